//! ATX heading formatter.

use super::inline::format_inline;
use crate::fonts::format_number;
use crate::theme::ResolvedTheme;

/// Size (em) and top margin (em) for levels 3-6.
const MINOR_LEVELS: &[(f32, f32)] = &[(1.25, 1.4), (1.1, 1.2), (1.0, 1.0), (0.9, 1.0)];

/// Parse `# Title ##` into `(level, text)`.
pub fn parse_heading(trimmed: &str) -> Option<(u8, &str)> {
    let heading_re = regex!(r"^(#{1,6})(?:[ \t]+(.*?))?[ \t]*$");
    let caps = heading_re.captures(trimmed)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let text = caps.get(2).map_or("", |m| m.as_str());
    Some((level, strip_closing_hashes(text)))
}

/// `Title ##` → `Title`; a lone run of hashes is kept as text.
fn strip_closing_hashes(text: &str) -> &str {
    let without = text.trim_end_matches('#');
    if without.len() == text.len() {
        return text;
    }
    if without.is_empty() {
        return "";
    }
    if without.ends_with([' ', '\t']) {
        without.trim_end()
    } else {
        text
    }
}

/// Render a heading. Preview mode emits bare tags.
pub fn render_heading(level: u8, text: &str, theme: &ResolvedTheme, is_preview: bool) -> String {
    let level = level.clamp(1, 6);
    let content = format_inline(text, &theme.color, true);
    if is_preview {
        return format!("<h{level}>{content}</h{level}>");
    }

    let color = &theme.color;
    let spacing = theme.system.heading_spacing;
    let margin = |em: f32| format_number(em * spacing);

    match level {
        1 => format!(
            r#"<h1 style="margin: {top}em 0 {bottom}em; text-align: center; font-size: 1.6em; font-weight: bold; line-height: 1.4;"><span style="background: linear-gradient(135deg, {primary}, {dark}); -webkit-background-clip: text; background-clip: text; -webkit-text-fill-color: transparent; color: {primary};">{content}</span><span style="display: block; width: 48px; height: 3px; margin: 0.5em auto 0; border-radius: 2px; background-color: {primary};"></span></h1>"#,
            top = margin(1.6),
            bottom = margin(1.0),
            primary = color.primary,
            dark = color.primary.darken(0.2),
            content = content,
        ),
        2 => format!(
            r#"<h2 style="margin: {top}em 0 {bottom}em; padding-left: 12px; border-left: 4px solid {primary}; font-size: 1.4em; font-weight: bold; line-height: 1.4; color: {text};">{content}</h2>"#,
            top = margin(1.5),
            bottom = margin(0.8),
            primary = color.primary,
            text = color.text,
            content = content,
        ),
        _ => {
            let (size, top) = MINOR_LEVELS[usize::from(level) - 3];
            let text_color = if level == 6 { color.text_muted } else { color.text };
            format!(
                r#"<h{level} style="margin: {top}em 0 {bottom}em; font-size: {size}em; font-weight: bold; line-height: 1.5; color: {text_color};">{content}</h{level}>"#,
                level = level,
                top = margin(top),
                bottom = margin(0.6),
                size = format_number(size),
                text_color = text_color,
                content = content,
            )
        }
    }
}
