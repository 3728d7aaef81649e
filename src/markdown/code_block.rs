//! Fenced code block formatter.
//!
//! The body is highlighted by [`super::syntax`]; this module adds the
//! container and the optional chrome bar (window dots, language label).

use super::syntax::highlight_code;
use crate::fonts::CODE_FONT_STACK;
use crate::string_utils::html_escape;
use crate::theme::CodeTheme;

/// Window-control dot colors: close, minimize, zoom.
const DOT_COLORS: [&str; 3] = ["#ff5f56", "#ffbd2e", "#27c93f"];

/// First word of a fence info string.
pub fn language_of(info: &str) -> &str {
    info.split_whitespace().next().unwrap_or("")
}

/// Render a complete code block from its body lines.
pub fn render_code_block(lines: &[String], language: &str, theme: &CodeTheme) -> String {
    let code = lines.join("\n");
    let body = highlight_code(&code, language, theme);

    let mut html = format!(
        r#"<section style="margin: 1em 0; border: 1px solid {border}; border-radius: 8px; overflow: hidden; background-color: {bg};">"#,
        border = theme.border,
        bg = theme.background,
    );

    if theme.has_chrome() {
        html.push_str(&render_chrome(language, theme));
    }

    html.push_str(&format!(
        r#"<pre style="margin: 0; padding: 12px 16px; overflow-x: auto; background-color: {bg};"><code style="display: block; font-family: {font}; font-size: 0.9em; line-height: 1.6; color: {fg}; white-space: nowrap;">{body}</code></pre></section>"#,
        bg = theme.background,
        font = CODE_FONT_STACK,
        fg = theme.foreground,
        body = body,
    ));

    html
}

fn render_chrome(language: &str, theme: &CodeTheme) -> String {
    let mut bar = format!(
        r#"<section style="display: flex; align-items: center; padding: 8px 12px; border-bottom: 1px solid {};">"#,
        theme.border
    );

    if theme.show_dots {
        for color in DOT_COLORS {
            bar.push_str(&format!(
                r#"<span style="display: inline-block; width: 12px; height: 12px; margin-right: 6px; border-radius: 50%; background-color: {};"></span>"#,
                color
            ));
        }
    }

    if theme.show_header && !language.is_empty() {
        bar.push_str(&format!(
            r#"<span style="margin-left: auto; font-family: {font}; font-size: 12px; color: {fg}; text-transform: uppercase; letter-spacing: 0.05em;">{lang}</span>"#,
            font = CODE_FONT_STACK,
            fg = theme.comment,
            lang = html_escape(language),
        ));
    }

    bar.push_str("</section>");
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{presets, PartialCodeTheme};

    fn lines(code: &str) -> Vec<String> {
        code.lines().map(String::from).collect()
    }

    #[test]
    fn test_language_of() {
        assert_eq!(language_of("rust ignore"), "rust");
        assert_eq!(language_of("   "), "");
    }

    #[test]
    fn test_render_without_chrome() {
        let theme = presets::code_themes()
            .into_iter()
            .find(|t| t.id == "solarized-light")
            .unwrap();
        let html = render_code_block(&lines("x = 1"), "python", &theme);
        assert!(!html.contains("border-radius: 50%"));
        assert!(!html.contains("PYTHON") && !html.contains(">python</span>"));
        assert!(html.contains("<pre"));
    }

    #[test]
    fn test_render_dots_and_header() {
        let theme = presets::default_code_theme().merged_with(&PartialCodeTheme {
            show_dots: Some(true),
            ..Default::default()
        });
        let html = render_code_block(&lines("fn main() {}"), "rust", &theme);
        assert_eq!(html.matches("border-radius: 50%").count(), 3);
        assert!(html.contains(">rust</span>"));
    }

    #[test]
    fn test_language_label_is_escaped() {
        let theme = presets::default_code_theme();
        let html = render_code_block(&lines("x"), "<script>", &theme);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_body_lines_joined_with_breaks() {
        let html = render_code_block(&lines("a\nb"), "", &presets::default_code_theme());
        assert!(html.contains("a<br>b"));
    }
}
