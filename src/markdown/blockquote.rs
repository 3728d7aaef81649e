//! Blockquote formatter.
//!
//! The strategy chain buffers every line of a quote with the outermost `>`
//! removed. Rendering partitions that flat list by relative depth: lines with
//! no further `>` form paragraph runs of the current level, consecutive lines
//! that still start with `>` form a child quote rendered one level deeper.

use super::inline::format_inline;
use crate::theme::ColorTheme;

/// Spacing for one nesting level.
#[derive(Debug, Clone, Copy)]
struct LevelStyle {
    margin: &'static str,
    padding: &'static str,
    font_size: &'static str,
}

/// Levels 1-3; deeper levels use [`DEFAULT_LEVEL`].
const LEVEL_STYLES: [LevelStyle; 3] = [
    LevelStyle {
        margin: "1.2em 0",
        padding: "12px 16px",
        font_size: "0.95em",
    },
    LevelStyle {
        margin: "0.8em 0",
        padding: "10px 14px",
        font_size: "0.95em",
    },
    LevelStyle {
        margin: "0.6em 0",
        padding: "8px 12px",
        font_size: "0.92em",
    },
];

const DEFAULT_LEVEL: LevelStyle = LevelStyle {
    margin: "0.5em 0",
    padding: "6px 10px",
    font_size: "0.9em",
};

fn level_style(level: usize) -> LevelStyle {
    LEVEL_STYLES
        .get(level.saturating_sub(1))
        .copied()
        .unwrap_or(DEFAULT_LEVEL)
}

/// Content of `line` after one more `>` marker, if it has one.
pub fn strip_marker(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Render a buffered blockquote.
pub fn render_blockquote(lines: &[String], theme: &ColorTheme) -> String {
    render_level(lines, 1, theme)
}

fn render_level(lines: &[String], level: usize, theme: &ColorTheme) -> String {
    let mut body = String::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut nested: Vec<String> = Vec::new();

    for line in lines {
        match strip_marker(line) {
            Some(inner) => {
                flush_paragraph(&mut body, &mut paragraph, theme);
                nested.push(inner.to_string());
            }
            None => {
                flush_nested(&mut body, &mut nested, level, theme);
                let text = line.trim();
                if text.is_empty() {
                    flush_paragraph(&mut body, &mut paragraph, theme);
                } else {
                    paragraph.push(text);
                }
            }
        }
    }
    flush_paragraph(&mut body, &mut paragraph, theme);
    flush_nested(&mut body, &mut nested, level, theme);

    let style = level_style(level);
    format!(
        r#"<blockquote style="margin: {margin}; padding: {padding}; border-left: 4px solid {primary}; border-radius: 0 6px 6px 0; background: linear-gradient(to right, {from}, {to}); color: {muted}; font-size: {size};">{body}</blockquote>"#,
        margin = style.margin,
        padding = style.padding,
        primary = theme.primary,
        from = theme.primary.rgba(0.08),
        to = theme.primary.rgba(0.02),
        muted = theme.text_muted,
        size = style.font_size,
        body = body,
    )
}

fn flush_paragraph(body: &mut String, paragraph: &mut Vec<&str>, theme: &ColorTheme) {
    if paragraph.is_empty() {
        return;
    }
    let lines: Vec<String> = paragraph
        .drain(..)
        .map(|line| format_inline(line, theme, true))
        .collect();
    body.push_str(&format!(
        r#"<p style="margin: 0.3em 0; color: {};">{}</p>"#,
        theme.text_muted,
        lines.join("<br>")
    ));
}

fn flush_nested(body: &mut String, nested: &mut Vec<String>, level: usize, theme: &ColorTheme) {
    if nested.is_empty() {
        return;
    }
    body.push_str(&render_level(nested, level + 1, theme));
    nested.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::presets;

    fn render(lines: &[&str]) -> String {
        let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        render_blockquote(&lines, &presets::default_color_theme())
    }

    #[test]
    fn test_strip_marker() {
        assert_eq!(strip_marker("> a"), Some("a"));
        assert_eq!(strip_marker(">a"), Some("a"));
        assert_eq!(strip_marker(">"), Some(""));
        assert_eq!(strip_marker("a > b"), None);
    }

    #[test]
    fn test_single_level_lines_join_with_breaks() {
        let html = render(&["one", "two"]);
        assert_eq!(html.matches("<blockquote").count(), 1);
        assert!(html.contains("one<br>two"));
    }

    #[test]
    fn test_blank_line_splits_paragraphs() {
        let html = render(&["one", "", "two"]);
        assert_eq!(html.matches("<p ").count(), 2);
    }

    #[test]
    fn test_nested_levels() {
        let html = render(&["l1", "> l2"]);
        assert_eq!(html.matches("<blockquote").count(), 2);
        let inner = html.rfind("<blockquote").unwrap();
        assert!(html[inner..].contains("l2"));
        assert!(!html[inner..].contains("l1"));
        assert!(html[inner..].starts_with(r#"<blockquote style="margin: 0.8em 0; padding: 10px 14px;"#));
    }

    #[test]
    fn test_deep_nesting_uses_default_style() {
        let html = render(&["> > > > deep"]);
        assert_eq!(html.matches("<blockquote").count(), 5);
        assert!(html.contains("margin: 0.5em 0; padding: 6px 10px;"));
    }

    #[test]
    fn test_return_to_outer_level() {
        let html = render(&["a", "> b", "c"]);
        let inner_end = html.find("</blockquote>").unwrap();
        let c_pos = html.find(">c</p>").unwrap();
        assert!(c_pos > inner_end);
    }
}
