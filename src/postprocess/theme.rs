//! ThemeProcessor
//!
//! Re-derives every primary-colored decoration from the active theme: quote
//! bars and gradients, table borders and header tint, the h2 accent bar and
//! gradient heading text. Values are overwritten, never appended, so running
//! the processor again changes nothing.

use super::css::{rewrite_styles, StyleDecls};
use crate::theme::ColorTheme;

#[derive(Debug, Clone)]
pub struct ThemeProcessor {
    quote_border: String,
    quote_background: String,
    cell_border: String,
    header_tint: String,
    accent_bar: String,
    gradient: String,
    primary: String,
}

impl ThemeProcessor {
    pub fn new(theme: &ColorTheme) -> Self {
        let primary = theme.primary;
        Self {
            quote_border: format!("4px solid {}", primary),
            quote_background: format!(
                "linear-gradient(to right, {}, {})",
                primary.rgba(0.08),
                primary.rgba(0.02)
            ),
            cell_border: format!("1px solid {}", primary.rgba(0.2)),
            header_tint: primary.rgba(0.08),
            accent_bar: format!("4px solid {}", primary),
            gradient: format!("linear-gradient(135deg, {}, {})", primary, primary.darken(0.2)),
            primary: primary.to_hex(),
        }
    }

    pub fn process(&self, html: &str) -> String {
        rewrite_styles(html, |_| true, |name, style| {
            let style = style?;
            let mut decls = StyleDecls::parse(style);
            let before = decls.clone();

            match name {
                "blockquote" => {
                    decls.set("border-left", &self.quote_border);
                    decls.set("background", &self.quote_background);
                }
                "td" => decls.set("border", &self.cell_border),
                "th" => {
                    decls.set("border", &self.cell_border);
                    if !is_solid_header(&decls) {
                        decls.set("background-color", &self.header_tint);
                    }
                }
                "h2" if decls.has("border-left") => decls.set("border-left", &self.accent_bar),
                _ => {}
            }
            if decls.get("background-clip") == Some("text") {
                decls.set("background", &self.gradient);
                decls.set("color", &self.primary);
            }

            (decls != before).then(|| decls.to_string())
        })
    }
}

/// Header cells restyled as solid blocks by a copy adapter keep their fill.
fn is_solid_header(decls: &StyleDecls) -> bool {
    decls.get("color") == Some("#ffffff")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{presets, Color, PartialColorTheme};

    fn ocean() -> ColorTheme {
        presets::default_color_theme()
            .merged_with(&PartialColorTheme::default().with_primary(Color::from_rgb(0x1e, 0x88, 0xe5)))
    }

    #[test]
    fn test_blockquote_normalized() {
        let html = r#"<blockquote style="margin: 1em 0; border-left: 2px solid red; background: none;">x</blockquote>"#;
        let out = ThemeProcessor::new(&ocean()).process(html);
        assert!(out.contains("border-left: 4px solid #1e88e5;"));
        assert!(out.contains("rgba(30, 136, 229, 0.08)"));
        assert!(out.contains("margin: 1em 0;"));
    }

    #[test]
    fn test_table_cells_normalized() {
        let html = r#"<th style="border: 1px solid red; background-color: red;">h</th><td style="border: 0;">d</td>"#;
        let out = ThemeProcessor::new(&ocean()).process(html);
        assert_eq!(out.matches("border: 1px solid rgba(30, 136, 229, 0.2);").count(), 2);
        assert!(out.contains("background-color: rgba(30, 136, 229, 0.08);"));
    }

    #[test]
    fn test_gradient_heading_normalized() {
        let html = r#"<span style="background: red; -webkit-background-clip: text; background-clip: text; color: red;">T</span>"#;
        let out = ThemeProcessor::new(&ocean()).process(html);
        assert!(out.contains("linear-gradient(135deg, #1e88e5,"));
        assert!(out.contains("color: #1e88e5;"));
    }

    #[test]
    fn test_unstyled_and_unrelated_tags_untouched() {
        let html = r#"<h2>bare</h2><p style="color: red;">p</p><blockquote>q</blockquote>"#;
        assert_eq!(ThemeProcessor::new(&ocean()).process(html), html);
    }

    #[test]
    fn test_idempotent() {
        let html = crate::markdown::parse(
            "# T\n## S\n> q\n\n| a |\n|---|\n| 1 |",
            &Default::default(),
        )
        .unwrap();
        let processor = ThemeProcessor::new(&presets::default_color_theme());
        let once = processor.process(&html);
        assert_eq!(processor.process(&once), once);
        assert_eq!(once, html);
    }
}
