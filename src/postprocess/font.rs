//! FontProcessor
//!
//! Gives every block element explicit typography so the paste target's own
//! stylesheet can't resize it. Declarations already present are kept as they
//! are; only the missing ones are appended.

use super::css::{append_declarations, rewrite_styles, StyleDecls};
use crate::fonts::FontSettings;

/// Elements that carry their own typography.
pub const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "td", "th",
];

/// Adds font-size, line-height and letter-spacing to block elements.
#[derive(Debug, Clone)]
pub struct FontProcessor {
    declarations: [(&'static str, String); 3],
}

impl FontProcessor {
    pub fn new(font: &FontSettings) -> Self {
        Self {
            declarations: [
                ("font-size", font.css_font_size()),
                ("line-height", font.css_line_height()),
                ("letter-spacing", font.css_letter_spacing()),
            ],
        }
    }

    pub fn process(&self, html: &str) -> String {
        rewrite_styles(
            html,
            |name| BLOCK_TAGS.contains(&name),
            |_, style| {
                let Some(style) = style else {
                    return Some(append_declarations("", &self.declarations));
                };
                let existing = StyleDecls::parse(style);
                let missing: Vec<(&str, String)> = self
                    .declarations
                    .iter()
                    .filter(|(prop, _)| !existing.has(prop))
                    .cloned()
                    .collect();
                (!missing.is_empty()).then(|| append_declarations(style, &missing))
            },
        )
    }
}
