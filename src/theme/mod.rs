//! Theme System for inkpaste
//!
//! Every decoration the renderer emits is derived from a handful of resolved
//! records, passed explicitly into each parse call:
//!
//! - [`ColorTheme`] - the palette (primary accent, text, surfaces)
//! - [`CodeTheme`] - syntax colors and code-block chrome flags
//! - [`ThemeSystem`] - layout/decoration family, selects the copy adapter
//! - [`FontSettings`](crate::fonts::FontSettings) - family, size, spacing
//!
//! Callers usually hold only ids or partially filled records. The
//! [`ThemeResolver`] fills the gaps from the built-in tables in `presets`.
//!
//! # Architecture
//!
//! - `presets.rs` - built-in color themes, code styles and theme systems
//! - `resolve.rs` - partial/id-only reference → complete record

pub mod presets;
pub mod resolve;

pub use resolve::{ResolvedTheme, ThemeResolver};

use serde::{Deserialize, Serialize};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Color
// ─────────────────────────────────────────────────────────────────────────────

/// An opaque sRGB color. Serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a color from its channels.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb` (the `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let mut channels = hex
                    .chars()
                    .map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Self::from_rgb(
                    channels.next()??,
                    channels.next()??,
                    channels.next()??,
                ))
            }
            6 => Some(Self::from_rgb(
                u8::from_str_radix(&hex[0..2], 16).ok()?,
                u8::from_str_radix(&hex[2..4], 16).ok()?,
                u8::from_str_radix(&hex[4..6], 16).ok()?,
            )),
            _ => None,
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS `rgba()` with the given alpha.
    pub fn rgba(&self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }

    /// Multiply every channel by `factor`, rounding to the nearest integer.
    pub fn scale(&self, factor: f32) -> Self {
        let channel = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Self::from_rgb(channel(self.r), channel(self.g), channel(self.b))
    }

    /// Darken by `amount` in `0.0..=1.0` (0.2 keeps 80% of each channel).
    pub fn darken(&self, amount: f32) -> Self {
        self.scale(1.0 - amount.clamp(0.0, 1.0))
    }

    /// Relative brightness in `0.0..=1.0` (ITU-R BT.601 weights).
    pub fn brightness(&self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }

    /// Whether light text reads better on top of this color.
    pub fn is_dark(&self) -> bool {
        self.brightness() < 0.5
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color '{}'", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Color Theme
// ─────────────────────────────────────────────────────────────────────────────

/// A complete color palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorTheme {
    pub id: String,
    pub name: String,
    /// Accent color: headings, links, list markers, quote bars
    pub primary: Color,
    /// Body text
    pub text: Color,
    /// Secondary text: quotes, captions, finished tasks
    pub text_muted: Color,
    pub background: Color,
    pub border: Color,
    /// Subtle fill for zebra rows and panels
    pub surface: Color,
    pub inline_code_bg: Color,
    pub inline_code_text: Color,
    /// Background for `==highlighted==` text
    pub highlight: Color,
}

impl ColorTheme {
    /// Overlay the fields set in `partial` onto this theme.
    pub fn merged_with(&self, partial: &PartialColorTheme) -> Self {
        Self {
            id: partial.id.clone().unwrap_or_else(|| self.id.clone()),
            name: partial.name.clone().unwrap_or_else(|| self.name.clone()),
            primary: partial.primary.unwrap_or(self.primary),
            text: partial.text.unwrap_or(self.text),
            text_muted: partial.text_muted.unwrap_or(self.text_muted),
            background: partial.background.unwrap_or(self.background),
            border: partial.border.unwrap_or(self.border),
            surface: partial.surface.unwrap_or(self.surface),
            inline_code_bg: partial.inline_code_bg.unwrap_or(self.inline_code_bg),
            inline_code_text: partial.inline_code_text.unwrap_or(self.inline_code_text),
            highlight: partial.highlight.unwrap_or(self.highlight),
        }
    }
}

/// A possibly-partial color theme reference. An id alone selects a preset;
/// any other field overrides the preset's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialColorTheme {
    pub id: Option<String>,
    pub name: Option<String>,
    pub primary: Option<Color>,
    pub text: Option<Color>,
    pub text_muted: Option<Color>,
    pub background: Option<Color>,
    pub border: Option<Color>,
    pub surface: Option<Color>,
    pub inline_code_bg: Option<Color>,
    pub inline_code_text: Option<Color>,
    pub highlight: Option<Color>,
}

impl PartialColorTheme {
    /// A reference that only names a preset.
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Override the primary color.
    pub fn with_primary(mut self, primary: Color) -> Self {
        self.primary = Some(primary);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Code Theme
// ─────────────────────────────────────────────────────────────────────────────

/// Syntax palette and chrome flags for fenced code blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeTheme {
    pub id: String,
    pub background: Color,
    pub foreground: Color,
    pub comment: Color,
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub function: Color,
    pub border: Color,
    /// Draw the three window-control dots above the code
    pub show_dots: bool,
    /// Draw a header bar with the language name
    pub show_header: bool,
}

impl CodeTheme {
    /// Overlay the fields set in `partial` onto this code theme.
    pub fn merged_with(&self, partial: &PartialCodeTheme) -> Self {
        Self {
            id: partial.id.clone().unwrap_or_else(|| self.id.clone()),
            background: partial.background.unwrap_or(self.background),
            foreground: partial.foreground.unwrap_or(self.foreground),
            comment: partial.comment.unwrap_or(self.comment),
            keyword: partial.keyword.unwrap_or(self.keyword),
            string: partial.string.unwrap_or(self.string),
            number: partial.number.unwrap_or(self.number),
            function: partial.function.unwrap_or(self.function),
            border: partial.border.unwrap_or(self.border),
            show_dots: partial.show_dots.unwrap_or(self.show_dots),
            show_header: partial.show_header.unwrap_or(self.show_header),
        }
    }

    /// Chrome is drawn when either flag is set.
    pub fn has_chrome(&self) -> bool {
        self.show_dots || self.show_header
    }
}

/// A possibly-partial code theme reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialCodeTheme {
    pub id: Option<String>,
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    pub comment: Option<Color>,
    pub keyword: Option<Color>,
    pub string: Option<Color>,
    pub number: Option<Color>,
    pub function: Option<Color>,
    pub border: Option<Color>,
    pub show_dots: Option<bool>,
    pub show_header: Option<bool>,
}

impl PartialCodeTheme {
    /// A reference that only names a preset.
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme System
// ─────────────────────────────────────────────────────────────────────────────

/// A named bundle of layout rules, independent of palette. The id also keys
/// the copy-adapter registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSystem {
    pub id: String,
    pub name: String,
    /// Bottom margin of paragraphs, in `em`
    pub paragraph_spacing: f32,
    /// Scales the vertical margins around headings
    pub heading_spacing: f32,
    /// Justify paragraph text
    pub justify: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#00A86B"), Some(Color::from_rgb(0, 168, 107)));
        assert_eq!(Color::from_hex("00a86b"), Some(Color::from_rgb(0, 168, 107)));
        assert_eq!(Color::from_hex("#fff"), Some(Color::from_rgb(255, 255, 255)));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#gggggg"), None);
    }

    #[test]
    fn test_color_to_hex_lowercase() {
        assert_eq!(Color::from_rgb(0, 168, 107).to_hex(), "#00a86b");
    }

    #[test]
    fn test_color_scale_rounds_each_channel() {
        let primary = Color::from_rgb(0, 168, 107);
        assert_eq!(primary.scale(1.0), primary);
        // 168 * 0.7 = 117.6, 107 * 0.7 = 74.9
        assert_eq!(primary.scale(0.7), Color::from_rgb(0, 118, 75));
        // 168 * 0.5 = 84, 107 * 0.5 = 53.5
        assert_eq!(primary.scale(0.5), Color::from_rgb(0, 84, 54));
        // 168 * 0.3 = 50.4, 107 * 0.3 = 32.1
        assert_eq!(primary.scale(0.3), Color::from_rgb(0, 50, 32));
    }

    #[test]
    fn test_color_rgba() {
        assert_eq!(Color::from_rgb(1, 2, 3).rgba(0.5), "rgba(1, 2, 3, 0.5)");
    }

    #[test]
    fn test_color_is_dark() {
        assert!(Color::from_rgb(30, 30, 30).is_dark());
        assert!(!Color::from_rgb(250, 250, 250).is_dark());
    }

    #[test]
    fn test_color_serde_as_hex_string() {
        let json = serde_json::to_string(&Color::from_rgb(255, 0, 16)).unwrap();
        assert_eq!(json, "\"#ff0010\"");
        let back: Color = serde_json::from_str("\"#FF0010\"").unwrap();
        assert_eq!(back, Color::from_rgb(255, 0, 16));
        assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    }

    #[test]
    fn test_merge_partial_color_theme() {
        let base = presets::default_color_theme();
        let partial = PartialColorTheme::id("custom").with_primary(Color::from_rgb(1, 2, 3));
        let merged = base.merged_with(&partial);
        assert_eq!(merged.id, "custom");
        assert_eq!(merged.primary, Color::from_rgb(1, 2, 3));
        assert_eq!(merged.text, base.text);
    }

    #[test]
    fn test_merge_partial_code_theme_flags() {
        let base = presets::default_code_theme();
        let partial = PartialCodeTheme {
            show_dots: Some(true),
            ..Default::default()
        };
        let merged = base.merged_with(&partial);
        assert!(merged.show_dots);
        assert_eq!(merged.keyword, base.keyword);
    }
}
