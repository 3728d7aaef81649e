//! Font settings and platform-safe font families
//!
//! Pasted markup cannot ship font files, so a font "family" here is an id that
//! maps to a CSS font stack made only of fonts that ship with common operating
//! systems. Unknown ids are accepted as raw CSS when they look like a plain
//! family list, otherwise they fall back to the system stack.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Font Family Table
// ─────────────────────────────────────────────────────────────────────────────

/// Id of the default font family.
pub const DEFAULT_FONT_FAMILY: &str = "system";
/// Default base font size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;
/// Line height applied when the settings leave it unset.
pub const DEFAULT_LINE_HEIGHT: f32 = 1.75;
/// Letter spacing (px) applied when the settings leave it unset.
pub const DEFAULT_LETTER_SPACING: f32 = 0.0;

/// Smallest accepted base font size.
pub const MIN_FONT_SIZE: f32 = 10.0;
/// Largest accepted base font size.
pub const MAX_FONT_SIZE: f32 = 32.0;

/// `(id, CSS font stack)` pairs.
const FONT_FAMILIES: &[(&str, &str)] = &[
    (
        "system",
        "-apple-system, BlinkMacSystemFont, 'Segoe UI', 'Helvetica Neue', 'PingFang SC', 'Microsoft YaHei', Arial, sans-serif",
    ),
    (
        "sans",
        "'Helvetica Neue', Helvetica, 'Hiragino Sans GB', 'Microsoft YaHei', Arial, sans-serif",
    ),
    (
        "serif",
        "Georgia, 'Times New Roman', 'Songti SC', SimSun, serif",
    ),
    (
        "mono",
        "'SF Mono', Menlo, Consolas, 'Liberation Mono', 'Courier New', monospace",
    ),
    (
        "rounded",
        "'SF Pro Rounded', 'Hiragino Maru Gothic ProN', 'Arial Rounded MT Bold', sans-serif",
    ),
];

/// Font stack used inside code blocks and inline code.
pub const CODE_FONT_STACK: &str =
    "'SF Mono', Menlo, Consolas, 'Liberation Mono', 'Courier New', monospace";

/// Ids of all built-in font families.
pub fn family_ids() -> impl Iterator<Item = &'static str> {
    FONT_FAMILIES.iter().map(|(id, _)| *id)
}

/// Resolve a family id (or raw CSS family list) to a CSS font stack.
pub fn font_stack(family: &str) -> String {
    let family = family.trim();
    if let Some((_, stack)) = FONT_FAMILIES
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(family))
    {
        return (*stack).to_string();
    }
    if is_safe_css_family_list(family) {
        return family.to_string();
    }
    log::debug!("Unknown font family '{}', using system stack", family);
    FONT_FAMILIES[0].1.to_string()
}

/// A raw family list may only contain names, spaces, commas, hyphens and
/// single quotes; anything else could break out of the style attribute.
fn is_safe_css_family_list(family: &str) -> bool {
    !family.is_empty()
        && family
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, ' ' | ',' | '-' | '\'' | '_'))
}

// ─────────────────────────────────────────────────────────────────────────────
// Font Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Resolved typography settings for one parse call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSettings {
    /// Family id from the table above, or a raw CSS family list
    pub font_family: String,
    /// Base size in pixels
    pub font_size: f32,
    /// Unitless line height
    pub line_height: Option<f32>,
    /// Letter spacing in pixels
    pub letter_spacing: Option<f32>,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            line_height: None,
            letter_spacing: None,
        }
    }
}

impl FontSettings {
    /// Overlay the fields set in `partial`, clamping the size.
    pub fn merged_with(&self, partial: &PartialFontSettings) -> Self {
        Self {
            font_family: partial
                .font_family
                .clone()
                .unwrap_or_else(|| self.font_family.clone()),
            font_size: partial
                .font_size
                .unwrap_or(self.font_size)
                .clamp(MIN_FONT_SIZE, MAX_FONT_SIZE),
            line_height: partial.line_height.or(self.line_height),
            letter_spacing: partial.letter_spacing.or(self.letter_spacing),
        }
    }

    /// Line height with the default filled in.
    pub fn effective_line_height(&self) -> f32 {
        self.line_height.unwrap_or(DEFAULT_LINE_HEIGHT)
    }

    /// Letter spacing with the default filled in.
    pub fn effective_letter_spacing(&self) -> f32 {
        self.letter_spacing.unwrap_or(DEFAULT_LETTER_SPACING)
    }

    /// CSS font stack for the family.
    pub fn css_font_family(&self) -> String {
        font_stack(&self.font_family)
    }

    /// `16px`
    pub fn css_font_size(&self) -> String {
        format!("{}px", format_number(self.font_size))
    }

    /// `1.75`
    pub fn css_line_height(&self) -> String {
        format_number(self.effective_line_height())
    }

    /// `0.5px`
    pub fn css_letter_spacing(&self) -> String {
        format!("{}px", format_number(self.effective_letter_spacing()))
    }
}

/// A possibly-partial font settings reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialFontSettings {
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub line_height: Option<f32>,
    pub letter_spacing: Option<f32>,
}

/// Format a CSS number without a trailing `.0` and with at most two decimals.
pub fn format_number(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{:.2}", rounded);
        s.trim_end_matches('0').to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_stack_known_ids() {
        assert!(font_stack("serif").contains("Georgia"));
        assert!(font_stack("MONO").contains("monospace"));
        assert!(font_stack("system").contains("-apple-system"));
    }

    #[test]
    fn test_font_stack_raw_family_list() {
        assert_eq!(font_stack("'Noto Serif', serif"), "'Noto Serif', serif");
    }

    #[test]
    fn test_font_stack_rejects_injection() {
        let stack = font_stack("x\"; background: url(evil)");
        assert!(stack.contains("-apple-system"));
        assert!(!stack.contains("evil"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(16.0), "16");
        assert_eq!(format_number(1.75), "1.75");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.333), "1.33");
    }

    #[test]
    fn test_effective_defaults() {
        let font = FontSettings::default();
        assert_eq!(font.css_font_size(), "16px");
        assert_eq!(font.css_line_height(), "1.75");
        assert_eq!(font.css_letter_spacing(), "0px");
    }

    #[test]
    fn test_merge_clamps_font_size() {
        let partial = PartialFontSettings {
            font_size: Some(4.0),
            ..Default::default()
        };
        let font = FontSettings::default().merged_with(&partial);
        assert_eq!(font.font_size, MIN_FONT_SIZE);
    }

    #[test]
    fn test_family_ids() {
        let ids: Vec<&str> = family_ids().collect();
        assert_eq!(ids[0], DEFAULT_FONT_FAMILY);
        assert!(ids.contains(&"serif"));
    }
}
