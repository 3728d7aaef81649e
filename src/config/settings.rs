//! User settings for inkpaste
//!
//! This module defines the `Settings` struct that holds the persisted render
//! defaults (selected theme, code theme, theme system and typography), with
//! serde support for JSON persistence.

use serde::{Deserialize, Serialize};

use crate::fonts::{
    self, PartialFontSettings, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, MAX_FONT_SIZE,
    MIN_FONT_SIZE,
};
use crate::markdown::ParseOptions;
use crate::theme::{presets, PartialCodeTheme, PartialColorTheme};

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Persisted render defaults.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have defaults via the `Default` trait and `#[serde(default)]`, so
/// a file written by an older version still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Themes
    // ─────────────────────────────────────────────────────────────────────────
    /// Color theme id
    pub theme: String,

    /// Code theme id
    pub code_theme: String,

    /// Theme system id (also selects the copy adapter)
    pub theme_system: String,

    /// Field overrides applied on top of the selected color theme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_theme: Option<PartialColorTheme>,

    // ─────────────────────────────────────────────────────────────────────────
    // Typography
    // ─────────────────────────────────────────────────────────────────────────
    /// Font family id or raw CSS family list
    pub font_family: String,

    /// Base font size in pixels
    pub font_size: f32,

    /// Unitless line height; `None` uses the built-in default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,

    /// Letter spacing in pixels; `None` uses the built-in default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f32>,

    // ─────────────────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────────────────
    /// Compact the output (see `ParseOptions::clean_html`)
    pub clean_html: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: presets::DEFAULT_COLOR_THEME.to_string(),
            code_theme: presets::DEFAULT_CODE_THEME.to_string(),
            theme_system: presets::DEFAULT_THEME_SYSTEM.to_string(),
            custom_theme: None,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            line_height: None,
            letter_spacing: None,
            clean_html: false,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum allowed line height.
    pub const MIN_LINE_HEIGHT: f32 = 1.0;
    /// Maximum allowed line height.
    pub const MAX_LINE_HEIGHT: f32 = 3.0;
    /// Minimum allowed letter spacing.
    pub const MIN_LETTER_SPACING: f32 = -2.0;
    /// Maximum allowed letter spacing.
    pub const MAX_LETTER_SPACING: f32 = 10.0;

    /// Sanitize settings by clamping values to valid ranges and replacing
    /// blank ids with the defaults.
    ///
    /// Unknown ids are kept: they may name records from a theme file, and
    /// the resolver falls back on its own when they don't.
    pub fn sanitize(&mut self) {
        let defaults = Self::default();

        for (field, default) in [
            (&mut self.theme, defaults.theme),
            (&mut self.code_theme, defaults.code_theme),
            (&mut self.theme_system, defaults.theme_system),
            (&mut self.font_family, defaults.font_family),
        ] {
            let trimmed = field.trim();
            *field = if trimmed.is_empty() {
                default
            } else {
                trimmed.to_string()
            };
        }

        if !self.font_size.is_finite() {
            self.font_size = DEFAULT_FONT_SIZE;
        }
        self.font_size = self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);

        self.line_height = self
            .line_height
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(Self::MIN_LINE_HEIGHT, Self::MAX_LINE_HEIGHT));
        self.letter_spacing = self
            .letter_spacing
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(Self::MIN_LETTER_SPACING, Self::MAX_LETTER_SPACING));

        // An override block that sets nothing is noise in the file
        if self.custom_theme.as_ref() == Some(&PartialColorTheme::default()) {
            self.custom_theme = None;
        }
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Render options for these defaults.
    pub fn to_parse_options(&self) -> ParseOptions {
        let mut theme = self.custom_theme.clone().unwrap_or_default();
        theme.id = Some(self.theme.clone());

        ParseOptions {
            theme: Some(theme),
            code_theme: Some(PartialCodeTheme::id(&self.code_theme)),
            theme_system: Some(self.theme_system.clone()),
            is_preview: false,
            clean_html: self.clean_html,
            font_settings: Some(PartialFontSettings {
                font_family: Some(self.font_family.clone()),
                font_size: Some(self.font_size),
                line_height: self.line_height,
                letter_spacing: self.letter_spacing,
            }),
        }
    }

    /// Whether `font_family` names a built-in family rather than a raw list.
    pub fn uses_builtin_font(&self) -> bool {
        fonts::family_ids().any(|id| id.eq_ignore_ascii_case(&self.font_family))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
