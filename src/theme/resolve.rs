//! Theme Resolution
//!
//! Turns the partial, id-only or missing references in [`ParseOptions`] into
//! complete records. The parser never reads a theme field without this step
//! having run.
//!
//! Resolution rules, per record:
//!
//! 1. Start from the preset named by `id`, or the default preset when the id
//!    is absent or unknown (unknown ids are logged).
//! 2. Overlay every field the partial reference sets.
//!
//! # Usage
//!
//! ```ignore
//! let resolver = ThemeResolver::default();
//! let resolved = resolver.resolve(&ParseOptions::default());
//! assert_eq!(resolved.color.id, "emerald");
//! ```

use log::{debug, warn};

use super::presets;
use super::{CodeTheme, ColorTheme, ThemeSystem};
use crate::fonts::FontSettings;
use crate::markdown::ParseOptions;

// ─────────────────────────────────────────────────────────────────────────────
// Resolved Theme
// ─────────────────────────────────────────────────────────────────────────────

/// Every record one parse call needs, fully populated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTheme {
    pub color: ColorTheme,
    pub code: CodeTheme,
    pub system: ThemeSystem,
    pub font: FontSettings,
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        Self {
            color: presets::default_color_theme(),
            code: presets::default_code_theme(),
            system: presets::default_theme_system(),
            font: FontSettings::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme Resolver
// ─────────────────────────────────────────────────────────────────────────────

/// Lookup tables for resolving theme references.
///
/// Starts with the built-in presets; callers may register their own records
/// (e.g. loaded from a theme file) which shadow presets with the same id.
#[derive(Debug, Clone)]
pub struct ThemeResolver {
    color_themes: Vec<ColorTheme>,
    code_themes: Vec<CodeTheme>,
    systems: Vec<ThemeSystem>,
}

impl Default for ThemeResolver {
    fn default() -> Self {
        Self {
            color_themes: presets::color_themes(),
            code_themes: presets::code_themes(),
            systems: presets::theme_systems(),
        }
    }
}

impl ThemeResolver {
    /// Register (or replace) a color theme.
    pub fn with_color_theme(mut self, theme: ColorTheme) -> Self {
        self.color_themes.retain(|t| t.id != theme.id);
        self.color_themes.insert(0, theme);
        self
    }

    /// Register (or replace) a code theme.
    pub fn with_code_theme(mut self, theme: CodeTheme) -> Self {
        self.code_themes.retain(|t| t.id != theme.id);
        self.code_themes.insert(0, theme);
        self
    }

    /// Register (or replace) a theme system.
    pub fn with_theme_system(mut self, system: ThemeSystem) -> Self {
        self.systems.retain(|s| s.id != system.id);
        self.systems.insert(0, system);
        self
    }

    /// Ids of all known color themes.
    pub fn color_theme_ids(&self) -> Vec<&str> {
        self.color_themes.iter().map(|t| t.id.as_str()).collect()
    }

    /// Ids of all known code themes.
    pub fn code_theme_ids(&self) -> Vec<&str> {
        self.code_themes.iter().map(|t| t.id.as_str()).collect()
    }

    /// Ids of all known theme systems.
    pub fn theme_system_ids(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.id.as_str()).collect()
    }

    /// Resolve every record referenced by `options`.
    pub fn resolve(&self, options: &ParseOptions) -> ResolvedTheme {
        let color = match &options.theme {
            Some(partial) => self
                .color_theme(partial.id.as_deref())
                .merged_with(partial),
            None => self.color_theme(None),
        };

        let code = match &options.code_theme {
            Some(partial) => self.code_theme(partial.id.as_deref()).merged_with(partial),
            None => self.code_theme(None),
        };

        let system = self.theme_system(options.theme_system.as_deref());

        let font = match &options.font_settings {
            Some(partial) => FontSettings::default().merged_with(partial),
            None => FontSettings::default(),
        };

        debug!(
            "Resolved theme: color={}, code={}, system={}, font={}@{}px",
            color.id, code.id, system.id, font.font_family, font.font_size
        );

        ResolvedTheme {
            color,
            code,
            system,
            font,
        }
    }

    /// The color theme with `id`, or the default one.
    pub fn color_theme(&self, id: Option<&str>) -> ColorTheme {
        lookup(&self.color_themes, id, |t| &t.id, "color theme")
            .unwrap_or_else(presets::default_color_theme)
    }

    /// The code theme with `id`, or the default one.
    pub fn code_theme(&self, id: Option<&str>) -> CodeTheme {
        lookup(&self.code_themes, id, |t| &t.id, "code theme")
            .unwrap_or_else(presets::default_code_theme)
    }

    /// The theme system with `id`, or the default one.
    pub fn theme_system(&self, id: Option<&str>) -> ThemeSystem {
        lookup(&self.systems, id, |s| &s.id, "theme system")
            .unwrap_or_else(presets::default_theme_system)
    }
}

/// Find the record with `id`. Missing id → `None` silently; unknown id →
/// `None` with a warning. Either way the caller falls back to the default.
fn lookup<T: Clone>(
    records: &[T],
    id: Option<&str>,
    id_of: impl Fn(&T) -> &String,
    what: &str,
) -> Option<T> {
    let id = id?;
    let found = records
        .iter()
        .find(|r| id_of(r).eq_ignore_ascii_case(id))
        .cloned();
    if found.is_none() {
        warn!("Unknown {} '{}', using default", what, id);
    }
    found
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::PartialFontSettings;
    use crate::theme::{Color, PartialCodeTheme, PartialColorTheme};

    #[test]
    fn test_resolve_defaults() {
        let resolved = ThemeResolver::default().resolve(&ParseOptions::default());
        assert_eq!(resolved, ResolvedTheme::default());
    }

    #[test]
    fn test_resolve_id_only() {
        let options = ParseOptions {
            theme: Some(PartialColorTheme::id("ocean")),
            code_theme: Some(PartialCodeTheme::id("monokai")),
            theme_system: Some("capsule".to_string()),
            ..Default::default()
        };
        let resolved = ThemeResolver::default().resolve(&options);
        assert_eq!(resolved.color.id, "ocean");
        assert_eq!(resolved.color.primary, Color::from_rgb(0x1e, 0x88, 0xe5));
        assert_eq!(resolved.code.id, "monokai");
        assert!(resolved.code.show_dots);
        assert_eq!(resolved.system.id, "capsule");
    }

    #[test]
    fn test_resolve_partial_without_id_uses_default_base() {
        let options = ParseOptions {
            theme: Some(PartialColorTheme::default().with_primary(Color::from_rgb(9, 9, 9))),
            ..Default::default()
        };
        let resolved = ThemeResolver::default().resolve(&options);
        assert_eq!(resolved.color.id, "emerald");
        assert_eq!(resolved.color.primary, Color::from_rgb(9, 9, 9));
    }

    #[test]
    fn test_resolve_unknown_id_falls_back() {
        let options = ParseOptions {
            theme: Some(PartialColorTheme::id("no-such-theme")),
            theme_system: Some("nope".to_string()),
            ..Default::default()
        };
        let resolved = ThemeResolver::default().resolve(&options);
        assert_eq!(resolved.color.primary, presets::default_color_theme().primary);
        assert_eq!(resolved.system.id, "classic");
    }

    #[test]
    fn test_resolve_font_settings() {
        let options = ParseOptions {
            font_settings: Some(PartialFontSettings {
                font_family: Some("serif".to_string()),
                font_size: Some(18.0),
                line_height: Some(2.0),
                letter_spacing: None,
            }),
            ..Default::default()
        };
        let font = ThemeResolver::default().resolve(&options).font;
        assert_eq!(font.font_family, "serif");
        assert_eq!(font.font_size, 18.0);
        assert_eq!(font.line_height, Some(2.0));
        assert_eq!(font.letter_spacing, None);
    }

    #[test]
    fn test_registered_theme_shadows_preset() {
        let mut custom = presets::default_color_theme();
        custom.id = "ocean".to_string();
        custom.primary = Color::from_rgb(1, 1, 1);
        let resolver = ThemeResolver::default().with_color_theme(custom);
        let options = ParseOptions {
            theme: Some(PartialColorTheme::id("ocean")),
            ..Default::default()
        };
        assert_eq!(resolver.resolve(&options).color.primary, Color::from_rgb(1, 1, 1));
        assert_eq!(
            resolver.color_theme_ids().iter().filter(|id| **id == "ocean").count(),
            1
        );
    }
}
