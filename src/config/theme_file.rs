//! User theme files
//!
//! A TOML file defining a color theme, a code theme, or both. Each section
//! extends a built-in record and registers the result under its own id:
//!
//! ```toml
//! [color]
//! id = "brand"
//! extends = "ocean"
//! primary = "#ff6600"
//!
//! [code]
//! id = "brand-code"
//! show_header = true
//! ```

use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::theme::{PartialCodeTheme, PartialColorTheme, ThemeResolver};

/// Id given to a section that doesn't name itself.
pub const CUSTOM_THEME_ID: &str = "custom";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColorThemeEntry {
    /// Preset to start from; the default preset when absent
    pub extends: Option<String>,
    #[serde(flatten)]
    pub theme: PartialColorTheme,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CodeThemeEntry {
    pub extends: Option<String>,
    #[serde(flatten)]
    pub theme: PartialCodeTheme,
}

/// Parsed theme file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeFile {
    pub color: Option<ColorThemeEntry>,
    pub code: Option<CodeThemeEntry>,
}

impl ThemeFile {
    /// Read and parse `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::ThemeFile {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        let file: Self = toml::from_str(&contents).map_err(|e| Error::ThemeFile {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        info!("Loaded theme file {}", path.display());
        Ok(file)
    }

    /// Id of the color theme this file defines.
    pub fn color_id(&self) -> Option<String> {
        self.color.as_ref().map(|entry| entry_id(&entry.theme.id))
    }

    /// Id of the code theme this file defines.
    pub fn code_id(&self) -> Option<String> {
        self.code.as_ref().map(|entry| entry_id(&entry.theme.id))
    }

    /// Register the file's records with `resolver`.
    pub fn install(&self, mut resolver: ThemeResolver) -> ThemeResolver {
        if let (Some(entry), Some(id)) = (&self.color, self.color_id()) {
            let mut theme = resolver
                .color_theme(entry.extends.as_deref())
                .merged_with(&entry.theme);
            theme.id = id;
            resolver = resolver.with_color_theme(theme);
        }
        if let (Some(entry), Some(id)) = (&self.code, self.code_id()) {
            let mut theme = resolver
                .code_theme(entry.extends.as_deref())
                .merged_with(&entry.theme);
            theme.id = id;
            resolver = resolver.with_code_theme(theme);
        }
        resolver
    }
}

fn entry_id(id: &Option<String>) -> String {
    id.as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(CUSTOM_THEME_ID)
        .to_string()
}
