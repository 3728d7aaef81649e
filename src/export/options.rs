//! Export Options and Configuration
//!
//! Where rendered output goes and in what shape.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Export Format
// ─────────────────────────────────────────────────────────────────────────────

/// Output destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Write the markup to standard output
    #[default]
    Stdout,
    /// Write the markup to a file
    HtmlFile,
    /// Put the markup on the system clipboard as rich text
    Clipboard,
}

impl ExportFormat {
    /// Get the display label for this format.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Stdout => "Standard output",
            ExportFormat::HtmlFile => "HTML file",
            ExportFormat::Clipboard => "Clipboard",
        }
    }

    /// Get the file extension for this format (if applicable).
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ExportFormat::HtmlFile => Some("html"),
            ExportFormat::Stdout | ExportFormat::Clipboard => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for one export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,

    /// Target path for [`ExportFormat::HtmlFile`]
    pub output_path: Option<PathBuf>,

    /// Wrap the fragment in a standalone HTML document
    pub as_document: bool,

    /// Document title; only used with `as_document`
    pub title: Option<String>,
}

impl ExportOptions {
    /// Options for writing to `path`. A path without an extension gets `.html`.
    pub fn html_file(path: impl Into<PathBuf>) -> Self {
        let mut path = path.into();
        if path.extension().is_none() {
            if let Some(ext) = ExportFormat::HtmlFile.extension() {
                path.set_extension(ext);
            }
        }
        Self {
            format: ExportFormat::HtmlFile,
            output_path: Some(path),
            ..Default::default()
        }
    }

    /// Options for clipboard export.
    pub fn clipboard() -> Self {
        Self {
            format: ExportFormat::Clipboard,
            ..Default::default()
        }
    }

    /// Wrap the output in a document with `title`.
    pub fn with_document(mut self, title: Option<String>) -> Self {
        self.as_document = true;
        self.title = title;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_default() {
        assert_eq!(ExportFormat::default(), ExportFormat::Stdout);
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::HtmlFile.extension(), Some("html"));
        assert_eq!(ExportFormat::Clipboard.extension(), None);
    }

    #[test]
    fn test_html_file_adds_extension() {
        let options = ExportOptions::html_file("out/post");
        assert_eq!(options.output_path, Some(PathBuf::from("out/post.html")));

        let options = ExportOptions::html_file("post.htm");
        assert_eq!(options.output_path, Some(PathBuf::from("post.htm")));
    }

    #[test]
    fn test_with_document() {
        let options = ExportOptions::clipboard().with_document(Some("T".to_string()));
        assert_eq!(options.format, ExportFormat::Clipboard);
        assert!(options.as_document);
        assert_eq!(options.title.as_deref(), Some("T"));
    }

    #[test]
    fn test_export_options_serialization() {
        let options = ExportOptions::html_file("a.html");
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"htmlfile\""));
        let back: ExportOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }
}
