//! Markdown parsing and inline-styled rendering
//!
//! A line-oriented renderer: each line is dispatched through a chain of
//! strategies (code block, blank, blockquote close, table, list, single-line
//! constructs, paragraph) which emit self-contained fragments. The joined
//! fragments then pass through the post-processing stage.
//!
//! # Architecture
//!
//! - `parser.rs` - coordinator loop and end-of-input flushing
//! - `strategy.rs` - the [`LineStrategy`](strategy::LineStrategy) chain
//! - `context.rs` - per-call parse state
//! - `inline.rs` - character-level formatting inside a line
//! - `table.rs`, `list.rs` - sub-processors
//! - `heading.rs`, `code_block.rs`, `syntax.rs`, `blockquote.rs` - block
//!   formatters
//! - `url.rs` - link target sanitization
//!
//! # Example
//! ```
//! use inkpaste::markdown::{parse, ParseOptions};
//! use inkpaste::theme::PartialColorTheme;
//!
//! let options = ParseOptions {
//!     theme: Some(PartialColorTheme::id("ocean")),
//!     ..Default::default()
//! };
//! let html = parse("## Section", &options).unwrap();
//! assert!(html.contains("#1e88e5"));
//! ```

pub mod blockquote;
pub mod code_block;
pub mod context;
pub mod heading;
pub mod inline;
pub mod list;
pub mod parser;
pub mod strategy;
pub mod syntax;
pub mod table;
pub mod url;

pub use inline::format_inline;

use std::sync::OnceLock;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fonts::PartialFontSettings;
use crate::postprocess::{self, adapters::AdapterRegistry, adapters::CopyAdapter};
use crate::theme::{PartialCodeTheme, PartialColorTheme, ThemeResolver};

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Per-call rendering options. Every theme reference may be partial or absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Color theme reference (id and/or overrides)
    pub theme: Option<PartialColorTheme>,
    /// Code theme reference
    pub code_theme: Option<PartialCodeTheme>,
    /// Theme system id
    pub theme_system: Option<String>,
    /// Render for an in-app preview: bare headings, no font or platform
    /// post-processing
    pub is_preview: bool,
    /// Strip newlines between tags, empty paragraphs and internal markers
    pub clean_html: bool,
    pub font_settings: Option<PartialFontSettings>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parser
// ─────────────────────────────────────────────────────────────────────────────

/// Renderer with its theme tables and copy adapters.
///
/// [`parse`] uses a shared default instance; build one of these to register
/// extra themes or adapters.
#[derive(Debug)]
pub struct MarkdownParser {
    resolver: ThemeResolver,
    adapters: AdapterRegistry,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self {
            resolver: ThemeResolver::default(),
            adapters: AdapterRegistry::with_builtin(),
        }
    }
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the theme tables.
    pub fn with_resolver(mut self, resolver: ThemeResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Register a copy adapter for a theme system id.
    pub fn with_adapter(mut self, system_id: &str, adapter: impl CopyAdapter + 'static) -> Self {
        self.adapters.register(system_id, adapter);
        self
    }

    pub fn resolver(&self) -> &ThemeResolver {
        &self.resolver
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    /// Render `markdown` to inline-styled markup.
    ///
    /// Blank input yields an empty string. Content never produces an error;
    /// the error cases are internal dispatch defects.
    pub fn parse(&self, markdown: &str, options: &ParseOptions) -> Result<String> {
        if markdown.trim().is_empty() {
            return Ok(String::new());
        }

        let theme = self.resolver.resolve(options);
        let body = parser::render_blocks(markdown, theme.clone(), options.is_preview)?;
        let html = postprocess::run(&body, &theme, options, &self.adapters);

        debug!(
            "Parsed {} bytes of markdown into {} bytes of markup",
            markdown.len(),
            html.len()
        );
        Ok(html)
    }
}

/// Render `markdown` with the built-in themes and adapters.
pub fn parse(markdown: &str, options: &ParseOptions) -> Result<String> {
    static DEFAULT: OnceLock<MarkdownParser> = OnceLock::new();
    DEFAULT
        .get_or_init(MarkdownParser::default)
        .parse(markdown, options)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
