//! inkpaste - Markdown to paste-ready, inline-styled HTML
//!
//! Rich-text surfaces (mail composers, blogging back-ends, messaging editors)
//! usually strip `<style>` blocks, classes and a handful of element types on
//! paste. This crate renders Markdown into markup where every decoration lives
//! in a `style` attribute, so the result survives being pasted.
//!
//! # Architecture
//!
//! - `markdown` - the line-oriented parser: strategy chain, inline pipeline,
//!   table/list sub-processors and block formatters
//! - `postprocess` - font normalization, theme normalization, platform
//!   adaptation (outer containers, captions, copy adapters)
//! - `theme` / `fonts` - resolved theme records and the built-in value tables
//! - `config` - persisted settings (selected theme and font ids)
//! - `export` - clipboard and HTML file output
//!
//! # Example
//!
//! ```
//! use inkpaste::{parse, ParseOptions};
//!
//! let html = parse("# Hello\n\nSome **bold** text.", &ParseOptions::default()).unwrap();
//! assert!(html.contains("<strong"));
//! ```

/// Compile a regex once and hand out a `&'static Regex`.
macro_rules! regex {
    ($pattern:expr $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($pattern).expect("built-in regex must compile"))
    }};
}

pub mod config;
pub mod error;
pub mod export;
pub mod fonts;
pub mod markdown;
pub mod postprocess;
pub mod string_utils;
pub mod theme;

pub use error::{Error, Result};
pub use markdown::{parse, MarkdownParser, ParseOptions};
pub use postprocess::adapters::{AdapterContext, AdapterRegistry, CopyAdapter};
pub use theme::{Color, ResolvedTheme, ThemeResolver};
