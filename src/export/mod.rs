//! Export Module for inkpaste
//!
//! Delivers rendered markup to its destination: standard output, an HTML
//! file, or the system clipboard, optionally wrapped in a standalone
//! document.
//!
//! # Architecture
//!
//! - `options.rs` - export destinations and options
//! - `html.rs` - document generation, file output, plain-text fallback
//! - `clipboard.rs` - platform clipboard operations

pub mod clipboard;
pub mod html;
pub mod options;

pub use clipboard::copy_html_to_clipboard;
pub use html::{export_to_html_file, generate_html_document, html_to_plain_text};
pub use options::{ExportFormat, ExportOptions};

use std::io::Write;

use crate::error::{Error, Result};

/// Send `fragment` where `options` says.
///
/// `stdout` receives the output for [`ExportFormat::Stdout`]; the other
/// destinations don't touch it.
pub fn deliver(fragment: &str, options: &ExportOptions, stdout: &mut impl Write) -> Result<()> {
    let html = if options.as_document {
        generate_html_document(fragment, options.title.as_deref())
    } else {
        fragment.to_string()
    };

    match options.format {
        ExportFormat::Stdout => {
            stdout.write_all(html.as_bytes())?;
            if !html.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
            Ok(())
        }
        ExportFormat::HtmlFile => {
            let path = options.output_path.as_deref().ok_or_else(|| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "no output path given for HTML file export",
                ))
            })?;
            export_to_html_file(&html, path)
        }
        ExportFormat::Clipboard => copy_html_to_clipboard(&html, &html_to_plain_text(fragment)),
    }
}
