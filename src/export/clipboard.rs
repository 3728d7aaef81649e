//! Clipboard Operations
//!
//! Puts rendered markup on the system clipboard through `arboard`, as rich
//! HTML with a plain-text alternative for targets that refuse it.

use arboard::Clipboard;
use log::debug;

use crate::error::{Error, Result};

/// Copy `html` to the clipboard with `plain_text` as the fallback flavor.
///
/// Apps like mail composers and blog editors paste the HTML flavor; plain
/// text editors get the fallback.
///
/// # Example
///
/// ```ignore
/// let html = inkpaste::parse("**Bold** text", &Default::default())?;
/// copy_html_to_clipboard(&html, "Bold text")?;
/// ```
pub fn copy_html_to_clipboard(html: &str, plain_text: &str) -> Result<()> {
    let mut clipboard =
        Clipboard::new().map_err(|e| Error::Clipboard(format!("access failed: {}", e)))?;

    clipboard.set_html(html, Some(plain_text))?;

    debug!(
        "Copied {} bytes of HTML ({} bytes plain) to clipboard",
        html.len(),
        plain_text.len()
    );
    Ok(())
}
