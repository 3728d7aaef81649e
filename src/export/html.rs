//! HTML Export Generation
//!
//! Standalone documents around a rendered fragment, file output and the
//! plain-text rendition used as the clipboard fallback.

use log::info;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::string_utils::html_escape;

/// Title used when none is given.
pub const DEFAULT_TITLE: &str = "Document";

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Wrap a rendered fragment in a complete HTML document.
///
/// The fragment already carries all of its styling, so the document adds
/// only a charset, a viewport and a centered column.
pub fn generate_html_document(fragment: &str, title: Option<&str>) -> String {
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="inkpaste">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 24px 16px;">
    <article style="max-width: 720px; margin: 0 auto;">
{body}
    </article>
</body>
</html>
"#,
        title = html_escape(title),
        body = fragment,
    )
}

/// Write `html` to `output_path`, creating parent directories as needed.
pub fn export_to_html_file(html: &str, output_path: &Path) -> Result<()> {
    let write_err = |source| Error::FileWrite {
        path: output_path.to_path_buf(),
        source,
    };

    if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(write_err)?;
    }
    fs::write(output_path, html).map_err(write_err)?;

    info!("Wrote {} bytes to {}", html.len(), output_path.display());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Plain Text Fallback
// ─────────────────────────────────────────────────────────────────────────────

/// Readable text for targets that refuse rich content.
///
/// Block ends and `<br>` become line breaks, tags are dropped and the
/// entities the renderer emits are decoded.
pub fn html_to_plain_text(html: &str) -> String {
    let break_re = regex!(r"(?i)<br\s*/?>|</(?:p|h[1-6]|li|tr|blockquote|pre|figure|section)>");
    let cell_re = regex!(r"(?i)</t[hd]>");
    let tag_re = regex!(r"<[^<>]*>");
    let blank_run_re = regex!(r"\n{3,}");

    let text = break_re.replace_all(html, "\n");
    let text = cell_re.replace_all(&text, "\t");
    let text = tag_re.replace_all(&text, "");
    let text = decode_entities(&text);
    let text: Vec<&str> = text.lines().map(str::trim_end).collect();
    blank_run_re
        .replace_all(&text.join("\n"), "\n\n")
        .trim()
        .to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
