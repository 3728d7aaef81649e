//! String Utilities for Markup Generation
//!
//! HTML escaping, placeholder sentinels and tag shielding shared by the
//! inline pipeline, the code-block tokenizer and the post-processors.
//!
//! # Placeholders
//!
//! Several passes temporarily swap a fragile substring for a sentinel token,
//! run further regex transforms, then put the original back. Sentinels are
//! built from Unicode private-use code points (`U+E000` / `U+E001`), which
//! [`strip_sentinel_chars`] removes from user input up front so a document can
//! never forge one.

// ─────────────────────────────────────────────────────────────────────────────
// Sentinels
// ─────────────────────────────────────────────────────────────────────────────

/// Opens a placeholder token.
pub const SENTINEL_OPEN: char = '\u{E000}';
/// Closes a placeholder token.
pub const SENTINEL_CLOSE: char = '\u{E001}';
/// Zero-width separator between two delimiter runs split out of one.
pub const SPAN_JOIN: char = '\u{E002}';

/// Build the sentinel token for slot `index` of placeholder family `kind`.
///
/// `kind` must be ASCII letters only so tokens never contain emphasis markers.
pub fn sentinel(kind: &str, index: usize) -> String {
    format!("{}{}{}{}", SENTINEL_OPEN, kind, index, SENTINEL_CLOSE)
}

/// Remove sentinel code points from untrusted text.
pub fn strip_sentinel_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(*c, SENTINEL_OPEN | SENTINEL_CLOSE | SPAN_JOIN))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Escaping
// ─────────────────────────────────────────────────────────────────────────────

/// HTML-escape a string for use inside an attribute value.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape text content: `<` and `>` always, `&` only when it does not
/// already start a character reference (`&amp;`, `&#169;`, `&#x2014;`).
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for (i, c) in s.char_indices() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' if !starts_with_entity(&s[i..]) => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape everything, including existing entities. Used for code, where the
/// source must be shown byte for byte.
pub fn escape_code(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Does `s` (starting at an `&`) begin with a well-formed character reference?
fn starts_with_entity(s: &str) -> bool {
    let rest = &s[1..];
    let Some(end) = rest.find(';') else {
        return false;
    };
    let body = &rest[..end];
    if body.is_empty() || body.len() > 32 {
        return false;
    }
    if let Some(num) = body.strip_prefix('#') {
        if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
        }
        return !num.is_empty() && num.chars().all(|c| c.is_ascii_digit());
    }
    body.chars().all(|c| c.is_ascii_alphanumeric())
}

// ─────────────────────────────────────────────────────────────────────────────
// Character Neighbours
// ─────────────────────────────────────────────────────────────────────────────

/// The character ending right before byte offset `index`, if any.
#[inline]
pub fn char_before(s: &str, index: usize) -> Option<char> {
    s.get(..index).and_then(|head| head.chars().next_back())
}

/// The character starting at byte offset `index`, if any.
#[inline]
pub fn char_at(s: &str, index: usize) -> Option<char> {
    s.get(index..).and_then(|tail| tail.chars().next())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tag Shield
// ─────────────────────────────────────────────────────────────────────────────

/// Swaps every markup tag for a sentinel so text-level regexes only see text.
///
/// ```ignore
/// let mut shield = TagShield::default();
/// let text = shield.protect(r#"<a href="x_y_z">a_b</a>"#);
/// let text = text.replace('_', " ");
/// assert_eq!(shield.restore(&text), r#"<a href="x_y_z">a b</a>"#);
/// ```
#[derive(Debug, Default)]
pub struct TagShield {
    tags: Vec<String>,
}

impl TagShield {
    /// Replace each `<...>` tag in `html` with a sentinel.
    pub fn protect(&mut self, html: &str) -> String {
        let tag_re = regex!(r"<[^<>]+>");
        tag_re
            .replace_all(html, |caps: &regex::Captures| {
                let token = sentinel("T", self.tags.len());
                self.tags.push(caps[0].to_string());
                token
            })
            .into_owned()
    }

    /// Put the protected tags back.
    pub fn restore(&self, text: &str) -> String {
        let token_re = regex!("\u{E000}T(\\d+)\u{E001}");
        token_re
            .replace_all(text, |caps: &regex::Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.tags.get(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
