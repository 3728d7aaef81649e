//! Link and image target sanitization.
//!
//! Only a fixed set of schemes may ever reach an `href` or `src`. A target
//! without a scheme gets [`DEFAULT_SCHEME`] prepended; everything else either
//! passes unchanged or is rejected outright.

use log::debug;

/// Schemes allowed in emitted `href`/`src` attributes.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel", "ftp"];

/// Scheme prepended to targets that carry none.
pub const DEFAULT_SCHEME: &str = "https";

/// Sanitize a raw link target.
///
/// Returns `None` when the target must not be emitted: empty, containing
/// whitespace or control characters (a classic way of smuggling `java\tscript:`
/// past naive checks), or using a scheme outside [`ALLOWED_SCHEMES`].
pub fn sanitize_url(raw: &str) -> Option<String> {
    let url = raw.trim();
    let url = url
        .strip_prefix('<')
        .and_then(|u| u.strip_suffix('>'))
        .unwrap_or(url)
        .trim();

    if url.is_empty() {
        return None;
    }
    if url.chars().any(|c| c.is_control() || c.is_whitespace()) {
        debug!("Rejected link target with whitespace/control characters");
        return None;
    }

    // In-document anchors carry no scheme and cannot execute anything.
    if url.starts_with('#') {
        return Some(url.to_string());
    }
    if let Some(rest) = url.strip_prefix("//") {
        return Some(format!("{}://{}", DEFAULT_SCHEME, rest));
    }

    match scheme_of(url) {
        Some(scheme) => {
            let scheme = scheme.to_ascii_lowercase();
            if ALLOWED_SCHEMES.contains(&scheme.as_str()) {
                Some(url.to_string())
            } else {
                debug!("Rejected link target with scheme '{}'", scheme);
                None
            }
        }
        None => Some(format!("{}://{}", DEFAULT_SCHEME, url)),
    }
}

/// Extract the scheme of `url`, if it has one.
///
/// `example.com:8080/x` is a host with a port, not a scheme named
/// `example.com`.
fn scheme_of(url: &str) -> Option<&str> {
    let colon = url.find(':')?;
    let candidate = &url[..colon];
    let mut chars = candidate.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic()
        || !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return None;
    }
    let after = &url[colon + 1..];
    if candidate.contains('.') && after.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some(candidate)
}
