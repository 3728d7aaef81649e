//! Post-processing stage
//!
//! Runs over the joined block fragments, in order:
//!
//! 1. [`FontProcessor`](font::FontProcessor) - explicit typography on block
//!    elements (skipped in preview)
//! 2. [`ThemeProcessor`](theme::ThemeProcessor) - primary-colored decorations
//!    re-derived from the active theme
//! 3. [`SocialStyler`](social::SocialStyler) - captions, root containers and
//!    the theme system's copy adapter (skipped in preview)
//! 4. [`clean_html`](clean::clean_html) - compaction, when requested

pub mod adapters;
pub mod clean;
pub mod css;
pub mod font;
pub mod social;
pub mod theme;

use log::trace;

use crate::markdown::ParseOptions;
use crate::theme::ResolvedTheme;
use adapters::AdapterRegistry;

/// Run the post stage over rendered block markup.
pub fn run(
    html: &str,
    theme: &ResolvedTheme,
    options: &ParseOptions,
    adapters: &AdapterRegistry,
) -> String {
    let mut html = html.to_string();

    if !options.is_preview {
        html = font::FontProcessor::new(&theme.font).process(&html);
    }
    html = theme::ThemeProcessor::new(&theme.color).process(&html);
    if !options.is_preview {
        html = social::SocialStyler::new(theme, adapters).process(&html);
    }
    if options.clean_html {
        html = clean::clean_html(&html);
    }

    trace!("Post stage produced {} bytes", html.len());
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_only_themes() {
        let options = ParseOptions {
            is_preview: true,
            ..Default::default()
        };
        let html = run(
            "<p>x</p>",
            &ResolvedTheme::default(),
            &options,
            &AdapterRegistry::with_builtin(),
        );
        assert_eq!(html, "<p>x</p>");
    }

    #[test]
    fn test_full_run_wraps_and_styles() {
        let html = run(
            "<p>x</p>",
            &ResolvedTheme::default(),
            &ParseOptions::default(),
            &AdapterRegistry::new(),
        );
        assert!(html.starts_with(r#"<section data-md-root="outer""#));
        assert!(html.contains(r#"<p style="font-size: 16px;"#));
    }

    #[test]
    fn test_clean_runs_last() {
        let options = ParseOptions {
            clean_html: true,
            ..Default::default()
        };
        let html = run(
            "<p>a</p>\n<p>b</p>",
            &ResolvedTheme::default(),
            &options,
            &AdapterRegistry::new(),
        );
        assert!(html.starts_with("<section style="));
        assert!(!html.contains('\n'));
    }
}
