//! SocialStyler
//!
//! Prepares the rendered fragment for pasting into a rich-text editor:
//!
//! 1. images standing alone in a paragraph with alt text or a title become a
//!    `<figure>` with a caption
//! 2. the fragment is wrapped in an outer and an inner container that carry
//!    the base typography (pasted markup inherits nothing from the page)
//! 3. the copy adapter registered for the theme system runs last

use log::trace;
use regex::Captures;

use super::adapters::{AdapterContext, AdapterRegistry};
use crate::theme::{ColorTheme, ResolvedTheme};

/// Attribute marking the containers this stage adds.
pub const ROOT_MARKER: &str = "data-md-root";

#[derive(Debug)]
pub struct SocialStyler<'a> {
    theme: &'a ResolvedTheme,
    adapters: &'a AdapterRegistry,
}

impl<'a> SocialStyler<'a> {
    pub fn new(theme: &'a ResolvedTheme, adapters: &'a AdapterRegistry) -> Self {
        Self { theme, adapters }
    }

    pub fn process(&self, html: &str) -> String {
        let html = caption_images(html, &self.theme.color);
        let html = if is_wrapped(&html) {
            trace!("Output already wrapped");
            html
        } else {
            self.wrap(&html)
        };

        let ctx = AdapterContext {
            primary_color: self.theme.color.primary,
            base_font_size: self.theme.font.font_size,
        };
        self.adapters.apply(&self.theme.system.id, &html, &ctx)
    }

    fn wrap(&self, html: &str) -> String {
        let font = &self.theme.font;
        let color = &self.theme.color;
        format!(
            r#"<section {marker}="outer" style="margin: 0; padding: 0; background-color: {bg};"><section {marker}="inner" style="font-family: {family}; font-size: {size}; line-height: {line_height}; letter-spacing: {letter_spacing}; color: {text}; word-break: break-word; overflow-wrap: break-word;">{html}</section></section>"#,
            marker = ROOT_MARKER,
            bg = color.background,
            family = font.css_font_family(),
            size = font.css_font_size(),
            line_height = font.css_line_height(),
            letter_spacing = font.css_letter_spacing(),
            text = color.text,
            html = html,
        )
    }
}

fn is_wrapped(html: &str) -> bool {
    html.trim_start()
        .starts_with(&format!("<section {}=", ROOT_MARKER))
}

/// `<p><img alt="x"></p>` → `<figure><img alt="x"><figcaption>x</figcaption></figure>`.
///
/// The title wins over the alt text; images with neither stay as they are.
fn caption_images(html: &str, theme: &ColorTheme) -> String {
    let lone_image_re = regex!(r"<p(?:\s[^<>]*)?>\s*(<img\s[^<>]*>)\s*</p>");
    let alt_re = regex!(r#"\salt="([^"]*)""#);
    let title_re = regex!(r#"\stitle="([^"]*)""#);

    lone_image_re
        .replace_all(html, |caps: &Captures| {
            let img = &caps[1];
            let attr = |re: &regex::Regex| {
                re.captures(img)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|s| !s.is_empty())
            };
            let Some(caption) = attr(title_re).or_else(|| attr(alt_re)) else {
                return caps[0].to_string();
            };
            format!(
                r#"<figure style="margin: 1.2em 0; text-align: center;">{img}<figcaption style="margin-top: 0.5em; font-size: 0.85em; color: {muted}; text-align: center;">{caption}</figcaption></figure>"#,
                img = img,
                muted = theme.text_muted,
                caption = caption,
            )
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{presets, PartialColorTheme};
    use crate::{markdown::ParseOptions, ThemeResolver};

    fn resolved(system: &str) -> ResolvedTheme {
        ThemeResolver::default().resolve(&ParseOptions {
            theme_system: Some(system.to_string()),
            theme: Some(PartialColorTheme::id("emerald")),
            ..Default::default()
        })
    }

    #[test]
    fn test_wraps_once() {
        let theme = resolved("classic");
        let adapters = AdapterRegistry::new();
        let styler = SocialStyler::new(&theme, &adapters);
        let once = styler.process("<p>x</p>");
        assert!(once.starts_with(r#"<section data-md-root="outer""#));
        assert_eq!(once.matches("<section").count(), 2);
        assert!(once.contains("font-size: 16px; line-height: 1.75; letter-spacing: 0px;"));
        assert!(once.contains("-apple-system"));
        assert_eq!(styler.process(&once), once);
    }

    #[test]
    fn test_caption_from_alt() {
        let html = r#"<p style="margin: 0;"><img src="https://x/a.png" alt="A cat" style="display: block;"></p>"#;
        let out = caption_images(html, &presets::default_color_theme());
        assert!(out.starts_with("<figure"));
        assert!(out.contains(">A cat</figcaption></figure>"));
        assert!(!out.contains("<p"));
    }

    #[test]
    fn test_caption_prefers_title() {
        let html = r#"<p><img src="https://x/a.png" alt="alt" title="Title"></p>"#;
        let out = caption_images(html, &presets::default_color_theme());
        assert!(out.contains(">Title</figcaption>"));
    }

    #[test]
    fn test_no_caption_without_text() {
        let html = r#"<p><img src="https://x/a.png" alt=""></p>"#;
        assert_eq!(caption_images(html, &presets::default_color_theme()), html);
    }

    #[test]
    fn test_image_with_text_not_captioned() {
        let html = r#"<p>see <img src="https://x/a.png" alt="a"></p>"#;
        assert_eq!(caption_images(html, &presets::default_color_theme()), html);
    }

    #[test]
    fn test_adapter_runs_for_system() {
        let theme = resolved("capsule");
        let adapters = AdapterRegistry::with_builtin();
        let out = SocialStyler::new(&theme, &adapters)
            .process(r#"<h2 style="font-size: 1.4em;">Sub</h2>"#);
        assert!(out.contains("border-radius: 999px"));
    }
}
