//! Copy adapters
//!
//! A copy adapter is a final, theme-system-specific rewrite applied to the
//! wrapped output. Adapters are looked up by theme system id; a system without
//! an adapter passes the markup through unchanged.
//!
//! # Built-in adapters
//!
//! - `capsule` - headings become pills filled with a per-level darkened
//!   accent, tables get rounded corners
//! - `magazine` - headings get a short vertical accent bar, table headers are
//!   solid primary blocks, links use a dashed underline

use std::collections::HashMap;
use std::fmt;

use log::debug;
use regex::Captures;

use super::css::{rewrite_styles, strip_tags, StyleDecls};
use crate::fonts::format_number;
use crate::theme::Color;

/// What an adapter may know about the render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdapterContext {
    pub primary_color: Color,
    /// Base font size in pixels
    pub base_font_size: f32,
}

/// A theme-system-specific markup rewrite.
pub trait CopyAdapter: Send + Sync {
    fn transform(&self, html: &str, ctx: &AdapterContext) -> String;
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Theme system id → adapter.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Box<dyn CopyAdapter>>,
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids = self.ids();
        ids.sort_unstable();
        f.debug_struct("AdapterRegistry").field("adapters", &ids).finish()
    }
}

impl AdapterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `capsule` and `magazine` adapters.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("capsule", CapsuleAdapter);
        registry.register("magazine", MagazineAdapter);
        registry
    }

    /// Register `adapter` for `system_id`, replacing any previous one.
    pub fn register(&mut self, system_id: &str, adapter: impl CopyAdapter + 'static) {
        self.adapters
            .insert(system_id.to_ascii_lowercase(), Box::new(adapter));
    }

    pub fn get(&self, system_id: &str) -> Option<&dyn CopyAdapter> {
        self.adapters
            .get(&system_id.to_ascii_lowercase())
            .map(|a| a.as_ref())
    }

    pub fn contains(&self, system_id: &str) -> bool {
        self.get(system_id).is_some()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.adapters.keys().map(String::as_str).collect()
    }

    /// Run the adapter for `system_id`, or return `html` unchanged.
    pub fn apply(&self, system_id: &str, html: &str, ctx: &AdapterContext) -> String {
        match self.get(system_id) {
            Some(adapter) => {
                debug!("Applying '{}' copy adapter", system_id);
                adapter.transform(html, ctx)
            }
            None => html.to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Accent for heading `level`: 10% darker per level below h1.
fn heading_accent(primary: Color, level: u8) -> Color {
    primary.darken(0.1 * f32::from(level.saturating_sub(1)))
}

/// Rewrite every heading element with `render(level, style, text)`.
///
/// `text` is the heading's plain text; decorations from the default renderer
/// are dropped.
fn rewrite_headings(html: &str, render: impl Fn(u8, &mut StyleDecls, &str) -> String) -> String {
    let heading_re = regex!(r#"<h([1-6])((?:\s[^<>]*)?)>(.*?)</h[1-6]>"#);
    let style_re = regex!(r#"\sstyle="([^"]*)""#);
    heading_re
        .replace_all(html, |caps: &Captures| {
            let level = caps[1].parse::<u8>().unwrap_or(1);
            let style = style_re
                .captures(&caps[2])
                .and_then(|c| c.get(1))
                .map_or("", |m| m.as_str());
            let mut decls = StyleDecls::parse(style);
            for prop in ["border-left", "padding-left", "text-align", "color"] {
                decls.remove(prop);
            }
            let inner = render(level, &mut decls, &strip_tags(&caps[3]));
            format!(r#"<h{level} style="{decls}">{inner}</h{level}>"#)
        })
        .into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Capsule
// ─────────────────────────────────────────────────────────────────────────────

/// Pill headings and rounded tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapsuleAdapter;

impl CopyAdapter for CapsuleAdapter {
    fn transform(&self, html: &str, ctx: &AdapterContext) -> String {
        let html = rewrite_headings(html, |level, decls, text| {
            decls.set("text-align", if level == 1 { "center" } else { "left" });
            let accent = heading_accent(ctx.primary_color, level);
            let pad = format_number(ctx.base_font_size * 0.25);
            format!(
                r#"<span style="display: inline-block; padding: {pad}px {side}px; border-radius: 999px; background-color: {accent}; color: #ffffff; font-weight: bold;">{text}</span>"#,
                pad = pad,
                side = format_number(ctx.base_font_size),
                accent = accent,
                text = text,
            )
        });

        rewrite_styles(&html, |name| name == "table", |_, style| {
            let mut decls = StyleDecls::parse(style.unwrap_or(""));
            decls.set("border-collapse", "separate");
            decls.set("border-spacing", "0");
            decls.set("border-radius", "8px");
            decls.set("overflow", "hidden");
            Some(decls.to_string())
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Magazine
// ─────────────────────────────────────────────────────────────────────────────

/// Bar headings, solid table headers, dashed links.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagazineAdapter;

impl CopyAdapter for MagazineAdapter {
    fn transform(&self, html: &str, ctx: &AdapterContext) -> String {
        let primary = ctx.primary_color;
        let html = rewrite_headings(html, |level, decls, text| {
            decls.set("text-align", "left");
            decls.set("color", &heading_accent(primary, level).to_hex());
            format!(
                r#"<span style="display: inline-block; width: 4px; height: 1em; margin-right: 10px; vertical-align: -0.1em; background-color: {};"></span>{}"#,
                heading_accent(primary, level),
                text
            )
        });

        rewrite_styles(
            &html,
            |name| name == "th" || name == "a",
            |name, style| {
                let mut decls = StyleDecls::parse(style.unwrap_or(""));
                if name == "th" {
                    decls.set("background-color", &primary.to_hex());
                    decls.set("color", "#ffffff");
                } else {
                    decls.set("border-bottom", &format!("1px dashed {}", primary));
                }
                Some(decls.to_string())
            },
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
