//! Inline `style` attribute helpers shared by the post-processors.

use regex::{Captures, NoExpand};

/// The declarations of one `style` attribute, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDecls {
    decls: Vec<(String, String)>,
}

impl StyleDecls {
    /// Parse `a: b; c: d`. Property names are lowercased; empty and
    /// malformed declarations are dropped.
    pub fn parse(style: &str) -> Self {
        let decls = style
            .split(';')
            .filter_map(|decl| {
                let (prop, value) = decl.split_once(':')?;
                let prop = prop.trim().to_ascii_lowercase();
                let value = value.trim();
                (!prop.is_empty() && !value.is_empty()).then(|| (prop, value.to_string()))
            })
            .collect();
        Self { decls }
    }

    pub fn get(&self, prop: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|(p, _)| p == prop)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, prop: &str) -> bool {
        self.get(prop).is_some()
    }

    /// Set `prop`, replacing its value in place or appending it.
    pub fn set(&mut self, prop: &str, value: &str) {
        match self.decls.iter_mut().find(|(p, _)| p == prop) {
            Some((_, v)) => *v = value.to_string(),
            None => self.decls.push((prop.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, prop: &str) {
        self.decls.retain(|(p, _)| p != prop);
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl std::fmt::Display for StyleDecls {
    /// `a: b; c: d;`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (prop, value)) in self.decls.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {};", prop, value)?;
        }
        Ok(())
    }
}

/// Append declarations to a raw style string without touching what is there.
pub fn append_declarations(style: &str, additions: &[(&str, String)]) -> String {
    let mut out = style.trim_end().to_string();
    if !out.is_empty() && !out.ends_with(';') {
        out.push(';');
    }
    for (prop, value) in additions {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("{}: {};", prop, value));
    }
    out
}

/// Rewrite the `style` attribute of opening tags.
///
/// `select` picks tags by (lowercase) name; `rewrite` receives the name and the
/// current style (if any) and returns the new style, or `None` to leave the tag
/// untouched.
pub fn rewrite_styles(
    html: &str,
    select: impl Fn(&str) -> bool,
    mut rewrite: impl FnMut(&str, Option<&str>) -> Option<String>,
) -> String {
    let tag_re = regex!(r"<([a-zA-Z][a-zA-Z0-9]*)((?:\s[^<>]*)?)>");
    let style_re = regex!(r#"\sstyle="([^"]*)""#);

    tag_re
        .replace_all(html, |caps: &Captures| {
            let whole = &caps[0];
            let name = caps[1].to_ascii_lowercase();
            if !select(&name) {
                return whole.to_string();
            }
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            let current = style_re
                .captures(attrs)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str());

            let Some(new_style) = rewrite(&name, current) else {
                return whole.to_string();
            };
            let new_attr = format!(r#" style="{}""#, new_style);
            let attrs = if current.is_some() {
                style_re
                    .replace(attrs, NoExpand(new_attr.as_str()))
                    .into_owned()
            } else {
                format!("{}{}", new_attr, attrs)
            };
            format!("<{}{}>", &caps[1], attrs)
        })
        .into_owned()
}

/// Text content of a fragment with every tag removed.
pub fn strip_tags(html: &str) -> String {
    regex!(r"<[^<>]*>").replace_all(html, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let decls = StyleDecls::parse("color: red;  Margin :0 ; bad; url: a:b");
        assert_eq!(decls.get("color"), Some("red"));
        assert_eq!(decls.get("margin"), Some("0"));
        assert_eq!(decls.get("url"), Some("a:b"));
        assert_eq!(decls.to_string(), "color: red; margin: 0; url: a:b;");
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut decls = StyleDecls::parse("a: 1; b: 2;");
        decls.set("a", "3");
        decls.set("c", "4");
        decls.remove("b");
        assert_eq!(decls.to_string(), "a: 3; c: 4;");
    }

    #[test]
    fn test_append_declarations() {
        let extra = [("font-size", "16px".to_string())];
        assert_eq!(append_declarations("color: red", &extra), "color: red; font-size: 16px;");
        assert_eq!(append_declarations("", &extra), "font-size: 16px;");
    }

    #[test]
    fn test_rewrite_styles_inserts_and_replaces() {
        let html = r#"<p>a</p><p class="x" style="color: red;">b</p><span>c</span>"#;
        let out = rewrite_styles(html, |name| name == "p", |_, style| {
            Some(match style {
                Some(s) => format!("{} margin: 0;", s),
                None => "margin: 0;".to_string(),
            })
        });
        assert_eq!(
            out,
            r#"<p style="margin: 0;">a</p><p class="x" style="color: red; margin: 0;">b</p><span>c</span>"#
        );
    }

    #[test]
    fn test_rewrite_ignores_closing_tags() {
        let out = rewrite_styles("<p>x</p>", |_| true, |_, _| Some("a: b;".to_string()));
        assert_eq!(out, r#"<p style="a: b;">x</p>"#);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>bo</b>ld"), "bold");
    }
}
