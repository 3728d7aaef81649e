//! Inline Formatting Pipeline
//!
//! Character-level Markdown constructs inside a single line: emphasis, links,
//! images, inline code, strikethrough, sub/superscript, highlight and
//! keyboard tags.
//!
//! # Pass order
//!
//! 1. escape-protect (`\*` and friends become sentinels)
//! 2. inline code → sentinel (contents are final from here on)
//! 3. link/image targets → sentinel, then HTML-escape the remaining text
//! 4. keyboard tags, `<br>`
//! 5. highlight `==x==`
//! 6. bold/italic: `***x***`, `**x *y* z**`, `**x**`, `*x*` (and `_` forms)
//! 7. strikethrough `~~x~~`, superscript `^x^`, subscript `~x~`
//! 8. images, then links (a linked image's label is its `<img>` tag)
//! 9. code restore, escape unprotect
//!
//! Passes 5-7 only ever see text outside emitted tags: every tag is swapped
//! for a sentinel while they run. Link targets never pass through them at all,
//! so an underscore in a URL stays an underscore.
//!
//! All placeholder tables belong to one [`InlineFormatter`], which is consumed
//! by [`InlineFormatter::format`].

use log::debug;

use super::url::sanitize_url;
use crate::fonts::CODE_FONT_STACK;
use crate::string_utils::{
    char_at, char_before, escape_code, escape_text, html_escape, sentinel, strip_sentinel_chars,
    TagShield, SENTINEL_OPEN, SPAN_JOIN,
};
use crate::theme::ColorTheme;

/// Characters that a backslash turns into literals.
pub const ESCAPABLE: &[char] = &[
    '*', '_', '`', '~', '[', ']', '(', ')', '#', '+', '-', '.', '!',
];

/// Format one line of inline Markdown.
pub fn format_inline(text: &str, theme: &ColorTheme, handle_escapes: bool) -> String {
    InlineFormatter::new(theme)
        .handle_escapes(handle_escapes)
        .format(text)
}

// ─────────────────────────────────────────────────────────────────────────────
// Span Rules
// ─────────────────────────────────────────────────────────────────────────────

/// How a delimiter pair may open and close.
#[derive(Debug, Clone, Copy)]
struct SpanRule {
    marker: &'static str,
    /// May open/close between two alphanumeric characters
    intraword: bool,
    /// Content may contain whitespace
    inner_whitespace: bool,
}

impl SpanRule {
    const fn new(marker: &'static str) -> Self {
        Self {
            marker,
            intraword: true,
            inner_whitespace: true,
        }
    }

    const fn word_bound(mut self) -> Self {
        self.intraword = false;
        self
    }

    const fn no_whitespace(mut self) -> Self {
        self.inner_whitespace = false;
        self
    }

    fn marker_char(&self) -> char {
        self.marker.chars().next().unwrap_or('*')
    }
}

const BOLD_ITALIC_STAR: SpanRule = SpanRule::new("***");
const BOLD_ITALIC_UNDERSCORE: SpanRule = SpanRule::new("___").word_bound();
const BOLD_STAR: SpanRule = SpanRule::new("**");
const BOLD_UNDERSCORE: SpanRule = SpanRule::new("__").word_bound();
const ITALIC_STAR: SpanRule = SpanRule::new("*");
const ITALIC_UNDERSCORE: SpanRule = SpanRule::new("_").word_bound();
const HIGHLIGHT: SpanRule = SpanRule::new("==");
const STRIKETHROUGH: SpanRule = SpanRule::new("~~");
const SUPERSCRIPT: SpanRule = SpanRule::new("^").no_whitespace();
const SUBSCRIPT: SpanRule = SpanRule::new("~").no_whitespace();

/// Replace every `marker content marker` span accepted by `rule`.
///
/// A marker adjacent to another copy of its own character never opens or
/// closes, so `**` left over from a failed bold can't produce a one-character
/// italic span.
///
/// Closer positions are collected once up front; an opener with no closer
/// after it ends the scan, since no later opener can have one either.
fn replace_spans(text: &str, rule: SpanRule, mut render: impl FnMut(&str) -> String) -> String {
    let m = rule.marker.len();
    let closers = marker_positions(text, rule.marker, |pos| is_closer(text, pos, rule));
    if closers.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut copied = 0;

    while let Some(found) = text[cursor..].find(rule.marker) {
        let open = cursor + found;
        let next = closers.partition_point(|&c| c <= open + m);
        let Some(&close) = closers.get(next) else {
            break;
        };
        if !is_opener(text, open, rule) || !fits(&text[open + m..close], rule) {
            cursor = open + 1;
            continue;
        }
        out.push_str(&text[copied..open]);
        out.push_str(&render(&text[open + m..close]));
        cursor = close + m;
        copied = cursor;
    }

    out.push_str(&text[copied..]);
    out
}

/// Byte offsets of every (possibly overlapping) `marker` accepted by `keep`.
fn marker_positions(text: &str, marker: &str, keep: impl Fn(usize) -> bool) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut cursor = 0;
    while let Some(found) = text[cursor..].find(marker) {
        let pos = cursor + found;
        if keep(pos) {
            positions.push(pos);
        }
        cursor = pos + 1;
    }
    positions
}

fn is_opener(text: &str, pos: usize, rule: SpanRule) -> bool {
    let mc = rule.marker_char();
    let before = char_before(text, pos);
    let after = char_at(text, pos + rule.marker.len());

    if before == Some(mc) {
        return false;
    }
    match after {
        None => return false,
        Some(c) if c.is_whitespace() || c == mc => return false,
        _ => {}
    }
    !(!rule.intraword && before.is_some_and(|c| c.is_alphanumeric()))
}

fn is_closer(text: &str, pos: usize, rule: SpanRule) -> bool {
    let mc = rule.marker_char();
    let before = char_before(text, pos);
    let after = char_at(text, pos + rule.marker.len());

    if before.map_or(true, |c| c.is_whitespace() || c == mc) {
        return false;
    }
    if after == Some(mc) {
        return false;
    }
    !(!rule.intraword && after.is_some_and(|c| c.is_alphanumeric()))
}

fn fits(inner: &str, rule: SpanRule) -> bool {
    rule.inner_whitespace || !inner.contains(char::is_whitespace)
}

/// Split each `***` run that opens or closes two different spans.
///
/// `**a *b***` closes an italic and then a bold, `***a** b*` opens an italic
/// and then a bold. The nearest neighbouring run of the same character tells
/// which span is the inner one; the halves are separated by [`SPAN_JOIN`] so
/// each still flanks on its own.
fn split_mixed_triples(text: &str, mc: char) -> String {
    let runs = marker_runs(text, mc);
    if !runs.iter().any(|&(_, len)| len == 3) {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 4);
    let mut copied = 0;
    for (i, &(start, len)) in runs.iter().enumerate() {
        if len != 3 {
            continue;
        }
        let before = char_before(text, start);
        let after = char_at(text, start + 3);
        let opens = before.map_or(true, |c| !c.is_alphanumeric())
            && after.is_some_and(|c| !c.is_whitespace());
        let closes = before.is_some_and(|c| !c.is_whitespace())
            && after.map_or(true, |c| !c.is_alphanumeric());

        // (length of the first half, length of the second half)
        let halves = match (opens, closes) {
            (true, false) => match runs.get(i + 1).map(|r| r.1) {
                Some(2) => (1, 2),
                Some(1) => (2, 1),
                _ => continue,
            },
            (false, true) => match i.checked_sub(1).and_then(|p| runs.get(p)).map(|r| r.1) {
                Some(1) => (1, 2),
                Some(2) => (2, 1),
                _ => continue,
            },
            _ => continue,
        };

        out.push_str(&text[copied..start]);
        out.extend(std::iter::repeat(mc).take(halves.0));
        out.push(SPAN_JOIN);
        out.extend(std::iter::repeat(mc).take(halves.1));
        copied = start + 3;
    }

    out.push_str(&text[copied..]);
    out
}

/// `(byte offset, length)` of every maximal run of the ASCII marker `mc`.
fn marker_runs(text: &str, mc: char) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut run_start = None;
    for (i, c) in text.char_indices() {
        match (c == mc, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - s));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = run_start {
        runs.push((s, text.len() - s));
    }
    runs
}

/// Run `transform` with every markup tag in `text` shielded.
fn outside_tags(text: &str, transform: impl FnOnce(&str) -> String) -> String {
    let mut shield = TagShield::default();
    let protected = shield.protect(text);
    shield.restore(&transform(&protected))
}

// ─────────────────────────────────────────────────────────────────────────────
// Link Targets
// ─────────────────────────────────────────────────────────────────────────────

/// A protected `(url "title")` link target.
#[derive(Debug, Clone)]
struct LinkTarget {
    /// Original text between the parentheses, for unresolved targets
    raw: String,
    /// Sanitized URL, `None` if the target must not be emitted
    url: Option<String>,
    title: Option<String>,
}

/// Byte length up to (not including) the `)` closing an already-open paren.
fn closing_paren(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split `url "title"` into its parts.
fn split_title(target: &str) -> (String, Option<String>) {
    if let Some(rest) = target.strip_prefix('<') {
        if let Some(end) = rest.find('>') {
            let title = unquote(rest[end + 1..].trim());
            return (rest[..end].to_string(), title);
        }
    }
    match target.find(char::is_whitespace) {
        Some(split) => {
            let (url, rest) = target.split_at(split);
            match unquote(rest.trim()) {
                Some(title) => (url.to_string(), Some(title)),
                // Unquoted trailing text: keep it in the URL so sanitization rejects it.
                None => (target.to_string(), None),
            }
        }
        None => (target.to_string(), None),
    }
}

fn unquote(s: &str) -> Option<String> {
    let mut chars = s.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    let matched = matches!((first, last), ('"', '"') | ('\'', '\'') | ('(', ')'));
    matched.then(|| s[1..s.len() - 1].to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Formatter
// ─────────────────────────────────────────────────────────────────────────────

/// One inline-format invocation and its placeholder tables.
#[derive(Debug)]
pub struct InlineFormatter<'a> {
    theme: &'a ColorTheme,
    handle_escapes: bool,
    /// Slot → literal character of `\x`
    escapes: Vec<char>,
    /// Slot → rendered `<code>` markup
    codes: Vec<String>,
    /// Slot → protected link target
    targets: Vec<LinkTarget>,
}

impl<'a> InlineFormatter<'a> {
    pub fn new(theme: &'a ColorTheme) -> Self {
        Self {
            theme,
            handle_escapes: true,
            escapes: Vec::new(),
            codes: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Whether backslash escapes are resolved (default `true`).
    pub fn handle_escapes(mut self, enabled: bool) -> Self {
        self.handle_escapes = enabled;
        self
    }

    /// Run the full pipeline over `text`.
    pub fn format(mut self, text: &str) -> String {
        let text = strip_sentinel_chars(text);
        let text = if self.handle_escapes {
            self.protect_escapes(&text)
        } else {
            text
        };
        let text = self.extract_code(&text);
        let text = self.protect_link_targets(&text);
        let text = escape_text(&text);

        let text = self.render_keyboard(&text);
        let text = render_line_breaks(&text);
        let text = outside_tags(&text, |t| self.render_highlight(t));
        let text = outside_tags(&text, |t| self.render_emphasis(t));
        let text = outside_tags(&text, |t| self.render_strikethrough(t));
        let text = outside_tags(&text, |t| self.render_superscript(t));
        let text = outside_tags(&text, |t| self.render_subscript(t));
        let text = self.render_images(&text);
        let text = outside_tags(&text, |t| self.render_links(t));

        let text = self.restore_unresolved_targets(&text);
        let text = self.restore_code(&text);
        self.resolve_escapes(&text, false)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Protection passes
    // ─────────────────────────────────────────────────────────────────────────

    fn protect_escapes(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(&next) = chars.peek() {
                    if ESCAPABLE.contains(&next) {
                        chars.next();
                        out.push_str(&sentinel("E", self.escapes.len()));
                        self.escapes.push(next);
                        continue;
                    }
                }
            }
            out.push(c);
        }
        out
    }

    /// Replace escape sentinels with the literal character, or with the
    /// original backslash sequence when `keep_backslash` is set.
    fn resolve_escapes(&self, text: &str, keep_backslash: bool) -> String {
        if self.escapes.is_empty() {
            return text.to_string();
        }
        let token_re = regex!("\u{E000}E(\\d+)\u{E001}");
        token_re
            .replace_all(text, |caps: &regex::Captures| {
                let c = caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.escapes.get(i).copied());
                match (c, keep_backslash) {
                    (Some(c), true) => format!("\\{}", c),
                    (Some(c), false) => c.to_string(),
                    (None, _) => String::new(),
                }
            })
            .into_owned()
    }

    /// Move every backtick span into the code table.
    fn extract_code(&mut self, text: &str) -> String {
        let bytes = text.as_bytes();
        let mut out = String::with_capacity(text.len());
        let mut i = 0;
        let mut copied = 0;

        while i < bytes.len() {
            if bytes[i] != b'`' {
                i += 1;
                continue;
            }
            let run_start = i;
            while i < bytes.len() && bytes[i] == b'`' {
                i += 1;
            }
            let run_len = i - run_start;

            // Closing run must have exactly the same length.
            let mut j = i;
            let mut close = None;
            while j < bytes.len() {
                if bytes[j] == b'`' {
                    let s = j;
                    while j < bytes.len() && bytes[j] == b'`' {
                        j += 1;
                    }
                    if j - s == run_len {
                        close = Some(s);
                        break;
                    }
                } else {
                    j += 1;
                }
            }

            if let Some(close_start) = close {
                out.push_str(&text[copied..run_start]);
                let token = self.stash_code(&text[i..close_start]);
                out.push_str(&token);
                i = close_start + run_len;
                copied = i;
            }
        }

        out.push_str(&text[copied..]);
        out
    }

    fn stash_code(&mut self, content: &str) -> String {
        let content = self.resolve_escapes(content, true);
        let content = if content.len() >= 2
            && content.starts_with(' ')
            && content.ends_with(' ')
            && !content.trim().is_empty()
        {
            &content[1..content.len() - 1]
        } else {
            content.as_str()
        };

        let html = format!(
            r#"<code style="padding: 2px 4px; margin: 0 2px; border-radius: 4px; background-color: {bg}; color: {fg}; font-family: {font}; font-size: 0.9em; word-break: break-all;">{code}</code>"#,
            bg = self.theme.inline_code_bg,
            fg = self.theme.inline_code_text,
            font = CODE_FONT_STACK,
            code = escape_code(content),
        );
        let token = sentinel("C", self.codes.len());
        self.codes.push(html);
        token
    }

    fn restore_code(&self, text: &str) -> String {
        if self.codes.is_empty() {
            return text.to_string();
        }
        let token_re = regex!("\u{E000}C(\\d+)\u{E001}");
        token_re
            .replace_all(text, |caps: &regex::Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.codes.get(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned()
    }

    /// Swap the inside of every `](...)` for a sentinel.
    fn protect_link_targets(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(pos) = rest.find("](") {
            let open = pos + 2;
            let Some(len) = closing_paren(&rest[open..]) else {
                out.push_str(&rest[..open]);
                rest = &rest[open..];
                continue;
            };
            let inner = &rest[open..open + len];
            let target = self.parse_target(inner);
            out.push_str(&rest[..open]);
            out.push_str(&sentinel("U", self.targets.len()));
            out.push(')');
            self.targets.push(target);
            rest = &rest[open + len + 1..];
        }

        out.push_str(rest);
        out
    }

    fn parse_target(&self, inner: &str) -> LinkTarget {
        let literal = self.resolve_escapes(inner, false);
        let (url, title) = split_title(literal.trim());
        let url = if url.contains(SENTINEL_OPEN) {
            None
        } else {
            sanitize_url(&url)
        };
        LinkTarget {
            raw: inner.to_string(),
            url,
            title,
        }
    }

    fn restore_unresolved_targets(&self, text: &str) -> String {
        if self.targets.is_empty() {
            return text.to_string();
        }
        let token_re = regex!("\u{E000}U(\\d+)\u{E001}");
        token_re
            .replace_all(text, |caps: &regex::Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.targets.get(i))
                    .map(|t| escape_text(&t.raw))
                    .unwrap_or_default()
            })
            .into_owned()
    }

    fn target(&self, slot: &str) -> Option<&LinkTarget> {
        slot.parse::<usize>().ok().and_then(|i| self.targets.get(i))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering passes
    // ─────────────────────────────────────────────────────────────────────────

    fn render_keyboard(&self, text: &str) -> String {
        let kbd_re = regex!(r"&lt;kbd&gt;(.+?)&lt;/kbd&gt;");
        kbd_re
            .replace_all(text, |caps: &regex::Captures| {
                format!(
                    r#"<kbd style="display: inline-block; padding: 1px 6px; margin: 0 2px; border: 1px solid {border}; border-bottom-width: 2px; border-radius: 4px; background-color: {bg}; color: {fg}; font-family: {font}; font-size: 0.85em; line-height: 1.4;">{key}</kbd>"#,
                    border = self.theme.border,
                    bg = self.theme.surface,
                    fg = self.theme.text,
                    font = CODE_FONT_STACK,
                    key = &caps[1],
                )
            })
            .into_owned()
    }

    fn render_highlight(&self, text: &str) -> String {
        replace_spans(text, HIGHLIGHT, |inner| {
            format!(
                r#"<span style="background-color: {}; padding: 0 2px; border-radius: 2px;">{}</span>"#,
                self.theme.highlight, inner
            )
        })
    }

    fn strong(&self, inner: &str) -> String {
        format!(
            r#"<strong style="font-weight: bold; color: {};">{}</strong>"#,
            self.theme.primary, inner
        )
    }

    fn em(&self, inner: &str) -> String {
        format!(r#"<em style="font-style: italic;">{}</em>"#, inner)
    }

    fn render_italics(&self, text: &str) -> String {
        let text = replace_spans(text, ITALIC_STAR, |inner| self.em(inner));
        replace_spans(&text, ITALIC_UNDERSCORE, |inner| self.em(inner))
    }

    fn render_emphasis(&self, text: &str) -> String {
        let text = replace_spans(text, BOLD_ITALIC_STAR, |inner| self.strong(&self.em(inner)));
        let text = replace_spans(&text, BOLD_ITALIC_UNDERSCORE, |inner| {
            self.strong(&self.em(inner))
        });
        let text = split_mixed_triples(&text, '*');
        let text = split_mixed_triples(&text, '_');
        // Italic nested in bold resolves against the bold span's own content.
        let text = replace_spans(&text, BOLD_STAR, |inner| {
            self.strong(&self.render_italics(inner))
        });
        let text = replace_spans(&text, BOLD_UNDERSCORE, |inner| {
            self.strong(&self.render_italics(inner))
        });
        self.render_italics(&text).replace(SPAN_JOIN, "")
    }

    fn render_strikethrough(&self, text: &str) -> String {
        replace_spans(text, STRIKETHROUGH, |inner| {
            format!(
                r#"<del style="text-decoration: line-through; color: {};">{}</del>"#,
                self.theme.text_muted, inner
            )
        })
    }

    fn render_superscript(&self, text: &str) -> String {
        replace_spans(text, SUPERSCRIPT, |inner| {
            format!(
                r#"<sup style="font-size: 0.75em; vertical-align: super; line-height: 0;">{}</sup>"#,
                inner
            )
        })
    }

    fn render_subscript(&self, text: &str) -> String {
        replace_spans(text, SUBSCRIPT, |inner| {
            format!(
                r#"<sub style="font-size: 0.75em; vertical-align: sub; line-height: 0;">{}</sub>"#,
                inner
            )
        })
    }

    fn render_links(&self, text: &str) -> String {
        let link_re = regex!("(!?)\\[([^\\[\\]]*)\\]\\(\u{E000}U(\\d+)\u{E001}\\)");
        link_re
            .replace_all(text, |caps: &regex::Captures| {
                if &caps[1] == "!" {
                    return caps[0].to_string();
                }
                let Some(target) = self.target(&caps[3]) else {
                    return caps[0].to_string();
                };
                let label = &caps[2];
                match &target.url {
                    Some(url) => format!(
                        r#"<a href="{href}"{title} style="color: {primary}; text-decoration: none; border-bottom: 1px solid {underline};">{label}</a>"#,
                        href = html_escape(url),
                        title = title_attr(target.title.as_deref()),
                        primary = self.theme.primary,
                        underline = self.theme.primary.rgba(0.4),
                        label = label,
                    ),
                    None => {
                        debug!("Rendering unsafe link as inert text");
                        format!(
                            r#"<span style="color: {};">{}</span>"#,
                            self.theme.text_muted, label
                        )
                    }
                }
            })
            .into_owned()
    }

    fn render_images(&self, text: &str) -> String {
        let image_re = regex!("!\\[([^\\[\\]]*)\\]\\(\u{E000}U(\\d+)\u{E001}\\)");
        image_re
            .replace_all(text, |caps: &regex::Captures| {
                let Some(target) = self.target(&caps[2]) else {
                    return caps[0].to_string();
                };
                let alt = alt_text(&caps[1]);
                match &target.url {
                    Some(url) => format!(
                        r#"<img src="{src}" alt="{alt}"{title} style="display: block; max-width: 100%; height: auto; margin: 0.8em auto; border-radius: 6px;">"#,
                        src = html_escape(url),
                        alt = alt,
                        title = title_attr(target.title.as_deref()),
                    ),
                    None => {
                        debug!("Rendering unsafe image as placeholder");
                        let label = if alt.is_empty() { "image".to_string() } else { alt };
                        format!(
                            r#"<span style="color: {};">[{}]</span>"#,
                            self.theme.text_muted, label
                        )
                    }
                }
            })
            .into_owned()
    }
}

fn render_line_breaks(text: &str) -> String {
    let br_re = regex!(r"&lt;br\s*/?&gt;");
    br_re.replace_all(text, "<br>").into_owned()
}

fn title_attr(title: Option<&str>) -> String {
    match title {
        Some(t) if !t.is_empty() => format!(r#" title="{}""#, html_escape(t)),
        _ => String::new(),
    }
}

/// Alt text is already HTML-escaped; drop emitted tags and code tokens, then
/// make it safe inside a double-quoted attribute.
fn alt_text(label: &str) -> String {
    let tag_re = regex!(r"<[^<>]+>");
    let code_re = regex!("\u{E000}C\\d+\u{E001}");
    let plain = tag_re.replace_all(label, "");
    code_re.replace_all(&plain, "").replace('"', "&quot;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::presets;

    fn fmt(text: &str) -> String {
        format_inline(text, &presets::default_color_theme(), true)
    }

    fn strip_tags(html: &str) -> String {
        regex::Regex::new(r"<[^>]+>")
            .unwrap()
            .replace_all(html, "")
            .into_owned()
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(fmt("hello world"), "hello world");
    }

    #[test]
    fn test_bold() {
        let html = fmt("**bold**");
        assert!(html.starts_with("<strong"));
        assert!(html.ends_with(">bold</strong>"));
        assert!(!html.contains('*'));
    }

    #[test]
    fn test_italic_both_markers() {
        assert!(fmt("*it*").contains(">it</em>"));
        assert!(fmt("_it_").contains(">it</em>"));
    }

    #[test]
    fn test_bold_italic_triple() {
        let html = fmt("***both***");
        assert!(html.contains("<strong"));
        assert!(html.contains("<em"));
        assert!(html.contains(">both</em></strong>"));
    }

    #[test]
    fn test_italic_nested_in_bold_stays_inside() {
        let html = fmt("**bold *inner* text** after *out*");
        let strong_end = html.find("</strong>").unwrap();
        let inner_em = html.find(">inner</em>").unwrap();
        assert!(inner_em < strong_end);
        assert!(html[strong_end..].contains(">out</em>"));
    }

    #[test]
    fn test_triple_run_closes_italic_then_bold() {
        let html = fmt("**a *b***");
        assert!(html.starts_with("<strong"));
        assert!(html.ends_with(">b</em></strong>"));
        assert!(!html.contains('*'));
    }

    #[test]
    fn test_triple_run_opens_italic_then_bold() {
        let html = fmt("***a** b*");
        assert!(html.starts_with("<em"));
        assert!(html.ends_with(">a</strong> b</em>"));
        assert!(!html.contains('*'));
    }

    #[test]
    fn test_triple_run_bold_inside_italic() {
        assert!(fmt("*a **b***").ends_with(">b</strong></em>"));
        assert!(fmt("***a* b**").ends_with(">a</em> b</strong>"));
    }

    #[test]
    fn test_lone_triple_run_untouched() {
        assert_eq!(fmt("a *** b"), "a *** b");
    }

    #[test]
    fn test_adjacent_markers_do_not_make_short_spans() {
        // A dangling ** must not be split into two one-char italics.
        let html = fmt("a ** b ** c");
        assert!(!html.contains("<em"));
        assert!(!html.contains("<strong"));
    }

    #[test]
    fn test_intraword_underscores_untouched() {
        assert_eq!(fmt("snake_case_name"), "snake_case_name");
    }

    #[test]
    fn test_arithmetic_asterisks_untouched() {
        assert_eq!(fmt("2 * 3 * 4"), "2 * 3 * 4");
    }

    #[test]
    fn test_strikethrough_sup_sub_highlight() {
        assert!(fmt("~~gone~~").contains(">gone</del>"));
        assert!(fmt("x^2^").contains(">2</sup>"));
        assert!(fmt("H~2~O").contains(">2</sub>"));
        assert!(fmt("==hot==").contains(">hot</span>"));
    }

    #[test]
    fn test_superscript_rejects_spaces() {
        assert_eq!(fmt("a ^b c^ d"), "a ^b c^ d");
    }

    #[test]
    fn test_inline_code_is_verbatim() {
        let html = fmt("use `**not bold** <tag> a_b_c` here");
        assert!(html.contains("**not bold** &lt;tag&gt; a_b_c</code>"));
        assert!(!html.contains("<strong"));
    }

    #[test]
    fn test_inline_code_double_backticks() {
        let html = fmt("``a ` b``");
        assert!(html.contains(">a ` b</code>"));
    }

    #[test]
    fn test_inline_code_keeps_backslashes() {
        let html = fmt(r"`a\*b`");
        assert!(html.contains(r">a\*b</code>"));
    }

    #[test]
    fn test_every_escape_renders_literal() {
        for c in ESCAPABLE {
            let input = format!("a \\{}x\\{} b", c, c);
            let html = fmt(&input);
            let expected = format!("a {}x{} b", c, c);
            assert_eq!(strip_tags(&html), expected, "escape of {:?}", c);
            assert!(!html.contains("<em"), "escape of {:?}", c);
            assert!(!html.contains("<del"), "escape of {:?}", c);
            assert!(!html.contains("<code"), "escape of {:?}", c);
        }
    }

    #[test]
    fn test_escaped_emphasis_is_literal() {
        assert_eq!(fmt(r"\*not italic\*"), "*not italic*");
        assert_eq!(fmt(r"\_\_not bold\_\_"), "__not bold__");
    }

    #[test]
    fn test_escapes_disabled() {
        let html = format_inline(r"\*a\*", &presets::default_color_theme(), false);
        assert!(html.contains('\\'));
    }

    #[test]
    fn test_link_target_with_underscores_and_asterisks() {
        let url = "https://example.com/a_b_c/d*e*f_";
        let html = fmt(&format!("[see _this_]({})", url));
        assert!(html.contains(&format!(r#"href="{}""#, url)));
        assert!(html.contains(">this</em>"));
    }

    #[test]
    fn test_image_target_with_underscores() {
        let url = "https://cdn.example.com/img_1_2.png";
        let html = fmt(&format!("![my_pic]({})", url));
        assert!(html.contains(&format!(r#"src="{}""#, url)));
        assert!(html.contains(r#"alt="my_pic""#));
    }

    #[test]
    fn test_link_gets_default_scheme_and_title() {
        let html = fmt(r#"[x](example.com "Example")"#);
        assert!(html.contains(r#"href="https://example.com""#));
        assert!(html.contains(r#"title="Example""#));
    }

    #[test]
    fn test_javascript_link_is_inert() {
        let html = fmt("[click](javascript:alert(1))");
        assert!(!html.contains("href"));
        assert!(!html.contains("javascript:"));
        assert!(html.contains(">click</span>"));
    }

    #[test]
    fn test_javascript_image_is_inert() {
        let html = fmt("![alt](javascript:alert(1))");
        assert!(!html.contains("src="));
        assert!(!html.contains("javascript:"));
        assert!(html.contains("[alt]"));
    }

    #[test]
    fn test_link_target_with_balanced_parens() {
        let html = fmt("[wiki](https://en.wikipedia.org/wiki/Rust_(language))");
        assert!(html.contains(r#"href="https://en.wikipedia.org/wiki/Rust_(language)""#));
    }

    #[test]
    fn test_linked_image() {
        let html = fmt("[![badge](a.png)](https://y.example)");
        assert!(html.starts_with(r#"<a href="https://y.example""#));
        assert!(html.contains(r#"<img src="https://a.png" alt="badge""#));
        assert!(html.ends_with("</a>"));
        assert!(!html.contains("]("));
    }

    #[test]
    fn test_many_unclosed_openers_stay_linear() {
        let line = "*a ".repeat(20_000);
        let started = std::time::Instant::now();
        let html = fmt(&line);
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
        assert!(!html.contains("<em"));
    }

    #[test]
    fn test_many_spans_on_one_line() {
        let line = "*a* ".repeat(5_000);
        let html = fmt(&line);
        assert_eq!(html.matches("</em>").count(), 5_000);
    }

    #[test]
    fn test_stray_bracket_paren_restored() {
        assert_eq!(fmt("f](x) y"), "f](x) y");
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = fmt("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_keyboard_and_line_break() {
        let html = fmt("press <kbd>Ctrl</kbd><br>next");
        assert!(html.contains(">Ctrl</kbd>"));
        assert!(html.contains("<br>next"));
    }

    #[test]
    fn test_forged_sentinels_are_stripped() {
        let html = fmt("\u{E000}C0\u{E001} text");
        assert_eq!(html, "C0 text");
    }

    #[test]
    fn test_formatter_state_does_not_leak_between_calls() {
        let theme = presets::default_color_theme();
        let first = format_inline("`a` [x](http://a.com)", &theme, true);
        let second = format_inline("`b` [y](http://b.com)", &theme, true);
        assert!(first.contains(">a</code>"));
        assert!(second.contains(">b</code>"));
        assert!(!second.contains("a.com"));
    }
}
