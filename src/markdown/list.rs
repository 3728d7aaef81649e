//! List sub-processor.
//!
//! Each list line is rendered on its own as an indented paragraph with a
//! colored marker span. Nesting is expressed through indentation and the
//! per-depth marker style and accent color, not through nested `<ul>`/`<ol>`
//! elements, which several paste targets flatten anyway.

use super::inline::format_inline;
use crate::theme::{Color, ColorTheme};

/// Leading whitespace columns per nesting level. A tab counts as one level.
pub const INDENT_UNIT: usize = 2;

/// Unordered markers by depth, reused modulo its length.
const BULLETS: &[&str] = &["•", "◦", "▪", "▫"];

/// Accent factors by depth, the last one applies to every deeper level.
const ACCENT_FACTORS: &[f32] = &[1.0, 0.7, 0.5, 0.3];

const CHECKED_BOX: &str = "☑";
const UNCHECKED_BOX: &str = "☐";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered(u64),
    Task { checked: bool },
}

/// One parsed list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem<'a> {
    pub kind: ListKind,
    pub depth: usize,
    pub content: &'a str,
}

/// Parse a raw line as a list item.
pub fn parse_item(raw: &str) -> Option<ListItem<'_>> {
    if is_horizontal_rule(raw.trim()) {
        return None;
    }
    let item_re = regex!(r"^([ \t]*)([-*+]|\d{1,9}[.)])\s+(.+)$");
    let caps = item_re.captures(raw)?;

    let depth = indent_width(caps.get(1).map_or("", |m| m.as_str())) / INDENT_UNIT;
    let marker = caps.get(2)?.as_str();
    let content = caps.get(3)?.as_str().trim_end();

    let task_re = regex!(r"^\[([ xX])\]\s+(.+)$");
    if let Some(task) = task_re.captures(content) {
        let checked = &task[1] != " ";
        let content = task.get(2)?.as_str();
        return Some(ListItem {
            kind: ListKind::Task { checked },
            depth,
            content,
        });
    }

    let kind = match marker.trim_end_matches(['.', ')']).parse::<u64>() {
        Ok(n) => ListKind::Ordered(n),
        Err(_) => ListKind::Unordered,
    };
    Some(ListItem {
        kind,
        depth,
        content,
    })
}

/// `***`, `---`, `___` (optionally spaced), at least three markers.
pub fn is_horizontal_rule(trimmed: &str) -> bool {
    let hr_re = regex!(r"^(?:(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})$");
    hr_re.is_match(trimmed)
}

fn indent_width(indent: &str) -> usize {
    indent
        .chars()
        .map(|c| if c == '\t' { INDENT_UNIT } else { 1 })
        .sum()
}

/// Marker accent for `depth`: the primary color scaled channel-wise.
pub fn accent_color(primary: Color, depth: usize) -> Color {
    let factor = ACCENT_FACTORS[depth.min(ACCENT_FACTORS.len() - 1)];
    primary.scale(factor)
}

/// Bullet glyph for `depth`.
pub fn bullet(depth: usize) -> &'static str {
    BULLETS[depth % BULLETS.len()]
}

/// Ordered marker for number `n` at `depth`.
///
/// Styles rotate arabic → lower-alpha → lower-roman → parenthesized.
pub fn ordered_marker(n: u64, depth: usize) -> String {
    match depth % 4 {
        0 => format!("{}.", n),
        1 => format!("{}.", to_alpha(n)),
        2 => format!("{}.", to_roman(n)),
        _ => format!("({})", n),
    }
}

/// 1 → a, 26 → z, 27 → aa.
fn to_alpha(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'a' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

fn to_roman(n: u64) -> String {
    if n == 0 || n >= 4000 {
        return n.to_string();
    }
    const NUMERALS: &[(u64, &str)] = &[
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut n = n;
    let mut out = String::new();
    for &(value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// Render one list line.
pub fn render_item(item: &ListItem<'_>, theme: &ColorTheme) -> String {
    let accent = accent_color(theme.primary, item.depth);
    let padding = 1.2 + item.depth as f32 * 1.5;
    let content = format_inline(item.content, theme, true);

    let (marker, body) = match item.kind {
        ListKind::Unordered => (bullet(item.depth).to_string(), content),
        ListKind::Ordered(n) => (ordered_marker(n, item.depth), content),
        ListKind::Task { checked: true } => (
            CHECKED_BOX.to_string(),
            format!(
                r#"<span style="text-decoration: line-through; color: {};">{}</span>"#,
                theme.text_muted, content
            ),
        ),
        ListKind::Task { checked: false } => (UNCHECKED_BOX.to_string(), content),
    };

    format!(
        r#"<p style="margin: 0.4em 0; padding-left: {padding}em; color: {text};"><span style="display: inline-block; min-width: 1.2em; margin-right: 0.4em; margin-left: -1.2em; color: {accent}; font-weight: bold;">{marker}</span>{body}</p>"#,
        padding = crate::fonts::format_number(padding),
        text = theme.text,
        accent = accent,
        marker = marker,
        body = body,
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::presets;

    #[test]
    fn test_parse_unordered_and_ordered() {
        let item = parse_item("- apples").unwrap();
        assert_eq!(item.kind, ListKind::Unordered);
        assert_eq!(item.depth, 0);
        assert_eq!(item.content, "apples");

        let item = parse_item("    12) twelve").unwrap();
        assert_eq!(item.kind, ListKind::Ordered(12));
        assert_eq!(item.depth, 2);
    }

    #[test]
    fn test_parse_tab_indent() {
        assert_eq!(parse_item("\t\t* deep").unwrap().depth, 2);
    }

    #[test]
    fn test_parse_tasks() {
        let done = parse_item("- [x] done").unwrap();
        assert_eq!(done.kind, ListKind::Task { checked: true });
        assert_eq!(done.content, "done");
        let upper = parse_item("- [X] done").unwrap();
        assert_eq!(upper.kind, ListKind::Task { checked: true });
        let todo = parse_item("- [ ] todo").unwrap();
        assert_eq!(todo.kind, ListKind::Task { checked: false });
    }

    #[test]
    fn test_horizontal_rules_are_not_items() {
        assert!(parse_item("* * *").is_none());
        assert!(parse_item("---").is_none());
        assert!(parse_item("- - -").is_none());
        assert!(is_horizontal_rule("___"));
        assert!(!is_horizontal_rule("--"));
    }

    #[test]
    fn test_non_items() {
        assert!(parse_item("-no space").is_none());
        assert!(parse_item("2024 was a year").is_none());
        assert!(parse_item("**bold** start").is_none());
    }

    #[test]
    fn test_accent_ramp() {
        let primary = Color::from_hex("#00A86B").unwrap();
        assert_eq!(accent_color(primary, 0), primary);
        assert_eq!(accent_color(primary, 1), Color::from_rgb(0, 118, 75));
        assert_eq!(accent_color(primary, 2), Color::from_rgb(0, 84, 54));
        assert_eq!(accent_color(primary, 3), Color::from_rgb(0, 50, 32));
        assert_eq!(accent_color(primary, 7), Color::from_rgb(0, 50, 32));
    }

    #[test]
    fn test_bullets_cycle() {
        assert_eq!(bullet(0), "•");
        assert_eq!(bullet(1), "◦");
        assert_eq!(bullet(4), bullet(0));
    }

    #[test]
    fn test_ordered_marker_styles() {
        assert_eq!(ordered_marker(3, 0), "3.");
        assert_eq!(ordered_marker(3, 1), "c.");
        assert_eq!(ordered_marker(4, 2), "iv.");
        assert_eq!(ordered_marker(3, 3), "(3)");
        assert_eq!(ordered_marker(3, 4), "3.");
        assert_eq!(ordered_marker(28, 1), "ab.");
    }

    #[test]
    fn test_render_checked_task() {
        let theme = presets::default_color_theme();
        let html = render_item(&parse_item("- [x] done").unwrap(), &theme);
        assert!(html.contains(CHECKED_BOX));
        assert!(html.contains("line-through"));
        assert!(html.contains(&theme.text_muted.to_hex()));

        let html = render_item(&parse_item("- [ ] todo").unwrap(), &theme);
        assert!(html.contains(UNCHECKED_BOX));
        assert!(!html.contains("line-through"));
    }

    #[test]
    fn test_render_depth_accent() {
        let theme = presets::default_color_theme();
        let html = render_item(&parse_item("  - nested").unwrap(), &theme);
        assert!(html.contains("color: #00764b;"));
        assert!(html.contains("padding-left: 2.7em"));
    }
}
