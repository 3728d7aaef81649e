//! Table sub-processor.
//!
//! Tables are recognized line by line with a small state machine:
//!
//! ```text
//! None ──header──▶ Detecting ──alignment row──▶ Processing ──non-row──▶ flush ──▶ None
//!                      │
//!                      └──anything else──▶ header degrades to a paragraph
//! ```
//!
//! A header line only enters `Detecting` when the next non-blank line is an
//! alignment row, so a stray `a | b` sentence never starts a table.

use super::inline::format_inline;
use crate::theme::ColorTheme;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Column alignment from the separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// `:---` → left, `:---:` → center, `---:` → right, `---` → left.
    pub fn from_cell(cell: &str) -> Self {
        let cell = cell.trim();
        match (cell.starts_with(':'), cell.ends_with(':') && cell.len() > 1) {
            (true, true) => Alignment::Center,
            (false, true) => Alignment::Right,
            _ => Alignment::Left,
        }
    }

    /// CSS `text-align` value.
    pub fn css(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Rows collected for a table being processed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableBuffer {
    pub header: Vec<String>,
    pub alignments: Vec<Alignment>,
    pub rows: Vec<Vec<String>>,
}

impl TableBuffer {
    pub fn column_count(&self) -> usize {
        self.alignments.len()
    }

    /// Pad with empty cells or truncate to the column count.
    fn normalize(&self, cells: &[String]) -> Vec<String> {
        let mut row: Vec<String> = cells.iter().take(self.column_count()).cloned().collect();
        row.resize(self.column_count(), String::new());
        row
    }
}

/// Table recognition state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TableState {
    #[default]
    None,
    /// Header seen, waiting for the alignment row
    Detecting { header: String },
    Processing(TableBuffer),
}

// ─────────────────────────────────────────────────────────────────────────────
// Line classification
// ─────────────────────────────────────────────────────────────────────────────

/// Whether `trimmed` can be a header or body row.
///
/// Quote lines are never table rows; they belong to the blockquote.
pub fn is_table_row(trimmed: &str) -> bool {
    if trimmed.starts_with('>') || !trimmed.contains('|') {
        return false;
    }
    let pipe_delimited = trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|');
    pipe_delimited || split_cells(trimmed).len() >= 2
}

/// Whether `trimmed` is a separator row like `|:---|:---:|---:|`.
pub fn is_alignment_row(trimmed: &str) -> bool {
    let alignment_re = regex!(r"^\|?\s*:?-+:?\s*(\|\s*:?-+:?\s*)*\|?$");
    trimmed.contains('|') && alignment_re.is_match(trimmed)
}

/// Parse the alignments of a separator row.
pub fn parse_alignments(trimmed: &str) -> Vec<Alignment> {
    split_cells(trimmed)
        .iter()
        .map(|cell| Alignment::from_cell(cell))
        .collect()
}

/// Split a row into trimmed cells.
///
/// Pipes inside backtick spans and escaped pipes (`\|`) do not split; an
/// escaped pipe becomes a literal `|` in the cell.
pub fn split_cells(line: &str) -> Vec<String> {
    let mut body = line.trim();
    body = body.strip_prefix('|').unwrap_or(body);
    if body.ends_with('|') && !body.ends_with("\\|") {
        body = &body[..body.len() - 1];
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut code_run: Option<usize> = None;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                chars.next();
                current.push('|');
            }
            '`' => {
                let mut run = 1;
                while chars.peek() == Some(&'`') {
                    chars.next();
                    run += 1;
                }
                current.extend(std::iter::repeat('`').take(run));
                code_run = match code_run {
                    None => Some(run),
                    Some(open) if open == run => None,
                    other => other,
                };
            }
            '|' if code_run.is_none() => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Render a complete table.
pub fn render_table(table: &TableBuffer, theme: &ColorTheme) -> String {
    let border = format!("1px solid {}", theme.primary.rgba(0.2));
    let mut html = String::new();

    html.push_str(r#"<section style="overflow-x: auto; margin: 1em 0;">"#);
    html.push_str(
        r#"<table style="width: 100%; border-collapse: collapse; border-spacing: 0; font-size: 0.95em;">"#,
    );

    html.push_str("<thead><tr>");
    for (cell, align) in table.normalize(&table.header).iter().zip(&table.alignments) {
        html.push_str(&format!(
            r#"<th style="border: {border}; padding: 8px 12px; background-color: {tint}; color: {text}; font-weight: bold; text-align: {align};">{content}</th>"#,
            border = border,
            tint = theme.primary.rgba(0.08),
            text = theme.text,
            align = align.css(),
            content = format_inline(cell, theme, true),
        ));
    }
    html.push_str("</tr></thead>");

    html.push_str("<tbody>");
    for (i, row) in table.rows.iter().enumerate() {
        if i % 2 == 1 {
            html.push_str(&format!(r#"<tr style="background-color: {};">"#, theme.surface));
        } else {
            html.push_str("<tr>");
        }
        for (cell, align) in table.normalize(row).iter().zip(&table.alignments) {
            html.push_str(&format!(
                r#"<td style="border: {border}; padding: 8px 12px; color: {text}; text-align: {align};">{content}</td>"#,
                border = border,
                text = theme.text,
                align = align.css(),
                content = format_inline(cell, theme, true),
            ));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></section>");

    html
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
