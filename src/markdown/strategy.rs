//! Line strategies.
//!
//! Every input line is offered to a fixed chain of strategies; the first one
//! whose [`LineStrategy::can_process`] accepts it handles the line. A strategy
//! may ask for the same line to be dispatched again after changing the
//! context, which is how a closing quote or table hands the line that closed
//! it on to the rest of the chain.
//!
//! # Precedence
//!
//! 1. [`CodeBlockStrategy`] - raw accumulation inside a fence
//! 2. [`BlankLineStrategy`]
//! 3. [`BlockquoteCloseStrategy`]
//! 4. [`TableStrategy`]
//! 5. [`ListStrategy`]
//! 6. [`SingleLineStrategy`] - heading, rule, quote line, fence open
//! 7. [`ParagraphStrategy`] - accepts everything

use log::trace;

use super::blockquote::{render_blockquote, strip_marker};
use super::code_block::{language_of, render_code_block};
use super::context::{CodeBlockState, ParseContext};
use super::heading::{parse_heading, render_heading};
use super::inline::format_inline;
use super::list::{is_horizontal_rule, parse_item, render_item};
use super::table::{
    is_alignment_row, is_table_row, parse_alignments, render_table, split_cells, TableBuffer,
    TableState,
};
use crate::error::Result;

// ─────────────────────────────────────────────────────────────────────────────
// Line & Outcome
// ─────────────────────────────────────────────────────────────────────────────

/// One input line with its neighbours.
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    pub raw: &'a str,
    pub trimmed: &'a str,
    pub index: usize,
    pub all: &'a [&'a str],
}

impl<'a> Line<'a> {
    pub fn new(all: &'a [&'a str], index: usize) -> Self {
        let raw = all.get(index).copied().unwrap_or("");
        Self {
            raw,
            trimmed: raw.trim(),
            index,
            all,
        }
    }

    /// The next line after this one that is not blank.
    pub fn next_non_blank(&self) -> Option<&'a str> {
        self.all
            .iter()
            .skip(self.index + 1)
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
    }
}

/// What a strategy did with a line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyOutcome {
    /// Markup to append to the output, if any
    pub fragment: Option<String>,
    /// Dispatch the same line again
    pub reprocess: bool,
}

impl StrategyOutcome {
    /// Line consumed, nothing emitted yet.
    pub fn consumed() -> Self {
        Self::default()
    }

    /// Line consumed, `fragment` emitted.
    pub fn emit(fragment: String) -> Self {
        Self {
            fragment: Some(fragment),
            reprocess: false,
        }
    }

    /// `fragment` emitted for earlier lines; the current line goes round again.
    pub fn emit_and_reprocess(fragment: String) -> Self {
        Self {
            fragment: Some(fragment),
            reprocess: true,
        }
    }
}

/// A handler for one kind of line.
pub trait LineStrategy {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this strategy handles `line` in the current context.
    fn can_process(&self, ctx: &ParseContext, line: &Line<'_>) -> bool;

    /// Handle `line`, updating the context.
    fn process(&self, ctx: &mut ParseContext, line: &Line<'_>) -> Result<StrategyOutcome>;
}

/// The chain in precedence order.
pub fn default_chain() -> [&'static dyn LineStrategy; 7] {
    [
        &CodeBlockStrategy,
        &BlankLineStrategy,
        &BlockquoteCloseStrategy,
        &TableStrategy,
        &ListStrategy,
        &SingleLineStrategy,
        &ParagraphStrategy,
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared block helpers
// ─────────────────────────────────────────────────────────────────────────────

/// A plain paragraph line.
pub fn render_paragraph(ctx: &ParseContext, text: &str) -> String {
    let system = &ctx.theme.system;
    let justify = if system.justify {
        " text-align: justify;"
    } else {
        ""
    };
    format!(
        r#"<p style="margin: 0 0 {spacing}em; color: {text};{justify}">{content}</p>"#,
        spacing = crate::fonts::format_number(system.paragraph_spacing),
        text = ctx.theme.color.text,
        justify = justify,
        content = format_inline(text, &ctx.theme.color, true),
    )
}

fn render_rule(ctx: &ParseContext) -> String {
    format!(
        r#"<hr style="border: none; border-top: 1px solid {}; margin: 1.5em 0;">"#,
        ctx.theme.color.border
    )
}

/// Render and clear the open blockquote.
pub fn flush_blockquote(ctx: &mut ParseContext) -> Option<String> {
    let lines = ctx.blockquote.take()?;
    Some(render_blockquote(&lines, &ctx.theme.color))
}

/// Render and clear the table state. A table still waiting for its alignment
/// row falls back to a paragraph of its header line.
pub fn flush_table(ctx: &mut ParseContext) -> Option<String> {
    match std::mem::take(&mut ctx.table) {
        TableState::None => None,
        TableState::Detecting { header } => Some(render_paragraph(ctx, &header)),
        TableState::Processing(buffer) => Some(render_table(&buffer, &ctx.theme.color)),
    }
}

/// Render and clear an unterminated code block.
pub fn flush_code_block(ctx: &mut ParseContext) -> Option<String> {
    let block = ctx.code_block.take()?;
    Some(render_code_block(
        &block.lines,
        &block.language,
        &ctx.theme.code,
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Strategies
// ─────────────────────────────────────────────────────────────────────────────

/// Accumulates raw lines until the closing fence.
#[derive(Debug)]
pub struct CodeBlockStrategy;

impl LineStrategy for CodeBlockStrategy {
    fn name(&self) -> &'static str {
        "code-block"
    }

    fn can_process(&self, ctx: &ParseContext, _line: &Line<'_>) -> bool {
        ctx.in_code_block()
    }

    fn process(&self, ctx: &mut ParseContext, line: &Line<'_>) -> Result<StrategyOutcome> {
        let closes = ctx
            .code_block
            .as_ref()
            .is_some_and(|block| block.is_closed_by(line.trimmed));
        if closes {
            trace!("Code block closed at line {}", line.index + 1);
            return Ok(flush_code_block(ctx).map_or_else(StrategyOutcome::consumed, StrategyOutcome::emit));
        }
        if let Some(block) = ctx.code_block.as_mut() {
            block.lines.push(line.raw.to_string());
        }
        Ok(StrategyOutcome::consumed())
    }
}

/// Blank lines separate blocks.
#[derive(Debug)]
pub struct BlankLineStrategy;

impl LineStrategy for BlankLineStrategy {
    fn name(&self) -> &'static str {
        "blank"
    }

    fn can_process(&self, _ctx: &ParseContext, line: &Line<'_>) -> bool {
        line.trimmed.is_empty()
    }

    fn process(&self, ctx: &mut ParseContext, _line: &Line<'_>) -> Result<StrategyOutcome> {
        if let Some(quote) = ctx.blockquote.as_mut() {
            quote.push(String::new());
            return Ok(StrategyOutcome::consumed());
        }
        if matches!(ctx.table, TableState::Processing(_)) {
            return Ok(flush_table(ctx).map_or_else(StrategyOutcome::consumed, StrategyOutcome::emit));
        }
        Ok(StrategyOutcome::consumed())
    }
}

/// Closes an open quote at the first line without `>`.
#[derive(Debug)]
pub struct BlockquoteCloseStrategy;

impl LineStrategy for BlockquoteCloseStrategy {
    fn name(&self) -> &'static str {
        "blockquote-close"
    }

    fn can_process(&self, ctx: &ParseContext, line: &Line<'_>) -> bool {
        ctx.in_blockquote() && !line.trimmed.starts_with('>')
    }

    fn process(&self, ctx: &mut ParseContext, _line: &Line<'_>) -> Result<StrategyOutcome> {
        let fragment = flush_blockquote(ctx).unwrap_or_default();
        Ok(StrategyOutcome::emit_and_reprocess(fragment))
    }
}

/// Drives the table state machine.
#[derive(Debug)]
pub struct TableStrategy;

impl LineStrategy for TableStrategy {
    fn name(&self) -> &'static str {
        "table"
    }

    fn can_process(&self, ctx: &ParseContext, line: &Line<'_>) -> bool {
        match ctx.table {
            TableState::None => {
                is_table_row(line.trimmed)
                    && line.next_non_blank().is_some_and(is_alignment_row)
            }
            _ => true,
        }
    }

    fn process(&self, ctx: &mut ParseContext, line: &Line<'_>) -> Result<StrategyOutcome> {
        match &mut ctx.table {
            TableState::None => {
                trace!("Table header candidate at line {}", line.index + 1);
                ctx.table = TableState::Detecting {
                    header: line.trimmed.to_string(),
                };
                Ok(StrategyOutcome::consumed())
            }
            TableState::Detecting { header } => {
                if is_alignment_row(line.trimmed) {
                    let buffer = TableBuffer {
                        header: split_cells(header),
                        alignments: parse_alignments(line.trimmed),
                        rows: Vec::new(),
                    };
                    ctx.table = TableState::Processing(buffer);
                    Ok(StrategyOutcome::consumed())
                } else {
                    let fragment = flush_table(ctx).unwrap_or_default();
                    Ok(StrategyOutcome::emit_and_reprocess(fragment))
                }
            }
            TableState::Processing(buffer) => {
                if is_table_row(line.trimmed) {
                    buffer.rows.push(split_cells(line.trimmed));
                    Ok(StrategyOutcome::consumed())
                } else {
                    let fragment = flush_table(ctx).unwrap_or_default();
                    Ok(StrategyOutcome::emit_and_reprocess(fragment))
                }
            }
        }
    }
}

/// Bullet, numbered and task items.
#[derive(Debug)]
pub struct ListStrategy;

impl LineStrategy for ListStrategy {
    fn name(&self) -> &'static str {
        "list"
    }

    fn can_process(&self, _ctx: &ParseContext, line: &Line<'_>) -> bool {
        parse_item(line.raw).is_some()
    }

    fn process(&self, ctx: &mut ParseContext, line: &Line<'_>) -> Result<StrategyOutcome> {
        Ok(parse_item(line.raw)
            .map(|item| render_item(&item, &ctx.theme.color))
            .map_or_else(StrategyOutcome::consumed, StrategyOutcome::emit))
    }
}

/// Constructs that fit on one line, plus the openers of quotes and fences.
#[derive(Debug)]
pub struct SingleLineStrategy;

impl SingleLineStrategy {
    fn fence_of(trimmed: &str) -> Option<(&str, &str)> {
        let fence_re = regex!(r"^(`{3,}|~{3,})(.*)$");
        let caps = fence_re.captures(trimmed)?;
        let fence = caps.get(1)?.as_str();
        let info = caps.get(2).map_or("", |m| m.as_str());
        // A backtick fence's info string may not contain backticks.
        if fence.starts_with('`') && info.contains('`') {
            return None;
        }
        Some((fence, info))
    }
}

impl LineStrategy for SingleLineStrategy {
    fn name(&self) -> &'static str {
        "single-line"
    }

    fn can_process(&self, _ctx: &ParseContext, line: &Line<'_>) -> bool {
        let t = line.trimmed;
        parse_heading(t).is_some()
            || is_horizontal_rule(t)
            || t.starts_with('>')
            || Self::fence_of(t).is_some()
    }

    fn process(&self, ctx: &mut ParseContext, line: &Line<'_>) -> Result<StrategyOutcome> {
        let t = line.trimmed;

        if let Some((level, text)) = parse_heading(t) {
            return Ok(StrategyOutcome::emit(render_heading(
                level,
                text,
                &ctx.theme,
                ctx.is_preview,
            )));
        }
        if is_horizontal_rule(t) {
            return Ok(StrategyOutcome::emit(render_rule(ctx)));
        }
        if let Some(content) = strip_marker(t) {
            ctx.blockquote
                .get_or_insert_with(Vec::new)
                .push(content.to_string());
            return Ok(StrategyOutcome::consumed());
        }
        if let Some((fence, info)) = Self::fence_of(t) {
            trace!("Code block opened at line {}", line.index + 1);
            ctx.code_block = Some(CodeBlockState::new(fence, language_of(info)));
            return Ok(StrategyOutcome::consumed());
        }

        Ok(StrategyOutcome::consumed())
    }
}

/// Everything else is a paragraph line.
#[derive(Debug)]
pub struct ParagraphStrategy;

impl LineStrategy for ParagraphStrategy {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn can_process(&self, _ctx: &ParseContext, _line: &Line<'_>) -> bool {
        true
    }

    fn process(&self, ctx: &mut ParseContext, line: &Line<'_>) -> Result<StrategyOutcome> {
        Ok(StrategyOutcome::emit(render_paragraph(ctx, line.trimmed)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ResolvedTheme;

    fn ctx() -> ParseContext {
        ParseContext::new(ResolvedTheme::default(), false)
    }

    fn first_match(ctx: &ParseContext, all: &[&str], index: usize) -> &'static str {
        let line = Line::new(all, index);
        default_chain()
            .iter()
            .find(|s| s.can_process(ctx, &line))
            .map(|s| s.name())
            .unwrap_or("none")
    }

    #[test]
    fn test_next_non_blank_skips_blank_lines() {
        let all = ["| a | b |", "", "  ", "|---|---|"];
        assert_eq!(Line::new(&all, 0).next_non_blank(), Some("|---|---|"));
        assert_eq!(Line::new(&all, 3).next_non_blank(), None);
    }

    #[test]
    fn test_dispatch_order() {
        let ctx = ctx();
        let all = [
            "# Title",
            "| a | b |",
            "|---|---|",
            "- item",
            "> quote",
            "```rust",
            "plain text",
            "",
            "a | b without separator",
        ];
        assert_eq!(first_match(&ctx, &all, 0), "single-line");
        assert_eq!(first_match(&ctx, &all, 1), "table");
        assert_eq!(first_match(&ctx, &all, 3), "list");
        assert_eq!(first_match(&ctx, &all, 4), "single-line");
        assert_eq!(first_match(&ctx, &all, 5), "single-line");
        assert_eq!(first_match(&ctx, &all, 6), "paragraph");
        assert_eq!(first_match(&ctx, &all, 7), "blank");
        assert_eq!(first_match(&ctx, &all, 8), "paragraph");
    }

    #[test]
    fn test_code_block_takes_priority() {
        let mut ctx = ctx();
        ctx.code_block = Some(CodeBlockState::new("```", ""));
        let all = ["# not a heading", ""];
        assert_eq!(first_match(&ctx, &all, 0), "code-block");
        assert_eq!(first_match(&ctx, &all, 1), "code-block");
    }

    #[test]
    fn test_quote_line_never_starts_table() {
        let ctx = ctx();
        let all = ["> | a | b |", "> |---|---|"];
        assert_eq!(first_match(&ctx, &all, 0), "single-line");
    }

    #[test]
    fn test_blank_line_extends_open_quote() {
        let mut ctx = ctx();
        ctx.blockquote = Some(vec!["a".to_string()]);
        let all = [""];
        let outcome = BlankLineStrategy.process(&mut ctx, &Line::new(&all, 0)).unwrap();
        assert_eq!(outcome, StrategyOutcome::consumed());
        assert_eq!(ctx.blockquote, Some(vec!["a".to_string(), String::new()]));
    }

    #[test]
    fn test_quote_close_requests_reprocess() {
        let mut ctx = ctx();
        ctx.blockquote = Some(vec!["a".to_string()]);
        let all = ["after"];
        let line = Line::new(&all, 0);
        assert_eq!(first_match(&ctx, &all, 0), "blockquote-close");
        let outcome = BlockquoteCloseStrategy.process(&mut ctx, &line).unwrap();
        assert!(outcome.reprocess);
        assert!(outcome.fragment.unwrap().contains("<blockquote"));
        assert!(!ctx.in_blockquote());
    }

    #[test]
    fn test_table_header_without_separator_degrades() {
        let mut ctx = ctx();
        ctx.table = TableState::Detecting {
            header: "| a | b |".to_string(),
        };
        let all = ["not a separator"];
        let outcome = TableStrategy.process(&mut ctx, &Line::new(&all, 0)).unwrap();
        assert!(outcome.reprocess);
        let fragment = outcome.fragment.unwrap();
        assert!(fragment.starts_with("<p "));
        assert!(!fragment.contains("<table"));
        assert_eq!(ctx.table, TableState::None);
    }

    #[test]
    fn test_fence_open_records_language() {
        let mut ctx = ctx();
        let all = ["~~~~ python extra"];
        SingleLineStrategy.process(&mut ctx, &Line::new(&all, 0)).unwrap();
        let block = ctx.code_block.unwrap();
        assert_eq!(block.fence, "~~~~");
        assert_eq!(block.language, "python");
    }
}
