//! Block-level coordinator.
//!
//! Feeds every line through the strategy chain, collects the emitted
//! fragments and flushes whatever block is still open at end of input.

use log::{debug, trace};

use super::context::ParseContext;
use super::strategy::{
    default_chain, flush_blockquote, flush_code_block, flush_table, Line, LineStrategy,
};
use crate::error::{Error, Result};
use crate::theme::ResolvedTheme;

/// How often one line may be handed back to the chain.
pub const MAX_REDISPATCH: usize = 8;

/// Render the block structure of `markdown` to a sequence of fragments
/// joined by newlines. No post-processing is applied.
pub fn render_blocks(markdown: &str, theme: ResolvedTheme, is_preview: bool) -> Result<String> {
    let lines: Vec<&str> = markdown.lines().collect();
    let chain = default_chain();
    let mut ctx = ParseContext::new(theme, is_preview);
    let mut fragments: Vec<String> = Vec::new();

    for index in 0..lines.len() {
        let line = Line::new(&lines, index);
        dispatch(&chain, &mut ctx, &line, &mut fragments)?;
    }

    // Unterminated blocks are emitted as if they had been closed.
    fragments.extend(flush_code_block(&mut ctx));
    fragments.extend(flush_table(&mut ctx));
    fragments.extend(flush_blockquote(&mut ctx));
    fragments.retain(|f| !f.is_empty());

    debug!(
        "Rendered {} lines into {} block fragments",
        lines.len(),
        fragments.len()
    );
    Ok(fragments.join("\n"))
}

fn dispatch(
    chain: &[&'static dyn LineStrategy],
    ctx: &mut ParseContext,
    line: &Line<'_>,
    fragments: &mut Vec<String>,
) -> Result<()> {
    let mut redispatches = 0;
    loop {
        let strategy = chain
            .iter()
            .find(|s| s.can_process(&*ctx, line))
            .ok_or(Error::StrategyExhausted {
                line_index: line.index,
            })?;
        trace!("Line {} -> {}", line.index + 1, strategy.name());

        let outcome = strategy.process(ctx, line)?;
        fragments.extend(outcome.fragment);
        if !outcome.reprocess {
            return Ok(());
        }

        redispatches += 1;
        if redispatches > MAX_REDISPATCH {
            return Err(Error::RedispatchLimit {
                line_index: line.index,
                strategy: strategy.name(),
            });
        }
    }
}
