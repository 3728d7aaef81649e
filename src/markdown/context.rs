//! Per-call parse state.
//!
//! Everything that survives from one line to the next lives here. A fresh
//! context is built for each parse call and dropped at the end of it.

use super::table::TableState;
use crate::theme::ResolvedTheme;

/// An open fenced code block.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlockState {
    /// The opening fence (e.g. "```" or "~~~~"); closing must match its
    /// character and be at least as long
    pub fence: String,
    /// Info string from the opening fence, may be empty
    pub language: String,
    /// Raw body lines
    pub lines: Vec<String>,
}

impl CodeBlockState {
    pub fn new(fence: &str, language: &str) -> Self {
        Self {
            fence: fence.to_string(),
            language: language.to_string(),
            lines: Vec::new(),
        }
    }

    /// Whether `trimmed` closes this block.
    pub fn is_closed_by(&self, trimmed: &str) -> bool {
        let Some(fence_char) = self.fence.chars().next() else {
            return false;
        };
        let run = trimmed.chars().take_while(|c| *c == fence_char).count();
        run >= self.fence.chars().count() && trimmed[run * fence_char.len_utf8()..].trim().is_empty()
    }
}

/// Mutable state threaded through the strategy chain.
#[derive(Debug)]
pub struct ParseContext {
    pub theme: ResolvedTheme,
    pub is_preview: bool,
    /// Open fenced code block, if any
    pub code_block: Option<CodeBlockState>,
    /// Lines of an open blockquote with the outermost `>` removed
    pub blockquote: Option<Vec<String>>,
    pub table: TableState,
}

impl ParseContext {
    pub fn new(theme: ResolvedTheme, is_preview: bool) -> Self {
        Self {
            theme,
            is_preview,
            code_block: None,
            blockquote: None,
            table: TableState::default(),
        }
    }

    pub fn in_code_block(&self) -> bool {
        self.code_block.is_some()
    }

    pub fn in_blockquote(&self) -> bool {
        self.blockquote.is_some()
    }

    /// Drop all block state.
    pub fn reset(&mut self) {
        self.code_block = None;
        self.blockquote = None;
        self.table = TableState::default();
    }
}
