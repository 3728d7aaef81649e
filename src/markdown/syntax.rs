//! Syntax Highlighting Module
//!
//! A small regex tokenizer that colors code blocks with inline `style`
//! attributes. It does not try to be a real lexer: it knows comments, string
//! literals, a fixed keyword list, numeric literals and call-site identifiers,
//! which covers most snippets people paste into an article.
//!
//! # Passes
//!
//! Passes run in a fixed order and each one only claims characters that no
//! earlier pass has claimed, so a keyword inside a string or a number inside a
//! comment is never wrapped twice:
//!
//! 1. comments (`//`, `/* */`, `#` or `--` depending on the language)
//! 2. strings (`"…"`, `'…'`, `` `…` ``)
//! 3. keywords
//! 4. numbers
//! 5. identifiers directly followed by `(`
//!
//! # Example
//! ```ignore
//! use crate::markdown::syntax::highlight_code;
//!
//! let html = highlight_code("fn main() {}", "rust", &code_theme);
//! ```

use log::trace;
use regex::Regex;

use crate::string_utils::{escape_code, TagShield};
use crate::theme::{CodeTheme, Color};

// ─────────────────────────────────────────────────────────────────────────────
// Claimed Ranges
// ─────────────────────────────────────────────────────────────────────────────

/// A set of non-overlapping, half-open byte ranges, kept sorted by start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimedRanges {
    ranges: Vec<(usize, usize)>,
}

impl ClaimedRanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `start..end` overlaps no claimed range.
    pub fn is_free(&self, start: usize, end: usize) -> bool {
        // First range that ends after `start`; it is the only candidate.
        let idx = self.ranges.partition_point(|&(_, e)| e <= start);
        match self.ranges.get(idx) {
            Some(&(s, _)) => s >= end,
            None => true,
        }
    }

    /// Claim `start..end` if it is free. Returns whether the claim succeeded.
    pub fn claim(&mut self, start: usize, end: usize) -> bool {
        if start >= end || !self.is_free(start, end) {
            return false;
        }
        let idx = self.ranges.partition_point(|&(s, _)| s < start);
        self.ranges.insert(idx, (start, end));
        true
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tokens
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Comment,
    String,
    Keyword,
    Number,
    Function,
}

impl TokenKind {
    fn color(&self, theme: &CodeTheme) -> Color {
        match self {
            TokenKind::Comment => theme.comment,
            TokenKind::String => theme.string,
            TokenKind::Keyword => theme.keyword,
            TokenKind::Number => theme.number,
            TokenKind::Function => theme.function,
        }
    }

    fn extra_style(&self) -> &'static str {
        match self {
            TokenKind::Comment => " font-style: italic;",
            TokenKind::Keyword => " font-weight: bold;",
            _ => "",
        }
    }
}

/// A classified byte range of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

/// Line comment syntax for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentStyle {
    /// `//` and `/* */`
    CLike,
    /// `#`
    Hash,
    /// `--`
    Dash,
}

fn comment_style(language: &str) -> CommentStyle {
    match language.to_ascii_lowercase().as_str() {
        "python" | "py" | "bash" | "sh" | "shell" | "zsh" | "fish" | "ruby" | "rb" | "yaml"
        | "yml" | "toml" | "perl" | "pl" | "r" | "dockerfile" | "makefile" | "make" | "ini"
        | "conf" | "powershell" | "ps1" | "nim" | "elixir" | "ex" => CommentStyle::Hash,
        "sql" | "lua" | "haskell" | "hs" | "elm" => CommentStyle::Dash,
        _ => CommentStyle::CLike,
    }
}

/// Languages where `'` starts a lifetime or label, not a string.
fn has_lifetimes(language: &str) -> bool {
    matches!(language.to_ascii_lowercase().as_str(), "rust" | "rs")
}

const KEYWORDS: &[&str] = &[
    "abstract", "and", "as", "async", "await", "bool", "boolean", "break", "case", "catch",
    "chan", "char", "class", "const", "continue", "crate", "def", "default", "defer", "del",
    "do", "double", "dyn", "elif", "else", "enum", "except", "export", "extends", "extern",
    "false", "final", "finally", "float", "fn", "for", "from", "func", "function", "go", "if",
    "impl", "implements", "import", "in", "instanceof", "int", "interface", "is", "lambda",
    "let", "loop", "match", "mod", "move", "mut", "new", "nil", "None", "not", "null", "or",
    "package", "pass", "private", "protected", "pub", "public", "raise", "range", "ref",
    "return", "select", "self", "Self", "static", "string", "struct", "super", "switch",
    "this", "throw", "trait", "True", "False", "true", "try", "type", "typeof", "undefined",
    "unsafe", "use", "var", "void", "where", "while", "with", "yield",
];

fn keyword_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"\b(?:{})\b", KEYWORDS.join("|"));
        Regex::new(&pattern).expect("keyword regex must compile")
    })
}

/// Classify the source into non-overlapping tokens, sorted by position.
pub fn tokenize(code: &str, language: &str) -> Vec<Token> {
    let mut claimed = ClaimedRanges::new();
    let mut tokens = Vec::new();

    // Comments and strings are claimed in one left-to-right sweep so that a
    // `//` inside a string and a quote inside a comment both stay inert.
    let comment_re = match comment_style(language) {
        CommentStyle::CLike => regex!(r"(?s)/\*.*?\*/|//[^\n]*"),
        CommentStyle::Hash => regex!(r"#[^\n]*"),
        CommentStyle::Dash => regex!(r"--[^\n]*"),
    };
    let string_re = if has_lifetimes(language) {
        regex!(r#""(?:[^"\\]|\\.)*"|'(?:[^'\\\n]|\\[^\n]{1,8})'"#)
    } else {
        regex!(r#""(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`(?:[^`\\]|\\.)*`"#)
    };
    for (start, end, kind) in comments_and_strings(code, comment_re, string_re) {
        if claimed.claim(start, end) {
            tokens.push(Token { start, end, kind });
        }
    }

    let mut take = |re: &Regex, group: usize, kind: TokenKind, tokens: &mut Vec<Token>| {
        for caps in re.captures_iter(code) {
            let Some(m) = caps.get(group) else { continue };
            if claimed.claim(m.start(), m.end()) {
                tokens.push(Token {
                    start: m.start(),
                    end: m.end(),
                    kind,
                });
            }
        }
    };

    take(keyword_regex(), 0, TokenKind::Keyword, &mut tokens);
    take(
        regex!(r"\b(?:0[xX][0-9a-fA-F_]+|0[bB][01_]+|\d[\d_]*(?:\.\d[\d_]*)?(?:[eE][+-]?\d+)?)\b"),
        0,
        TokenKind::Number,
        &mut tokens,
    );
    take(
        regex!(r"\b([A-Za-z_][A-Za-z0-9_]*)!?\s*\("),
        1,
        TokenKind::Function,
        &mut tokens,
    );

    tokens.sort_by_key(|t| t.start);
    trace!("Tokenized {} bytes of {:?} into {} tokens", code.len(), language, tokens.len());
    tokens
}

/// Earliest-match-wins sweep over comments and strings.
fn comments_and_strings(
    code: &str,
    comment_re: &Regex,
    string_re: &Regex,
) -> Vec<(usize, usize, TokenKind)> {
    let mut found = Vec::new();
    let mut pos = 0;
    while pos < code.len() {
        let comment = comment_re.find_at(code, pos);
        let string = string_re.find_at(code, pos);
        let next = match (comment, string) {
            (Some(c), Some(s)) if s.start() < c.start() => (s, TokenKind::String),
            (Some(c), _) => (c, TokenKind::Comment),
            (None, Some(s)) => (s, TokenKind::String),
            (None, None) => break,
        };
        let (m, kind) = next;
        if m.end() == m.start() {
            break;
        }
        found.push((m.start(), m.end(), kind));
        pos = m.end();
    }
    found
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Highlight `code` into inline-styled markup with whitespace preserved.
pub fn highlight_code(code: &str, language: &str, theme: &CodeTheme) -> String {
    let tokens = tokenize(code, language);
    let mut html = String::with_capacity(code.len() * 2);
    let mut pos = 0;

    for token in &tokens {
        html.push_str(&escape_code(&code[pos..token.start]));
        html.push_str(&format!(
            r#"<span style="color: {};{}">{}</span>"#,
            token.kind.color(theme),
            token.kind.extra_style(),
            escape_code(&code[token.start..token.end]),
        ));
        pos = token.end;
    }
    html.push_str(&escape_code(&code[pos..]));

    protect_whitespace(&html)
}

/// Turn literal spaces, tabs and newlines into entities and `<br>`, leaving
/// the attributes of emitted tags untouched.
pub fn protect_whitespace(html: &str) -> String {
    let mut shield = TagShield::default();
    let protected = shield.protect(html);
    let protected = protected
        .replace('\t', "&nbsp;&nbsp;&nbsp;&nbsp;")
        .replace(' ', "&nbsp;")
        .replace('\n', "<br>");
    shield.restore(&protected)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::presets;

    fn kinds(code: &str, language: &str) -> Vec<(String, TokenKind)> {
        tokenize(code, language)
            .into_iter()
            .map(|t| (code[t.start..t.end].to_string(), t.kind))
            .collect()
    }

    #[test]
    fn test_claimed_ranges() {
        let mut ranges = ClaimedRanges::new();
        assert!(ranges.claim(5, 10));
        assert!(!ranges.claim(8, 12));
        assert!(!ranges.claim(0, 6));
        assert!(!ranges.claim(6, 7));
        assert!(ranges.claim(0, 5));
        assert!(ranges.claim(10, 11));
        assert!(!ranges.claim(3, 3));
        assert_eq!(ranges.len(), 3);
        assert!(ranges.is_free(11, 20));
    }

    #[test]
    fn test_highlight_rust_code() {
        let tokens = kinds("fn main() {\n    println!(\"Hello\");\n}", "rust");
        assert!(tokens.contains(&("fn".to_string(), TokenKind::Keyword)));
        assert!(tokens.contains(&("main".to_string(), TokenKind::Function)));
        assert!(tokens.contains(&("println".to_string(), TokenKind::Function)));
        assert!(tokens.contains(&("\"Hello\"".to_string(), TokenKind::String)));
    }

    #[test]
    fn test_keyword_inside_string_not_double_wrapped() {
        let tokens = kinds(r#"let s = "if return 42";"#, "js");
        assert_eq!(
            tokens,
            vec![
                ("let".to_string(), TokenKind::Keyword),
                ("\"if return 42\"".to_string(), TokenKind::String),
            ]
        );
    }

    #[test]
    fn test_comment_marker_inside_string() {
        let tokens = kinds(r#"url = "http://x" // real"#, "js");
        assert!(tokens.contains(&("\"http://x\"".to_string(), TokenKind::String)));
        assert!(tokens.contains(&("// real".to_string(), TokenKind::Comment)));
    }

    #[test]
    fn test_hash_comments_for_python() {
        let tokens = kinds("x = 1 # note\ny = a // b", "python");
        assert!(tokens.contains(&("# note".to_string(), TokenKind::Comment)));
        assert!(tokens.contains(&("1".to_string(), TokenKind::Number)));
        assert!(!tokens.iter().any(|(t, _)| t.starts_with("//")));
    }

    #[test]
    fn test_rust_lifetimes_are_not_strings() {
        let tokens = kinds("fn f<'a>(x: &'a str) -> char { 'c' }", "rust");
        assert!(tokens.contains(&("'c'".to_string(), TokenKind::String)));
        assert!(!tokens.iter().any(|(t, _)| t.starts_with("'a")));
    }

    #[test]
    fn test_numbers_not_inside_identifiers() {
        let tokens = kinds("x1 = 0xff + 3.14", "c");
        assert!(tokens.contains(&("0xff".to_string(), TokenKind::Number)));
        assert!(tokens.contains(&("3.14".to_string(), TokenKind::Number)));
        assert!(!tokens.iter().any(|(t, _)| t == "1"));
    }

    #[test]
    fn test_tokens_never_overlap() {
        let code = "/* if 1 */ call(\"fn\", 2) // while\nreturn x(3)";
        let tokens = tokenize(code, "c");
        for pair in tokens.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn test_highlight_preserves_whitespace_outside_tags() {
        let html = highlight_code("if  a\n\tb", "c", &presets::default_code_theme());
        assert!(html.contains("<span style=\"color:"));
        assert!(html.contains("&nbsp;&nbsp;a<br>&nbsp;&nbsp;&nbsp;&nbsp;b"));
    }

    #[test]
    fn test_highlight_escapes_markup() {
        let html = highlight_code("a < b && c", "", &presets::default_code_theme());
        assert!(html.contains("a&nbsp;&lt;&nbsp;b&nbsp;&amp;&amp;&nbsp;c"));
    }

    #[test]
    fn test_highlight_empty_code() {
        assert_eq!(highlight_code("", "rust", &presets::default_code_theme()), "");
    }
}
