//! Token types produced by the lexer.

use serde::Serialize;

/// Lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Whitespace,
    Comment,
    /// Unquoted identifier or keyword
    Word,
    /// `"x"`, `` `x` `` or `[x]` depending on dialect
    QuotedIdent,
    /// Any quoted literal, including prefixed and dollar-quoted forms
    String,
    Number,
    /// `?`, `$1`, `:name`, `@name`
    Bind,
    /// Standalone `$tag$` in dialects that do not lex dollar-quoted strings
    DollarTag,
    Operator,
    /// `(`, `)`, `,`, `;`, `.`, `[`, `]`, `{`, `}`
    Punct
}

/// Channel a token is emitted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Channel {
    /// Significant tokens
    Default,
    /// Whitespace and comments
    Hidden
}

/// A lexical token borrowing its text from the source.
///
/// `start` and `stop` are inclusive **character** offsets, not byte
/// offsets; use [`crate::offset::OffsetMap`] to relate them back to the
/// source bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind:    TokenKind,
    pub text:    &'a str,
    pub channel: Channel,
    pub start:   usize,
    pub stop:    usize
}

impl Token<'_> {
    pub fn is_default_channel(&self) -> bool {
        self.channel == Channel::Default
    }

    /// Whether the token text equals `word`, ignoring ASCII case
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(word)
    }

    /// Whether the token is the given punctuation or operator text
    pub fn is(&self, text: &str) -> bool {
        self.text == text && matches!(self.kind, TokenKind::Punct | TokenKind::Operator)
    }
}
