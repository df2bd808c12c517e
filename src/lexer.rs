//! Dialect-aware SQL lexer.
//!
//! Turns raw SQL text into a complete, ordered token sequence. Whitespace and
//! comments are kept on the hidden channel so that every byte of the input
//! belongs to exactly one token; significant tokens go to the default
//! channel.
//!
//! The lexer is total: unterminated strings, quoted identifiers and comments
//! simply extend to end-of-input, and any character that is not understood
//! becomes a one-character operator token.
//!
//! # Dialect Differences
//!
//! | Construct | MySQL | Postgres | SQL Server | Oracle |
//! |-----------|-------|----------|------------|--------|
//! | `"..."` | string | identifier | identifier | identifier |
//! | `#` | line comment | operator (`#>`, `#>>`) | temp table name | identifier char |
//! | `/*!N ...*/` | executable | comment | comment | comment |
//! | `$tag$...$tag$` | tag token | string | tag token | tag token |
//! | `@name` | variable | operator | variable | variable |
//!
//! # Example
//!
//! ```
//! use sql_signature::{
//!     dialect::Dialect,
//!     lexer::{Channel, TokenKind, tokenize}
//! };
//!
//! let tokens = tokenize("SELECT 'é' -- tail", Dialect::Postgres);
//! let visible: Vec<_> = tokens
//!     .iter()
//!     .filter(|t| t.channel == Channel::Default)
//!     .collect();
//!
//! assert_eq!(visible.len(), 2);
//! assert_eq!(visible[1].kind, TokenKind::String);
//! assert_eq!((visible[1].start, visible[1].stop), (7, 9));
//! ```

mod types;

pub use types::{Channel, Token, TokenKind};

use crate::dialect::Dialect;

/// Multi-character operators, longest first
const MULTI_CHAR_OPS: [&str; 22] = [
    "->>", "#>>", "<=>", "!~*", ">=", "<=", "<>", "!=", "||", "->", "#>", "@>", "<@", "::", ":=",
    "=>", "**", "~*", "!~", "&&", "<<", ">>"
];

/// Tokenize `source` for `dialect`.
pub fn tokenize(source: &str, dialect: Dialect) -> Vec<Token<'_>> {
    let mut lexer = Lexer::new(source, dialect);
    let mut tokens = Vec::with_capacity(source.len() / 3 + 1);
    let mut chars = 0usize;

    while let Some((kind, channel, end)) = lexer.next_token() {
        let text = &source[lexer.pos..end];
        let width = text.chars().count();
        tokens.push(Token {
            kind,
            text,
            channel,
            start: chars,
            stop: chars + width - 1
        });
        chars += width;
        lexer.pos = end;
    }

    tokens
}

struct Lexer<'a> {
    src:             &'a str,
    bytes:           &'a [u8],
    pos:             usize,
    dialect:         Dialect,
    in_exec_comment: bool
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str, dialect: Dialect) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            dialect,
            in_exec_comment: false
        }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.src.get(pos..).and_then(|s| s.chars().next())
    }

    /// Next token as `(kind, channel, end_byte)`; the token starts at
    /// `self.pos`.
    fn next_token(&mut self) -> Option<(TokenKind, Channel, usize)> {
        let c = self.char_at(self.pos)?;
        let b = self.bytes[self.pos];
        let next = self.peek(1);

        if c.is_whitespace() {
            return Some((TokenKind::Whitespace, Channel::Hidden, self.scan_whitespace()));
        }

        match b {
            b'-' if next == Some(b'-') => Some(self.hidden_comment(self.scan_line_end(self.pos))),
            b'#' if self.dialect == Dialect::MySql => {
                Some(self.hidden_comment(self.scan_line_end(self.pos)))
            }
            b'#' if self.dialect == Dialect::SqlServer && self.is_word_byte_at(self.pos + 1) => {
                Some((TokenKind::Word, Channel::Default, self.scan_word(self.pos + 1)))
            }
            b'/' if next == Some(b'*') => {
                if self.dialect.has_executable_comments() && self.peek(2) == Some(b'!') {
                    let mut end = self.pos + 3;
                    while end < self.bytes.len() && self.bytes[end].is_ascii_digit() {
                        end += 1;
                    }
                    self.in_exec_comment = true;
                    Some(self.hidden_comment(end))
                } else {
                    Some(self.hidden_comment(self.scan_block_comment()))
                }
            }
            b'*' if next == Some(b'/') && self.in_exec_comment => {
                self.in_exec_comment = false;
                Some(self.hidden_comment(self.pos + 2))
            }
            b'\'' => Some(self.string_token(self.scan_quoted(self.pos, b'\''))),
            b'"' if self.dialect.double_quote_is_string() => {
                Some(self.string_token(self.scan_quoted(self.pos, b'"')))
            }
            b'"' => Some(self.quoted_ident(self.scan_quoted(self.pos, b'"'))),
            b'`' if self.dialect == Dialect::MySql => {
                Some(self.quoted_ident(self.scan_quoted(self.pos, b'`')))
            }
            b'[' if self.dialect == Dialect::SqlServer => {
                Some(self.quoted_ident(self.scan_bracket_ident()))
            }
            b'$' => Some(self.scan_dollar()),
            b'?' => Some((TokenKind::Bind, Channel::Default, self.pos + 1)),
            b':' => Some(self.scan_colon()),
            b'@' => Some(self.scan_at()),
            b'0'..=b'9' => Some((TokenKind::Number, Channel::Default, self.scan_number())),
            b'.' if next.is_some_and(|n| n.is_ascii_digit()) => {
                Some((TokenKind::Number, Channel::Default, self.scan_number()))
            }
            b'(' | b')' | b',' | b';' | b'.' | b'[' | b']' | b'{' | b'}' => {
                Some((TokenKind::Punct, Channel::Default, self.pos + 1))
            }
            _ => {
                if let Some(end) = self.scan_prefixed_string() {
                    return Some(self.string_token(end));
                }
                if is_word_start(c) {
                    return Some((TokenKind::Word, Channel::Default, self.scan_word(self.pos)));
                }
                Some((TokenKind::Operator, Channel::Default, self.scan_operator(c)))
            }
        }
    }

    fn hidden_comment(&self, end: usize) -> (TokenKind, Channel, usize) {
        (TokenKind::Comment, Channel::Hidden, end)
    }

    fn string_token(&self, end: usize) -> (TokenKind, Channel, usize) {
        (TokenKind::String, Channel::Default, end)
    }

    fn quoted_ident(&self, end: usize) -> (TokenKind, Channel, usize) {
        (TokenKind::QuotedIdent, Channel::Default, end)
    }

    fn scan_whitespace(&self) -> usize {
        let mut end = self.pos;
        while let Some(c) = self.char_at(end) {
            if !c.is_whitespace() {
                break;
            }
            end += c.len_utf8();
        }
        end
    }

    /// End of a line comment, excluding the newline
    fn scan_line_end(&self, from: usize) -> usize {
        self.bytes[from..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.bytes.len(), |i| from + i)
    }

    fn scan_block_comment(&self) -> usize {
        let nested = self.dialect == Dialect::Postgres;
        let mut depth = 1usize;
        let mut i = self.pos + 2;
        while i < self.bytes.len() {
            if self.bytes[i] == b'*' && self.peek_at(i + 1) == Some(b'/') {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return i;
                }
                continue;
            }
            if nested && self.bytes[i] == b'/' && self.peek_at(i + 1) == Some(b'*') {
                depth += 1;
                i += 2;
                continue;
            }
            i += 1;
        }
        self.bytes.len()
    }

    fn peek_at(&self, pos: usize) -> Option<u8> {
        self.bytes.get(pos).copied()
    }

    /// Quoted run starting at `open`; doubled quotes escape, and MySQL also
    /// honors backslash escapes inside strings.
    fn scan_quoted(&self, open: usize, quote: u8) -> usize {
        let backslash = self.dialect == Dialect::MySql && quote != b'`';
        self.scan_quoted_with(open, quote, backslash)
    }

    fn scan_quoted_with(&self, open: usize, quote: u8, backslash: bool) -> usize {
        let mut i = open + 1;
        while i < self.bytes.len() {
            let b = self.bytes[i];
            if backslash && b == b'\\' {
                i += 2;
                continue;
            }
            if b == quote {
                if self.peek_at(i + 1) == Some(quote) {
                    i += 2;
                    continue;
                }
                return i + 1;
            }
            i += 1;
        }
        self.bytes.len()
    }

    fn scan_bracket_ident(&self) -> usize {
        let mut i = self.pos + 1;
        while i < self.bytes.len() {
            if self.bytes[i] == b']' {
                if self.peek_at(i + 1) == Some(b']') {
                    i += 2;
                    continue;
                }
                return i + 1;
            }
            i += 1;
        }
        self.bytes.len()
    }

    /// `N'..'`, `E'..'`, `X'..'`, `B'..'`, `q'[..]'`, `nq'[..]'`
    fn scan_prefixed_string(&self) -> Option<usize> {
        let b0 = self.bytes[self.pos].to_ascii_lowercase();
        let b1 = self.peek(1)?;
        if b1 == b'\'' {
            return match b0 {
                b'x' | b'b' => Some(self.scan_quoted(self.pos + 1, b'\'')),
                b'n' if self.dialect != Dialect::Postgres => {
                    Some(self.scan_quoted(self.pos + 1, b'\''))
                }
                b'e' if self.dialect == Dialect::Postgres => {
                    Some(self.scan_quoted_with(self.pos + 1, b'\'', true))
                }
                b'q' if self.dialect == Dialect::Oracle => self.scan_q_quote(self.pos + 1),
                _ => None
            };
        }
        if self.dialect == Dialect::Oracle
            && b0 == b'n'
            && b1.eq_ignore_ascii_case(&b'q')
            && self.peek(2) == Some(b'\'')
        {
            return self.scan_q_quote(self.pos + 2);
        }
        None
    }

    /// Oracle alternative quoting; `quote` points at the opening `'`
    fn scan_q_quote(&self, quote: usize) -> Option<usize> {
        let open = self.char_at(quote + 1)?;
        if open.is_whitespace() {
            return None;
        }
        let close = match open {
            '(' => ')',
            '[' => ']',
            '{' => '}',
            '<' => '>',
            other => other
        };
        let body = quote + 1 + open.len_utf8();
        let mut i = body;
        while let Some(c) = self.char_at(i) {
            if c == close && self.peek_at(i + c.len_utf8()) == Some(b'\'') {
                return Some(i + c.len_utf8() + 1);
            }
            i += c.len_utf8();
        }
        Some(self.bytes.len())
    }

    fn scan_dollar(&self) -> (TokenKind, Channel, usize) {
        let mut i = self.pos + 1;
        if self.peek(1).is_some_and(|b| b.is_ascii_digit()) {
            while self.peek_at(i).is_some_and(|b| b.is_ascii_digit()) {
                i += 1;
            }
            return (TokenKind::Bind, Channel::Default, i);
        }
        while self
            .peek_at(i)
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            i += 1;
        }
        if self.peek_at(i) != Some(b'$') {
            return (TokenKind::Operator, Channel::Default, self.pos + 1);
        }
        let tag_end = i + 1;
        if !self.dialect.has_dollar_quoting() {
            return (TokenKind::DollarTag, Channel::Default, tag_end);
        }
        let tag = &self.src[self.pos..tag_end];
        let end = self.src[tag_end..]
            .find(tag)
            .map_or(self.bytes.len(), |at| tag_end + at + tag.len());
        (TokenKind::String, Channel::Default, end)
    }

    fn scan_colon(&self) -> (TokenKind, Channel, usize) {
        match self.peek(1) {
            Some(b':') | Some(b'=') => (TokenKind::Operator, Channel::Default, self.pos + 2),
            Some(b) if b.is_ascii_digit() => {
                let mut i = self.pos + 1;
                while self.peek_at(i).is_some_and(|b| b.is_ascii_digit()) {
                    i += 1;
                }
                (TokenKind::Bind, Channel::Default, i)
            }
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => {
                (TokenKind::Bind, Channel::Default, self.scan_word(self.pos + 1))
            }
            _ => (TokenKind::Operator, Channel::Default, self.pos + 1)
        }
    }

    fn scan_at(&self) -> (TokenKind, Channel, usize) {
        if self.dialect == Dialect::Postgres {
            let end = if self.peek(1) == Some(b'>') { self.pos + 2 } else { self.pos + 1 };
            return (TokenKind::Operator, Channel::Default, end);
        }
        match self.peek(1) {
            Some(b'@') if self.is_word_byte_at(self.pos + 2) => {
                (TokenKind::Word, Channel::Default, self.scan_word(self.pos + 2))
            }
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => {
                (TokenKind::Bind, Channel::Default, self.scan_word(self.pos + 1))
            }
            _ => (TokenKind::Operator, Channel::Default, self.pos + 1)
        }
    }

    fn scan_number(&self) -> usize {
        let bytes = self.bytes;
        let mut i = self.pos;
        if bytes[i] == b'0' && matches!(self.peek_at(i + 1), Some(b'x') | Some(b'X')) {
            i += 2;
            while self.peek_at(i).is_some_and(|b| b.is_ascii_hexdigit()) {
                i += 1;
            }
            return i;
        }
        while self.peek_at(i).is_some_and(|b| b.is_ascii_digit()) {
            i += 1;
        }
        if self.peek_at(i) == Some(b'.') && self.peek_at(i + 1) != Some(b'.') {
            i += 1;
            while self.peek_at(i).is_some_and(|b| b.is_ascii_digit()) {
                i += 1;
            }
        }
        if matches!(self.peek_at(i), Some(b'e') | Some(b'E')) {
            let mut j = i + 1;
            if matches!(self.peek_at(j), Some(b'+') | Some(b'-')) {
                j += 1;
            }
            if self.peek_at(j).is_some_and(|b| b.is_ascii_digit()) {
                while self.peek_at(j).is_some_and(|b| b.is_ascii_digit()) {
                    j += 1;
                }
                i = j;
            }
        }
        i
    }

    fn is_word_byte_at(&self, pos: usize) -> bool {
        self.char_at(pos).is_some_and(|c| self.is_word_char(c))
    }

    fn is_word_char(&self, c: char) -> bool {
        if c.is_ascii() {
            c.is_ascii_alphanumeric()
                || c == '_'
                || c == '$'
                || (c == '#' && matches!(self.dialect, Dialect::Oracle | Dialect::SqlServer))
        } else {
            c.is_alphanumeric()
        }
    }

    fn scan_word(&self, from: usize) -> usize {
        let mut i = from;
        while let Some(c) = self.char_at(i) {
            if !self.is_word_char(c) {
                break;
            }
            i += c.len_utf8();
        }
        i
    }

    fn scan_operator(&self, c: char) -> usize {
        let rest = &self.src[self.pos..];
        for op in MULTI_CHAR_OPS {
            if rest.starts_with(op) && self.dialect_has_operator(op) {
                return self.pos + op.len();
            }
        }
        self.pos + c.len_utf8()
    }

    fn dialect_has_operator(&self, op: &str) -> bool {
        match op {
            "#>" | "#>>" | "@>" | "<@" => self.dialect == Dialect::Postgres,
            _ => true
        }
    }
}

fn is_word_start(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphabetic() || c == '_'
    } else {
        c.is_alphabetic()
    }
}
