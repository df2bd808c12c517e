//! Materialized token array with visibility-aware navigation.
//!
//! Every pass over the token sequence (rendering, tuple analysis, row/col
//! annotation, statement splitting) needs the same primitives: "is this
//! token significant", "next/previous significant token", and "byte range of
//! this token in the source". [`TokenStream`] bundles the tokens with the
//! offset map and comment spans that answer those questions.

use std::ops::Range;

use crate::{
    comments::CommentSpans,
    dialect::Dialect,
    lexer::{Token, tokenize},
    offset::OffsetMap
};

/// Tokens of one source string plus the data needed to navigate them
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    source:   &'a str,
    dialect:  Dialect,
    tokens:   Vec<Token<'a>>,
    offsets:  OffsetMap,
    comments: CommentSpans
}

impl<'a> TokenStream<'a> {
    /// Tokenize `source` and prepare offset and comment lookups
    pub fn new(source: &'a str, dialect: Dialect) -> Self {
        let comments = if dialect.has_executable_comments() {
            CommentSpans::scan(source)
        } else {
            CommentSpans::default()
        };
        Self {
            source,
            dialect,
            tokens: tokenize(source, dialect),
            offsets: OffsetMap::new(source),
            comments
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, idx: usize) -> &Token<'a> {
        &self.tokens[idx]
    }

    pub fn text(&self, idx: usize) -> &'a str {
        self.tokens[idx].text
    }

    /// Byte range `[start, end)` of token `idx` in the source
    pub fn byte_range(&self, idx: usize) -> Range<usize> {
        let t = &self.tokens[idx];
        self.offsets.byte(t.start)..self.offsets.byte(t.stop + 1)
    }

    /// Byte range covering tokens `first..=last`
    pub fn span(&self, first: usize, last: usize) -> Range<usize> {
        self.byte_range(first).start..self.byte_range(last).end
    }

    /// Significant token: default channel and outside any comment span
    pub fn is_visible(&self, idx: usize) -> bool {
        let Some(t) = self.tokens.get(idx) else {
            return false;
        };
        if !t.is_default_channel() {
            return false;
        }
        if self.comments.is_empty() {
            return true;
        }
        let range = self.byte_range(idx);
        !self.comments.intersects(range.start, range.end)
    }

    /// First visible token at or after `idx`
    pub fn first_visible_from(&self, idx: usize) -> Option<usize> {
        (idx..self.tokens.len()).find(|&i| self.is_visible(i))
    }

    /// First visible token strictly after `idx`
    pub fn next_visible(&self, idx: usize) -> Option<usize> {
        self.first_visible_from(idx + 1)
    }

    /// Last visible token strictly before `idx`
    pub fn prev_visible(&self, idx: usize) -> Option<usize> {
        (0..idx.min(self.tokens.len()))
            .rev()
            .find(|&i| self.is_visible(i))
    }

    /// Index of the visible `)` matching the `(` at `open`, if any
    pub fn matching_close(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = open;
        while i < self.tokens.len() {
            if self.is_visible(i) {
                let t = &self.tokens[i];
                if t.is("(") {
                    depth += 1;
                } else if t.is(")") {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
            }
            i += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_skips_hidden() {
        let s = TokenStream::new("SELECT /* c */ a , b", Dialect::Postgres);
        let first = s.first_visible_from(0).unwrap();
        assert_eq!(s.text(first), "SELECT");
        let a = s.next_visible(first).unwrap();
        assert_eq!(s.text(a), "a");
        assert_eq!(s.prev_visible(a), Some(first));
    }

    #[test]
    fn test_executable_comment_tokens_invisible() {
        let s = TokenStream::new("/*!40101 SET @a:=1*/ SELECT 1", Dialect::MySql);
        let first = s.first_visible_from(0).unwrap();
        assert_eq!(s.text(first), "SELECT");
    }

    #[test]
    fn test_byte_range_multibyte() {
        let src = "SELECT 'ü', 2";
        let s = TokenStream::new(src, Dialect::Postgres);
        let lit = (0..s.len()).find(|&i| s.text(i) == "'ü'").unwrap();
        assert_eq!(&src[s.byte_range(lit)], "'ü'");
    }

    #[test]
    fn test_matching_close() {
        let s = TokenStream::new("f(a, (b), c) x", Dialect::MySql);
        let open = (0..s.len()).find(|&i| s.text(i) == "(").unwrap();
        let close = s.matching_close(open).unwrap();
        assert_eq!(s.text(s.next_visible(close).unwrap()), "x");
        let unbalanced = TokenStream::new("f(a", Dialect::MySql);
        assert_eq!(unbalanced.matching_close(1), None);
    }
}
