//! Raw-text comment scanner.
//!
//! MySQL executable comments (`/*!40101 ... */`) are lexed as ordinary
//! default-channel tokens, so the lexer's hidden channel alone cannot tell
//! which significant tokens sit inside a comment. This module finds comment
//! byte spans directly in the source with a small quote-aware state machine;
//! any token intersecting a span is skipped by rendering and statement
//! splitting.

use std::ops::Range;

/// Sorted, disjoint comment byte spans `[start, end)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentSpans {
    spans: Vec<Range<usize>>
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
    Backtick
}

impl CommentSpans {
    /// Scan `source` for block (`/* */`, `/*! */`), `--` and `#` comments.
    ///
    /// Unterminated comments run to end-of-input.
    pub fn scan(source: &str) -> Self {
        let bytes = source.as_bytes();
        let len = bytes.len();
        let mut spans = Vec::new();
        let mut quote = Quote::None;
        let mut i = 0;

        while i < len {
            let b = bytes[i];
            if quote != Quote::None {
                match (quote, b) {
                    (_, b'\\') => i += 1,
                    (Quote::Single, b'\'') | (Quote::Double, b'"') | (Quote::Backtick, b'`') => {
                        quote = Quote::None
                    }
                    _ => {}
                }
                i += 1;
                continue;
            }

            match b {
                b'\'' => quote = Quote::Single,
                b'"' => quote = Quote::Double,
                b'`' => quote = Quote::Backtick,
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    let end = source[i + 2..]
                        .find("*/")
                        .map_or(len, |at| i + 2 + at + 2);
                    spans.push(i..end);
                    i = end;
                    continue;
                }
                b'-' if bytes.get(i + 1) == Some(&b'-') => {
                    let end = line_end(bytes, i);
                    spans.push(i..end);
                    i = end;
                    continue;
                }
                b'#' => {
                    let end = line_end(bytes, i);
                    spans.push(i..end);
                    i = end;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }

        Self {
            spans
        }
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn spans(&self) -> &[Range<usize>] {
        &self.spans
    }

    /// Whether byte range `[start, end)` overlaps any comment
    pub fn intersects(&self, start: usize, end: usize) -> bool {
        let idx = self.spans.partition_point(|s| s.end <= start);
        self.spans.get(idx).is_some_and(|s| s.start < end)
    }
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |at| from + at)
}
