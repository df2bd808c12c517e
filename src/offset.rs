//! Character-to-byte offset mapping.
//!
//! Lexer tokens carry character offsets; extracted parameters report byte
//! offsets into the original `&str`. For ASCII input the two coincide and
//! no table is built.

/// Maps character indices of a source string to byte indices
#[derive(Debug, Clone)]
pub struct OffsetMap {
    /// `bytes[i]` is the byte offset of char `i`; the final entry is the
    /// source length. Empty for ASCII sources.
    bytes: Vec<usize>,
    len:   usize
}

impl OffsetMap {
    pub fn new(source: &str) -> Self {
        let bytes = if source.is_ascii() {
            Vec::new()
        } else {
            source
                .char_indices()
                .map(|(b, _)| b)
                .chain(std::iter::once(source.len()))
                .collect()
        };
        Self {
            bytes,
            len: source.len()
        }
    }

    /// Byte offset of character `char_idx`, clamped to the source length
    pub fn byte(&self, char_idx: usize) -> usize {
        if self.bytes.is_empty() {
            return char_idx.min(self.len);
        }
        self.bytes.get(char_idx).copied().unwrap_or(self.len)
    }
}
