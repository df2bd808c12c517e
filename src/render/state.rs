//! Mutable state threaded through one render pass.

use compact_str::CompactString;

use crate::signature::{ExtractedParam, ParamKind};

/// `VALUES` list bookkeeping
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct ValuesState {
    /// Inside a `VALUES` list
    pub active:          bool,
    /// Paren depth relative to the list
    pub depth:           usize,
    /// Top-level tuples written to the output
    pub tuples_rendered: usize,
    /// Collapse decision, made when the first tuple opens
    pub collapse:        Option<bool>,
    /// Current tuple is elided from the output
    pub suppressing:     bool
}

impl ValuesState {
    pub fn start() -> Self {
        Self {
            active: true,
            ..Self::default()
        }
    }

    /// At the list's top level, between tuples
    pub fn at_top(&self) -> bool {
        self.active && self.depth == 0
    }
}

#[derive(Debug, Default)]
pub(super) struct RenderState {
    pub out:        String,
    pub params:     Vec<ExtractedParam>,
    pub next_index: usize,
    pub prev_word:  CompactString,
    /// Suppress the next inter-token space (after `::`)
    pub tight_next: bool,
    pub depth:      usize,
    pub values:     ValuesState
}

impl RenderState {
    pub fn new(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            next_index: 1,
            ..Self::default()
        }
    }

    /// Append to the output unless the current tuple is elided
    pub fn write(&mut self, text: &str) {
        if !self.values.suppressing {
            self.out.push_str(text);
        }
    }

    pub fn last_non_space(&self) -> Option<char> {
        self.out.trim_end_matches(' ').chars().next_back()
    }

    /// Separate the next word from the previous output where needed
    pub fn space_before_word(&mut self) {
        if self.tight_next {
            self.tight_next = false;
            return;
        }
        match self.last_non_space() {
            None | Some('(' | ',' | '.') => {}
            Some(_) => self.write(" ")
        }
    }

    pub fn write_word(&mut self, word: &str) {
        self.space_before_word();
        self.write(word);
        self.prev_word = word.into();
    }

    pub fn write_operator(&mut self, op: &str) {
        if op == "::" {
            self.write("::");
            self.tight_next = true;
        } else {
            if self.last_non_space().is_some() {
                self.write(" ");
            }
            self.write(op);
            self.write(" ");
        }
        self.prev_word = op.into();
    }

    /// Emit a placeholder and record the parameter covering `range`
    pub fn push_param(&mut self, kind: ParamKind, source: &str, start: usize, end: usize) {
        self.space_before_word();
        self.write("?");
        self.params.push(ExtractedParam {
            index: self.next_index,
            index_hash: String::new(),
            kind,
            value: source.get(start..end).unwrap_or_default().to_string(),
            start,
            end,
            row: 0,
            col: 0
        });
        self.next_index += 1;
        self.prev_word.clear();
    }

    /// Statement boundary
    pub fn reset_statement(&mut self) {
        self.values = ValuesState::default();
        self.depth = 0;
        self.tight_next = false;
        self.prev_word.clear();
    }

    pub fn has_output(&self) -> bool {
        !self.out.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppressed_writes_are_dropped() {
        let mut state = RenderState::new(16);
        state.write_word("SELECT");
        state.values.suppressing = true;
        state.write_word("X");
        state.values.suppressing = false;
        state.write_word("Y");
        assert_eq!(state.out, "SELECT Y");
    }

    #[test]
    fn test_cast_is_tight() {
        let mut state = RenderState::new(16);
        state.write_word("A");
        state.write_operator("::");
        state.write_word("INT");
        assert_eq!(state.out, "A::INT");
    }

    #[test]
    fn test_param_indices() {
        let mut state = RenderState::new(16);
        let src = "a = 1";
        state.write_word("A");
        state.write_word("=");
        state.push_param(ParamKind::Number, src, 4, 5);
        assert_eq!(state.out, "A = ?");
        assert_eq!(state.params[0].index, 1);
        assert_eq!(state.params[0].value, "1");
        assert_eq!(state.next_index, 2);
    }
}
