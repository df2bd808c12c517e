//! Digest rendering and parameter extraction.
//!
//! A single pass over the visible tokens builds the normalized digest and
//! records every literal, bind marker and (optionally) time-valued or
//! generic function call as an [`ExtractedParam`]. Each token is handled by
//! the first rule that claims it:
//!
//! | # | Rule | Output |
//! |---|------|--------|
//! | 1 | `DATE`/`TIME`/`TIMESTAMP`/`INTERVAL` + string | `?` |
//! | 2 | `$tag$ ... $tag$` | `?` |
//! | 3 | time keyword or `NOW()`/`NOW(3)` (parameterization on) | `?` |
//! | 4 | `name(...)`, `schema.name(...)` (parameterization on) | `?` |
//! | 5 | bind marker, number or string literal | `?` |
//! | 6 | `TRUE`/`FALSE`/`NULL` | upper-cased |
//! | 7 | operators and punctuation | spaced per token |
//! | 8 | identifiers and keywords | upper-cased |
//!
//! Inside a multi-row `VALUES` list the renderer can elide every tuple
//! after the first when [`crate::tuples::analyze`] reports identical shapes
//! and collapsing is enabled. Elided tuples still contribute parameters.
//!
//! # Example
//!
//! ```
//! use sql_signature::{dialect::Dialect, render::render, stream::TokenStream};
//!
//! let stream = TokenStream::new("select * from t where id in(1, 2)", Dialect::MySql);
//! let rendered = render(&stream, &Dialect::MySql.into());
//!
//! assert_eq!(rendered.digest, "SELECT * FROM T WHERE ID IN (?, ?)");
//! assert_eq!(rendered.params.len(), 2);
//! ```

mod state;

use state::{RenderState, ValuesState};
use tracing::trace;

use crate::{
    classify::{
        bind_kind, bool_or_null, date_literal_kind, is_clause_keyword, is_dollar_tag,
        is_non_function_keyword, is_number_literal, is_spaced_operator, is_string_literal,
        time_function_kind
    },
    dialect::Options,
    lexer::TokenKind,
    sanitize::normalize,
    signature::{ExtractedParam, ParamKind},
    stream::TokenStream,
    tuples
};

/// Raw render output, before paren sanitizing and row/col annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub digest: String,
    pub params: Vec<ExtractedParam>
}

/// Words after which a name followed by `(` is a table or column list
const NAME_CONTEXT_WORDS: [&str; 4] = ["INTO", "TABLE", "REFERENCES", "WITH"];

/// Render `stream` into a normalized digest and its parameters.
pub fn render(stream: &TokenStream<'_>, options: &Options) -> Rendered {
    let mut renderer = Renderer {
        stream,
        options,
        state: RenderState::new(stream.source().len())
    };

    let mut cursor = 0;
    while let Some(idx) = stream.first_visible_from(cursor) {
        cursor = renderer.step(idx) + 1;
    }

    let state = renderer.state;
    let mut digest = normalize(&state.out);
    if digest.ends_with(';') {
        digest.pop();
        digest.truncate(digest.trim_end().len());
    }

    Rendered {
        digest,
        params: state.params
    }
}

struct Renderer<'r, 'a> {
    stream:  &'r TokenStream<'a>,
    options: &'r Options,
    state:   RenderState
}

impl Renderer<'_, '_> {
    /// Handle the token at `idx`; returns the last token index consumed.
    fn step(&mut self, idx: usize) -> usize {
        let token = *self.stream.token(idx);
        let text = token.text;

        if self.state.values.at_top() && !(token.is("(") || token.is(",")) {
            self.state.values = ValuesState::default();
        }

        if let Some(end) = self.typed_literal(idx) {
            return end;
        }
        if let Some(end) = self.dollar_quoted(idx) {
            return end;
        }
        if self.options.paramize_time_funcs && token.kind == TokenKind::Word {
            if let Some(end) = self.time_function(idx) {
                return end;
            }
            if let Some(end) = self.function_call_end(idx) {
                self.param(ParamKind::Func, idx, end);
                return end;
            }
        }
        if let Some(kind) = bind_kind(text) {
            self.param(kind, idx, idx);
            return idx;
        }
        if is_number_literal(text) {
            self.param(ParamKind::Number, idx, idx);
            return idx;
        }
        if is_string_literal(text, self.stream.dialect()) {
            self.param(ParamKind::String, idx, idx);
            return idx;
        }
        if !self.options.paramize_time_funcs
            && token.kind == TokenKind::Word
            && bool_or_null(text).is_some()
        {
            self.state.write_word(&text.to_ascii_uppercase());
            return idx;
        }

        if is_spaced_operator(text) {
            self.state.write_operator(text);
            return idx;
        }
        match text {
            "," => self.comma(idx),
            "." => {
                self.state.write(".");
                self.state.prev_word = ".".into();
            }
            "(" => self.open_paren(idx),
            ")" => self.close_paren(idx),
            ";" => self.semicolon(),
            "*" => {
                if self.state.last_non_space() != Some('.') {
                    self.state.space_before_word();
                }
                self.state.write("*");
                self.state.prev_word = "*".into();
            }
            _ => self.word(idx)
        }
        idx
    }

    fn param(&mut self, kind: ParamKind, first: usize, last: usize) {
        let range = self.stream.span(first, last);
        self.state
            .push_param(kind, self.stream.source(), range.start, range.end);
    }

    /// `DATE '2024-01-01'`, `INTERVAL '1 day'`
    fn typed_literal(&mut self, idx: usize) -> Option<usize> {
        let token = self.stream.token(idx);
        if token.kind != TokenKind::Word {
            return None;
        }
        let kind = date_literal_kind(token.text)?;
        let next = self.stream.next_visible(idx)?;
        if !is_string_literal(self.stream.text(next), self.stream.dialect()) {
            return None;
        }
        self.param(kind, idx, next);
        Some(next)
    }

    /// `$tag$ ... $tag$` split into separate tokens
    fn dollar_quoted(&mut self, idx: usize) -> Option<usize> {
        let tag = self.stream.text(idx);
        if self.stream.token(idx).kind != TokenKind::DollarTag || !is_dollar_tag(tag) {
            return None;
        }
        let close = (idx + 1..self.stream.len())
            .find(|&j| self.stream.is_visible(j) && self.stream.text(j) == tag)?;
        self.param(ParamKind::String, idx, close);
        Some(close)
    }

    /// Bare time keyword, `NAME()` or `NAME(<digits>)`
    fn time_function(&mut self, idx: usize) -> Option<usize> {
        let kind = time_function_kind(self.stream.text(idx))?;
        if self.after_dot(idx) {
            return None;
        }
        let end = match self.stream.next_visible(idx) {
            Some(open) if self.stream.token(open).is("(") => {
                let inner = self.stream.next_visible(open)?;
                if self.stream.token(inner).is(")") {
                    inner
                } else if self.stream.text(inner).bytes().all(|b| b.is_ascii_digit()) {
                    let close = self.stream.next_visible(inner)?;
                    if !self.stream.token(close).is(")") {
                        return None;
                    }
                    close
                } else {
                    return None;
                }
            }
            _ => idx
        };
        self.param(kind, idx, end);
        Some(end)
    }

    /// End of a generic call `name(...)` starting at `idx`, if it is one
    fn function_call_end(&self, idx: usize) -> Option<usize> {
        if self.after_dot(idx) {
            return None;
        }
        if let Some(prev) = self.stream.prev_visible(idx) {
            let prev = self.stream.token(prev);
            if NAME_CONTEXT_WORDS.iter().any(|w| prev.is_word(w)) {
                return None;
            }
        }
        if self.after_index_on(idx) {
            return None;
        }

        let mut leaf = idx;
        let mut next = self.stream.next_visible(idx)?;
        while self.stream.token(next).is(".") {
            let part = self.stream.next_visible(next)?;
            if self.stream.token(part).kind != TokenKind::Word {
                return None;
            }
            leaf = part;
            next = self.stream.next_visible(part)?;
        }
        if !self.stream.token(next).is("(") || is_non_function_keyword(self.stream.text(leaf)) {
            return None;
        }
        self.stream.matching_close(next)
    }

    /// `CREATE INDEX name ON t(cols)`: the table follows `ON` of an index
    fn after_index_on(&self, idx: usize) -> bool {
        let Some(on) = self.stream.prev_visible(idx) else {
            return false;
        };
        if !self.stream.token(on).is_word("ON") {
            return false;
        }
        let mut cursor = self.stream.prev_visible(on);
        while let Some(i) = cursor {
            let token = self.stream.token(i);
            if token.is_word("INDEX") {
                return true;
            }
            if token.is(";") || token.is("(") || token.is(")") || token.is_word("JOIN") {
                return false;
            }
            cursor = self.stream.prev_visible(i);
        }
        false
    }

    fn after_dot(&self, idx: usize) -> bool {
        self.stream
            .prev_visible(idx)
            .is_some_and(|p| self.stream.token(p).is("."))
    }

    fn comma(&mut self, idx: usize) {
        let values = self.state.values;
        let between_elided = values.at_top()
            && values.collapse == Some(true)
            && values.tuples_rendered >= 1
            && self
                .stream
                .next_visible(idx)
                .is_some_and(|n| self.stream.token(n).is("("));
        if !between_elided {
            self.state.write(", ");
        }
        self.state.prev_word = ",".into();
    }

    fn open_paren(&mut self, idx: usize) {
        if self.state.values.at_top() {
            if self.state.values.collapse.is_none() {
                let shape = tuples::analyze(self.stream, idx, self.options.paramize_time_funcs);
                let collapse = self.options.collapse_values_in_digest && shape.collapsible();
                trace!(
                    tuples = shape.tuples,
                    has_bind = shape.has_bind,
                    compatible = shape.compatible,
                    collapse,
                    "values list analyzed"
                );
                self.state.values.collapse = Some(collapse);
            }
            if self.state.values.collapse == Some(true) && self.state.values.tuples_rendered >= 1 {
                self.state.values.suppressing = true;
            }
        }

        let prev = self.state.prev_word.as_str();
        let spaced = is_clause_keyword(prev)
            || prev
                .chars()
                .next()
                .is_some_and(|c| !c.is_alphanumeric() && !matches!(c, '_' | '(' | ')' | '.' | ',' | '"' | '`' | '['));
        self.state.tight_next = false;
        self.state.write(if spaced { " (" } else { "(" });
        self.state.prev_word = "(".into();

        self.state.depth += 1;
        if self.state.values.active {
            self.state.values.depth += 1;
        }
    }

    fn close_paren(&mut self, idx: usize) {
        if self.state.depth == 0 {
            trace!(offset = self.stream.byte_range(idx).start, "unmatched ) dropped");
            return;
        }
        self.state.depth -= 1;
        self.state.write(")");
        self.state.prev_word = ")".into();

        let values = &mut self.state.values;
        if values.active && values.depth > 0 {
            values.depth -= 1;
            if values.depth == 0 {
                if values.suppressing {
                    values.suppressing = false;
                } else {
                    values.tuples_rendered += 1;
                }
                let continues = self
                    .stream
                    .next_visible(idx)
                    .is_some_and(|n| self.stream.token(n).is(","));
                if !continues {
                    *values = ValuesState::default();
                }
            }
        }
    }

    fn semicolon(&mut self) {
        self.state.reset_statement();
        if self.state.has_output() && !self.state.out.trim_end().ends_with(';') {
            self.state.write("; ");
        }
    }

    fn word(&mut self, idx: usize) {
        let token = self.stream.token(idx);
        if token.kind == TokenKind::QuotedIdent {
            self.state.write_word(token.text);
            return;
        }
        if token.is_word("VALUES") {
            self.state.values = ValuesState::start();
        }
        self.state.write_word(&token.text.to_uppercase());
    }
}
