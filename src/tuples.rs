//! Tuple-shape analysis for multi-row `VALUES` lists.
//!
//! Later tuples of `INSERT ... VALUES (...), (...)` may only be elided from
//! the digest when every tuple would render identically. The analyzer
//! classifies the syntactic head of each value per column and compares the
//! per-tuple head vectors.
//!
//! | Value | Head |
//! |-------|------|
//! | `1`, `'x'`, `DATE '2024-01-01'` | `Literal` |
//! | `?`, `$1`, `:id` | `Bind` |
//! | `lower('X')`, `SYSDATE` | `Function("LOWER")`, `Function("SYSDATE")` |
//! | `NULL`, `TRUE`, `DEFAULT` | `Keyword("NULL")`, ... |
//! | `-1`, `(1)`, `a + 1`, `col` | `Other` |
//!
//! With time-function parameterization enabled, every head that renders as a
//! single `?` (literals, binds, parameterizable calls) becomes `Param`.

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::{
    classify::{
        bind_kind, bool_or_null, date_literal_kind, is_non_function_keyword, is_number_literal,
        is_string_literal, time_function_kind
    },
    lexer::TokenKind,
    stream::TokenStream
};

/// Syntactic head of one value inside a tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Literal,
    Bind,
    Function(CompactString),
    Keyword(CompactString),
    /// Renders as a single placeholder under time-function parameterization
    Param,
    Other
}

type Heads = SmallVec<[Head; 8]>;

/// Result of analyzing one `VALUES` list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TupleShape {
    pub tuples:     usize,
    /// Some tuple contains a bind marker anywhere inside it
    pub has_bind:   bool,
    /// Equal lengths, no `Other` heads, equal heads per column
    pub compatible: bool
}

impl TupleShape {
    /// Whether tuples after the first may be elided from the digest
    pub fn collapsible(&self) -> bool {
        self.compatible && !self.has_bind
    }
}

/// Analyze the tuple list whose first `(` is token `open`.
pub fn analyze(stream: &TokenStream<'_>, open: usize, paramize: bool) -> TupleShape {
    let mut shape = TupleShape {
        tuples:     0,
        has_bind:   false,
        compatible: true
    };
    let mut first: Option<Heads> = None;
    let mut cursor = Some(open);

    while let Some(open) = cursor {
        if !stream.token(open).is("(") {
            break;
        }
        let Some(close) = stream.matching_close(open) else {
            shape.compatible = false;
            break;
        };

        let heads = tuple_heads(stream, open, close, paramize, &mut shape.has_bind);
        shape.tuples += 1;
        if heads.contains(&Head::Other) {
            shape.compatible = false;
        }
        match &first {
            None => first = Some(heads),
            Some(reference) if *reference != heads => shape.compatible = false,
            Some(_) => {}
        }

        cursor = stream
            .next_visible(close)
            .filter(|&i| stream.token(i).is(","))
            .and_then(|comma| stream.next_visible(comma));
    }

    shape
}

fn tuple_heads(
    stream: &TokenStream<'_>,
    open: usize,
    close: usize,
    paramize: bool,
    has_bind: &mut bool
) -> Heads {
    let mut heads = Heads::new();
    let mut value: SmallVec<[usize; 8]> = SmallVec::new();
    let mut depth = 0usize;
    let mut idx = stream.next_visible(open);

    while let Some(i) = idx.filter(|&i| i < close) {
        let token = stream.token(i);
        if bind_kind(token.text).is_some() {
            *has_bind = true;
        }
        if token.is("(") {
            depth += 1;
        } else if token.is(")") {
            depth = depth.saturating_sub(1);
        }
        if depth == 0 && token.is(",") {
            heads.push(value_head(stream, &value, paramize));
            value.clear();
        } else {
            value.push(i);
        }
        idx = stream.next_visible(i);
    }
    if !value.is_empty() || !heads.is_empty() {
        heads.push(value_head(stream, &value, paramize));
    }

    heads
}

fn value_head(stream: &TokenStream<'_>, value: &[usize], paramize: bool) -> Head {
    let param_or = |head: Head| if paramize { Head::Param } else { head };

    match value {
        [] => Head::Other,
        [single] => {
            let token = stream.token(*single);
            let text = token.text;
            if bind_kind(text).is_some() {
                param_or(Head::Bind)
            } else if is_number_literal(text) || is_string_literal(text, stream.dialect()) {
                param_or(Head::Literal)
            } else if token.kind == TokenKind::Word
                && (bool_or_null(text).is_some() || text.eq_ignore_ascii_case("DEFAULT"))
            {
                Head::Keyword(text.to_ascii_uppercase().into())
            } else if token.kind == TokenKind::Word && time_function_kind(text).is_some() {
                param_or(Head::Function(text.to_ascii_uppercase().into()))
            } else {
                Head::Other
            }
        }
        [prefix, literal]
            if stream.token(*prefix).kind == TokenKind::Word
                && date_literal_kind(stream.text(*prefix)).is_some()
                && is_string_literal(stream.text(*literal), stream.dialect()) =>
        {
            param_or(Head::Literal)
        }
        _ => function_head(stream, value, paramize).unwrap_or(Head::Other)
    }
}

/// `name(...)` or `schema.name(...)` spanning the whole value
fn function_head(stream: &TokenStream<'_>, value: &[usize], paramize: bool) -> Option<Head> {
    let mut name = CompactString::default();
    let mut k = 0;
    loop {
        let token = stream.token(*value.get(k)?);
        if token.kind != TokenKind::Word {
            return None;
        }
        name.push_str(&token.text.to_uppercase());
        k += 1;
        if !stream.token(*value.get(k)?).is(".") {
            break;
        }
        name.push('.');
        k += 1;
    }

    let open = *value.get(k)?;
    let last = *value.last()?;
    if !stream.token(open).is("(") || stream.matching_close(open) != Some(last) {
        return None;
    }

    let leaf = name.rsplit('.').next().unwrap_or_default();
    if is_non_function_keyword(leaf) {
        return Some(Head::Function(name));
    }
    Some(if paramize { Head::Param } else { Head::Function(name) })
}
