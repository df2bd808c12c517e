//! Result types of a signature computation.

use std::fmt;

use serde::Serialize;

use crate::{
    sanitize::count_placeholders,
    statements::{StatementInfo, StatementType}
};

/// Kind of an extracted parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParamKind {
    Number,
    String,
    Bool,
    Null,
    Date,
    Time,
    Timestamp,
    Interval,
    /// Positional bind marker: `?`, `$1`
    Bind,
    /// Named bind marker: `:name`, `:1`, `@name`
    NamedBind,
    /// Function call parameterized as a whole
    Func
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::String => "String",
            Self::Bool => "Bool",
            Self::Null => "Null",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Timestamp => "Timestamp",
            Self::Interval => "Interval",
            Self::Bind => "Bind",
            Self::NamedBind => "NamedBind",
            Self::Func => "Func"
        }
    }

    /// Whether the parameter is a bind marker written in the source SQL
    pub fn is_bind(self) -> bool {
        matches!(self, Self::Bind | Self::NamedBind)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal or placeholder removed from the digest.
///
/// `source[start..end] == value` holds for every parameter, including
/// multi-byte source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedParam {
    /// 1-based, in digest emission order
    pub index:      usize,
    /// First four hex chars of the MD5 of `index`
    pub index_hash: String,
    pub kind:       ParamKind,
    /// Verbatim source text
    pub value:      String,
    /// Byte offset, inclusive
    pub start:      usize,
    /// Byte offset, exclusive
    pub end:        usize,
    /// 1-based `VALUES` tuple, `0` outside a tuple
    pub row:        usize,
    /// 1-based position inside the tuple, `0` outside a tuple
    pub col:        usize
}

/// Digest, parameters and statement classification of one SQL input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub digest:          String,
    pub params:          Vec<ExtractedParam>,
    pub statements:      Vec<StatementInfo>,
    /// One tag per statement; `[UNKNOWN]` for empty input
    pub statement_types: Vec<StatementType>
}

impl Signature {
    /// Number of `?` placeholders in the digest, ignoring quoted identifiers
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.digest)
    }

    /// Whether tuple collapsing elided some parameters from the digest
    pub fn is_collapsed(&self) -> bool {
        self.placeholder_count() < self.params.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_kind_tags() {
        assert_eq!(ParamKind::NamedBind.to_string(), "NamedBind");
        assert_eq!(
            serde_json::to_string(&ParamKind::Timestamp).unwrap(),
            "\"Timestamp\""
        );
        assert!(ParamKind::Bind.is_bind());
        assert!(!ParamKind::Func.is_bind());
    }
}
