//! Token classification predicates.
//!
//! Pure functions over token text that decide whether a token is a literal,
//! a bind marker, a boolean/null keyword, or a time-valued function. All
//! lookup tables are immutable statics shared across threads.
//!
//! | Predicate | Matches |
//! |-----------|---------|
//! | [`is_number_literal`] | `42`, `1.5e3`, `.5`, `0x1F` |
//! | [`is_string_literal`] | `'x'`, `"x"` (MySQL), `$$x$$`, `E'x'`, `N'x'`, `x'00'`, `b'01'`, `q'[x]'` |
//! | [`bind_kind`] | `?`, `$1` (Bind); `:name`, `:1`, `@name` (NamedBind) |
//! | [`bool_or_null`] | `TRUE`, `FALSE`, `NULL` |
//! | [`date_literal_kind`] | `DATE`, `TIME`, `TIMESTAMP`, `INTERVAL` prefixes |
//! | [`time_function_kind`] | `NOW`, `CURRENT_DATE`, `SYSDATE`, `GETUTCDATE`, ... |

use std::sync::LazyLock;

use regex::Regex;

use crate::{dialect::Dialect, signature::ParamKind};

static POSITIONAL_BIND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\?|\$\d+)$").expect("valid regex"));

static NAMED_BIND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(:[A-Za-z_][A-Za-z_0-9]*|:\d+|@[A-Za-z_][A-Za-z_0-9]*)$").expect("valid regex")
});

/// Dollar-quoted body: `$$...` or `$tag$...`
static DOLLAR_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$[A-Za-z_0-9]*\$").expect("valid regex"));

/// A standalone `$tag$` marker
static DOLLAR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$[A-Za-z_0-9]*\$$").expect("valid regex"));

/// `E'..'`, `N'..'`, `X'..'`, `B'..'`, `Q'..'`, `NQ'..'`
static PREFIXED_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:nq|[enxbq])'").expect("valid regex"));

/// Time-valued keywords and functions with the kind they produce
const TIME_FUNCTIONS: &[(&str, ParamKind)] = &[
    ("NOW", ParamKind::Timestamp),
    ("CURRENT_TIMESTAMP", ParamKind::Timestamp),
    ("CURRENT_DATE", ParamKind::Date),
    ("CURRENT_TIME", ParamKind::Time),
    ("LOCALTIME", ParamKind::Time),
    ("LOCALTIMESTAMP", ParamKind::Timestamp),
    ("GETDATE", ParamKind::Timestamp),
    ("GETUTCDATE", ParamKind::Timestamp),
    ("SYSDATETIME", ParamKind::Timestamp),
    ("SYSUTCDATETIME", ParamKind::Timestamp),
    ("SYSDATETIMEOFFSET", ParamKind::Timestamp),
    ("SYSDATE", ParamKind::Timestamp),
    ("SYSTIMESTAMP", ParamKind::Timestamp),
    ("STATEMENT_TIMESTAMP", ParamKind::Timestamp),
    ("TRANSACTION_TIMESTAMP", ParamKind::Timestamp),
    ("CLOCK_TIMESTAMP", ParamKind::Timestamp),
    ("TIMEOFDAY", ParamKind::Timestamp),
    ("UTC_TIMESTAMP", ParamKind::Timestamp),
    ("UTC_DATE", ParamKind::Date),
    ("UTC_TIME", ParamKind::Time),
    ("CURDATE", ParamKind::Date),
    ("CURTIME", ParamKind::Time)
];

/// Clause keywords that may precede `(`; rendered with a space before it
const CLAUSE_KEYWORDS: &[&str] = &[
    "VALUES", "SELECT", "FROM", "WHERE", "AND", "OR", "NOT", "IN", "EXISTS", "ON", "AS", "JOIN",
    "INTO", "USING", "RETURNING", "WITH", "OVER", "CASE", "WHEN", "THEN", "ELSE", "END", "SET",
    "GROUP", "ORDER", "BY", "HAVING", "LIMIT", "OFFSET", "FETCH", "UNION", "INTERSECT", "EXCEPT",
    "MINUS", "ALL", "ANY", "SOME", "DISTINCT", "IS", "LIKE", "ILIKE", "BETWEEN", "TABLE",
    "INSERT", "UPDATE", "DELETE", "MERGE", "UPSERT", "REPLACE", "CALL", "EXEC", "EXECUTE",
    "PARTITION", "FILTER", "WITHIN", "ROW", "ROWS", "RANGE", "WINDOW", "DECLARE", "OUTPUT",
    "PRIMARY", "KEY", "UNIQUE", "CHECK", "REFERENCES", "FOREIGN", "INDEX", "CONSTRAINT",
    "DEFAULT", "LATERAL", "RECURSIVE", "MATERIALIZED", "CREATE", "ALTER", "VIEW", "PROCEDURE",
    "FUNCTION", "TRIGGER", "IF", "FOR", "TOP", "EXPLAIN", "ANALYZE", "DO", "CONFLICT", "TO"
];

/// Type names taking a length or precision, rendered tight like a call
const SIZED_TYPES: &[&str] = &[
    "VARCHAR", "VARCHAR2", "NVARCHAR", "CHAR", "NCHAR", "DECIMAL", "NUMERIC", "NUMBER", "FLOAT",
    "VARBINARY", "BINARY"
];

/// Multi-character operators rendered with operator spacing
const SPACED_OPERATORS: [&str; 12] =
    [">=", "<=", "<>", "!=", "||", "->", "->>", "#>", "#>>", "@>", "<@", "::"];

/// Leading digit (which covers `0x` hex), or `.` followed by a digit
pub fn is_number_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_digit() => true,
        Some(b'.') => bytes.get(1).is_some_and(u8::is_ascii_digit),
        _ => false
    }
}

/// Quoted literal in any of the forms `dialect` lexes as a string
pub fn is_string_literal(text: &str, dialect: Dialect) -> bool {
    match text.as_bytes().first() {
        Some(b'\'') => true,
        Some(b'"') => dialect.double_quote_is_string(),
        Some(b'$') => DOLLAR_QUOTED.is_match(text) && !DOLLAR_TAG.is_match(text),
        Some(_) => PREFIXED_STRING.is_match(text),
        None => false
    }
}

/// Standalone `$tag$` that opens or closes a dollar-quoted region
pub fn is_dollar_tag(text: &str) -> bool {
    DOLLAR_TAG.is_match(text)
}

/// Kind of a bind marker, or `None` if `text` is not one
pub fn bind_kind(text: &str) -> Option<ParamKind> {
    if POSITIONAL_BIND.is_match(text) {
        Some(ParamKind::Bind)
    } else if NAMED_BIND.is_match(text) {
        Some(ParamKind::NamedBind)
    } else {
        None
    }
}

pub fn bool_or_null(text: &str) -> Option<ParamKind> {
    if text.eq_ignore_ascii_case("TRUE") || text.eq_ignore_ascii_case("FALSE") {
        Some(ParamKind::Bool)
    } else if text.eq_ignore_ascii_case("NULL") {
        Some(ParamKind::Null)
    } else {
        None
    }
}

/// Kind produced by a `DATE '...'` style typed literal prefix
pub fn date_literal_kind(word: &str) -> Option<ParamKind> {
    [
        ("DATE", ParamKind::Date),
        ("TIME", ParamKind::Time),
        ("TIMESTAMP", ParamKind::Timestamp),
        ("INTERVAL", ParamKind::Interval)
    ]
    .into_iter()
    .find(|(name, _)| word.eq_ignore_ascii_case(name))
    .map(|(_, kind)| kind)
}

/// Kind produced by a time-valued keyword or function name
pub fn time_function_kind(name: &str) -> Option<ParamKind> {
    TIME_FUNCTIONS
        .iter()
        .find(|(fname, _)| name.eq_ignore_ascii_case(fname))
        .map(|&(_, kind)| kind)
}

/// Whether a word followed by `(` is structural rather than a call
pub fn is_non_function_keyword(word: &str) -> bool {
    is_clause_keyword(word) || SIZED_TYPES.iter().any(|ty| word.eq_ignore_ascii_case(ty))
}

/// Whether `word` is a clause keyword (`VALUES`, `IN`, `OVER`, ...)
pub fn is_clause_keyword(word: &str) -> bool {
    CLAUSE_KEYWORDS.iter().any(|kw| word.eq_ignore_ascii_case(kw))
}

pub fn is_spaced_operator(text: &str) -> bool {
    SPACED_OPERATORS.contains(&text)
}
