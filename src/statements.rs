//! Statement splitting and verb classification.
//!
//! Input is split on `;` at paren depth 0. Each statement is classified by
//! its first top-level keyword, looking through `WITH` CTE lists and
//! `EXPLAIN`/`ANALYZE` wrappers to the main verb.
//!
//! | Input | Type |
//! |-------|------|
//! | `select 1` | `SELECT` |
//! | `WITH a AS (SELECT 1) DELETE FROM t` | `DELETE` |
//! | `EXPLAIN ANALYZE UPDATE t SET a = 1` | `UPDATE` |
//! | `EXPLAIN foo` | `EXPLAIN` |
//! | `(SELECT 1)`, empty | `UNKNOWN` |

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

use crate::{lexer::TokenKind, stream::TokenStream};

/// Statement type by leading verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Merge,
    Replace,
    Upsert,
    With,
    Explain,
    Analyze,
    Create,
    Alter,
    Drop,
    Truncate,
    Grant,
    Revoke,
    Set,
    Show,
    Use,
    Call,
    Exec,
    Begin,
    Commit,
    Rollback,
    Savepoint,
    Release,
    Pragma,
    Unknown
}

impl StatementType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Merge => "MERGE",
            Self::Replace => "REPLACE",
            Self::Upsert => "UPSERT",
            Self::With => "WITH",
            Self::Explain => "EXPLAIN",
            Self::Analyze => "ANALYZE",
            Self::Create => "CREATE",
            Self::Alter => "ALTER",
            Self::Drop => "DROP",
            Self::Truncate => "TRUNCATE",
            Self::Grant => "GRANT",
            Self::Revoke => "REVOKE",
            Self::Set => "SET",
            Self::Show => "SHOW",
            Self::Use => "USE",
            Self::Call => "CALL",
            Self::Exec => "EXEC",
            Self::Begin => "BEGIN",
            Self::Commit => "COMMIT",
            Self::Rollback => "ROLLBACK",
            Self::Savepoint => "SAVEPOINT",
            Self::Release => "RELEASE",
            Self::Pragma => "PRAGMA",
            Self::Unknown => "UNKNOWN"
        }
    }

    /// DML verbs that can follow `WITH` or `EXPLAIN`
    fn main_verb(word: &str) -> Option<Self> {
        let verb = match word.to_ascii_uppercase().as_str() {
            "SELECT" => Self::Select,
            "INSERT" => Self::Insert,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            "MERGE" => Self::Merge,
            "REPLACE" => Self::Replace,
            "UPSERT" => Self::Upsert,
            _ => return None
        };
        Some(verb)
    }

    /// Any verb that can lead a statement
    fn leading_verb(word: &str) -> Option<Self> {
        if let Some(verb) = Self::main_verb(word) {
            return Some(verb);
        }
        let verb = match word.to_ascii_uppercase().as_str() {
            "CREATE" => Self::Create,
            "ALTER" => Self::Alter,
            "DROP" => Self::Drop,
            "TRUNCATE" => Self::Truncate,
            "GRANT" => Self::Grant,
            "REVOKE" => Self::Revoke,
            "SET" => Self::Set,
            "SHOW" => Self::Show,
            "USE" => Self::Use,
            "CALL" => Self::Call,
            "EXEC" | "EXECUTE" => Self::Exec,
            "BEGIN" => Self::Begin,
            "COMMIT" => Self::Commit,
            "ROLLBACK" => Self::Rollback,
            "SAVEPOINT" => Self::Savepoint,
            "RELEASE" => Self::Release,
            "PRAGMA" => Self::Pragma,
            _ => return None
        };
        Some(verb)
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(verb) = Self::leading_verb(s) {
            return Ok(verb);
        }
        match s.to_ascii_uppercase().as_str() {
            "WITH" => Ok(Self::With),
            "EXPLAIN" => Ok(Self::Explain),
            "ANALYZE" => Ok(Self::Analyze),
            "UNKNOWN" => Ok(Self::Unknown),
            _ => Err(())
        }
    }
}

impl Serialize for StatementType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One top-level statement of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatementInfo {
    pub statement_type: StatementType,
    /// First visible token
    pub start_token:    usize,
    /// Last visible token, excluding the terminating `;`
    pub end_token:      usize,
    pub start_byte:     usize,
    pub end_byte:       usize
}

/// Split `stream` into top-level statements and classify each.
///
/// A `;` with nothing before it since the previous `;` yields an empty
/// `UNKNOWN` statement positioned at that `;`; a trailing `;` does not.
pub fn split(stream: &TokenStream<'_>) -> Vec<StatementInfo> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut first: Option<usize> = None;
    let mut last = 0usize;
    let mut cursor = stream.first_visible_from(0);

    while let Some(idx) = cursor {
        cursor = stream.next_visible(idx);
        let token = stream.token(idx);
        if token.is("(") {
            depth += 1;
        } else if token.is(")") {
            depth = depth.saturating_sub(1);
        } else if token.is(";") && depth == 0 {
            match first.take() {
                Some(start) => out.push(statement(stream, start, last)),
                None => {
                    let at = stream.byte_range(idx).start;
                    out.push(StatementInfo {
                        statement_type: StatementType::Unknown,
                        start_token:    idx,
                        end_token:      idx,
                        start_byte:     at,
                        end_byte:       at
                    });
                }
            }
            continue;
        }
        first.get_or_insert(idx);
        last = idx;
    }
    if let Some(start) = first {
        out.push(statement(stream, start, last));
    }

    out
}

fn statement(stream: &TokenStream<'_>, first: usize, last: usize) -> StatementInfo {
    StatementInfo {
        statement_type: classify(stream, first, last),
        start_token:    first,
        end_token:      last,
        start_byte:     stream.byte_range(first).start,
        end_byte:       stream.byte_range(last).end
    }
}

/// Classify the statement spanning visible tokens `first..=last`.
pub fn classify(stream: &TokenStream<'_>, first: usize, last: usize) -> StatementType {
    let mut depth = 0usize;
    let mut cursor = Some(first);

    while let Some(idx) = cursor.filter(|&i| i <= last) {
        cursor = stream.next_visible(idx);
        let token = stream.token(idx);
        if token.is("(") {
            depth += 1;
            continue;
        }
        if token.is(")") {
            depth = depth.saturating_sub(1);
            continue;
        }
        if token.is(";") && depth == 0 {
            return StatementType::Unknown;
        }
        if depth > 0 || token.kind != TokenKind::Word {
            continue;
        }

        if token.is_word("WITH") {
            return verb_after_with(stream, idx, last).unwrap_or(StatementType::With);
        }
        if token.is_word("EXPLAIN") || token.is_word("ANALYZE") {
            let wrapper = if token.is_word("EXPLAIN") {
                StatementType::Explain
            } else {
                StatementType::Analyze
            };
            return verb_after_explain(stream, idx, last).unwrap_or(wrapper);
        }
        if let Some(verb) = StatementType::leading_verb(token.text) {
            return verb;
        }
    }

    StatementType::Unknown
}

/// Main verb after `WITH [RECURSIVE] name [(cols)] AS [[NOT] MATERIALIZED] (...) [, ...]`
fn verb_after_with(stream: &TokenStream<'_>, with: usize, last: usize) -> Option<StatementType> {
    let next = |i: usize| stream.next_visible(i).filter(|&n| n <= last);
    let skip_group = |open: usize| stream.matching_close(open).and_then(next);

    let mut cur = next(with)?;
    if stream.token(cur).is_word("RECURSIVE") {
        cur = next(cur)?;
    }
    loop {
        let token = stream.token(cur);
        if !matches!(token.kind, TokenKind::Word | TokenKind::QuotedIdent) {
            break;
        }
        if StatementType::main_verb(token.text).is_some() && token.kind == TokenKind::Word {
            break;
        }
        cur = next(cur)?;
        if stream.token(cur).is("(") {
            cur = skip_group(cur)?;
        }
        if stream.token(cur).is_word("AS") {
            cur = next(cur)?;
            if stream.token(cur).is_word("NOT") {
                cur = next(cur)?;
            }
            if stream.token(cur).is_word("MATERIALIZED") {
                cur = next(cur)?;
            }
            if stream.token(cur).is("(") {
                cur = skip_group(cur)?;
            }
        }
        if !stream.token(cur).is(",") {
            break;
        }
        cur = next(cur)?;
    }

    StatementType::leading_verb(stream.text(cur))
}

/// Verb wrapped by `EXPLAIN [ANALYZE] [VERBOSE] [(options)] [QUERY PLAN] [PLAN FOR]`
fn verb_after_explain(stream: &TokenStream<'_>, wrapper: usize, last: usize) -> Option<StatementType> {
    const MODIFIERS: [&str; 6] = ["PLAN", "FOR", "VERBOSE", "ANALYZE", "QUERY", "EXTENDED"];

    let next = |i: usize| stream.next_visible(i).filter(|&n| n <= last);
    let mut cur = next(wrapper)?;
    loop {
        let token = stream.token(cur);
        if token.is("(") {
            cur = stream.matching_close(cur).and_then(next)?;
        } else if MODIFIERS.iter().any(|m| token.is_word(m)) {
            cur = next(cur)?;
        } else {
            break;
        }
    }

    StatementType::main_verb(stream.text(cur))
        .or_else(|| StatementType::leading_verb(stream.text(cur)))
}
