//! Signature computation entry points.
//!
//! A signature is the normalized digest of a SQL input together with every
//! literal and placeholder removed from it and the type of each statement.
//!
//! # Pipeline
//!
//! ```text
//! sql ─► TokenStream ─► render ─► sanitize_parens ─► digest
//!                         │
//!                         └──► params ─► annotate_rows ─► index_hash
//! sql ─► TokenStream ─► statements::split ─► statement types
//! ```
//!
//! # Example
//!
//! ```
//! use sql_signature::{
//!     dialect::{Dialect, Options},
//!     signature::{ParamKind, signature}
//! };
//!
//! let sql = "INSERT INTO t(a,b) VALUES (1,'x'), (2,'y'), (3,'z');";
//! let sig = signature(sql, &Options::new(Dialect::MySql).collapse_values(true));
//!
//! assert_eq!(sig.digest, "INSERT INTO T(A, B) VALUES (?, ?)");
//! assert_eq!(sig.params.len(), 6);
//! assert_eq!(sig.params[1].kind, ParamKind::String);
//! assert_eq!((sig.params[5].row, sig.params[5].col), (3, 2));
//! assert_eq!(sig.statement_types[0].to_string(), "INSERT");
//! ```

mod types;

use rayon::prelude::*;
use tracing::debug;
pub use types::{ExtractedParam, ParamKind, Signature};

use crate::{
    annotate::annotate_rows,
    dialect::{Dialect, Options},
    error::AppResult,
    render::render,
    sanitize::sanitize_parens,
    statements::{self, StatementInfo, StatementType},
    stream::TokenStream
};

/// Compute the signature of `sql`.
///
/// Never fails and never panics: malformed SQL degrades to a best-effort
/// digest.
pub fn signature(sql: &str, options: &Options) -> Signature {
    let stream = TokenStream::new(sql, options.dialect);
    let rendered = render(&stream, options);
    let digest = sanitize_parens(&rendered.digest);

    let mut params = rendered.params;
    annotate_rows(sql, options.dialect, &mut params);
    for param in &mut params {
        param.index_hash = index_hash(param.index);
    }

    let statements = statements::split(&stream);
    let statement_types = types_of(&statements);

    debug!(
        dialect = %options.dialect,
        params = params.len(),
        statements = statements.len(),
        digest_len = digest.len(),
        "signature computed"
    );

    Signature {
        digest,
        params,
        statements,
        statement_types
    }
}

/// Compute a signature for a dialect given by tag (`"mysql"`, `"pg"`, ...).
///
/// # Errors
///
/// Returns an error if `dialect` is not a supported tag; `options.dialect`
/// is replaced by the parsed one.
pub fn signature_for_tag(sql: &str, dialect: &str, options: Options) -> AppResult<Signature> {
    let options = Options {
        dialect: dialect.parse()?,
        ..options
    };
    Ok(signature(sql, &options))
}

/// Parameters only
pub fn extract_params(sql: &str, options: &Options) -> Vec<ExtractedParam> {
    signature(sql, options).params
}

/// Top-level statements with their types and byte ranges
pub fn split_statements(sql: &str, dialect: Dialect) -> Vec<StatementInfo> {
    statements::split(&TokenStream::new(sql, dialect))
}

/// One type per statement, `[UNKNOWN]` for empty input
pub fn statement_types(sql: &str, dialect: Dialect) -> Vec<StatementType> {
    types_of(&split_statements(sql, dialect))
}

/// Signatures of independent inputs, computed in parallel
pub fn signature_many<S>(sqls: &[S], options: &Options) -> Vec<Signature>
where
    S: AsRef<str> + Sync
{
    sqls.par_iter()
        .map(|sql| signature(sql.as_ref(), options))
        .collect()
}

/// Short label for a parameter index: first four hex chars of its MD5
pub fn index_hash(index: usize) -> String {
    let mut hex = format!("{:x}", md5::compute(index.to_string()));
    hex.truncate(4);
    hex
}

fn types_of(statements: &[StatementInfo]) -> Vec<StatementType> {
    if statements.is_empty() {
        return vec![StatementType::Unknown];
    }
    statements.iter().map(|s| s.statement_type).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_hash() {
        assert_eq!(index_hash(1), "c4ca");
        assert_eq!(index_hash(2), "c81e");
        assert_eq!(index_hash(10), "d3d9");
    }

    #[test]
    fn test_empty_input_is_unknown() {
        let sig = signature("  \n ", &Options::default());
        assert_eq!(sig.digest, "");
        assert!(sig.params.is_empty());
        assert_eq!(sig.statement_types, vec![StatementType::Unknown]);
    }

    #[test]
    fn test_signature_for_tag() {
        let sig = signature_for_tag("SELECT $1", "pg", Options::default()).unwrap();
        assert_eq!(sig.params[0].kind, ParamKind::Bind);
        assert!(signature_for_tag("SELECT 1", "sybase", Options::default()).is_err());
    }

    #[test]
    fn test_signature_many_matches_serial() {
        let sqls = ["SELECT 1", "UPDATE t SET a = 'x'", "DELETE FROM t WHERE id = ?"];
        let opts = Options::new(Dialect::Postgres);
        let parallel = signature_many(&sqls, &opts);
        let serial: Vec<_> = sqls.iter().map(|s| signature(s, &opts)).collect();
        assert_eq!(parallel, serial);
    }
}
