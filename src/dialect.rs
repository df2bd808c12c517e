//! SQL dialect selection and signature options.
//!
//! The dialect decides how raw text is tokenized (comment syntax, quoting
//! rules, bind marker shapes). Everything downstream of the lexer is
//! dialect-agnostic except for the few predicates that take a [`Dialect`]
//! argument explicitly.
//!
//! # Example
//!
//! ```
//! use sql_signature::dialect::{Dialect, Options};
//!
//! let dialect: Dialect = "postgresql".parse().unwrap();
//! let opts = Options::new(dialect).collapse_values(true);
//!
//! assert_eq!(opts.dialect, Dialect::Postgres);
//! assert!(opts.collapse_values_in_digest);
//! assert!("db2".parse::<Dialect>().is_err());
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, unsupported_dialect_error};

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    MySql,
    Postgres,
    SqlServer,
    Oracle
}

impl Dialect {
    /// All supported dialects, in tag order
    pub const ALL: [Dialect; 4] = [
        Dialect::MySql,
        Dialect::Postgres,
        Dialect::SqlServer,
        Dialect::Oracle
    ];

    /// Canonical lowercase tag
    pub fn tag(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::SqlServer => "sqlserver",
            Self::Oracle => "oracle"
        }
    }

    /// Whether comments can hide default-channel tokens (`/*!... */`), so
    /// the raw text must be scanned for comment spans separately.
    pub fn has_executable_comments(self) -> bool {
        matches!(self, Self::MySql)
    }

    /// Whether `"..."` delimits a string rather than an identifier
    pub fn double_quote_is_string(self) -> bool {
        matches!(self, Self::MySql)
    }

    /// Whether `$tag$ ... $tag$` is lexed as one string token
    pub fn has_dollar_quoting(self) -> bool {
        matches!(self, Self::Postgres)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Dialect {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::MySql),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "sqlserver" | "mssql" | "tsql" => Ok(Self::SqlServer),
            "oracle" | "plsql" => Ok(Self::Oracle),
            _ => Err(unsupported_dialect_error(s))
        }
    }
}

/// Options controlling a signature computation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Options {
    #[serde(default)]
    pub dialect:                   Dialect,
    /// Treat `NOW()`, `CURRENT_DATE`, `SYSDATE` and generic function calls
    /// as parameters
    #[serde(default)]
    pub paramize_time_funcs:       bool,
    /// Elide repeated, structurally identical `VALUES` tuples from the digest
    /// (never from the parameter list)
    #[serde(default)]
    pub collapse_values_in_digest: bool
}

impl Options {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn paramize_time_funcs(mut self, enabled: bool) -> Self {
        self.paramize_time_funcs = enabled;
        self
    }

    #[must_use]
    pub fn collapse_values(mut self, enabled: bool) -> Self {
        self.collapse_values_in_digest = enabled;
        self
    }
}

impl From<Dialect> for Options {
    fn from(dialect: Dialect) -> Self {
        Self::new(dialect)
    }
}
