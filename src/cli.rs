use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// SQL Signature - normalized digests and extracted parameters for SQL
#[derive(Parser, Debug)]
#[command(name = "sql-signature")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the signature of SQL input
    Sign {
        #[command(flatten)]
        common: CommonArgs
    },

    /// Sign one statement per line and group the results by digest
    Batch {
        #[command(flatten)]
        common: CommonArgs,

        /// Show only the N most frequent digests
        #[arg(long)]
        top: Option<usize>
    }
}

/// Flags shared by all subcommands
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to SQL file (use - for stdin)
    #[arg(short, long, default_value = "-")]
    pub query: PathBuf,

    /// SQL dialect tag (mysql, postgres, sqlserver, oracle, or an alias)
    #[arg(long, env = "SQL_SIGNATURE_DIALECT")]
    pub dialect: Option<String>,

    /// Treat NOW(), CURRENT_DATE, SYSDATE and function calls as parameters
    #[arg(long)]
    pub paramize_time_funcs: bool,

    /// Elide repeated VALUES tuples from the digest
    #[arg(long)]
    pub collapse_values: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum)]
    pub output_format: Option<Format>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
