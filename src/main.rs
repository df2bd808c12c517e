//! # SQL Signature
//!
//! Normalized digests and extracted literals for SQL statements.
//!
//! `sql-signature` reads SQL text, replaces every literal and bind marker
//! with `?`, and reports what was removed together with its byte span and,
//! inside `INSERT ... VALUES`, its row and column.
//!
//! # Quick Start
//!
//! ```bash
//! # Signature of a file
//! sql-signature sign -q query.sql --dialect postgres
//!
//! # Collapse multi-row inserts, JSON output
//! echo "INSERT INTO t VALUES (1,'a'),(2,'b')" | sql-signature sign --collapse-values -f json
//!
//! # Group a log of one statement per line by digest
//! sql-signature batch -q statements.log --top 10
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`SQL_SIGNATURE_DIALECT`, ...)
//! 3. `.sql-signature.toml` in current directory
//! 4. `~/.config/sql-signature/config.toml`
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Invalid input, unsupported dialect or unreadable file

use std::process;

use clap::Parser;
use sql_signature::{
    app::{run_batch, run_sign},
    cli::{Cli, Commands},
    config::Config,
    error::AppResult,
    logging
};

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> AppResult<i32> {
    let cli = Cli::parse();

    let output = match &cli.command {
        Commands::Sign {
            common
        } => {
            logging::init(common.verbose);
            let config = Config::load()?;
            run_sign(common, &config)?
        }
        Commands::Batch {
            common,
            top
        } => {
            logging::init(common.verbose);
            let config = Config::load()?;
            run_batch(common, *top, &config)?
        }
    };

    println!("{}", output.trim_end());
    Ok(0)
}
