//! Application logic for the `sql-signature` CLI.
//!
//! Kept apart from the entry point so the commands can be tested without
//! spawning the binary.

use std::{
    fs::read_to_string,
    io::{self, Read},
    path::Path
};

use rayon::prelude::*;
use tracing::debug;

use crate::{
    aggregate::{aggregate, top},
    cache::signature_cached,
    cli::{CommonArgs, Format},
    config::Config,
    dialect::{Dialect, Options},
    error::{AppResult, config_error, file_read_error},
    output::{OutputFormat, OutputOptions, format_groups, format_signature},
    signature::Signature
};

/// Read SQL from a file, or from stdin when the path is `-`
pub fn read_input(path: &Path) -> AppResult<String> {
    if path.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        return Ok(buffer);
    }
    read_to_string(path).map_err(|e| file_read_error(&path.display().to_string(), e))
}

/// Non-empty trimmed lines of batch input
pub fn batch_lines(input: &str) -> Vec<&str> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Merge command-line flags over the loaded configuration
///
/// # Errors
///
/// Returns an error if the effective dialect tag is not supported.
pub fn resolve_options(args: &CommonArgs, config: &Config) -> AppResult<Options> {
    let base = config.options()?;
    let dialect = match &args.dialect {
        Some(tag) => tag.parse::<Dialect>()?,
        None => base.dialect
    };
    Ok(Options::new(dialect)
        .paramize_time_funcs(args.paramize_time_funcs || base.paramize_time_funcs)
        .collapse_values(args.collapse_values || base.collapse_values_in_digest))
}

/// Output settings from flags, falling back to the `[output]` table
///
/// # Errors
///
/// Returns an error if the configured format name is unknown.
pub fn resolve_output(args: &CommonArgs, config: &Config) -> AppResult<OutputOptions> {
    let format = match args.output_format {
        Some(Format::Text) => OutputFormat::Text,
        Some(Format::Json) => OutputFormat::Json,
        Some(Format::Yaml) => OutputFormat::Yaml,
        None => match &config.output.format {
            Some(name) => OutputFormat::from_name(name)
                .ok_or_else(|| config_error(format!("Unknown output format: {}", name)))?,
            None => OutputFormat::Text
        }
    };
    Ok(OutputOptions {
        format,
        colored: config.output.color && !args.no_color,
        verbose: args.verbose
    })
}

/// Sign the whole input as one signature and format it
pub fn run_sign(args: &CommonArgs, config: &Config) -> AppResult<String> {
    let options = resolve_options(args, config)?;
    let output = resolve_output(args, config)?;
    let sql = read_input(&args.query)?;

    let sig = signature_cached(&sql, &options);
    format_signature(&sig, &output)
}

/// Sign each input line and format the digest groups
pub fn run_batch(args: &CommonArgs, limit: Option<usize>, config: &Config) -> AppResult<String> {
    let options = resolve_options(args, config)?;
    let output = resolve_output(args, config)?;
    let input = read_input(&args.query)?;
    let lines = batch_lines(&input);

    let signatures: Vec<Signature> = lines
        .par_iter()
        .map(|line| signature_cached(line, &options))
        .collect();
    let mut groups = aggregate(lines.iter().copied().zip(signatures.iter()));
    debug!(
        lines = lines.len(),
        groups = groups.len(),
        "batch aggregated"
    );

    if let Some(n) = limit {
        groups = top(groups, n);
    }
    format_groups(&groups, &output)
}
