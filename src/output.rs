use colored::Colorize;
use serde::Serialize;

use crate::{
    aggregate::DigestGroup,
    error::{AppResult, output_error},
    signature::Signature
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

impl OutputFormat {
    /// Parse a config-file format name; unknown names yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None
        }
    }
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Format one signature
pub fn format_signature(sig: &Signature, opts: &OutputOptions) -> AppResult<String> {
    match opts.format {
        OutputFormat::Json => to_json(sig),
        OutputFormat::Yaml => to_yaml(sig),
        OutputFormat::Text => Ok(format_text_signature(sig, opts))
    }
}

/// Format digest groups of a batch run
pub fn format_groups(groups: &[DigestGroup], opts: &OutputOptions) -> AppResult<String> {
    match opts.format {
        OutputFormat::Json => to_json(groups),
        OutputFormat::Yaml => to_yaml(groups),
        OutputFormat::Text => Ok(format_text_groups(groups, opts))
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| output_error(e.to_string()))
}

fn to_yaml<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    serde_yaml::to_string(value).map_err(|e| output_error(e.to_string()))
}

fn heading(text: &str, opts: &OutputOptions) -> String {
    if opts.colored {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn format_text_signature(sig: &Signature, opts: &OutputOptions) -> String {
    let mut out = String::new();

    out.push_str(&heading("Digest:", opts));
    out.push(' ');
    if opts.colored {
        out.push_str(&sig.digest.cyan().to_string());
    } else {
        out.push_str(&sig.digest);
    }
    out.push('\n');

    let types: Vec<&str> = sig.statement_types.iter().map(|t| t.as_str()).collect();
    out.push_str(&format!("{} {}\n", heading("Statements:", opts), types.join(", ")));

    if sig.is_collapsed() {
        out.push_str(&format!(
            "Collapsed: {} placeholders for {} params\n",
            sig.placeholder_count(),
            sig.params.len()
        ));
    }

    if sig.params.is_empty() {
        return out;
    }

    out.push_str(&heading("Params:", opts));
    out.push('\n');
    for p in &sig.params {
        let position = if p.row > 0 {
            format!(" row {} col {}", p.row, p.col)
        } else {
            String::new()
        };
        let kind = if opts.colored {
            p.kind.as_str().yellow().to_string()
        } else {
            p.kind.as_str().to_string()
        };
        out.push_str(&format!("  #{} {} {}{}", p.index, kind, p.value, position));
        if opts.verbose {
            out.push_str(&format!(" [{}..{}] {}", p.start, p.end, p.index_hash));
        }
        out.push('\n');
    }

    if opts.verbose && sig.statements.len() > 1 {
        out.push_str(&heading("Ranges:", opts));
        out.push('\n');
        for s in &sig.statements {
            out.push_str(&format!(
                "  {} bytes {}..{}\n",
                s.statement_type, s.start_byte, s.end_byte
            ));
        }
    }

    out
}

fn format_text_groups(groups: &[DigestGroup], opts: &OutputOptions) -> String {
    let mut out = String::new();
    let total: usize = groups.iter().map(|g| g.count).sum();

    out.push_str(&heading(
        &format!("{} statements, {} distinct digests", total, groups.len()),
        opts
    ));
    out.push_str("\n\n");

    for (i, group) in groups.iter().enumerate() {
        let header = format!("#{} x{}", i + 1, group.count);
        if opts.colored {
            out.push_str(&header.cyan().bold().to_string());
        } else {
            out.push_str(&header);
        }
        let types: Vec<&str> = group.statement_types.iter().map(|t| t.as_str()).collect();
        out.push_str(&format!(" ({})\n", types.join(", ")));
        out.push_str(&format!("{}\n", group.digest));
        if opts.verbose {
            out.push_str(&format!("Example: {}\n", group.example));
            out.push_str(&format!("Params: {}\n", group.total_params));
        }
        out.push('\n');
    }

    out
}
