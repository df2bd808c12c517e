//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.sql-signature.toml` in current directory
//! 4. `~/.config/sql-signature/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [signature]
//! dialect = "postgres"         # mysql, postgres, sqlserver, oracle (and aliases)
//! paramize_time_funcs = true
//! collapse_values = true
//!
//! [output]
//! format = "json"              # text, json, yaml
//! color = false
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SQL_SIGNATURE_DIALECT` | Dialect tag |
//! | `SQL_SIGNATURE_PARAMIZE_TIME_FUNCS` | `true`/`1`/`yes` to parameterize time functions |
//! | `SQL_SIGNATURE_COLLAPSE_VALUES` | `true`/`1`/`yes` to collapse `VALUES` tuples |

use std::{
    env, fs,
    path::{Path, PathBuf}
};

use serde::Deserialize;

use crate::{
    dialect::{Dialect, Options},
    error::{AppResult, config_error}
};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub signature: SignatureConfig,
    #[serde(default)]
    pub output:    OutputConfig
}

/// Signature computation settings
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct SignatureConfig {
    /// Dialect tag, validated when options are built
    #[serde(default)]
    pub dialect:             Option<String>,
    #[serde(default)]
    pub paramize_time_funcs: bool,
    #[serde(default)]
    pub collapse_values:     bool
}

/// Output settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputConfig {
    pub format: Option<String>,
    #[serde(default = "default_color")]
    pub color:  bool
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color:  true
        }
    }
}

fn default_color() -> bool {
    true
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.sql-signature.toml)
    /// 3. Config file in home directory (~/.config/sql-signature/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sql-signature")
                .join("config.toml");

            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        let local_config = PathBuf::from(".sql-signature.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        config.apply_env();
        Ok(config)
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Override settings from `SQL_SIGNATURE_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(dialect) = env::var("SQL_SIGNATURE_DIALECT") {
            self.signature.dialect = Some(dialect);
        }
        if let Some(enabled) = env_flag("SQL_SIGNATURE_PARAMIZE_TIME_FUNCS") {
            self.signature.paramize_time_funcs = enabled;
        }
        if let Some(enabled) = env_flag("SQL_SIGNATURE_COLLAPSE_VALUES") {
            self.signature.collapse_values = enabled;
        }
    }

    /// Signature options described by this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured dialect tag is not supported.
    pub fn options(&self) -> AppResult<Options> {
        let dialect = match &self.signature.dialect {
            Some(tag) => tag.parse()?,
            None => Dialect::default()
        };
        Ok(Options::new(dialect)
            .paramize_time_funcs(self.signature.paramize_time_funcs)
            .collapse_values(self.signature.collapse_values))
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = env::var(name).ok()?;
    Some(matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    ))
}
