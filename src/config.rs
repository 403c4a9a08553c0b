//! CLI configuration
//!
//! Read from `--config <path>` or ~/.config/smt/config.json, then overridden by the
//! `SMT_FORMAT` and `SMT_LOG` environment variables.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding [`Config::format`]
pub const ENV_FORMAT: &str = "SMT_FORMAT";

/// Environment variable overriding [`Config::log`]
pub const ENV_LOG: &str = "SMT_LOG";

/// How command results are printed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON document per line
    #[default]
    Json,
    /// Pretty-printed JSON
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            other => Err(Error::Config(format!("Unknown output format: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub format: OutputFormat,
    /// `tracing` filter directive, e.g. `warn` or `sparse_trie=debug`
    pub log: String,
    /// Newline-separated values inserted before any given on the command line
    pub values_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            format: OutputFormat::Json,
            log: "warn".to_string(),
            values_file: None,
        }
    }
}

impl Config {
    /// ~/.config/smt/config.json
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("smt").join("config.json"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load from an explicit path, else the default path if present, then apply the
    /// environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|path| path.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides looked up by variable name
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(format) = lookup(ENV_FORMAT) {
            self.format = format.parse()?;
        }
        if let Some(log) = lookup(ENV_LOG) {
            self.log = log;
        }
        Ok(self)
    }
}
