//! Configuration management for collab
//!
//! Reads `~/.collab/config.toml`. Environment variables override the file,
//! command-line flags override both.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ROOT_ENV_VAR: &str = "PAI_COLLAB_ROOT";
pub const LOG_ENV_VAR: &str = "COLLAB_LOG";

/// Default output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub output: OutputFormat,
    /// Blackboard root used when no flag or env var is given
    pub root: Option<PathBuf>,
    /// Default tracing filter, e.g. "debug" or "collab=debug"
    pub log_level: Option<String>,
}

/// Returns the path to the collab home directory (~/.collab)
pub fn collab_home() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".collab"))
}

/// Load configuration from `~/.collab/config.toml`, defaults if absent
pub fn load_config() -> Result<Config> {
    load_config_from(&collab_home()?.join("config.toml"))
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
