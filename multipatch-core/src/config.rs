//! User configuration for multipatch
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (MULTIPATCH_*)
//! 3. Config file (~/.config/multipatch/config.toml)
//! 4. Default values
//!
//! This is separate from the per-repository tracking manifest, which lives
//! in the repository's git directory (see [`crate::manifest`]).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default maximum length of a summary line in log output
pub const DEFAULT_SUMMARY_WIDTH: usize = 90;

/// Default timestamp format in log output
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Log-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Exclusion patterns applied to every log invocation
    pub exclude: Vec<String>,

    /// Maximum number of characters of the summary line to print
    pub summary_width: usize,

    /// strftime-style format for commit timestamps
    pub date_format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            summary_width: DEFAULT_SUMMARY_WIDTH,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Log configuration
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/multipatch/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("multipatch").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - MULTIPATCH_SUMMARY_WIDTH: summary truncation width
    /// - MULTIPATCH_DATE_FORMAT: timestamp format
    /// - MULTIPATCH_EXCLUDE: comma separated exclusion patterns, appended
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(width) = var("MULTIPATCH_SUMMARY_WIDTH") {
            self.log.summary_width = width.trim().parse().map_err(|_| {
                Error::Config(format!("MULTIPATCH_SUMMARY_WIDTH is not a number: {}", width))
            })?;
        }

        if let Some(format) = var("MULTIPATCH_DATE_FORMAT") {
            self.log.date_format = format;
        }

        if let Some(patterns) = var("MULTIPATCH_EXCLUDE") {
            self.log.exclude.extend(
                patterns
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from),
            );
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    ///
    /// Exclusion patterns given on the command line add to the configured ones.
    pub fn with_cli_overrides(mut self, exclude: &[String]) -> Self {
        self.log.exclude.extend(exclude.iter().cloned());
        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(exclude: &[String]) -> Result<Self> {
        Ok(Self::load()?.with_env_overrides()?.with_cli_overrides(exclude))
    }
}
