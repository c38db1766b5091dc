//! Configuration file
//!
//! ```json
//! { "data_dir": "./data", "default_dynamic": "strict", "log_level": "info" }
//! ```
//!
//! Only `data_dir` is required.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::observability::Severity;
use crate::schema::DynamicMode;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("data_dir must not be empty")]
    EmptyDataDir,

    #[error("Invalid log_level: {0}")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Dynamic mode for field maps that declare none (default "strict")
    #[serde(default)]
    pub default_dynamic: DynamicMode,

    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Create a configuration with defaults for everything but `data_dir`
    pub fn new(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            default_dynamic: DynamicMode::default(),
            log_level: default_log_level(),
        }
    }

    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.trim().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        self.log_severity()?;
        Ok(())
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn log_severity(&self) -> Result<Severity, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}
