//! CLI error types
//!
//! Field map errors keep their own `FIELDMAP_*` code so scripts can match on
//! it; everything else gets a `FIELDMAP_CLI_*` code.

use std::fmt;
use std::io;

use crate::schema::{MappingError, MappingErrorCode};

use super::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout/files)
    IoError,
    /// Input is not the expected JSON shape
    InvalidInput,
    /// Data directory already initialized
    AlreadyInitialized,
    /// Data directory not initialized
    NotInitialized,
    /// Field map, mapping or document error
    Mapping(MappingErrorCode),
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FIELDMAP_CLI_CONFIG_ERROR",
            Self::IoError => "FIELDMAP_CLI_IO_ERROR",
            Self::InvalidInput => "FIELDMAP_CLI_INVALID_INPUT",
            Self::AlreadyInitialized => "FIELDMAP_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "FIELDMAP_CLI_NOT_INITIALIZED",
            Self::Mapping(code) => code.code(),
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    pub fn already_initialized() -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            "Data directory already initialized",
        )
    }

    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Data directory not initialized. Run 'fieldmap init' first.",
        )
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_input(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<MappingError> for CliError {
    fn from(e: MappingError) -> Self {
        let message = match e.field_map_id() {
            Some(id) => format!("{} (field map '{}')", e.message(), id),
            None => e.message().to_string(),
        };
        Self::new(CliErrorCode::Mapping(e.code()), message)
    }
}

pub type CliResult<T> = Result<T, CliError>;
