//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration bootstrap, loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found at the specified path.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Reading or writing the configuration file, or the terminal, failed.
    #[error("Configuration I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The file or environment did not produce a valid record.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Serializing the bootstrap record failed.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Invalid configuration: {message}")]
    Validation { message: String },
}

impl ConfigError {
    /// Creates a validation error with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Variant name, used in the startup failure line.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "FileNotFound",
            Self::Io(_) => "Io",
            Self::Parse(_) => "Parse",
            Self::Serialize(_) => "Serialize",
            Self::Validation { .. } => "Validation",
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
