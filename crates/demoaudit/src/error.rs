//! Error types for demoaudit.
//!
//! This module defines all error types used throughout the demoaudit crate,
//! providing enough context to tell which file or setting was at fault.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for demoaudit operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Source Errors ===
    /// Failed to read the demo source file.
    #[error("failed to read demo source {path}: {source}")]
    SourceRead {
        /// Path to the source file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for demoaudit operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a source read error for the given path.
    #[must_use]
    pub fn source_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceRead {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error means the source file does not exist.
    #[must_use]
    pub fn is_source_missing(&self) -> bool {
        matches!(
            self,
            Self::SourceRead { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
