//! Error types for the stig-evidence CLI

use std::path::PathBuf;
use thiserror::Error;

use stig_evidence::EvidenceError;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read error
    #[error("Failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration parse error
    #[error("Failed to parse configuration file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// A required input document was not supplied
    #[error("No {description} given. Pass {flag} FILE_PATH or set it in the configuration file")]
    MissingInput {
        flag: &'static str,
        description: &'static str,
    },

    /// Logging could not be initialized
    #[error("Failed to initialize logging: {message}")]
    Logging { message: String },

    /// Pipeline failure
    #[error(transparent)]
    Evidence(#[from] EvidenceError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a missing input error
    pub fn missing_input(flag: &'static str, description: &'static str) -> Self {
        Self::MissingInput { flag, description }
    }
}
