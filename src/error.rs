//! Error types for evidence extraction
//!
//! Every failure in the pipeline is fatal: errors propagate to the caller
//! and no output file is written.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for evidence operations
pub type Result<T> = std::result::Result<T, EvidenceError>;

/// Errors raised while reading, joining, or writing evidence documents
#[derive(Error, Debug)]
pub enum EvidenceError {
    /// Input document could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input document is not well-formed XML
    #[error("Malformed XML in {path}: {message}")]
    Xml { path: PathBuf, message: String },

    /// A required attribute is absent from an element
    #[error("<{element}> is missing required attribute '{attribute}' ({context})")]
    MissingAttribute {
        element: String,
        attribute: String,
        context: String,
    },

    /// Output document could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output serialization failed
    #[error("Failed to serialize report: {message}")]
    Serialize { message: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

impl EvidenceError {
    /// Create a malformed XML error for a document
    pub fn xml(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Xml {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a missing attribute error
    pub fn missing_attribute(
        element: impl Into<String>,
        attribute: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
            context: context.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
