//! Error types for ClipTrim.

use thiserror::Error;

/// Main error type for ClipTrim operations.
#[derive(Error, Debug)]
pub enum CliptrimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Export cancelled")]
    Cancelled,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for ClipTrim operations.
pub type Result<T> = std::result::Result<T, CliptrimError>;
