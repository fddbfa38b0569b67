//! Error types shared across the SDK

use thiserror::Error;

/// Errors produced while decoding or classifying wire data
#[derive(Error, Debug)]
pub enum BitgoError {
    /// Failed to parse JSON message
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String, raw: Option<String> },

    /// Frame is valid JSON but lacks the expected shape
    #[error("Unexpected message format: {0}")]
    UnexpectedMessage(String),

    /// Environment name not recognized
    #[error("Unknown environment: {0} (expected production or test)")]
    UnknownEnvironment(String),
}

impl BitgoError {
    /// Create an invalid JSON error, keeping the raw text for diagnostics
    pub fn invalid_json(err: &serde_json::Error, raw: impl Into<String>) -> Self {
        Self::InvalidJson {
            message: err.to_string(),
            raw: Some(raw.into()),
        }
    }
}

/// Result type alias for shared operations
pub type BitgoResult<T> = Result<T, BitgoError>;
