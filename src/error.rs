// src/error.rs
// Standardized error types for the bridge

use thiserror::Error;

/// Main error type for the bridge library
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown error: {0}")]
    Other(String),
}

/// Convenience type alias for Result using BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;

impl From<String> for BridgeError {
    fn from(s: String) -> Self {
        BridgeError::Other(s)
    }
}

impl From<BridgeError> for String {
    fn from(err: BridgeError) -> Self {
        err.to_string()
    }
}
