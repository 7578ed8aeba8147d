//! Error handling for wrex

use thiserror::Error;

/// Main error type for wrex operations
#[derive(Error, Debug)]
pub enum WrexError {
    #[error("JSON serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("JSON deserialization error: {0}")]
    Deserialization(#[source] serde_json::Error),

    #[error("File access error: {0}")]
    FileAccess(#[from] std::io::Error),

    #[error("Invalid request: {0}")]
    RequestConstruction(String),

    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Network timeout")]
    Timeout,
}

impl WrexError {
    /// Classify a dispatch failure: deadline expiry maps to `Timeout`,
    /// everything else is a transport fault.
    pub(crate) fn from_dispatch(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WrexError::Timeout
        } else {
            WrexError::Transport(err)
        }
    }
}

/// Result type alias for wrex operations
pub type Result<T> = std::result::Result<T, WrexError>;
