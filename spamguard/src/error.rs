//! Error types for spamguard

use thiserror::Error;

/// Result type alias for spamguard operations
pub type Result<T> = std::result::Result<T, SpamGuardError>;

/// SpamGuard error types
#[derive(Error, Debug)]
pub enum SpamGuardError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level HTTP failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote endpoint answered with a non-success status
    #[error("Remote endpoint returned HTTP {0}")]
    RemoteStatus(u16),

    /// Remote body did not have the expected prediction shape
    #[error("Malformed remote response: {0}")]
    MalformedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Submitted message was blank after trimming
    #[error("Message is empty")]
    EmptyMessage,
}

impl From<config::ConfigError> for SpamGuardError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
