use thiserror::Error;

/// Core error type for ESI status operations.
#[derive(Error, Debug)]
pub enum EsiStatusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request failed: {url}: {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("Invalid JSON from {url}: {reason}")]
    InvalidJson { url: String, reason: String },

    #[error("Invalid cron expression: {0}")]
    Schedule(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EsiStatusError {
    /// Build a `RequestFailed` from any displayable transport error.
    pub fn request_failed(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::RequestFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias using EsiStatusError.
pub type Result<T> = std::result::Result<T, EsiStatusError>;
