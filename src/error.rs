use std::io;
use thiserror::Error;

/// Custom error type for gtop
#[derive(Error, Debug)]
pub enum GtopError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}

/// Result type alias for gtop
pub type Result<T> = std::result::Result<T, GtopError>;

impl GtopError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        GtopError::Config(msg.into())
    }

    /// Create an unknown export format error
    pub fn unknown_format<S: Into<String>>(format: S) -> Self {
        GtopError::UnknownFormat(format.into())
    }
}
