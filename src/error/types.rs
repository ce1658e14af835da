use thiserror::Error;

use crate::logging::LoggingError;

/// Unified result type for the crate.
pub type Result<T> = std::result::Result<T, NavError>;

/// Errors surfaced by configuration and host integration.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("invalid settings: {0}")]
    Settings(String),
    #[error("unknown key `{0}`")]
    UnknownKey(String),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("logging failure: {0}")]
    Logging(#[from] LoggingError),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
