//! Error types.
//!
//! `AppError` carries a process exit code and is used for failures the CLI
//! must surface. `FetchError` and `RowSkip` live below the best-effort
//! aggregation boundary and are never fatal.

use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Retrieval of a source file failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for '{path}' failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request for '{path}' returned status {status}")]
    Status { path: String, status: u16 },
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid url for '{path}': {message}")]
    InvalidUrl { path: String, message: String },
}

impl FetchError {
    pub fn path(&self) -> &str {
        match self {
            FetchError::Request { path, .. }
            | FetchError::Status { path, .. }
            | FetchError::Io { path, .. }
            | FetchError::InvalidUrl { path, .. } => path,
        }
    }
}

/// Why a CSV row was excluded from an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowSkip {
    #[error("missing `{0}` field")]
    MissingField(&'static str),
    #[error("year '{0}' does not start with an integer")]
    InvalidYear(String),
    #[error("value '{0}' does not start with a number")]
    InvalidValue(String),
}
