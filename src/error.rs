use std::path::PathBuf;

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error during file I/O operations
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Error during JSON serialization or deserialization
    #[error("json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    /// Error when user input fails.
    #[error("inquire error: {0}")]
    Inquire(#[from] inquire::InquireError),
    /// Error during input validation.
    #[error("validation error: {0}")]
    Validation(String),
    /// Error when a config or credential file cannot be written
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Error when an empty or blank token is handed to the credential store
    #[error("token cannot be blank")]
    BlankToken,
    /// Error when no home directory can be determined
    #[error("failed to find the home directory")]
    HomeDirNotFound,
}

impl AppError {
    /// Wraps an I/O error raised while writing `path`
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Write {
            path: path.into(),
            source,
        }
    }
}
