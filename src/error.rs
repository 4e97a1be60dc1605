//! Error types for noticeboard.

use thiserror::Error;

/// Common error type for noticeboard.
#[derive(Error, Debug)]
pub enum NoticeBoardError {
    /// Query error.
    ///
    /// Errors from sqlx are converted into this variant; the message is only
    /// ever logged, never returned to clients.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for configuration or input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for NoticeBoardError {
    fn from(e: sqlx::Error) -> Self {
        NoticeBoardError::Database(e.to_string())
    }
}

/// Result type alias for noticeboard operations.
pub type Result<T> = std::result::Result<T, NoticeBoardError>;
