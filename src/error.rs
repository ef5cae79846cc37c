//! Crate-level error type.

use thiserror::Error;

/// Errors surfaced by startup and infrastructure plumbing.
///
/// Authentication failures have their own taxonomy in
/// [`crate::auth::AuthError`]; this type covers everything around it.
#[derive(Error, Debug)]
pub enum MeshmonError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for MeshmonError {
    fn from(e: sqlx::Error) -> Self {
        MeshmonError::Database(e.to_string())
    }
}

/// Result type alias for meshmon operations.
pub type Result<T> = std::result::Result<T, MeshmonError>;
