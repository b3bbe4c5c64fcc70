//! Error types for mercurio-store

use thiserror::Error;

/// Store error type
#[derive(Debug, Error)]
pub enum Error {
    /// Database error from sqlx
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Input rejected before reaching the database; the message is the
    /// text shown to the customer
    #[error("{0}")]
    Validation(String),

    /// No product matches the identifier
    #[error("Producto no encontrado: {0}")]
    ProductNotFound(String),

    /// Import file could not be read or parsed
    #[error("import error: {0}")]
    Import(String),
}

impl Error {
    /// SQLSTATE code of the underlying database error, when present
    #[must_use]
    pub fn sqlstate(&self) -> Option<String> {
        match self {
            Self::Database(err) => err
                .as_database_error()
                .and_then(|db| db.code())
                .map(|code| code.to_string()),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
