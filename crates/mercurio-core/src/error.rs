//! Error types for the orchestration layer.

/// Errors raised while running a conversation turn or touching history.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The completion provider failed after retries.
    #[error(transparent)]
    Completion(#[from] mercurio_llm::Error),

    /// History storage failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored message could not be encoded or decoded.
    #[error("history serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for orchestration results.
pub type Result<T> = std::result::Result<T, Error>;
