//! Error types for mercurio-llm

use thiserror::Error;

/// HTTP statuses worth retrying against the completion API.
pub const RETRYABLE_STATUSES: &[u16] = &[404, 429, 500, 502, 503];

/// Completion client error type
#[derive(Debug, Error)]
pub enum Error {
    /// Transient API failure, eligible for retry
    #[error("transient api error (status {status}): {message}")]
    Transient {
        /// HTTP status code
        status: u16,
        /// Sanitized error body
        message: String,
    },

    /// Permanent API failure, never retried
    #[error("fatal api error (status {status}): {message}")]
    Fatal {
        /// HTTP status code
        status: u16,
        /// Sanitized error body
        message: String,
    },

    /// Retry budget exhausted against the completion API
    #[error("completion failed after {attempts} attempts: {message}")]
    RetriesExhausted {
        /// Attempts made, including the first
        attempts: u32,
        /// Last error observed
        message: String,
    },

    /// Malformed or empty completion response
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Provider not configured
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// Transport-level failure before any HTTP status was received
    #[error("http error: {0}")]
    Http(String),
}

impl Error {
    /// Build a status-classified API error from an HTTP response.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        if RETRYABLE_STATUSES.contains(&status) {
            Self::Transient { status, message }
        } else {
            Self::Fatal { status, message }
        }
    }

    /// Whether this error is worth another attempt.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
