//! Error types for mercurio-tools

use thiserror::Error;

/// Tool error type
#[derive(Debug, Error)]
pub enum Error {
    /// Tool not present in the registry
    #[error("tool not found: {0}")]
    NotFound(String),

    /// Arguments rejected by schema validation
    #[error("invalid arguments for tool {tool}: {}", .fields.join(", "))]
    InvalidArguments {
        /// Tool whose arguments failed validation
        tool: String,
        /// Offending argument paths
        fields: Vec<String>,
    },

    /// A tool with the same name was already registered
    #[error("duplicate tool registration: {0}")]
    Duplicate(String),

    /// Tool handler failed; the message is surfaced as-is
    #[error("{0}")]
    Execution(String),

    /// JSON error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
