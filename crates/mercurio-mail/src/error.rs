//! Error types for mercurio-mail

use lettre::transport::smtp::Error as SmtpError;
use thiserror::Error;

/// Mail error type
#[derive(Debug, Error)]
pub enum MailError {
    /// Required environment variable is missing
    #[error("missing environment variable: {0}")]
    MissingEnv(String),

    /// Environment variable has an unusable value
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnv(String, String),

    /// SMTP transport error
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Message could not be assembled
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Address did not parse as a mailbox
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, MailError>;
