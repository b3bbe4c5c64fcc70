//! SMTP configuration
//!
//! Implements `Debug` manually to redact the password.

use crate::error::{MailError, Result};
use secrecy::SecretString;

/// SMTP settings read from the environment
#[derive(Clone)]
pub struct MailerConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Sender mailbox for the From header
    pub from_address: String,
    /// Inbox that receives every sale confirmation
    pub sales_inbox: String,
}

impl std::fmt::Debug for MailerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailerConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("sales_inbox", &self.sales_inbox)
            .finish()
    }
}

impl MailerConfig {
    /// Load the configuration from environment variables
    ///
    /// Requires `SMTP_HOST`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_FROM`,
    /// and `SALES_INBOX`. `SMTP_PORT` defaults to 587.
    pub fn from_env() -> Result<Self> {
        let smtp_port = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .map_err(|e| MailError::InvalidEnv("SMTP_PORT".to_string(), e.to_string()))?;

        Ok(Self {
            smtp_host: required_env("SMTP_HOST")?,
            smtp_port,
            smtp_username: required_env("SMTP_USERNAME")?,
            smtp_password: SecretString::from(required_env("SMTP_PASSWORD")?),
            from_address: required_env("SMTP_FROM")?,
            sales_inbox: required_env("SALES_INBOX")?,
        })
    }
}

fn required_env(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| MailError::MissingEnv(key.to_string()))
}
