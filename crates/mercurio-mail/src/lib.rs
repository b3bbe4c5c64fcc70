//! Mercurio Mail - sale confirmation emails over SMTP
//!
//! Renders Askama HTML and plain text templates and delivers them with
//! lettre. Confirmations always go to the configured sales inbox.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod mailer;

pub use config::MailerConfig;
pub use error::{MailError, Result};
pub use mailer::{Mailer, SaleProduct};
