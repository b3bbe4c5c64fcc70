//! Completion provider trait definition

use crate::completion::{Completion, CompletionRequest};
use crate::error::Result;

/// Trait for completion API providers
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Get the default model
    fn default_model(&self) -> &str;

    /// Run one completion round-trip, normalizing the response
    async fn complete(&self, request: CompletionRequest) -> Result<Completion>;
}
