//! Agent core structure
//!
//! Contains the main `SalesAgent` struct and its builder methods.

use std::sync::Arc;

use mercurio_llm::CompletionProvider;
use mercurio_tools::ToolCatalog;

use super::config::AgentConfig;

/// Main agent that drives the completion and tool loop for one turn
pub struct SalesAgent {
    pub(crate) provider: Arc<dyn CompletionProvider>,
    pub(crate) catalog: Arc<ToolCatalog>,
    pub(crate) config: AgentConfig,
}

impl SalesAgent {
    /// Create a new agent with default configuration
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>, catalog: Arc<ToolCatalog>) -> Self {
        Self {
            provider,
            catalog,
            config: AgentConfig::default(),
        }
    }

    /// Replace the agent configuration
    #[must_use]
    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration
    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}
