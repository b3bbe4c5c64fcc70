//! Sales agent - conversation turn loop
//!
//! This module provides the agent logic that ties together the completion
//! provider, the tool catalog, and reply cleanup for one conversation turn.
//!
//! # Module Structure
//!
//! - `types`: Turn result and usage accounting types
//! - `config`: Agent configuration and defaults
//! - `core`: SalesAgent struct and builder methods
//! - `process`: Main completion and tool loop
//! - `tool_execution`: Tool round execution
//! - `prompt`: Default system prompt
//! - `sanitize`: Reply cleanup and fallback texts

mod config;
mod core;
mod process;
mod prompt;
mod sanitize;
mod tool_execution;
mod types;

#[cfg(test)]
mod tests;

// Re-export public types
pub use config::{
    AgentConfig, DEFAULT_HISTORY_WINDOW, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_TOOL_RESULT_CHARS,
};
pub use core::SalesAgent;
pub use prompt::DEFAULT_SYSTEM_PROMPT;
pub use sanitize::{clean_technical_markers, EMPTY_RESPONSE_FALLBACK, PROCESSING_FALLBACK};
pub use types::{TurnResult, UsageStep, UsageTotals};
