//! Mercurio LLM - Completion API client
//!
//! This crate provides the completion layer for Mercurio:
//! - Message and request/response model shared with the orchestration loop
//! - `CompletionOutcome`: explicit content vs tool-call split
//! - DeepSeek provider (OpenAI-compatible wire format) with status-based
//!   retry on transient failures
//! - Mock provider for deterministic loop tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod completion;
pub mod deepseek;
pub mod error;
pub mod message;
pub mod mock;
pub mod provider;
pub mod util;

pub use completion::{
    Completion, CompletionOutcome, CompletionRequest, TokenUsage, ToolCall, ToolChoice, ToolSchema,
};
pub use deepseek::{DeepSeekConfig, DeepSeekProvider};
pub use error::{Error, Result, RETRYABLE_STATUSES};
pub use message::{Message, MessageRole};
pub use mock::MockProvider;
pub use provider::CompletionProvider;
