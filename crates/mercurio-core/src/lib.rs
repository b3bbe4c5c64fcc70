//! Mercurio Core - sales agent orchestration.
//!
//! Drives one conversation turn at a time: builds the request from the
//! system prompt and recent history, loops completions against tool rounds,
//! cleans the final reply, and accounts token usage per request. Transcript
//! persistence lives in [`history`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod agent;
pub mod error;
pub mod history;

pub use agent::{
    clean_technical_markers, AgentConfig, SalesAgent, TurnResult, UsageStep, UsageTotals,
    DEFAULT_SYSTEM_PROMPT, EMPTY_RESPONSE_FALLBACK, PROCESSING_FALLBACK,
};
pub use error::{Error, Result};
pub use history::{ConversationStore, MemoryHistory, PgHistory, HISTORY_FETCH_LIMIT};
