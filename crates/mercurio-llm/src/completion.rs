//! Completion request and response types
//!
//! Requests carry the accumulated conversation plus the wire-format tool
//! schemas; responses are normalized into [`CompletionOutcome`], an explicit
//! split between a final answer and a round of tool calls.

use crate::error::{Error, Result};
use crate::message::Message;
use serde::{Deserialize, Serialize};

/// Token usage for one completion round-trip
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

/// Wire-format tool schema advertised to the completion API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name (exact-match key)
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for the arguments
    pub parameters: serde_json::Value,
}

impl ToolSchema {
    /// Create a new tool schema
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique ID for this call
    pub id: String,
    /// Tool name
    pub name: String,
    /// Arguments as a raw JSON string
    pub arguments: String,
}

impl ToolCall {
    /// Parse the raw arguments into a typed value
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.arguments).map_err(|e| Error::InvalidResponse(e.to_string()))
    }
}

/// Tool choice strategy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Let the model decide
    #[default]
    Auto,
    /// Don't use tools
    None,
    /// The model must call some tool
    Required,
}

/// Completion request
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// Model to use (empty string selects the provider default)
    pub model: String,
    /// Messages in the conversation
    pub messages: Vec<Message>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Tool schemas offered to the model (empty means no tools)
    pub tools: Vec<ToolSchema>,
    /// Tool choice strategy, sent only when tools are present
    pub tool_choice: ToolChoice,
}

impl CompletionRequest {
    /// Create a new completion request
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Add a message
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Add messages
    #[must_use]
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Set max tokens
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Offer tool schemas to the model
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolSchema>) -> Self {
        self.tools = tools;
        self
    }
}

/// What the model decided to do with one request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CompletionOutcome {
    /// Final answer, no tool calls
    Content {
        /// Generated text
        text: String,
    },
    /// The model requested tool executions
    ToolCalls {
        /// Text accompanying the calls, if any
        content: Option<String>,
        /// Requested calls, in the order received
        calls: Vec<ToolCall>,
    },
}

/// One normalized completion round-trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// What the model produced
    pub outcome: CompletionOutcome,
    /// Token usage reported by the API
    pub usage: Option<TokenUsage>,
    /// Model that produced the response
    pub model: String,
}

impl Completion {
    /// Tool calls carried by this completion, empty for content outcomes
    #[must_use]
    pub fn tool_calls(&self) -> &[ToolCall] {
        match &self.outcome {
            CompletionOutcome::Content { .. } => &[],
            CompletionOutcome::ToolCalls { calls, .. } => calls,
        }
    }
}
