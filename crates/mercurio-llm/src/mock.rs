//! Mock completion provider for testing
//!
//! Returns queued completions in order, recording every request it receives.
//! An empty queue yields a default content completion.

use crate::completion::{Completion, CompletionOutcome, CompletionRequest, TokenUsage, ToolCall};
use crate::error::{Error, Result};
use crate::provider::CompletionProvider;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A mock provider that replays queued completions or errors.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<Result<Completion>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a new mock provider with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a raw completion.
    pub fn push(&self, completion: Completion) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(completion));
    }

    /// Queue a content-only completion.
    pub fn push_content(&self, text: impl Into<String>, usage: Option<TokenUsage>) {
        self.push(Completion {
            outcome: CompletionOutcome::Content { text: text.into() },
            usage,
            model: "mock-model".to_string(),
        });
    }

    /// Queue a tool-call completion.
    pub fn push_tool_calls(&self, calls: Vec<ToolCall>, usage: Option<TokenUsage>) {
        self.push(Completion {
            outcome: CompletionOutcome::ToolCalls {
                content: None,
                calls,
            },
            usage,
            model: "mock-model".to_string(),
        });
    }

    /// Queue an error.
    pub fn push_error(&self, error: Error) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(error));
    }

    /// Requests observed so far, in order.
    #[must_use]
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        let next = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match next {
            Some(result) => result,
            // Default behavior if queue empty
            None => Ok(Completion {
                outcome: CompletionOutcome::Content {
                    text: "mock response".to_string(),
                },
                usage: None,
                model: "mock-model".to_string(),
            }),
        }
    }
}
