//! Agent main execution loop
//!
//! Contains the `process` method - the completion and tool loop for one turn.

use mercurio_llm::util::truncate_safe;
use mercurio_llm::{CompletionOutcome, CompletionRequest, Message, TokenUsage, ToolSchema};
use tracing::{debug, error, info, warn};

use super::core::SalesAgent;
use super::sanitize::{clean_technical_markers, EMPTY_RESPONSE_FALLBACK, PROCESSING_FALLBACK};
use super::types::{TurnResult, UsageStep, UsageTotals};
use crate::error::Result;

const INPUT_PREVIEW_CHARS: usize = 80;

impl SalesAgent {
    /// Process one user turn against the supplied conversation history
    ///
    /// Never fails: provider errors come back as a `TurnResult` with
    /// `success: false` and the error description as the message.
    #[tracing::instrument(skip(self, input, history), fields(history_len = history.len()))]
    pub async fn process(&self, input: &str, history: &[Message]) -> TurnResult {
        match self.run_turn(input, history).await {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err, "turn failed");
                TurnResult::failure(err.to_string())
            }
        }
    }

    async fn run_turn(&self, input: &str, history: &[Message]) -> Result<TurnResult> {
        let messages = self.base_messages(input, history);

        let tools = self.catalog.wire_schemas();
        if tools.is_empty() {
            warn!("no tools registered, continuing without tool support");
        }

        info!(
            model = self.request_model(),
            messages = messages.len(),
            tools = tools.len(),
            input = truncate_safe(input, INPUT_PREVIEW_CHARS),
            "starting turn"
        );

        let mut usage = UsageTotals::default();
        let mut tools_used: Vec<String> = Vec::new();
        // Tool traffic for this turn only; callers never persist it
        let mut tool_messages: Vec<Message> = Vec::new();

        let mut completion = self
            .provider
            .complete(self.request(messages.clone(), &tools))
            .await?;
        record_usage(&mut usage, "Initial request", completion.usage);

        let mut iteration = 0usize;

        let raw_reply = loop {
            match completion.outcome {
                CompletionOutcome::Content { text } => break text,
                CompletionOutcome::ToolCalls { content, calls } => {
                    if iteration >= self.config.max_iterations {
                        warn!(
                            iterations = iteration,
                            "tool iteration cap reached, replying with pending content"
                        );
                        break content.unwrap_or_default();
                    }
                    iteration += 1;

                    let tool_names = calls
                        .iter()
                        .map(|call| call.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    info!(
                        iteration,
                        max_iterations = self.config.max_iterations,
                        tools = %tool_names,
                        "running tool round"
                    );

                    tool_messages.push(Message::assistant_tool_calls(content, calls.clone()));
                    self.run_tool_round(&calls, &mut tool_messages, &mut tools_used)
                        .await;

                    debug!(
                        base = messages.len(),
                        tool_traffic = tool_messages.len(),
                        "requesting next completion"
                    );
                    let mut next_messages = messages.clone();
                    next_messages.extend(tool_messages.iter().cloned());

                    completion = self
                        .provider
                        .complete(self.request(next_messages, &tools))
                        .await?;
                    record_usage(
                        &mut usage,
                        &format!("Tool iteration {iteration} ({tool_names})"),
                        completion.usage,
                    );
                }
            }
        };

        if iteration > 0 {
            info!(
                iterations = iteration,
                tools_executed = tools_used.len(),
                "tool loop finished"
            );
        }

        let raw_len = raw_reply.len();
        let mut reply = clean_technical_markers(&raw_reply);
        if reply.len() != raw_len {
            info!(
                raw_len,
                clean_len = reply.len(),
                "technical markers removed from reply"
            );
        }

        if reply.is_empty() && !tools_used.is_empty() {
            warn!("empty reply after tool calls");
            reply = PROCESSING_FALLBACK.to_string();
        } else if reply.is_empty() {
            error!("model returned an empty reply");
            reply = EMPTY_RESPONSE_FALLBACK.to_string();
        }

        info!(
            total_tokens = usage.total_tokens,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "turn finished"
        );
        for step in &usage.breakdown {
            debug!(
                step = %step.step,
                prompt_tokens = step.prompt_tokens,
                completion_tokens = step.completion_tokens,
                "usage step"
            );
        }
        if !tools_used.is_empty() {
            info!(tools = %tools_used.join(", "), "tools used this turn");
        }

        Ok(TurnResult {
            success: true,
            message: reply,
            tools_used,
            usage: Some(usage),
        })
    }

    /// Builds the fixed message prefix: system prompt, trailing history
    /// window stripped to role and content, then the user input.
    fn base_messages(&self, input: &str, history: &[Message]) -> Vec<Message> {
        let window_start = history.len().saturating_sub(self.config.history_window);
        let window = &history[window_start..];

        let mut messages = Vec::with_capacity(window.len() + 2);
        messages.push(Message::system(&self.config.system_prompt));
        for message in window {
            messages.push(Message {
                role: message.role,
                content: message.content.clone(),
                tool_calls: None,
                tool_call_id: None,
            });
        }
        messages.push(Message::user(input));
        messages
    }

    fn request(&self, messages: Vec<Message>, tools: &[ToolSchema]) -> CompletionRequest {
        let mut request = CompletionRequest::new(self.config.model.as_str()).with_messages(messages);
        if !tools.is_empty() {
            request = request.with_tools(tools.to_vec());
        }
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }

    fn request_model(&self) -> &str {
        if self.config.model.is_empty() {
            self.provider.default_model()
        } else {
            &self.config.model
        }
    }
}

fn record_usage(totals: &mut UsageTotals, step: &str, usage: Option<TokenUsage>) {
    let (prompt_tokens, completion_tokens) =
        usage.map_or((0, 0), |u| (u.prompt_tokens, u.completion_tokens));

    totals.prompt_tokens += prompt_tokens;
    totals.completion_tokens += completion_tokens;
    totals.total_tokens = totals.prompt_tokens + totals.completion_tokens;
    totals.breakdown.push(UsageStep {
        step: step.to_string(),
        prompt_tokens,
        completion_tokens,
        total_tokens: prompt_tokens + completion_tokens,
    });
}
