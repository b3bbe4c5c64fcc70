//! Tool round execution
//!
//! Runs every tool call from one assistant message and appends the
//! resulting tool responses to the in-flight message buffer.

use mercurio_llm::util::truncate_safe;
use mercurio_llm::{Message, ToolCall};
use serde_json::json;
use tracing::{debug, error, info};

use super::core::SalesAgent;

/// Marker appended to oversized tool results.
pub(crate) const TRUNCATION_MARKER: &str = "... [resultado truncado]";

const ARGS_PREVIEW_CHARS: usize = 150;
const RESULT_PREVIEW_CHARS: usize = 200;

impl SalesAgent {
    /// Executes one round of tool calls, pushing one tool response per call.
    ///
    /// Calls whose arguments are not valid JSON get an inline error payload
    /// and are not recorded in `tools_used`. Execution failures surface
    /// through the tool outcome envelope, so every executed call is recorded.
    pub(crate) async fn run_tool_round(
        &self,
        calls: &[ToolCall],
        tool_messages: &mut Vec<Message>,
        tools_used: &mut Vec<String>,
    ) {
        for call in calls {
            let arguments: serde_json::Value = match serde_json::from_str(&call.arguments) {
                Ok(value) => value,
                Err(err) => {
                    error!(tool = %call.name, error = %err, "invalid JSON arguments in tool call");
                    tool_messages.push(Message::tool_response(
                        &call.id,
                        json!({"error": "Invalid JSON arguments"}).to_string(),
                    ));
                    continue;
                }
            };

            debug!(
                tool = %call.name,
                args = truncate_safe(&call.arguments, ARGS_PREVIEW_CHARS),
                "executing tool"
            );

            let outcome = self.catalog.execute(&call.name, arguments).await;
            tools_used.push(format!("{} (MCP)", call.name));

            let rendered = outcome.render();
            debug!(
                tool = %call.name,
                result = truncate_safe(&rendered, RESULT_PREVIEW_CHARS),
                "tool finished"
            );

            tool_messages.push(Message::tool_response(&call.id, self.clamp_result(&call.name, rendered)));
        }
    }

    /// Caps a rendered tool result at the configured character budget.
    fn clamp_result(&self, tool: &str, rendered: String) -> String {
        let max_chars = self.config.max_tool_result_chars;
        let kept = truncate_safe(&rendered, max_chars);
        if kept.len() == rendered.len() {
            return rendered;
        }

        info!(
            tool,
            chars = rendered.chars().count(),
            max_chars,
            "tool result truncated"
        );
        format!("{kept}{TRUNCATION_MARKER}")
    }
}
