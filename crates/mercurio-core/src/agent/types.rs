use serde::{Deserialize, Serialize};

/// Token spend for one completion request within a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStep {
    /// Label for the request, e.g. `"Initial request"` or
    /// `"Tool iteration 2 (searchProducts)"`.
    pub step: String,
    /// Prompt tokens consumed by this request.
    pub prompt_tokens: u32,
    /// Completion tokens produced by this request.
    pub completion_tokens: u32,
    /// Sum of prompt and completion tokens.
    pub total_tokens: u32,
}

/// Aggregated token spend for a whole turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageTotals {
    /// Prompt tokens across every request in the turn.
    pub prompt_tokens: u32,
    /// Completion tokens across every request in the turn.
    pub completion_tokens: u32,
    /// Sum of prompt and completion tokens across the turn.
    pub total_tokens: u32,
    /// Per-request breakdown in request order.
    pub breakdown: Vec<UsageStep>,
}

/// Outcome of one conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResult {
    /// Whether the turn produced a reply.
    pub success: bool,
    /// Reply text, or an error description when `success` is false.
    pub message: String,
    /// Labels of the tools executed during the turn.
    pub tools_used: Vec<String>,
    /// Token accounting, absent on failed turns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageTotals>,
}

impl TurnResult {
    /// Builds a failed turn carrying only an error description.
    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            tools_used: Vec::new(),
            usage: None,
        }
    }
}
