use crate::agent::prompt::DEFAULT_SYSTEM_PROMPT;

/// Maximum number of tool rounds in a single turn.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Number of trailing history messages included in each request.
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

/// Tool results longer than this are truncated before the model sees them.
pub const DEFAULT_MAX_TOOL_RESULT_CHARS: usize = 5000;

/// Tunables for [`SalesAgent`](crate::agent::SalesAgent).
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model identifier; empty selects the provider default.
    pub model: String,
    /// Sampling temperature forwarded to the provider.
    pub temperature: Option<f32>,
    /// Completion token cap forwarded to the provider.
    pub max_tokens: Option<u32>,
    /// System prompt placed first in every request.
    pub system_prompt: String,
    /// Hard cap on tool rounds per turn.
    pub max_iterations: usize,
    /// How many trailing history messages to include.
    pub history_window: usize,
    /// Character budget for a single tool result.
    pub max_tool_result_chars: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: None,
            max_tokens: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            history_window: DEFAULT_HISTORY_WINDOW,
            max_tool_result_chars: DEFAULT_MAX_TOOL_RESULT_CHARS,
        }
    }
}

impl AgentConfig {
    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the completion token cap.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Replaces the system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Sets the tool round cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the history window size.
    #[must_use]
    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    /// Sets the per-result character budget.
    #[must_use]
    pub fn with_max_tool_result_chars(mut self, max_chars: usize) -> Self {
        self.max_tool_result_chars = max_chars;
        self
    }
}
