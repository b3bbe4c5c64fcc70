//! DeepSeek completion provider (OpenAI-compatible API)
//!
//! The sales agent runs against DeepSeek's chat-completions endpoint. The
//! provider retries transient HTTP statuses (404, 429, 500, 502, 503) with
//! exponential backoff before giving up; everything else fails the request
//! immediately.

use crate::completion::{
    Completion, CompletionOutcome, CompletionRequest, TokenUsage, ToolCall, ToolChoice, ToolSchema,
};
use crate::error::{Error, Result};
use crate::message::Message;
use crate::provider::CompletionProvider;
use crate::util::{mask_api_key, truncate_safe};
use mercurio_retry::RetryPolicy;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// DeepSeek API base URL
pub const DEEPSEEK_API_BASE: &str = "https://api.deepseek.com/v1";

/// Default DeepSeek model
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Default retry attempts against the completion endpoint
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay between completion retries
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(2000);

/// DeepSeek provider configuration
#[derive(Clone)]
pub struct DeepSeekConfig {
    /// API key
    pub api_key: String,
    /// Base URL
    pub base_url: String,
    /// Default model
    pub default_model: String,
    /// Request timeout
    pub timeout: Duration,
    /// Retry attempts for transient statuses
    pub max_attempts: u32,
    /// Base delay for the retry backoff curve
    pub retry_base_delay: Duration,
}

// SECURITY: Custom Debug implementation to mask API key
impl fmt::Debug for DeepSeekConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepSeekConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("timeout", &self.timeout)
            .field("max_attempts", &self.max_attempts)
            .field("retry_base_delay", &self.retry_base_delay)
            .finish()
    }
}

impl DeepSeekConfig {
    /// Create a new configuration with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEEPSEEK_API_BASE.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DEEPSEEK_API_KEY")
            .map_err(|_| Error::NotConfigured("DEEPSEEK_API_KEY not set".to_string()))?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("DEEPSEEK_MODEL") {
            config.default_model = model;
        }
        if let Ok(base_url) = std::env::var("DEEPSEEK_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }

    /// Set the default model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry attempt budget
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the retry base delay
    #[must_use]
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}

/// Sanitize API error messages
fn sanitize_api_error(error: &str) -> String {
    let lower = error.to_lowercase();

    if lower.contains("api key")
        || lower.contains("apikey")
        || lower.contains("invalid key")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
    {
        return "API authentication error. Please check your DEEPSEEK_API_KEY.".to_string();
    }

    if lower.contains("rate limit") || lower.contains("quota") {
        return "DeepSeek rate limit exceeded. Please try again later.".to_string();
    }

    if error.len() > 300 {
        format!("{}...(truncated)", truncate_safe(error, 300))
    } else {
        error.to_string()
    }
}

/// DeepSeek provider (OpenAI-compatible)
pub struct DeepSeekProvider {
    client: Client,
    config: DeepSeekConfig,
    retry: RetryPolicy,
}

// OpenAI-compatible request/response types
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ChatTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ChatToolCallOut>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Serialize)]
struct ChatToolCallOut {
    id: String,
    r#type: String,
    function: ChatFunctionCallOut,
}

#[derive(Serialize)]
struct ChatFunctionCallOut {
    name: String,
    arguments: String,
}

#[derive(Serialize)]
struct ChatTool {
    r#type: String,
    function: ChatFunction,
}

#[derive(Serialize)]
struct ChatFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
    model: String,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ChatToolCall>>,
}

#[derive(Deserialize)]
struct ChatToolCall {
    id: String,
    function: ChatToolCallFunction,
}

#[derive(Deserialize)]
struct ChatToolCallFunction {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl DeepSeekProvider {
    /// Create a new DeepSeek provider
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: DeepSeekConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Http(format!("failed to create HTTP client: {e}")))?;

        let retry = RetryPolicy::new()
            .with_max_attempts(config.max_attempts)
            .with_initial_delay(config.retry_base_delay);

        Ok(Self {
            client,
            config,
            retry,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(DeepSeekConfig::from_env()?)
    }

    fn convert_message(msg: &Message) -> ChatMessage {
        ChatMessage {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
            tool_calls: msg.tool_calls.as_ref().map(|calls| {
                calls
                    .iter()
                    .map(|call| ChatToolCallOut {
                        id: call.id.clone(),
                        r#type: "function".to_string(),
                        function: ChatFunctionCallOut {
                            name: call.name.clone(),
                            arguments: call.arguments.clone(),
                        },
                    })
                    .collect()
            }),
            tool_call_id: msg.tool_call_id.clone(),
        }
    }

    fn convert_tool(tool: &ToolSchema) -> ChatTool {
        ChatTool {
            r#type: "function".to_string(),
            function: ChatFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        }
    }

    fn convert_tool_choice(choice: &ToolChoice) -> serde_json::Value {
        match choice {
            ToolChoice::Auto => serde_json::json!("auto"),
            ToolChoice::None => serde_json::json!("none"),
            ToolChoice::Required => serde_json::json!("required"),
        }
    }

    fn to_wire(&self, request: &CompletionRequest) -> ChatRequest {
        let model = if request.model.is_empty() {
            self.config.default_model.clone()
        } else {
            request.model.clone()
        };

        let (tools, tool_choice) = if request.tools.is_empty() {
            (None, None)
        } else {
            (
                Some(request.tools.iter().map(Self::convert_tool).collect()),
                Some(Self::convert_tool_choice(&request.tool_choice)),
            )
        };

        ChatRequest {
            model,
            messages: request.messages.iter().map(Self::convert_message).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            tools,
            tool_choice,
        }
    }

    fn normalize(response: ChatResponse) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponse("no choices in response".to_string()))?;

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let tool_calls: Vec<ToolCall> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let outcome = if tool_calls.is_empty() {
            CompletionOutcome::Content {
                text: choice.message.content.unwrap_or_default(),
            }
        } else {
            CompletionOutcome::ToolCalls {
                content: choice.message.content,
                calls: tool_calls,
            }
        };

        Ok(Completion {
            outcome,
            usage,
            model: response.model,
        })
    }

    async fn send_once(&self, chat_request: &ChatRequest) -> Result<Completion> {
        debug!(model = %chat_request.model, "sending completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(chat_request)
            .send()
            .await
            .map_err(|e| Error::Http(sanitize_api_error(&e.to_string())))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::from_status(status, sanitize_api_error(&error_text)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        Self::normalize(chat_response)
    }
}

#[async_trait::async_trait]
impl CompletionProvider for DeepSeekProvider {
    fn name(&self) -> &str {
        "deepseek"
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model, tools = request.tools.len()))]
    async fn complete(&self, request: CompletionRequest) -> Result<Completion> {
        let chat_request = self.to_wire(&request);

        let result = mercurio_retry::retry(
            &self.retry,
            || self.send_once(&chat_request),
            Error::is_transient,
        )
        .await;

        match result {
            Ok(completion) => {
                debug!(
                    tool_calls = completion.tool_calls().len(),
                    prompt_tokens = completion.usage.map_or(0, |u| u.prompt_tokens),
                    completion_tokens = completion.usage.map_or(0, |u| u.completion_tokens),
                    "completion received"
                );
                Ok(completion)
            }
            Err(retry_err) if retry_err.fatal => Err(retry_err.last_error),
            Err(retry_err) => {
                warn!(attempts = retry_err.attempts, "completion retries exhausted");
                Err(Error::RetriesExhausted {
                    attempts: retry_err.attempts,
                    message: retry_err.last_error.to_string(),
                })
            }
        }
    }
}
