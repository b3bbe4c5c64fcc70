//! Agent loop tests against the mock provider.

use std::sync::Arc;

use mercurio_llm::{
    Error as LlmError, Message, MessageRole, MockProvider, TokenUsage, ToolCall,
};
use mercurio_tools::{
    Error as ToolError, ParamSchema, ProductCatalog, ProductView, Result as ToolResult, Tool,
    ToolCatalog, ToolContext, ToolName, ToolRegistry,
};
use serde_json::{json, Value};

use super::core::SalesAgent;
use super::sanitize::{EMPTY_RESPONSE_FALLBACK, PROCESSING_FALLBACK};
use super::tool_execution::TRUNCATION_MARKER;

struct EmptyCatalog;

#[async_trait::async_trait]
impl ProductCatalog for EmptyCatalog {
    async fn search_products(
        &self,
        _keywords: &[String],
        _limit: i64,
        _min_stock: Option<i32>,
    ) -> ToolResult<Vec<ProductView>> {
        Ok(Vec::new())
    }

    async fn product_by_identifier(
        &self,
        _code: Option<&str>,
        _reference: Option<&str>,
    ) -> ToolResult<ProductView> {
        Err(ToolError::Execution("Producto no encontrado: X".to_string()))
    }
}

struct CannedTool {
    name: ToolName,
    payload: Value,
}

#[async_trait::async_trait]
impl Tool for CannedTool {
    fn name(&self) -> ToolName {
        self.name
    }

    fn description(&self) -> &str {
        "returns a canned payload"
    }

    fn schema(&self) -> ParamSchema {
        ParamSchema::object()
    }

    async fn execute(&self, _args: Value, _ctx: &ToolContext) -> ToolResult<Value> {
        Ok(self.payload.clone())
    }
}

struct FailingTool;

#[async_trait::async_trait]
impl Tool for FailingTool {
    fn name(&self) -> ToolName {
        ToolName::GetProduct
    }

    fn description(&self) -> &str {
        "always fails"
    }

    fn schema(&self) -> ParamSchema {
        ParamSchema::object()
    }

    async fn execute(&self, _args: Value, _ctx: &ToolContext) -> ToolResult<Value> {
        Err(ToolError::Execution("DB down".to_string()))
    }
}

fn usage(prompt: u32, completion: u32) -> Option<TokenUsage> {
    Some(TokenUsage {
        prompt_tokens: prompt,
        completion_tokens: completion,
        total_tokens: prompt + completion,
    })
}

fn call(id: &str, name: &str, arguments: &str) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments: arguments.to_string(),
    }
}

fn catalog_with(tools: Vec<Arc<dyn Tool>>) -> Arc<ToolCatalog> {
    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(tool).unwrap();
    }
    Arc::new(ToolCatalog::new(
        registry,
        ToolContext::new(Arc::new(EmptyCatalog)),
    ))
}

fn search_catalog(payload: Value) -> Arc<ToolCatalog> {
    catalog_with(vec![Arc::new(CannedTool {
        name: ToolName::SearchProducts,
        payload,
    })])
}

#[tokio::test]
async fn content_turn_reports_initial_usage() {
    let provider = Arc::new(MockProvider::new());
    provider.push_content("¡Hola! ¿En qué puedo ayudarte?", usage(100, 20));

    let agent = SalesAgent::new(provider.clone(), search_catalog(json!([])));
    let result = agent.process("hola", &[]).await;

    assert!(result.success);
    assert_eq!(result.message, "¡Hola! ¿En qué puedo ayudarte?");
    assert!(result.tools_used.is_empty());

    let totals = result.usage.unwrap();
    assert_eq!(totals.prompt_tokens, 100);
    assert_eq!(totals.completion_tokens, 20);
    assert_eq!(totals.total_tokens, 120);
    assert_eq!(totals.breakdown.len(), 1);
    assert_eq!(totals.breakdown[0].step, "Initial request");

    let requests = provider.recorded_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages.len(), 2);
    assert_eq!(requests[0].messages[0].role, MessageRole::System);
    assert_eq!(requests[0].messages[1].content, "hola");
    assert!(!requests[0].tools.is_empty());
}

#[tokio::test]
async fn tool_round_feeds_result_back() {
    let provider = Arc::new(MockProvider::new());
    provider.push_tool_calls(
        vec![call("call_1", "searchProducts", r#"{"keywords":["teclado"]}"#)],
        usage(120, 15),
    );
    provider.push_content("Tenemos un teclado mecánico RGB en stock.", usage(400, 30));

    let payload = json!([{"reference": "TEC-01", "stock": 5}]);
    let agent = SalesAgent::new(provider.clone(), search_catalog(payload.clone()));
    let result = agent.process("necesito un teclado mecánico", &[]).await;

    assert!(result.success);
    assert_eq!(result.message, "Tenemos un teclado mecánico RGB en stock.");
    assert_eq!(result.tools_used, vec!["searchProducts (MCP)".to_string()]);

    let totals = result.usage.unwrap();
    assert_eq!(totals.breakdown.len(), 2);
    assert_eq!(totals.breakdown[1].step, "Tool iteration 1 (searchProducts)");
    assert_eq!(totals.prompt_tokens, 520);
    assert_eq!(totals.completion_tokens, 45);
    assert_eq!(totals.total_tokens, 565);

    let requests = provider.recorded_requests();
    assert_eq!(requests.len(), 2);
    assert!(!requests[1].tools.is_empty());

    // system + user + assistant tool calls + tool result
    let follow_up = &requests[1].messages;
    assert_eq!(follow_up.len(), 4);
    assert_eq!(follow_up[2].role, MessageRole::Assistant);
    assert_eq!(follow_up[3].role, MessageRole::Tool);
    assert_eq!(follow_up[3].tool_call_id.as_deref(), Some("call_1"));
    assert_eq!(follow_up[3].content, payload.to_string());
}

#[tokio::test]
async fn malformed_arguments_answer_inline_without_execution() {
    let provider = Arc::new(MockProvider::new());
    provider.push_tool_calls(vec![call("call_1", "searchProducts", "not json")], usage(80, 10));
    provider.push_content("¿Me das más detalles de lo que buscas?", usage(150, 12));

    let agent = SalesAgent::new(provider.clone(), search_catalog(json!([])));
    let result = agent.process("busca algo", &[]).await;

    assert!(result.success);
    assert!(result.tools_used.is_empty());

    let requests = provider.recorded_requests();
    let tool_reply = &requests[1].messages[3];
    assert_eq!(tool_reply.role, MessageRole::Tool);
    assert_eq!(tool_reply.tool_call_id.as_deref(), Some("call_1"));
    assert_eq!(tool_reply.content, r#"{"error":"Invalid JSON arguments"}"#);
}

#[tokio::test]
async fn handler_failure_is_enveloped_and_loop_continues() {
    let provider = Arc::new(MockProvider::new());
    provider.push_tool_calls(
        vec![call("call_9", "getProduct", r#"{"code":"ABC"}"#)],
        usage(90, 9),
    );
    provider.push_content("No pude consultar ese producto ahora mismo.", usage(200, 18));

    let agent = SalesAgent::new(provider.clone(), catalog_with(vec![Arc::new(FailingTool)]));
    let result = agent.process("dame el producto ABC", &[]).await;

    assert!(result.success);
    assert_eq!(result.message, "No pude consultar ese producto ahora mismo.");
    assert_eq!(result.tools_used, vec!["getProduct (MCP)".to_string()]);

    let requests = provider.recorded_requests();
    let envelope: Value = serde_json::from_str(&requests[1].messages[3].content).unwrap();
    assert_eq!(envelope["success"], json!(false));
    assert_eq!(envelope["error"], json!("DB down"));
    assert_eq!(envelope["toolName"], json!("getProduct"));
}

#[tokio::test]
async fn iteration_cap_stops_the_loop() {
    let provider = Arc::new(MockProvider::new());
    for round in 0..11 {
        provider.push_tool_calls(
            vec![call(&format!("call_{round}"), "searchProducts", "{}")],
            usage(50, 5),
        );
    }

    let agent = SalesAgent::new(provider.clone(), search_catalog(json!([])));
    let result = agent.process("busca teclados", &[]).await;

    assert!(result.success);
    assert_eq!(result.message, PROCESSING_FALLBACK);
    assert_eq!(result.tools_used.len(), 10);
    assert_eq!(provider.recorded_requests().len(), 11);
    assert_eq!(result.usage.unwrap().breakdown.len(), 11);
}

#[tokio::test]
async fn empty_reply_asks_user_to_retry() {
    let provider = Arc::new(MockProvider::new());
    provider.push_content("", usage(40, 0));

    let agent = SalesAgent::new(provider.clone(), search_catalog(json!([])));
    let result = agent.process("hola", &[]).await;

    assert!(result.success);
    assert_eq!(result.message, EMPTY_RESPONSE_FALLBACK);
    assert!(result.tools_used.is_empty());
}

#[tokio::test]
async fn technical_markers_are_stripped() {
    let provider = Arc::new(MockProvider::new());
    provider.push_content(
        "Claro<｜tool▁calls▁begin｜>internal<｜tool▁calls▁end｜>, tenemos 3 opciones.\n\n\n[searchProducts(keywords: \"teclado\")]",
        usage(60, 12),
    );

    let agent = SalesAgent::new(provider.clone(), search_catalog(json!([])));
    let result = agent.process("hola", &[]).await;

    assert_eq!(result.message, "Claro, tenemos 3 opciones.");
}

#[tokio::test]
async fn provider_error_becomes_failed_turn() {
    let provider = Arc::new(MockProvider::new());
    provider.push_error(LlmError::Fatal {
        status: 401,
        message: "Unauthorized".to_string(),
    });

    let agent = SalesAgent::new(provider.clone(), search_catalog(json!([])));
    let result = agent.process("hola", &[]).await;

    assert!(!result.success);
    assert_eq!(result.message, "fatal api error (status 401): Unauthorized");
    assert!(result.tools_used.is_empty());
    assert!(result.usage.is_none());
}

#[tokio::test]
async fn history_window_keeps_last_twenty_messages() {
    let provider = Arc::new(MockProvider::new());
    provider.push_content("ok", usage(10, 2));

    let mut history = Vec::new();
    for index in 0..25 {
        history.push(Message::user(format!("mensaje {index}")));
    }

    let agent = SalesAgent::new(provider.clone(), search_catalog(json!([])));
    agent.process("el último", &history).await;

    let requests = provider.recorded_requests();
    // system + 20 trailing history messages + current input
    assert_eq!(requests[0].messages.len(), 22);
    assert_eq!(requests[0].messages[1].content, "mensaje 5");
    assert_eq!(requests[0].messages[21].content, "el último");
}

#[tokio::test]
async fn oversized_tool_result_is_truncated() {
    let provider = Arc::new(MockProvider::new());
    provider.push_tool_calls(vec![call("call_1", "searchProducts", "{}")], usage(30, 3));
    provider.push_content("listo", usage(90, 6));

    let agent = SalesAgent::new(
        provider.clone(),
        search_catalog(Value::String("x".repeat(6000))),
    );
    agent.process("busca", &[]).await;

    let requests = provider.recorded_requests();
    let forwarded = &requests[1].messages[3].content;
    assert_eq!(forwarded.len(), 5000 + TRUNCATION_MARKER.len());
    assert!(forwarded.starts_with(&"x".repeat(5000)));
    assert!(forwarded.ends_with(TRUNCATION_MARKER));
}
