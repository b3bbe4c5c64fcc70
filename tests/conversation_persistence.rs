//! Transcript persistence across turns, mirroring the chat command flow.

use std::sync::Arc;

use mercurio_core::{ConversationStore, MemoryHistory, SalesAgent, TurnResult};
use mercurio_llm::{Error as LlmError, MessageRole, MockProvider, TokenUsage, ToolCall};
use mercurio_tools::{
    Error as ToolError, ProductCatalog, ProductView, Result as ToolResult, ToolCatalog,
    ToolContext,
};
use serde_json::json;

struct NoProducts;

#[async_trait::async_trait]
impl ProductCatalog for NoProducts {
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
        Err(ToolError::Execution("Producto no encontrado".to_string()))
    }
}

fn agent(provider: &Arc<MockProvider>) -> SalesAgent {
    let context = ToolContext::new(Arc::new(NoProducts));
    SalesAgent::new(
        provider.clone(),
        Arc::new(ToolCatalog::builtin(context).unwrap()),
    )
}

fn usage(prompt: u32, completion: u32) -> Option<TokenUsage> {
    Some(TokenUsage {
        prompt_tokens: prompt,
        completion_tokens: completion,
        total_tokens: prompt + completion,
    })
}

/// Mirrors the chat command: load the transcript, store the user message,
/// run the agent, and store the reply only when the turn succeeded.
async fn run_turn(
    agent: &SalesAgent,
    store: &MemoryHistory,
    session: &str,
    input: &str,
) -> TurnResult {
    let transcript = store.history(session).await.unwrap();
    store
        .append(session, MessageRole::User, input, None)
        .await
        .unwrap();

    let result = agent.process(input, &transcript).await;
    if result.success {
        store
            .append(
                session,
                MessageRole::Assistant,
                &result.message,
                Some(&result.tools_used),
            )
            .await
            .unwrap();
    }
    result
}

#[tokio::test]
async fn second_turn_carries_the_first_exchange() {
    let provider = Arc::new(MockProvider::new());
    provider.push_content("¡Hola! ¿Qué estás buscando?", usage(50, 12));
    provider.push_content("Tenemos varios monitores.", usage(90, 10));

    let agent = agent(&provider);
    let store = MemoryHistory::default();

    // 1. Two consecutive turns on the same session
    run_turn(&agent, &store, "ventas-1", "hola").await;
    run_turn(&agent, &store, "ventas-1", "busco un monitor").await;

    // 2. The second request replays the first exchange before the new input
    let requests = provider.recorded_requests();
    assert_eq!(requests.len(), 2);
    let messages = &requests[1].messages;
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].role, MessageRole::System);
    assert_eq!(messages[1].role, MessageRole::User);
    assert_eq!(messages[1].content, "hola");
    assert_eq!(messages[2].role, MessageRole::Assistant);
    assert_eq!(messages[2].content, "¡Hola! ¿Qué estás buscando?");
    assert_eq!(messages[3].role, MessageRole::User);
    assert_eq!(messages[3].content, "busco un monitor");
}

#[tokio::test]
async fn tool_traffic_is_never_persisted() {
    let provider = Arc::new(MockProvider::new());
    provider.push_tool_calls(
        vec![ToolCall {
            id: "call_1".to_string(),
            name: "searchProducts".to_string(),
            arguments: json!({"keywords": ["monitor"]}).to_string(),
        }],
        usage(100, 12),
    );
    provider.push_content("No tenemos monitores por ahora.", usage(210, 16));
    provider.push_content("Tampoco en blanco, lo siento.", usage(120, 12));

    let agent = agent(&provider);
    let store = MemoryHistory::default();

    // 1. First turn runs a tool round, second turn is plain
    run_turn(&agent, &store, "ventas-1", "busco un monitor").await;
    run_turn(&agent, &store, "ventas-1", "¿y en blanco?").await;

    // 2. The follow-up request carries only clean role/content pairs
    let requests = provider.recorded_requests();
    assert_eq!(requests.len(), 3);
    let messages = &requests[2].messages;
    assert_eq!(messages.len(), 4);
    for message in messages {
        assert!(message.tool_calls.is_none());
        assert!(message.tool_call_id.is_none());
    }
    assert_eq!(messages[2].role, MessageRole::Assistant);
    assert_eq!(messages[2].content, "No tenemos monitores por ahora.");
}

#[tokio::test]
async fn sessions_do_not_leak_into_each_other() {
    let provider = Arc::new(MockProvider::new());
    provider.push_content("Hola desde la primera sesión.", usage(40, 9));
    provider.push_content("Hola desde la segunda sesión.", usage(40, 9));

    let agent = agent(&provider);
    let store = MemoryHistory::default();

    run_turn(&agent, &store, "ventas-1", "hola").await;
    run_turn(&agent, &store, "ventas-2", "hola").await;

    // Each session starts empty: system prompt plus the user message only
    let requests = provider.recorded_requests();
    assert_eq!(requests[0].messages.len(), 2);
    assert_eq!(requests[1].messages.len(), 2);
}

#[tokio::test]
async fn failed_turns_keep_the_user_message_only() {
    let provider = Arc::new(MockProvider::new());
    provider.push_error(LlmError::Transient {
        status: 503,
        message: "overloaded".to_string(),
    });

    let agent = agent(&provider);
    let store = MemoryHistory::default();

    let result = run_turn(&agent, &store, "ventas-1", "hola").await;
    assert!(!result.success);
    assert_eq!(result.message, "transient api error (status 503): overloaded");

    // The user message stays so a retry still has the input on record
    let transcript = store.history("ventas-1").await.unwrap();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].role, MessageRole::User);
    assert_eq!(transcript[0].content, "hola");
}
