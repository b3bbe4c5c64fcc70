//! Conversation history persistence.
//!
//! Messages are stored one row per message as JSONB documents shaped like
//! `{"type": "human", "content": "...", "additional_kwargs": {}, "response_metadata": {}}`,
//! so existing LangChain-style chat tables remain readable. Only user input and
//! final assistant replies are persisted; intermediate tool traffic is not.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mercurio_llm::{Message, MessageRole};
use sqlx::PgPool;
use tracing::{debug, info};

use crate::error::Result;

/// Upper bound on messages loaded for a single session.
pub const HISTORY_FETCH_LIMIT: i64 = 100;

/// Storage backend for per-session chat transcripts.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Appends one message to a session transcript.
    ///
    /// `tools_used` is recorded as presentation metadata on assistant
    /// messages and ignored for other roles.
    async fn append(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
        tools_used: Option<&[String]>,
    ) -> Result<()>;

    /// Loads a session transcript in chronological order.
    async fn history(&self, session_id: &str) -> Result<Vec<Message>>;

    /// Deletes every message belonging to a session.
    async fn clear(&self, session_id: &str) -> Result<()>;
}

/// Stored wire form of one chat message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct ChatRecord {
    #[serde(rename = "type")]
    kind: String,
    content: String,
    #[serde(default)]
    additional_kwargs: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    response_metadata: serde_json::Map<String, serde_json::Value>,
}

impl ChatRecord {
    fn new(role: MessageRole, content: &str, tools_used: Option<&[String]>) -> Self {
        let kind = match role {
            MessageRole::User => "human",
            MessageRole::Assistant => "ai",
            _ => "system",
        };
        let mut additional_kwargs = serde_json::Map::new();
        if role == MessageRole::Assistant {
            if let Some(tools) = tools_used {
                if !tools.is_empty() {
                    additional_kwargs
                        .insert("toolsUsed".to_string(), serde_json::json!(tools));
                }
            }
        }
        Self {
            kind: kind.to_string(),
            content: content.to_string(),
            additional_kwargs,
            response_metadata: serde_json::Map::new(),
        }
    }

    fn into_message(self) -> Message {
        match self.kind.as_str() {
            "human" => Message::user(self.content),
            "ai" => Message::assistant(self.content),
            _ => Message::system(self.content),
        }
    }
}

/// In-memory store for tests and single-process runs without Postgres.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    sessions: Mutex<HashMap<String, Vec<ChatRecord>>>,
}

impl MemoryHistory {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryHistory {
    async fn append(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
        tools_used: Option<&[String]>,
    ) -> Result<()> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions
            .entry(session_id.to_string())
            .or_default()
            .push(ChatRecord::new(role, content, tools_used));
        Ok(())
    }

    async fn history(&self, session_id: &str) -> Result<Vec<Message>> {
        let sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(sessions
            .get(session_id)
            .map(|records| {
                records
                    .iter()
                    .take(HISTORY_FETCH_LIMIT as usize)
                    .cloned()
                    .map(ChatRecord::into_message)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn clear(&self, session_id: &str) -> Result<()> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions.remove(session_id);
        Ok(())
    }
}

/// Postgres-backed store over the `chat_messages` table.
pub struct PgHistory {
    pool: PgPool,
}

impl PgHistory {
    /// Wraps an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `chat_messages` table and its session index.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chat_messages (
                id BIGSERIAL PRIMARY KEY,
                session_id TEXT NOT NULL,
                message JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_chat_messages_session_id
             ON chat_messages (session_id)",
        )
        .execute(&self.pool)
        .await?;

        info!("chat history schema initialized");
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for PgHistory {
    async fn append(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
        tools_used: Option<&[String]>,
    ) -> Result<()> {
        let record = ChatRecord::new(role, content, tools_used);
        let message = serde_json::to_value(&record)?;

        sqlx::query("INSERT INTO chat_messages (session_id, message) VALUES ($1, $2)")
            .bind(session_id)
            .bind(message)
            .execute(&self.pool)
            .await?;

        debug!(session_id, role = role.as_str(), "conversation message stored");
        Ok(())
    }

    async fn history(&self, session_id: &str) -> Result<Vec<Message>> {
        let rows: Vec<serde_json::Value> = sqlx::query_scalar(
            "SELECT message FROM chat_messages
             WHERE session_id = $1
             ORDER BY created_at ASC, id ASC
             LIMIT $2",
        )
        .bind(session_id)
        .bind(HISTORY_FETCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in rows {
            let record: ChatRecord = serde_json::from_value(row)?;
            messages.push(record.into_message());
        }
        Ok(messages)
    }

    async fn clear(&self, session_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM chat_messages WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        debug!(session_id, "conversation history cleared");
        Ok(())
    }
}
