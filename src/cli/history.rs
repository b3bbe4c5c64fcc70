//! Transcript inspection command
//!
//! `mercurio history --session X`          — print a session transcript
//! `mercurio history --session X --clear`  — delete it

use anyhow::{Context, Result};
use mercurio_core::{ConversationStore, PgHistory};
use mercurio_store::create_pool;

/// Run the history command.
pub async fn run(session: String, clear: bool) -> Result<()> {
    let pool = create_pool(&super::database_url()?)
        .await
        .context("cannot connect to Postgres")?;

    let history = PgHistory::new(pool);
    history
        .init_schema()
        .await
        .context("cannot initialize chat history schema")?;

    if clear {
        history.clear(&session).await?;
        println!("Historial de '{session}' eliminado.");
        return Ok(());
    }

    let messages = history.history(&session).await?;
    if messages.is_empty() {
        println!("Sin mensajes para '{session}'.");
        return Ok(());
    }
    for message in messages {
        println!("[{}] {}", message.role.as_str(), message.content);
    }
    Ok(())
}
