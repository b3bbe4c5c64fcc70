//! Interactive chat command
//!
//! `mercurio chat`            — interactive session against the sales agent
//! `mercurio chat -m "..."`   — answer one message and exit
//!
//! Transcripts are keyed by `--session` and persisted in Postgres, so a
//! session picks up where it left off.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use mercurio_core::{ConversationStore, PgHistory, SalesAgent};
use mercurio_llm::{DeepSeekProvider, MessageRole};
use mercurio_mail::{Mailer, MailerConfig};
use mercurio_store::{create_pool, ProductRepository, ProductService};
use mercurio_tools::{ToolCatalog, ToolContext};
use tracing::{info, warn};

use crate::adapters::{MailNotifier, StoreCatalog};

/// Run the chat command.
pub async fn run(session: String, message: Option<String>) -> Result<()> {
    let provider =
        Arc::new(DeepSeekProvider::from_env().context("completion provider not configured")?);

    let pool = create_pool(&super::database_url()?)
        .await
        .context("cannot connect to Postgres")?;

    let repository = ProductRepository::new(pool.clone());
    repository
        .init_schema()
        .await
        .context("cannot initialize product schema")?;
    let service = ProductService::new(repository);

    let mut context = ToolContext::new(Arc::new(StoreCatalog::new(service)));
    match MailerConfig::from_env() {
        Ok(config) => {
            let mailer = Mailer::new(&config).context("cannot build SMTP transport")?;
            context = context.with_notifier(Arc::new(MailNotifier::new(mailer)));
        }
        Err(err) => {
            warn!(error = %err, "mailer not configured, sale confirmation emails disabled");
        }
    }

    let catalog = Arc::new(ToolCatalog::builtin(context)?);
    let agent = SalesAgent::new(provider, catalog);

    let history = PgHistory::new(pool);
    history
        .init_schema()
        .await
        .context("cannot initialize chat history schema")?;

    info!(session, "chat session ready");
    match message {
        Some(message) => turn(&agent, &history, &session, &message).await,
        None => repl(&agent, &history, &session).await,
    }
}

async fn repl(agent: &SalesAgent, history: &PgHistory, session: &str) -> Result<()> {
    println!("Sesión '{session}'. Escribe tu mensaje, o 'salir' para terminar.");
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("salir") || input.eq_ignore_ascii_case("exit") {
            break;
        }

        turn(agent, history, session, input).await?;
    }
    Ok(())
}

/// One user turn: load the transcript, run the agent, persist both sides.
///
/// The transcript is read before the user message is stored so the model
/// sees the input exactly once. Tool traffic is never persisted.
async fn turn(agent: &SalesAgent, history: &PgHistory, session: &str, input: &str) -> Result<()> {
    let transcript = history.history(session).await?;
    history
        .append(session, MessageRole::User, input, None)
        .await?;

    let result = agent.process(input, &transcript).await;
    if !result.success {
        eprintln!("Error: {}", result.message);
        return Ok(());
    }

    history
        .append(
            session,
            MessageRole::Assistant,
            &result.message,
            Some(&result.tools_used),
        )
        .await?;

    println!("{}", result.message);
    if !result.tools_used.is_empty() {
        println!("  [{}]", result.tools_used.join(", "));
    }
    Ok(())
}
