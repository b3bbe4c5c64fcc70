//! CLI module for Mercurio
//!
//! Provides the commands:
//! - `chat`: interactive sales conversation
//! - `seed`: bulk product import from a JSON file
//! - `history`: inspect or clear a session transcript
//! - `tools`: print the tool schemas advertised to the model

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

pub mod chat;
pub mod history;
pub mod seed;
pub mod tools;

/// Mercurio sales agent CLI
#[derive(Parser, Debug)]
#[command(name = "mercurio")]
#[command(about = "Conversational sales agent with product search tools")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with the sales agent
    Chat {
        /// Session identifier for conversation history
        #[arg(long, default_value = "default")]
        session: String,
        /// Answer a single message instead of starting an interactive session
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Import products from a JSON file
    Seed {
        /// Path to a JSON array of products
        #[arg(long)]
        file: std::path::PathBuf,
    },
    /// Show or clear a session transcript
    History {
        /// Session identifier
        #[arg(long, default_value = "default")]
        session: String,
        /// Delete the transcript instead of printing it
        #[arg(long)]
        clear: bool,
    },
    /// List the tool schemas advertised to the model
    Tools,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Chat { session, message }) => chat::run(session, message).await,
        Some(Commands::Seed { file }) => seed::run(file).await,
        Some(Commands::History { session, clear }) => history::run(session, clear).await,
        Some(Commands::Tools) => tools::run().await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

pub(crate) fn database_url() -> Result<String> {
    std::env::var("DATABASE_URL").context("DATABASE_URL not set")
}
