use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use soccerfan::config::loader::parse_positive;
use soccerfan::config::{CliOverrides, load_config};
use soccerfan::conversation::ConversationEngine;
use soccerfan::repl::{DEFAULT_SESSION_ID, Repl};

#[derive(Parser, Debug)]
#[command(name = "soccerfan")]
#[command(about = "soccerfan - Chat with an opinionated soccer fan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Model id to use instead of the configured one
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Keep at most this many turns per session
    #[arg(long, global = true, value_name = "TURNS", value_parser = parse_max_history)]
    pub max_history: Option<usize>,

    /// Session to start in
    #[arg(short, long, global = true, value_name = "ID")]
    pub session: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start an interactive conversation (default)
    Chat,
    /// Ask a single question and print the reply
    Ask {
        /// The question
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Display version information
    Version,
}

fn parse_max_history(raw: &str) -> std::result::Result<usize, String> {
    parse_positive::<usize>("--max-history", raw).map_err(|e| e.to_string())
}

pub async fn run(cli: Cli) -> Result<()> {
    let Cli {
        model,
        max_history,
        session,
        command,
        ..
    } = cli;

    let overrides = CliOverrides { model, max_history };
    let session_id = session.unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());

    match command.unwrap_or(Commands::Chat) {
        Commands::Version => {
            print_version();
            Ok(())
        }
        Commands::Chat => run_chat(overrides, session_id).await,
        Commands::Ask { message } => run_ask(overrides, session_id, &message.join(" ")).await,
    }
}

async fn run_chat(overrides: CliOverrides, session_id: String) -> Result<()> {
    let config = load_config(overrides);
    let mut engine =
        ConversationEngine::from_config(&config).context("Failed to set up the model client")?;

    tracing::info!(
        model = %engine.model(),
        max_new_tokens = engine.max_new_tokens(),
        session_id = %session_id,
        "Starting chat"
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut repl = Repl::new(stdin.lock(), stdout.lock()).with_session(session_id);
    repl.run(&mut engine)
        .await
        .context("Failed to read from or write to the terminal")?;

    Ok(())
}

async fn run_ask(overrides: CliOverrides, session_id: String, message: &str) -> Result<()> {
    let config = load_config(overrides);
    let mut engine =
        ConversationEngine::from_config(&config).context("Failed to set up the model client")?;

    let reply = engine
        .respond(&session_id, message)
        .await
        .context("Model request failed")?;

    println!("{}", reply);
    Ok(())
}

fn print_version() {
    println!("soccerfan {}", env!("CARGO_PKG_VERSION"));
}
