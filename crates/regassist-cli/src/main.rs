//! Registration assistant chat
//!
//! Interactive terminal front-end: reads a line, runs one orchestrator
//! pass, prints the notices and the assistant's replies.
//!
//! # Usage
//!
//! ```bash
//! regassist [--config <path>] [--provider <id>] [--model <name>] [--server-url <url>] [-v]
//! ```
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY` / `GOOGLE_API_KEY` (or `<PROVIDER>_API_KEY`): LLM credential
//! - `REGASSIST_PROVIDER`, `REGASSIST_MODEL`, `REGASSIST_SERVER_URL`: override the config file
//! - `RUST_LOG`: control log verbosity (default: `info`)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use regassist_core::config::{resolve_api_key, AppConfig};
use regassist_core::logging::{init_tracing, Logger, TracingLogger};
use regassist_core::orchestrator::{NoticeLevel, Orchestrator, Session, TurnOutcome, GREETING};
use regassist_core::providers::{create_provider, ProviderModelConfig};
use regassist_core::secrets::{EnvSecretStore, SecretStore};
use regassist_core::tools::HttpToolDispatcher;
use regassist_core::types::UserRecord;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Chat with the registration assistant
#[derive(Parser, Debug)]
#[command(name = "regassist")]
#[command(version, about)]
struct Args {
    /// Config file (default: <config dir>/regassist/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// LLM provider id (gemini, openai, anthropic, ollama, mock, ...)
    #[arg(short, long)]
    provider: Option<String>,

    /// Model name
    #[arg(short, long)]
    model: Option<String>,

    /// Base URL of the registration server
    #[arg(short, long)]
    server_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn render(outcome: &TurnOutcome) {
    for notice in &outcome.notices {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warn",
            NoticeLevel::Error => "error",
        };
        println!("  [{}] {}", tag, notice.text);
    }
    if !outcome.users.is_empty() {
        print_users(&outcome.users);
    }
    for turn in &outcome.turns {
        println!("assistant> {}", turn.text);
    }
}

fn print_users(users: &[UserRecord]) {
    let width = |f: fn(&UserRecord) -> &str, title: &str| {
        users.iter().map(|u| f(u).chars().count()).max().unwrap_or(0).max(title.len())
    };
    let name_w = width(|u| u.name.as_str(), "Name");
    let email_w = width(|u| u.email.as_str(), "email");

    println!("  {:<name_w$}  {:<email_w$}  dob", "Name", "email");
    for user in users {
        println!("  {:<name_w$}  {:<email_w$}  {}", user.name, user.email, user.dob);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = AppConfig::load_with_env(args.config.as_deref())?;
    if let Some(provider) = args.provider {
        config.assistant.provider = provider;
    }
    if let Some(model) = args.model {
        config.assistant.model = model;
    }
    if let Some(url) = args.server_url {
        config.registration.base_url = url;
    }
    config.validate()?;

    // A missing credential aborts startup
    let secrets = EnvSecretStore::new();
    let api_key = resolve_api_key(&secrets, &config.assistant.provider)?;
    if api_key.is_some() {
        tracing::debug!(store = secrets.name(), "API key resolved");
    }

    let logger: Arc<dyn Logger> = Arc::new(TracingLogger::for_component("assistant"));
    let mut model = ProviderModelConfig::new(&config.assistant.model);
    if let Some(key) = api_key {
        model = model.with_api_key(key);
    }

    let mut orchestrator = Orchestrator::new(
        create_provider(&config.assistant.provider, logger.clone()),
        Arc::new(HttpToolDispatcher::new(
            &config.registration.base_url,
            logger.clone(),
        )),
        model,
        logger,
    );
    if let Some(temperature) = config.assistant.temperature {
        orchestrator = orchestrator.with_temperature(temperature);
    }

    tracing::info!(
        provider = %config.assistant.provider,
        model = %config.assistant.model,
        server = %config.registration.base_url,
        "Starting registration assistant"
    );

    let mut session = Session::with_greeting();
    println!("assistant> {}", GREETING);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"you> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        let outcome = orchestrator.handle_input(&mut session, input).await;
        render(&outcome);
    }

    Ok(())
}
