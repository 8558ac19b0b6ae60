//! Registration server
//!
//! Serves the registration HTTP API over a CSV record store.
//!
//! # Usage
//!
//! ```bash
//! regassist-server [--config <path>] [--bind <addr>] [--data-file <path>] [-v]
//! ```
//!
//! # Environment Variables
//!
//! - `REGASSIST_BIND`, `REGASSIST_DATA_FILE`: override the config file
//! - `RUST_LOG`: control log verbosity (default: `info`)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use regassist_core::config::AppConfig;
use regassist_core::logging::{init_tracing, TracingLogger};
use regassist_core::registration::{self, RegistrationService};
use regassist_core::store::CsvRecordStore;
use tokio::net::TcpListener;

/// HTTP registration service for the registration assistant
#[derive(Parser, Debug)]
#[command(name = "regassist-server")]
#[command(version, about)]
struct Args {
    /// Config file (default: <config dir>/regassist/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    bind: Option<String>,

    /// CSV file holding the registrations
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = AppConfig::load_with_env(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.registration.bind = bind;
    }
    if let Some(data_file) = args.data_file {
        config.registration.data_file = data_file;
    }

    let logger = Arc::new(TracingLogger::for_component("registration"));
    let store = Arc::new(CsvRecordStore::new(&config.registration.data_file));
    let service = RegistrationService::new(store, logger);

    let listener = TcpListener::bind(&config.registration.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.registration.bind))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        data_file = %config.registration.data_file.display(),
        "Starting registration server"
    );

    registration::serve(listener, service).await?;
    Ok(())
}
