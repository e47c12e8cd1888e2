//! ttt_duel - command-line entry point.
//!
//! `ttt_duel server` waits for a client; `ttt_duel client [HOST]` dials one.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use ttt_board::Mark;
use ttt_duel::{DuelConfig, HumanPlayer, SessionError, SessionFactory};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();
    initialize_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Server { port, config, once } => run_server(config, port, once).await,
        Command::Client {
            host,
            port,
            mark,
            config,
        } => run_client(config, host, port, mark).await,
    }
}

/// Logs go to stderr so they never interleave with the game prompts.
fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Builds the effective configuration: file (or defaults), then flags.
#[instrument(skip_all)]
fn load_config(path: Option<PathBuf>) -> Result<DuelConfig> {
    let config = match path {
        Some(path) => DuelConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DuelConfig::default(),
    };
    Ok(config)
}

/// Runs the listening side until the local player quits or, with `--once`,
/// after the first session.
#[instrument(skip(config_path))]
async fn run_server(config_path: Option<PathBuf>, port: Option<u16>, once: bool) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if once {
        config = config.with_keep_listening(false);
    }
    config.validate()?;

    info!(port = config.port(), "Starting server");
    let factory = SessionFactory::new(config);
    let mut player = HumanPlayer::stdio("server", None);

    match factory.serve(&mut player).await {
        Ok(reports) => {
            info!(sessions = reports.len(), "Server finished");
            Ok(())
        }
        Err(SessionError::InputClosed) => {
            info!("Input closed, shutting down");
            Ok(())
        }
        Err(err) => Err(err).context("Server stopped"),
    }
}

/// Runs the connecting side, offering to reconnect after a lost connection.
#[instrument(skip(config_path))]
async fn run_client(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    mark: Option<Mark>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if mark.is_some() {
        config = config.with_mark(mark);
    }
    config.validate()?;

    let mut player = HumanPlayer::stdio("client", *config.mark());
    let factory = SessionFactory::new(config);

    match factory.connect_with_restarts(&mut player).await {
        Ok(Some(report)) => {
            info!(rounds = report.outcomes().len(), "Session finished");
            Ok(())
        }
        Ok(None) | Err(SessionError::InputClosed) => Ok(()),
        Err(err) => Err(err).context("Client stopped"),
    }
}
