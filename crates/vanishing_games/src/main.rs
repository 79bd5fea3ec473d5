//! Vanishing Games - Unified CLI
//!
//! Multiplayer server and local terminal play for vanishing tic-tac-toe.

#![warn(missing_docs)]

mod cli;
mod terminal;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use vanishing_server::ServerConfig;
use vanishing_tictactoe::LocalMode;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            host,
            port,
            config,
            turn_timeout_ms,
        } => run_server(host, port, config, turn_timeout_ms).await,
        Command::Play {
            difficulty,
            two_player,
        } => {
            let mode = if two_player {
                LocalMode::TwoPlayer
            } else {
                LocalMode::VsComputer(difficulty)
            };
            run_local(mode).await
        }
    }
}

/// Run the multiplayer server
#[instrument(skip_all, fields(config_path = %config.display()))]
async fn run_server(
    host: Option<String>,
    port: Option<u16>,
    config: std::path::PathBuf,
    turn_timeout_ms: Option<u64>,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,vanishing_server=debug")),
        )
        .init();

    let mut config = ServerConfig::load(Some(config.as_path()))?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(ms) = turn_timeout_ms {
        config = config.with_turn_timeout_ms(ms)?;
    }

    info!(?config, "Starting vanishing tic-tac-toe server");
    vanishing_server::serve(&config).await
}

/// Run a local match on stdin/stdout
async fn run_local(mode: LocalMode) -> Result<()> {
    // Logs go to stderr so they never interleave with the board.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    terminal::run(mode).await
}
