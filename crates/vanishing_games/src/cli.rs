//! Command-line interface for vanishing_games.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vanishing_tictactoe::Difficulty;

/// Vanishing Games - tic-tac-toe where old marks disappear
#[derive(Parser, Debug)]
#[command(name = "vanishing_games")]
#[command(about = "Vanishing tic-tac-toe server and terminal client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the multiplayer WebSocket server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a TOML config file
        #[arg(short, long, default_value = "vanishing_games.toml")]
        config: PathBuf,

        /// Turn clock in milliseconds (overrides the config file)
        #[arg(long)]
        turn_timeout_ms: Option<u64>,
    },

    /// Play a local match in the terminal
    Play {
        /// Computer strength
        #[arg(short, long, default_value_t = Difficulty::Easy)]
        difficulty: Difficulty,

        /// Two humans share the terminal instead of playing the computer
        #[arg(long)]
        two_player: bool,
    },
}
