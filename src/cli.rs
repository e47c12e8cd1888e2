//! Command-line interface for ttt_duel.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ttt_board::Mark;

/// ttt_duel - two-player tic-tac-toe over TCP
#[derive(Parser, Debug)]
#[command(name = "ttt_duel")]
#[command(about = "Play tic-tac-toe against another terminal over TCP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Listen for a client; the server always moves first
    Server {
        /// Port to bind to (default 5131)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Exit after the first session instead of waiting for another client
        #[arg(long)]
        once: bool,
    },

    /// Connect to a server and choose a mark
    Client {
        /// Server host (default localhost)
        host: Option<String>,

        /// Server port (default 5131)
        #[arg(short, long)]
        port: Option<u16>,

        /// Play this mark without being asked (X or O)
        #[arg(short, long, value_parser = parse_mark)]
        mark: Option<Mark>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn parse_mark(value: &str) -> Result<Mark, String> {
    Mark::from_input(value).ok_or_else(|| format!("expected X or O, got {value:?}"))
}
