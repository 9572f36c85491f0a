//! Command-line interface for lobby_sync.

use clap::{Parser, Subcommand};

/// Lobby Sync - terminal lobby client for multiplayer games
#[derive(Parser, Debug)]
#[command(name = "lobby_sync")]
#[command(about = "Terminal lobby client kept in sync with a real-time event feed", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the client config file
    #[arg(short, long, global = true, default_value = "lobby_sync.toml")]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Join a lobby and show it in the terminal
    Tui {
        /// Lobby server WebSocket URL (overrides the config file)
        #[arg(long)]
        server_url: Option<String>,

        /// Id of the user this client acts for (overrides the config file)
        #[arg(long)]
        uuid: Option<String>,
    },

    /// Replay a JSON-lines transcript of lobby events and print the result
    Replay {
        /// Transcript file
        file: std::path::PathBuf,

        /// Id of the user to replay as
        #[arg(long)]
        uuid: Option<String>,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
