//! Lobby Sync - Unified CLI
//!
//! Terminal lobby client with a headless replay mode.

#![warn(missing_docs)]

use std::io::BufReader;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use lobby_sync::cli::{Cli, Command};
use lobby_sync::{ClientConfig, LobbySyncView, replay_transcript};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ClientConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Tui { server_url, uuid } => {
            let config = config.with_server_url(server_url).with_player_uuid(uuid);
            lobby_sync::run_tui(config).await
        }
        Command::Replay { file, uuid, json } => {
            initialize_stderr_tracing();
            run_replay(config.with_player_uuid(uuid), &file, json)
        }
    }
}

/// Replays a transcript and prints the final lobby state.
#[instrument(skip(config), fields(file = %file.display()))]
fn run_replay(config: ClientConfig, file: &std::path::Path, json: bool) -> Result<()> {
    info!("Replaying transcript");
    let reader = BufReader::new(
        std::fs::File::open(file).with_context(|| format!("opening {}", file.display()))?,
    );
    let view = LobbySyncView::new(config.player_uuid().clone(), config.chrome());
    let report = replay_transcript(reader, view)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("{}", report.frame);
    if !report.emitted.is_empty() {
        println!("Sent: {}", report.emitted.join(", "));
    }
    println!("Reloads: {}  Reload hook: {}", report.reloads, report.hook_calls);
    for skipped in &report.skipped {
        println!("Skipped line {}: {}", skipped.line, skipped.reason);
    }
    Ok(())
}

#[instrument]
fn initialize_stderr_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,lobby_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Replay tracing initialized");
}
