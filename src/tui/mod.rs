//! Terminal front end for the lobby client.

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use tracing::{error, info, instrument};

use crate::channel::WebSocketChannel;
use crate::config::ClientConfig;
use crate::error::LobbyError;
use crate::lobby::{LobbyController, LobbySyncView, LoggingReloadHook};

/// Controller type the terminal front end runs.
pub type TerminalController = LobbyController<WebSocketChannel, LoggingReloadHook>;

/// Validates `config`, connects to its server and builds the controller.
///
/// Nothing is sent yet; `join` goes out when the controller starts.
#[instrument(skip(config), fields(server_url = %config.server_url()))]
pub async fn connect_lobby(config: &ClientConfig) -> Result<TerminalController, LobbyError> {
    config.validate()?;
    let channel = WebSocketChannel::connect(config.server_url()).await?;
    let view = LobbySyncView::new(config.player_uuid().clone(), config.chrome());
    Ok(LobbyController::new(
        channel,
        view,
        LoggingReloadHook::default(),
    ))
}

/// Connects to the lobby server and runs the lobby screen until the user quits.
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    // Log to a file so tracing output does not tear the screen.
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(server_url = %config.server_url(), "Starting lobby client");

    // Connect before touching the terminal so errors print normally.
    let mut controller = connect_lobby(&config).await?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = controller.run(&mut terminal).await;

    restore_terminal(&mut terminal)?;

    if let Err(err) = &res {
        error!(error = ?err, "Lobby loop error");
    }
    res
}

#[instrument(skip_all)]
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
