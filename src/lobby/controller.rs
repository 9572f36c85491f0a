//! Lobby controller: the event loop that connects channel, view and screen.

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::channel::RealtimeChannel;
use crate::lobby::render::LobbyFrame;
use crate::lobby::screen::{LobbyScreen, ScreenAction};
use crate::lobby::view::{LobbySyncView, ViewEffect};
use crate::protocol::OutboundEvent;

/// Called when the server asks for an in-place game refresh.
pub trait ReloadHook: Send {
    /// Refreshes game state without discarding the lobby.
    fn reloaded(&mut self);
}

/// Reload hook that only records the request in the log.
#[derive(Debug, Default)]
pub struct LoggingReloadHook {
    calls: usize,
}

impl LoggingReloadHook {
    /// Number of reloads seen so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl ReloadHook for LoggingReloadHook {
    #[instrument(skip(self))]
    fn reloaded(&mut self) {
        self.calls += 1;
        info!(calls = self.calls, "Game reload hook invoked");
    }
}

/// Drives a [`LobbySyncView`] from a channel and keyboard input.
///
/// Call [`LobbyController::run`] to start the event loop. The channel is
/// closed exactly once when the loop ends, however it ends.
#[derive(Debug)]
pub struct LobbyController<C, H> {
    channel: C,
    view: LobbySyncView,
    screen: LobbyScreen,
    hook: H,
}

impl<C: RealtimeChannel, H: ReloadHook> LobbyController<C, H> {
    /// Creates a controller.
    #[instrument(skip_all)]
    pub fn new(channel: C, view: LobbySyncView, hook: H) -> Self {
        info!("Creating LobbyController");
        Self {
            channel,
            view,
            screen: LobbyScreen::new(),
            hook,
        }
    }

    /// The lobby view.
    pub fn view(&self) -> &LobbySyncView {
        &self.view
    }

    /// The channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// The reload hook.
    pub fn hook(&self) -> &H {
        &self.hook
    }

    /// Runs the lobby on a terminal until the user quits or the server hangs up.
    #[instrument(skip(self, terminal))]
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        info!("Starting lobby event loop");
        let (mut keys, reader) = spawn_key_reader();
        let screen = self.screen;
        let result = self
            .drive(&mut keys, |lobby| {
                terminal.draw(|f| screen.render(f, lobby))?;
                Ok(())
            })
            .await;
        drop(keys);
        if let Err(e) = reader.await {
            warn!(error = %e, "Key reader task failed");
        }
        result
    }

    /// Event loop without a terminal.
    ///
    /// Sends `join`, then redraws through `draw` after every event until the
    /// key stream ends, the user quits, or the channel ends. Unloads on the
    /// way out even if a step failed.
    #[instrument(skip_all)]
    pub async fn drive<F>(
        &mut self,
        keys: &mut mpsc::UnboundedReceiver<KeyEvent>,
        mut draw: F,
    ) -> anyhow::Result<()>
    where
        F: FnMut(&LobbyFrame) -> anyhow::Result<()>,
    {
        let mut result = self
            .apply_effects(vec![ViewEffect::Emit(OutboundEvent::Join)])
            .await;
        if result.is_ok() {
            result = loop {
                if let Err(e) = draw(&self.view.frame()) {
                    break Err(e);
                }
                match self.step(keys).await {
                    Ok(true) => continue,
                    Ok(false) => break Ok(()),
                    Err(e) => break Err(e),
                }
            };
        }
        let unloaded = self.unload().await;
        result.and(unloaded)
    }

    /// Waits for one channel frame or key press and handles it.
    ///
    /// Returns `Ok(false)` when the loop should stop.
    async fn step(&mut self, keys: &mut mpsc::UnboundedReceiver<KeyEvent>) -> anyhow::Result<bool> {
        tokio::select! {
            frame = self.channel.recv() => match frame {
                Some(Ok(envelope)) => {
                    debug!(event = %envelope.event, "Frame received");
                    let effects = self.view.handle_envelope(&envelope);
                    self.apply_effects(effects).await?;
                    Ok(true)
                }
                Some(Err(e)) => {
                    warn!(error = %e, "Dropping unreadable frame");
                    Ok(true)
                }
                None => {
                    info!("Lobby channel ended");
                    Ok(false)
                }
            },
            key = keys.recv() => match key {
                Some(key) => match self.screen.handle_key(key) {
                    ScreenAction::Stay => Ok(true),
                    ScreenAction::ActivateStart => {
                        let effects = self.view.activate_start();
                        self.apply_effects(effects).await?;
                        Ok(true)
                    }
                    ScreenAction::Quit => {
                        info!("User left the lobby");
                        Ok(false)
                    }
                },
                None => Ok(false),
            },
        }
    }

    /// Performs view effects in order, including effects they cause.
    #[instrument(skip(self))]
    pub async fn apply_effects(&mut self, effects: Vec<ViewEffect>) -> anyhow::Result<()> {
        let mut queue = std::collections::VecDeque::from(effects);
        while let Some(effect) = queue.pop_front() {
            debug!(effect = ?effect, "Applying effect");
            match effect {
                ViewEffect::Emit(event) => self.channel.emit(event).await?,
                ViewEffect::ReloadPage => queue.extend(self.view.reload()),
                ViewEffect::InvokeReloaded => self.hook.reloaded(),
                ViewEffect::CloseChannel => self.channel.close().await?,
            }
        }
        Ok(())
    }

    /// Unloads the view, which closes the channel once.
    #[instrument(skip(self))]
    pub async fn unload(&mut self) -> anyhow::Result<()> {
        let effects = self.view.on_unload();
        self.apply_effects(effects).await
    }
}

/// Forwards terminal key presses until the receiver is dropped.
fn spawn_key_reader() -> (mpsc::UnboundedReceiver<KeyEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            match event::poll(Duration::from_millis(100)) {
                Ok(true) => match event::read() {
                    // crossterm fires both press and release
                    Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                        if tx.send(key).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "Failed to read terminal event");
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    warn!(error = %e, "Failed to poll terminal events");
                    break;
                }
            }
        }
        debug!("Key reader stopped");
    });
    (rx, handle)
}
