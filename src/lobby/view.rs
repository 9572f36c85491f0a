//! The lobby view: turns server events into roster, banner and start state.
//!
//! Handlers never perform I/O. Anything that must happen outside the view
//! (sending a request, reloading, closing the channel) is returned as a
//! [`ViewEffect`] for the host to carry out.

use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

use crate::error::PayloadError;
use crate::lobby::render::{self, Chrome, LobbyFrame, LobbyStatus, RosterEntry};
use crate::lobby::start_control::StartControl;
use crate::protocol::{Envelope, GameOptions, InboundEvent, JoinedAck, OutboundEvent};
use crate::session::{LobbySession, Player, PlayerId, Roster};

/// Work the view asks its host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEffect {
    /// Send a request to the server.
    Emit(OutboundEvent),
    /// Throw away lobby state and load it again from the server.
    ReloadPage,
    /// Run the external reload hook in place.
    InvokeReloaded,
    /// Release the channel.
    CloseChannel,
}

/// Client-side lobby state and its event handlers.
#[derive(Debug, Getters)]
pub struct LobbySyncView {
    session: LobbySession,
    roster: Roster,
    subtitle: Option<String>,
    notice: Option<String>,
    status: LobbyStatus,
    start_control: StartControl,
    chrome: Chrome,
    unloaded: bool,
}

impl LobbySyncView {
    /// Creates an empty view for the given user.
    #[instrument]
    pub fn new(current_user_uuid: Option<PlayerId>, chrome: Chrome) -> Self {
        Self {
            session: LobbySession::new(current_user_uuid),
            roster: Roster::default(),
            subtitle: None,
            notice: None,
            status: LobbyStatus::Connecting,
            start_control: StartControl::new(),
            chrome,
            unloaded: false,
        }
    }

    /// Current visible state.
    pub fn frame(&self) -> LobbyFrame {
        render::render_frame(
            &self.session,
            &self.roster,
            self.subtitle.as_deref(),
            self.notice.as_deref(),
            self.status,
            self.start_control.enabled(),
            self.chrome,
        )
    }

    /// Validates an envelope and dispatches it.
    ///
    /// A payload that fails validation is logged and leaves a notice on
    /// screen; the previous roster stays in place.
    #[instrument(skip(self, envelope), fields(event = %envelope.event))]
    pub fn handle_envelope(&mut self, envelope: &Envelope) -> Vec<ViewEffect> {
        match InboundEvent::parse(envelope) {
            Ok(event) => self.dispatch(event),
            Err(err) => {
                self.on_payload_error(&err);
                Vec::new()
            }
        }
    }

    /// Routes a validated event to its handler.
    #[instrument(skip(self, event))]
    pub fn dispatch(&mut self, event: InboundEvent) -> Vec<ViewEffect> {
        if self.unloaded {
            debug!(event = ?event, "Dropping event received after unload");
            return Vec::new();
        }
        match event {
            InboundEvent::Connected { uuid } => {
                self.on_connected(uuid);
                Vec::new()
            }
            InboundEvent::JoinedAck(ack) => {
                self.on_joined_ack(ack);
                Vec::new()
            }
            InboundEvent::PlayerJoined(update) | InboundEvent::PlayerLeft(update) => {
                self.on_player_list_changed(update.players, update.owner);
                Vec::new()
            }
            InboundEvent::GameOptions(options) => {
                self.on_game_options_changed(&options);
                Vec::new()
            }
            InboundEvent::StartGame => self.on_start_game(),
            InboundEvent::GameReload => self.on_game_reload(),
            InboundEvent::Ignored { name } => {
                debug!(name = %name, "Ignoring lobby event");
                Vec::new()
            }
        }
    }

    /// Records the connected user's id unless one was configured.
    #[instrument(skip(self))]
    pub fn on_connected(&mut self, uuid: PlayerId) {
        match self.session.current_user_uuid().clone() {
            Some(existing) if existing != uuid => {
                warn!(configured = %existing, reported = %uuid, "Server reported a different user id; keeping configured id");
            }
            Some(_) => {}
            None => {
                info!(uuid = %uuid, "Current user identified by server");
                self.session.set_current_user(uuid);
                if self.status != LobbyStatus::Connecting {
                    self.evaluate();
                }
            }
        }
    }

    /// Initializes the session and roster from the join acknowledgment.
    #[instrument(skip(self, ack), fields(lobby_id = ?ack.lobby_id, owner = ?ack.owner_uuid))]
    pub fn on_joined_ack(&mut self, ack: JoinedAck) {
        debug!(
            previous_owner = ?self.session.owner_uuid(),
            current_user = ?self.session.current_user_uuid(),
            "Join acknowledged"
        );
        if let Some(lobby_id) = ack.lobby_id {
            self.session.set_lobby_id(lobby_id);
        }
        self.on_player_list_changed(ack.players, ack.owner_uuid);
    }

    /// Replaces the roster and re-evaluates the banner and start control.
    ///
    /// Calling this again with the same input yields the same frame and still
    /// leaves exactly one start handler bound.
    #[instrument(skip(self, players), fields(count = players.len()))]
    pub fn on_player_list_changed(&mut self, players: Vec<Player>, owner_uuid: Option<PlayerId>) {
        if let Some(owner) = owner_uuid {
            self.session.set_owner(owner);
        }
        self.roster = Roster::rebuild(players);
        self.notice = None;
        let entries = self.render_roster_list();
        debug!(rows = entries.len(), "Player list rendered");
        self.evaluate();
    }

    /// Recomputes the banner and the start control from roster and ownership.
    ///
    /// The control is enabled and bound only when the banner reads
    /// [`LobbyStatus::ReadyToStart`].
    #[instrument(skip(self))]
    fn evaluate(&mut self) {
        if let Some(owner) = self.session.owner_uuid().as_deref() {
            if self.roster.get(owner).is_none() {
                warn!(owner = %owner, "Lobby owner is not in the roster");
            }
        }
        self.status = LobbyStatus::evaluate(self.roster.len(), self.session.is_owner());
        match self.status {
            LobbyStatus::ReadyToStart => {
                self.start_control.enable_and_bind();
            }
            _ => self.start_control.disable(),
        }
        info!(status = ?self.status, players = self.roster.len(), "Lobby status updated");
    }

    /// Updates the subtitle from new lobby options.
    #[instrument(skip(self))]
    pub fn on_game_options_changed(&mut self, options: &GameOptions) {
        if !self.chrome.show_subtitle {
            debug!("Screen has no subtitle slot");
            return;
        }
        match render::compose_subtitle(options) {
            Some(subtitle) => {
                debug!(subtitle = %subtitle, "Subtitle updated");
                self.subtitle = Some(subtitle);
            }
            None => warn!("Game options carried nothing to display"),
        }
    }

    /// The game started; the host reloads from the server.
    #[instrument(skip(self))]
    pub fn on_start_game(&mut self) -> Vec<ViewEffect> {
        info!("Game starting, reloading lobby");
        vec![ViewEffect::ReloadPage]
    }

    /// The server asked for an in-place refresh.
    #[instrument(skip(self))]
    pub fn on_game_reload(&mut self) -> Vec<ViewEffect> {
        debug!("Game reload requested");
        vec![ViewEffect::InvokeReloaded]
    }

    /// Rows of the player list, owner highlighted.
    #[instrument(skip(self))]
    pub fn render_roster_list(&self) -> Vec<RosterEntry> {
        render::render_roster(&self.roster, self.session.owner_uuid().as_deref())
    }

    /// The user activated the start control.
    #[instrument(skip(self))]
    pub fn activate_start(&mut self) -> Vec<ViewEffect> {
        if self.unloaded {
            return Vec::new();
        }
        match self.start_control.activate() {
            Some(event) => {
                info!("Requesting game start");
                vec![ViewEffect::Emit(event)]
            }
            None => Vec::new(),
        }
    }

    /// Drops all lobby state and asks the server for it again.
    #[instrument(skip(self))]
    pub fn reload(&mut self) -> Vec<ViewEffect> {
        if self.unloaded {
            return Vec::new();
        }
        info!("Reloading lobby state");
        self.session.reset();
        self.roster = Roster::default();
        self.subtitle = None;
        self.notice = None;
        self.status = LobbyStatus::Connecting;
        self.start_control.disable();
        vec![ViewEffect::Emit(OutboundEvent::Join)]
    }

    /// Releases the channel; only the first call has an effect.
    #[instrument(skip(self))]
    pub fn on_unload(&mut self) -> Vec<ViewEffect> {
        if self.unloaded {
            debug!("Already unloaded");
            return Vec::new();
        }
        self.unloaded = true;
        self.start_control.disable();
        info!("Unloading lobby view");
        vec![ViewEffect::CloseChannel]
    }

    /// Logs a rejected payload and shows a neutral notice.
    #[instrument(skip(self))]
    pub fn on_payload_error(&mut self, err: &PayloadError) {
        warn!(error = %err, "Rejected lobby payload");
        self.notice = Some(format!(
            "Could not read '{}' update from the server",
            err.event
        ));
    }
}
