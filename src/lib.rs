//! Lobby Sync library - client side of a multiplayer game lobby
//!
//! Keeps a player roster, status banner and start control in sync with a
//! real-time event feed from the lobby server.
//!
//! # Architecture
//!
//! - **Protocol**: channel envelopes and validated lobby events
//! - **Session**: players, roster and the connected user's lobby state
//! - **Lobby**: the view that reacts to events, its pure renderer, the
//!   terminal screen and the controller loop
//! - **Channel**: WebSocket and in-memory transports
//!
//! # Example
//!
//! ```
//! use lobby_sync::{Chrome, Envelope, LobbyStatus, LobbySyncView};
//! use serde_json::json;
//!
//! let mut view = LobbySyncView::new(Some("p1".to_string()), Chrome::default());
//! view.handle_envelope(&Envelope::new(
//!     "joined",
//!     json!({
//!         "lobby_id": "3f2a9c1b",
//!         "owner_uuid": "p1",
//!         "player_data": [
//!             {"uuid": "p1", "username": "alice"},
//!             {"uuid": "p2", "username": "bob"}
//!         ]
//!     }),
//! ));
//! assert_eq!(view.frame().status, LobbyStatus::ReadyToStart);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod channel;
mod config;
mod error;
mod lobby;
mod protocol;
mod replay;
mod session;
mod tui;

pub mod cli;

// Crate-level exports - Errors
pub use error::{ChannelError, ConfigError, LobbyError, PayloadError};

// Crate-level exports - Configuration
pub use config::ClientConfig;

// Crate-level exports - Wire protocol
pub use protocol::{
    EVENT_CONNECTED, EVENT_JOINED, EVENT_MESSAGE, Envelope, GameOptions, InboundEvent, JoinedAck,
    OutboundEvent, RosterUpdate, parse_game_options, parse_players,
};

// Crate-level exports - Session state
pub use session::{LobbySession, Player, PlayerId, Roster, UNKNOWN_PLAYER, is_valid_player_id};

// Crate-level exports - Lobby view, rendering and host
pub use lobby::{
    Chrome, HandlerId, LobbyController, LobbyFrame, LobbyScreen, LobbyStatus, LobbySyncView,
    LoggingReloadHook, MIN_PLAYERS_TO_START, ReloadHook, RosterEntry, SUBTITLE_SEPARATOR,
    ScreenAction, StartControl, ViewEffect, compose_subtitle, render_frame, render_roster,
};

// Crate-level exports - Channels
pub use channel::{MemoryChannel, MemoryPeer, RealtimeChannel, WebSocketChannel};

// Crate-level exports - Replay and terminal front end
pub use replay::{ReplayReport, SkippedLine, replay_transcript};
pub use tui::{TerminalController, connect_lobby, run_tui};
