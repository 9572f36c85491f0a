//! Lobby session and roster state held by the client.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Opaque identifier of a player, as issued by the lobby server.
pub type PlayerId = String;

/// Display name used when the server sends a player without a username.
pub const UNKNOWN_PLAYER: &str = "Unknown player";

/// A player in the lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player's unique ID.
    pub uuid: PlayerId,
    /// Player's display name.
    pub username: String,
    /// Whether the server reports the player's connection as dropped.
    #[serde(default)]
    pub disconnected: bool,
}

impl Player {
    /// Creates a connected player.
    pub fn new(uuid: impl Into<PlayerId>, username: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            username: username.into(),
            disconnected: false,
        }
    }
}

/// Returns true if `uuid` can key a roster entry.
///
/// Roster entries are looked up by uuid equality, so ids must be non-empty
/// and contain no whitespace.
#[instrument]
pub fn is_valid_player_id(uuid: &str) -> bool {
    !uuid.is_empty() && !uuid.chars().any(char::is_whitespace)
}

/// Ordered list of players, always rebuilt from a full server payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Builds a roster from a payload's player list.
    ///
    /// Entries with an invalid id are dropped. A repeated id keeps its first
    /// occurrence.
    #[instrument(skip(players), fields(count = players.len()))]
    pub fn rebuild(players: Vec<Player>) -> Self {
        let mut kept: Vec<Player> = Vec::with_capacity(players.len());
        for player in players {
            if !is_valid_player_id(&player.uuid) {
                warn!(uuid = %player.uuid, "Dropping roster entry with invalid id");
                continue;
            }
            if kept.iter().any(|p| p.uuid == player.uuid) {
                warn!(uuid = %player.uuid, "Dropping duplicate roster entry");
                continue;
            }
            kept.push(player);
        }
        debug!(kept = kept.len(), "Roster rebuilt");
        Self { players: kept }
    }

    /// Players in server order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns true if nobody is in the lobby.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Looks up a player by id.
    pub fn get(&self, uuid: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.uuid == uuid)
    }
}

/// Process-wide lobby state for the connected user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct LobbySession {
    lobby_id: Option<String>,
    owner_uuid: Option<PlayerId>,
    current_user_uuid: Option<PlayerId>,
}

impl LobbySession {
    /// Creates a session for the given user before any lobby is joined.
    #[instrument]
    pub fn new(current_user_uuid: Option<PlayerId>) -> Self {
        Self {
            lobby_id: None,
            owner_uuid: None,
            current_user_uuid,
        }
    }

    /// Records the lobby id from a join acknowledgment.
    #[instrument(skip(self))]
    pub fn set_lobby_id(&mut self, lobby_id: String) {
        if self.lobby_id.as_deref() != Some(lobby_id.as_str()) {
            info!(lobby_id = %lobby_id, "Lobby id set");
        }
        self.lobby_id = Some(lobby_id);
    }

    /// Records the lobby owner reported by the server.
    #[instrument(skip(self))]
    pub fn set_owner(&mut self, owner_uuid: PlayerId) {
        if self.owner_uuid.as_deref() != Some(owner_uuid.as_str()) {
            info!(previous = ?self.owner_uuid, owner = %owner_uuid, "Lobby owner changed");
        }
        self.owner_uuid = Some(owner_uuid);
    }

    /// Records the connected user's id.
    #[instrument(skip(self))]
    pub fn set_current_user(&mut self, uuid: PlayerId) {
        self.current_user_uuid = Some(uuid);
    }

    /// Returns true if the connected user is the recognized owner.
    pub fn is_owner(&self) -> bool {
        match (&self.current_user_uuid, &self.owner_uuid) {
            (Some(me), Some(owner)) => me == owner,
            _ => false,
        }
    }

    /// Forgets lobby and owner, keeping the user identity.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        debug!("Resetting lobby session");
        self.lobby_id = None;
        self.owner_uuid = None;
    }
}
