//! Pure rendering of lobby state into a [`LobbyFrame`].
//!
//! Nothing here touches the terminal. The screen draws whatever frame this
//! module produces, and tests compare frames directly.

use std::fmt;

use serde::Serialize;
use tracing::instrument;

use crate::protocol::GameOptions;
use crate::session::{LobbySession, PlayerId, Roster};

/// Separator between subtitle parts.
pub const SUBTITLE_SEPARATOR: &str = " | ";

/// Fewest players needed before the game can start.
pub const MIN_PLAYERS_TO_START: usize = 2;

/// Status banner shown under the player list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LobbyStatus {
    /// No lobby state has arrived yet.
    Connecting,
    /// Fewer than two players are present.
    WaitingForPlayers,
    /// The connected user owns the lobby and can start.
    ReadyToStart,
    /// Someone else owns the lobby.
    WaitingOnHost,
}

impl LobbyStatus {
    /// Banner text.
    pub fn message(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting to lobby…",
            Self::WaitingForPlayers => "Waiting on at least one more player",
            Self::ReadyToStart => "You're good to go! Start the game when you're ready",
            Self::WaitingOnHost => "Waiting on host to start the game",
        }
    }

    /// Computes the banner for a roster size and the user's role.
    #[instrument]
    pub fn evaluate(player_count: usize, is_owner: bool) -> Self {
        if player_count < MIN_PLAYERS_TO_START {
            Self::WaitingForPlayers
        } else if is_owner {
            Self::ReadyToStart
        } else {
            Self::WaitingOnHost
        }
    }
}

/// One visible row of the player list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    /// Key of the row.
    pub uuid: PlayerId,
    /// Text shown in the row.
    pub username: String,
    /// Row belongs to the lobby owner.
    pub highlighted: bool,
    /// Player's connection dropped.
    pub disconnected: bool,
}

/// Everything the lobby screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LobbyFrame {
    /// Lobby id for the title, once known.
    pub lobby_id: Option<String>,
    /// Options subtitle, if the screen has a subtitle slot and options arrived.
    pub subtitle: Option<String>,
    /// Player list in roster order.
    pub entries: Vec<RosterEntry>,
    /// Number of players shown.
    pub player_count: usize,
    /// Lobby capacity.
    pub max_players: usize,
    /// Status banner.
    pub status: LobbyStatus,
    /// Start control can be activated.
    pub start_enabled: bool,
    /// Diagnostic shown when the last update could not be applied.
    pub notice: Option<String>,
}

/// Screen features and limits that are not part of lobby state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chrome {
    /// Lobby capacity shown next to the player count.
    pub max_players: usize,
    /// Whether the screen has a subtitle slot.
    pub show_subtitle: bool,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            max_players: 4,
            show_subtitle: true,
        }
    }
}

/// Builds the player list rows, highlighting the owner's row.
#[instrument(skip(roster), fields(count = roster.len()))]
pub fn render_roster(roster: &Roster, owner_uuid: Option<&str>) -> Vec<RosterEntry> {
    roster
        .players()
        .iter()
        .map(|player| RosterEntry {
            uuid: player.uuid.clone(),
            username: player.username.clone(),
            highlighted: owner_uuid == Some(player.uuid.as_str()),
            disconnected: player.disconnected,
        })
        .collect()
}

/// Composes the options subtitle.
///
/// Parts appear in the order mode, theme, round time, rounds. Missing parts
/// are left out. Returns `None` if nothing is left to show.
#[instrument]
pub fn compose_subtitle(options: &GameOptions) -> Option<String> {
    let mut parts: Vec<String> = Vec::with_capacity(4);
    if let Some(mode) = &options.mode {
        parts.push(mode.clone());
    }
    if let Some(theme) = &options.theme {
        parts.push(theme.clone());
    }
    if let Some(secs) = options.round_time {
        parts.push(format!("{}s rounds", secs));
    }
    if let Some(rounds) = options.rounds {
        parts.push(format!("{} rounds", rounds));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(SUBTITLE_SEPARATOR))
    }
}

/// Renders the full lobby frame from state.
///
/// `status` and `start_enabled` are taken as evaluated by the owner of the
/// start control; this function never recomputes them.
#[instrument(skip_all)]
pub fn render_frame(
    session: &LobbySession,
    roster: &Roster,
    subtitle: Option<&str>,
    notice: Option<&str>,
    status: LobbyStatus,
    start_enabled: bool,
    chrome: Chrome,
) -> LobbyFrame {
    LobbyFrame {
        lobby_id: session.lobby_id().clone(),
        subtitle: subtitle
            .filter(|_| chrome.show_subtitle)
            .map(str::to_string),
        entries: render_roster(roster, session.owner_uuid().as_deref()),
        player_count: roster.len(),
        max_players: chrome.max_players,
        status,
        start_enabled,
        notice: notice.map(str::to_string),
    }
}

impl fmt::Display for LobbyFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lobby_id {
            Some(id) => writeln!(f, "Lobby {}", id)?,
            None => writeln!(f, "Lobby")?,
        }
        if let Some(subtitle) = &self.subtitle {
            writeln!(f, "{}", subtitle)?;
        }
        writeln!(f, "Players: {}/{}", self.player_count, self.max_players)?;
        for entry in &self.entries {
            let marker = if entry.highlighted { '*' } else { '-' };
            let suffix = if entry.disconnected { " (disconnected)" } else { "" };
            writeln!(f, "  {} {}{}", marker, entry.username, suffix)?;
        }
        writeln!(f, "{}", self.status.message())?;
        let start = if self.start_enabled { "enabled" } else { "disabled" };
        write!(f, "Start: {}", start)?;
        if let Some(notice) = &self.notice {
            write!(f, "\n! {}", notice)?;
        }
        Ok(())
    }
}
