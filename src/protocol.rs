//! Wire format of the lobby channel.
//!
//! Every frame is an [`Envelope`]: an event name plus a JSON value. The
//! `message` event multiplexes several lobby updates behind a `state`
//! discriminator. Payloads are validated here so the view only ever sees
//! well-formed [`InboundEvent`]s.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::error::PayloadError;
use crate::session::{Player, PlayerId, UNKNOWN_PLAYER};

/// Event name of the join acknowledgment.
pub const EVENT_JOINED: &str = "joined";
/// Event name of the connect acknowledgment carrying the user's id.
pub const EVENT_CONNECTED: &str = "connected";
/// Event name of the multiplexed lobby update.
pub const EVENT_MESSAGE: &str = "message";

/// One frame on the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event name.
    pub event: String,
    /// Event payload; `null` when the event carries none.
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Creates an envelope.
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// Requests the client sends to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundEvent {
    /// Ask the server to add this connection to the lobby room.
    Join,
    /// Ask the server to start the game. Only the owner may send this.
    StartGame,
}

impl OutboundEvent {
    /// Wire name of the event.
    pub fn name(self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::StartGame => "start-game",
        }
    }

    /// Wraps the event in an envelope with no payload.
    pub fn to_envelope(self) -> Envelope {
        Envelope::new(self.name(), Value::Null)
    }
}

/// Payload of the `joined` acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedAck {
    /// Lobby the user joined.
    pub lobby_id: Option<String>,
    /// Current owner of the lobby.
    pub owner_uuid: Option<PlayerId>,
    /// Full player list.
    pub players: Vec<Player>,
}

/// Payload of a `joined` or `leave` roster message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterUpdate {
    /// Full player list after the change.
    pub players: Vec<Player>,
    /// Owner reported alongside the change.
    pub owner: Option<PlayerId>,
}

/// Lobby configuration shown as the screen subtitle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    /// Game mode name.
    pub mode: Option<String>,
    /// Optional theme.
    pub theme: Option<String>,
    /// Optional round length in seconds.
    pub round_time: Option<u64>,
    /// Number of rounds.
    pub rounds: Option<u64>,
}

/// A validated event from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// The server identified this connection.
    Connected {
        /// The connected user's id.
        uuid: PlayerId,
    },
    /// This connection joined the lobby.
    JoinedAck(JoinedAck),
    /// Another player joined.
    PlayerJoined(RosterUpdate),
    /// A player left.
    PlayerLeft(RosterUpdate),
    /// The lobby configuration changed.
    GameOptions(GameOptions),
    /// The owner started the game.
    StartGame,
    /// The server asked clients to refresh game state in place.
    GameReload,
    /// A message state this client does not handle.
    Ignored {
        /// The unhandled event or state name.
        name: String,
    },
}

impl InboundEvent {
    /// Validates an envelope and turns it into an event.
    #[instrument(skip(envelope), fields(event = %envelope.event))]
    pub fn parse(envelope: &Envelope) -> Result<Self, PayloadError> {
        match envelope.event.as_str() {
            EVENT_JOINED => parse_joined_ack(&envelope.data).map(Self::JoinedAck),
            EVENT_CONNECTED => {
                let data = as_object(EVENT_CONNECTED, &envelope.data)?;
                let uuid = required_str(EVENT_CONNECTED, data, "uuid")?;
                Ok(Self::Connected { uuid })
            }
            EVENT_MESSAGE => parse_message(&envelope.data),
            other => {
                debug!(event = %other, "Ignoring unhandled event");
                Ok(Self::Ignored {
                    name: other.to_string(),
                })
            }
        }
    }
}

#[instrument(skip(data))]
fn parse_joined_ack(data: &Value) -> Result<JoinedAck, PayloadError> {
    let obj = as_object(EVENT_JOINED, data)?;
    let players = obj
        .get("player_data")
        .ok_or_else(|| PayloadError::new(EVENT_JOINED, "missing 'player_data'"))
        .and_then(|v| parse_players(EVENT_JOINED, v))?;
    let lobby_id = optional_str(EVENT_JOINED, obj, "lobby_id");
    let owner_uuid = optional_str(EVENT_JOINED, obj, "owner_uuid");
    if lobby_id.is_none() {
        warn!("Join acknowledgment without lobby id");
    }
    Ok(JoinedAck {
        lobby_id,
        owner_uuid,
        players,
    })
}

#[instrument(skip(data))]
fn parse_message(data: &Value) -> Result<InboundEvent, PayloadError> {
    let obj = as_object(EVENT_MESSAGE, data)?;
    let state = required_str(EVENT_MESSAGE, obj, "state")?;
    debug!(state = %state, "Parsing lobby message");
    match state.as_str() {
        "joined" => parse_roster_update(&state, obj).map(InboundEvent::PlayerJoined),
        "leave" => parse_roster_update(&state, obj).map(InboundEvent::PlayerLeft),
        "game_options" => {
            let options = obj
                .get("data")
                .ok_or_else(|| PayloadError::new(&state, "missing 'data'"))?;
            parse_game_options(options).map(InboundEvent::GameOptions)
        }
        "start_game" => Ok(InboundEvent::StartGame),
        "game_reload" => Ok(InboundEvent::GameReload),
        _ => Ok(InboundEvent::Ignored { name: state }),
    }
}

#[instrument(skip(obj))]
fn parse_roster_update(state: &str, obj: &Map<String, Value>) -> Result<RosterUpdate, PayloadError> {
    let inner = obj
        .get("payload")
        .ok_or_else(|| PayloadError::new(state, "missing 'payload'"))?;
    let inner = as_object(state, inner)?;
    let players = inner
        .get("payload")
        .ok_or_else(|| PayloadError::new(state, "missing player list"))
        .and_then(|v| parse_players(state, v))?;
    let owner = optional_str(state, inner, "owner");
    Ok(RosterUpdate { players, owner })
}

/// Parses the subtitle options of a `game_options` message.
#[instrument(skip(value))]
pub fn parse_game_options(value: &Value) -> Result<GameOptions, PayloadError> {
    let obj = as_object("game_options", value)?;
    let options = GameOptions {
        mode: optional_str("game_options", obj, "mode"),
        theme: optional_str("game_options", obj, "theme"),
        round_time: optional_count("game_options", obj, "round_time"),
        rounds: optional_count("game_options", obj, "rounds"),
    };
    if options.mode.is_none() || options.rounds.is_none() {
        warn!(options = ?options, "Game options missing mode or rounds");
    }
    Ok(options)
}

/// Parses a player list.
///
/// The list itself must be an array. Entries that are not objects or lack a
/// string `uuid` are skipped with a warning; a missing username falls back
/// to [`UNKNOWN_PLAYER`].
#[instrument(skip(value))]
pub fn parse_players(event: &str, value: &Value) -> Result<Vec<Player>, PayloadError> {
    let entries = value
        .as_array()
        .ok_or_else(|| PayloadError::new(event, "player list is not an array"))?;
    let mut players = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Some(obj) = entry.as_object() else {
            warn!(index, "Skipping player entry that is not an object");
            continue;
        };
        let Some(uuid) = obj.get("uuid").and_then(Value::as_str) else {
            warn!(index, "Skipping player entry without uuid");
            continue;
        };
        let username = match obj.get("username").and_then(Value::as_str) {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => {
                warn!(index, uuid = %uuid, "Player entry without username");
                UNKNOWN_PLAYER.to_string()
            }
        };
        let disconnected = obj
            .get("disconnected")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        players.push(Player {
            uuid: uuid.to_string(),
            username,
            disconnected,
        });
    }
    Ok(players)
}

fn as_object<'a>(event: &str, value: &'a Value) -> Result<&'a Map<String, Value>, PayloadError> {
    value
        .as_object()
        .ok_or_else(|| PayloadError::new(event, format!("expected an object, got {}", kind(value))))
}

fn required_str(event: &str, obj: &Map<String, Value>, key: &str) -> Result<String, PayloadError> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| PayloadError::new(event, format!("missing string '{}'", key)))
}

fn optional_str(event: &str, obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            warn!(event, key, kind = kind(other), "Ignoring non-string field");
            None
        }
    }
}

// Counts arrive as numbers from most servers, but form-backed servers send
// them as strings.
fn optional_count(event: &str, obj: &Map<String, Value>, key: &str) -> Option<u64> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match n.as_u64() {
            Some(count) => Some(count),
            None => {
                warn!(event, key, value = %n, "Ignoring count that is not a whole non-negative number");
                None
            }
        },
        Some(Value::String(s)) => match s.trim().parse() {
            Ok(count) => Some(count),
            Err(_) => {
                warn!(event, key, value = %s, "Ignoring count that is not a whole non-negative number");
                None
            }
        },
        Some(other) => {
            warn!(event, key, kind = kind(other), "Ignoring non-numeric field");
            None
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
