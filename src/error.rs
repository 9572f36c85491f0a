//! Error types for the lobby client.
//!
//! Every error records the source location that created it, so a log line is
//! enough to find the failing call site.

use derive_more::{Display, Error, From};
use tracing::instrument;

/// A lobby event payload did not have the expected shape.
#[derive(Debug, Clone, Display, Error)]
#[display("Payload error in '{}': {} at {}:{}", event, message, file, line)]
pub struct PayloadError {
    /// Name of the event whose payload was rejected.
    pub event: String,
    /// What was wrong with the payload.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl PayloadError {
    /// Creates a new payload error with caller location tracking.
    #[track_caller]
    #[instrument(skip(event, message))]
    pub fn new(event: impl Into<String>, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            event: event.into(),
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// The real-time channel failed.
#[derive(Debug, Clone, Display, Error)]
#[display("Channel error: {} at {}:{}", message, file, line)]
pub struct ChannelError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ChannelError {
    /// Creates a new channel error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ChannelError {
    #[track_caller]
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::new(format!("WebSocket error: {}", err))
    }
}

impl From<serde_json::Error> for ChannelError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Malformed frame: {}", err))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Any error raised by the lobby client.
#[derive(Debug, Clone, Display, Error, From)]
pub enum LobbyError {
    /// Invalid event payload.
    #[display("{}", _0)]
    Payload(PayloadError),
    /// Channel failure.
    #[display("{}", _0)]
    Channel(ChannelError),
    /// Configuration failure.
    #[display("{}", _0)]
    Config(ConfigError),
}
