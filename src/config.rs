//! Client configuration loaded from TOML.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::error::ConfigError;
use crate::lobby::Chrome;
use crate::session::is_valid_player_id;

/// Configuration for the lobby client.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// WebSocket URL of the lobby server.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// Id of the user this client acts for. When absent the server's
    /// `connected` event supplies it.
    #[serde(default)]
    player_uuid: Option<String>,

    /// Lobby capacity shown next to the player count.
    #[serde(default = "default_max_players")]
    max_players: usize,

    /// Whether the lobby screen shows the options subtitle.
    #[serde(default = "default_show_subtitle")]
    show_subtitle: bool,

    /// File that receives logs while the terminal UI is running.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

#[instrument]
fn default_server_url() -> String {
    "ws://127.0.0.1:5000/lobby".to_string()
}

#[instrument]
fn default_max_players() -> usize {
    4
}

#[instrument]
fn default_show_subtitle() -> bool {
    true
}

#[instrument]
fn default_log_file() -> PathBuf {
    PathBuf::from("lobby_sync.log")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            player_uuid: None,
            max_players: default_max_players(),
            show_subtitle: default_show_subtitle(),
            log_file: default_log_file(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that parse but cannot be used.
    ///
    /// Run again after command-line overrides are applied.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_players == 0 {
            return Err(ConfigError::new("max_players must be at least 1"));
        }
        if let Some(uuid) = &self.player_uuid {
            if !is_valid_player_id(uuid) {
                return Err(ConfigError::new(format!(
                    "player_uuid '{}' must be non-empty and contain no whitespace",
                    uuid
                )));
            }
        }
        if !(self.server_url.starts_with("ws://") || self.server_url.starts_with("wss://")) {
            return Err(ConfigError::new(format!(
                "server_url '{}' must use ws:// or wss://",
                self.server_url
            )));
        }
        Ok(())
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Overrides the server URL.
    #[must_use]
    pub fn with_server_url(mut self, server_url: Option<String>) -> Self {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        self
    }

    /// Overrides the player id.
    #[must_use]
    pub fn with_player_uuid(mut self, player_uuid: Option<String>) -> Self {
        if player_uuid.is_some() {
            self.player_uuid = player_uuid;
        }
        self
    }

    /// Screen settings derived from this config.
    pub fn chrome(&self) -> Chrome {
        Chrome {
            max_players: self.max_players,
            show_subtitle: self.show_subtitle,
        }
    }
}
