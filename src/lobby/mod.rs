//! Lobby system: roster sync, status banner, start control and the screen that shows them.

mod controller;
mod render;
mod screen;
mod start_control;
mod view;

pub use controller::{LobbyController, LoggingReloadHook, ReloadHook};
pub use render::{
    Chrome, LobbyFrame, LobbyStatus, MIN_PLAYERS_TO_START, RosterEntry, SUBTITLE_SEPARATOR,
    compose_subtitle, render_frame, render_roster,
};
pub use screen::{LobbyScreen, ScreenAction};
pub use start_control::{HandlerId, StartControl};
pub use view::{LobbySyncView, ViewEffect};
