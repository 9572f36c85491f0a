//! Lobby screen: draws a [`LobbyFrame`] and maps keys to actions.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use tracing::{debug, instrument};

use crate::lobby::render::{LobbyFrame, LobbyStatus, RosterEntry};

/// What a key press asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    /// Nothing to do.
    Stay,
    /// Activate the start control.
    ActivateStart,
    /// Leave the lobby and exit.
    Quit,
}

/// The lobby screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct LobbyScreen;

impl LobbyScreen {
    /// Creates the screen.
    pub fn new() -> Self {
        Self
    }

    /// Renders the frame.
    #[instrument(skip_all)]
    pub fn render(&self, frame: &mut Frame, lobby: &LobbyFrame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(4),
                Constraint::Length(5),
                Constraint::Length(3),
            ])
            .split(area);

        let title_text = match &lobby.lobby_id {
            Some(id) => format!("Lobby {}", id),
            None => "Lobby".to_string(),
        };
        let mut header = vec![Line::from(Span::styled(
            title_text,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))];
        if let Some(subtitle) = &lobby.subtitle {
            header.push(Line::from(Span::styled(
                subtitle.clone(),
                Style::default().fg(Color::Gray),
            )));
        }
        let title = Paragraph::new(header)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let items: Vec<ListItem> = lobby.entries.iter().map(roster_item).collect();
        let list_title = format!("Players {}/{}", lobby.player_count, lobby.max_players);
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(list_title));
        frame.render_widget(list, chunks[1]);

        let status_color = match lobby.status {
            LobbyStatus::ReadyToStart => Color::Green,
            LobbyStatus::WaitingOnHost | LobbyStatus::WaitingForPlayers => Color::Yellow,
            LobbyStatus::Connecting => Color::DarkGray,
        };
        let (button_text, button_style) = if lobby.start_enabled {
            (
                "[ Start game ]",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("[ Start game ]", Style::default().fg(Color::DarkGray))
        };
        let mut status_lines = vec![
            Line::from(Span::styled(
                lobby.status.message(),
                Style::default().fg(status_color),
            )),
            Line::from(Span::styled(button_text, button_style)),
        ];
        if let Some(notice) = &lobby.notice {
            status_lines.push(Line::from(Span::styled(
                notice.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        let status = Paragraph::new(status_lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        frame.render_widget(status, chunks[2]);

        let help = Paragraph::new("Enter/s: Start game | q: Leave lobby")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);
    }

    /// Maps a key event to an action.
    #[instrument(skip(self, key))]
    pub fn handle_key(&mut self, key: KeyEvent) -> ScreenAction {
        let action = match key.code {
            KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => ScreenAction::ActivateStart,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => ScreenAction::Quit,
            _ => ScreenAction::Stay,
        };
        debug!(code = ?key.code, action = ?action, "Key handled");
        action
    }
}

fn roster_item(entry: &RosterEntry) -> ListItem<'static> {
    let mut text = entry.username.clone();
    if entry.highlighted {
        text.push_str(" (host)");
    }
    if entry.disconnected {
        text.push_str(" (disconnected)");
    }
    let style = if entry.highlighted {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else if entry.disconnected {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    ListItem::new(text).style(style)
}
