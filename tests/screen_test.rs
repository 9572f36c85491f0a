//! Tests for the lobby screen using ratatui's test backend.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};
use serde_json::json;

use lobby_sync::{Chrome, Envelope, LobbyFrame, LobbyScreen, LobbySyncView, ScreenAction};

fn draw(frame: &LobbyFrame) -> String {
    let backend = TestBackend::new(72, 20);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal
        .draw(|f| LobbyScreen::new().render(f, frame))
        .expect("draw");
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

fn lobby_frame() -> LobbyFrame {
    let mut view = LobbySyncView::new(Some("p1".into()), Chrome::default());
    view.handle_envelope(&Envelope::new(
        "joined",
        json!({
            "lobby_id": "3f2a9c1b",
            "owner_uuid": "p1",
            "player_data": [
                {"uuid": "p1", "username": "alice"},
                {"uuid": "p2", "username": "bob", "disconnected": true}
            ]
        }),
    ));
    view.handle_envelope(&Envelope::new(
        "message",
        json!({"state": "game_options", "data": {"mode": "classic", "round_time": 60, "rounds": 5}}),
    ));
    view.frame()
}

#[test]
fn test_screen_shows_lobby() {
    let screen = draw(&lobby_frame());

    assert!(screen.contains("Lobby 3f2a9c1b"));
    assert!(screen.contains("classic | 60s rounds | 5 rounds"));
    assert!(screen.contains("Players 2/4"));
    assert!(screen.contains("alice (host)"));
    assert!(screen.contains("bob (disconnected)"));
    assert!(screen.contains("You're good to go!"));
}

#[test]
fn test_screen_shows_notice() {
    let mut frame = lobby_frame();
    frame.notice = Some("Could not read 'leave' update".into());
    assert!(draw(&frame).contains("Could not read 'leave' update"));
}

#[test]
fn test_key_mapping() {
    let mut screen = LobbyScreen::new();
    let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

    assert_eq!(screen.handle_key(press(KeyCode::Enter)), ScreenAction::ActivateStart);
    assert_eq!(screen.handle_key(press(KeyCode::Char('s'))), ScreenAction::ActivateStart);
    assert_eq!(screen.handle_key(press(KeyCode::Char('q'))), ScreenAction::Quit);
    assert_eq!(screen.handle_key(press(KeyCode::Esc)), ScreenAction::Quit);
    assert_eq!(screen.handle_key(press(KeyCode::Char('x'))), ScreenAction::Stay);
}
