//! Tests for frame rendering and the options subtitle.

use lobby_sync::{
    Chrome, GameOptions, LobbySession, LobbyStatus, Player, Roster, compose_subtitle,
    render_frame, render_roster,
};

fn roster(ids: &[&str]) -> Roster {
    Roster::rebuild(ids.iter().map(|id| Player::new(*id, format!("user-{}", id))).collect())
}

#[test]
fn test_subtitle_with_round_time() {
    let options = GameOptions {
        mode: Some("classic".into()),
        theme: None,
        round_time: Some(60),
        rounds: Some(5),
    };
    assert_eq!(
        compose_subtitle(&options).as_deref(),
        Some("classic | 60s rounds | 5 rounds")
    );
}

#[test]
fn test_subtitle_without_round_time() {
    let options = GameOptions {
        mode: Some("classic".into()),
        theme: None,
        round_time: None,
        rounds: Some(3),
    };
    assert_eq!(compose_subtitle(&options).as_deref(), Some("classic | 3 rounds"));
}

#[test]
fn test_roster_render_is_idempotent() {
    let players = roster(&["p1", "p2", "p3"]);
    let first = render_roster(&players, Some("p2"));
    let second = render_roster(&players, Some("p2"));
    assert_eq!(first, second);
    assert_eq!(first.iter().filter(|e| e.highlighted).count(), 1);
}

#[test]
fn test_roster_render_has_no_stale_entries() {
    let before = render_roster(&roster(&["p1", "p2", "p3"]), Some("p1"));
    assert_eq!(before.len(), 3);
    let after = render_roster(&roster(&["p2"]), Some("p1"));
    let ids: Vec<&str> = after.iter().map(|e| e.uuid.as_str()).collect();
    assert_eq!(ids, ["p2"]);
    assert!(!after[0].highlighted);
}

#[test]
fn test_duplicate_ids_keep_first() {
    let players = Roster::rebuild(vec![
        Player::new("p1", "alice"),
        Player::new("p1", "impostor"),
        Player::new("", "blank"),
        Player::new("p2", "bob"),
    ]);
    let entries = render_roster(&players, None);
    let names: Vec<&str> = entries.iter().map(|e| e.username.as_str()).collect();
    assert_eq!(names, ["alice", "bob"]);
}

#[test]
fn test_frame_for_owner() {
    let mut session = LobbySession::new(Some("p1".into()));
    session.set_lobby_id("3f2a9c1b".into());
    session.set_owner("p1".into());
    let status = LobbyStatus::evaluate(2, session.is_owner());
    let frame = render_frame(
        &session,
        &roster(&["p1", "p2"]),
        None,
        None,
        status,
        true,
        Chrome::default(),
    );

    assert_eq!(frame.status, LobbyStatus::ReadyToStart);
    assert!(frame.start_enabled);
    assert_eq!(frame.lobby_id.as_deref(), Some("3f2a9c1b"));
    assert!(frame.entries[0].highlighted);
    assert_eq!(frame.max_players, 4);
    assert_eq!(frame.player_count, 2);
}

#[test]
fn test_frame_hides_subtitle_without_slot() {
    let session = LobbySession::new(Some("p1".into()));
    let chrome = Chrome {
        max_players: 8,
        show_subtitle: false,
    };
    let frame = render_frame(
        &session,
        &roster(&["p1"]),
        Some("classic | 3 rounds"),
        None,
        LobbyStatus::WaitingForPlayers,
        false,
        chrome,
    );
    assert_eq!(frame.subtitle, None);
    assert_eq!(frame.max_players, 8);
}

#[test]
fn test_frame_text_output() {
    let mut session = LobbySession::new(Some("p2".into()));
    session.set_lobby_id("abc".into());
    session.set_owner("p1".into());
    let frame = render_frame(
        &session,
        &roster(&["p1", "p2"]),
        Some("classic | 3 rounds"),
        Some("Could not read 'leave' update from the server"),
        LobbyStatus::WaitingOnHost,
        false,
        Chrome::default(),
    );
    let text = frame.to_string();

    assert!(text.starts_with("Lobby abc\nclassic | 3 rounds\nPlayers: 2/4\n"));
    assert!(text.contains("  * user-p1\n"));
    assert!(text.contains("  - user-p2\n"));
    assert!(text.contains(LobbyStatus::WaitingOnHost.message()));
    assert!(text.contains("Start: disabled"));
    assert!(text.ends_with("! Could not read 'leave' update from the server"));
}

#[test]
fn test_frame_reports_control_state_as_given() {
    let mut session = LobbySession::new(Some("p1".into()));
    session.set_owner("p1".into());
    let frame = render_frame(
        &session,
        &roster(&["p1", "p2"]),
        None,
        None,
        LobbyStatus::ReadyToStart,
        false,
        Chrome::default(),
    );
    assert_eq!(frame.status, LobbyStatus::ReadyToStart);
    assert!(!frame.start_enabled);
}
