//! Tests for envelope parsing and payload validation.

use serde_json::json;

use lobby_sync::{Envelope, GameOptions, InboundEvent, OutboundEvent, UNKNOWN_PLAYER, parse_players};

fn parse(event: &str, data: serde_json::Value) -> InboundEvent {
    InboundEvent::parse(&Envelope::new(event, data)).expect("valid envelope")
}

#[test]
fn test_joined_ack_parses_players_in_order() {
    let event = parse(
        "joined",
        json!({
            "lobby_id": "3f2a9c1b",
            "owner_uuid": "p1",
            "player_data": [
                {"uuid": "p1", "username": "alice", "disconnected": false},
                {"uuid": "p2", "username": "bob", "disconnected": true}
            ]
        }),
    );
    let InboundEvent::JoinedAck(ack) = event else {
        panic!("expected join acknowledgment, got {:?}", event);
    };
    assert_eq!(ack.lobby_id.as_deref(), Some("3f2a9c1b"));
    assert_eq!(ack.owner_uuid.as_deref(), Some("p1"));
    assert_eq!(ack.players.len(), 2);
    assert_eq!(ack.players[0].username, "alice");
    assert!(!ack.players[0].disconnected);
    assert!(ack.players[1].disconnected);
}

#[test]
fn test_joined_ack_without_player_data_is_rejected() {
    let err = InboundEvent::parse(&Envelope::new("joined", json!({"lobby_id": "x"})))
        .expect_err("player_data is required");
    assert_eq!(err.event, "joined");
}

#[test]
fn test_connected_carries_uuid() {
    assert_eq!(
        parse("connected", json!({"uuid": "p7"})),
        InboundEvent::Connected { uuid: "p7".into() }
    );
}

#[test]
fn test_roster_messages_map_to_join_and_leave() {
    let data = |state: &str| {
        json!({"state": state, "payload": {"payload": [{"uuid": "p1", "username": "alice"}], "owner": "p1"}})
    };
    let InboundEvent::PlayerJoined(joined) = parse("message", data("joined")) else {
        panic!("expected player joined");
    };
    assert_eq!(joined.owner.as_deref(), Some("p1"));
    assert_eq!(joined.players.len(), 1);

    assert!(matches!(
        parse("message", data("leave")),
        InboundEvent::PlayerLeft(_)
    ));
}

#[test]
fn test_roster_message_without_owner_keeps_none() {
    let InboundEvent::PlayerLeft(update) = parse(
        "message",
        json!({"state": "leave", "payload": {"payload": []}}),
    ) else {
        panic!("expected player left");
    };
    assert!(update.players.is_empty());
    assert_eq!(update.owner, None);
}

#[test]
fn test_game_options_message() {
    let event = parse(
        "message",
        json!({"state": "game_options", "data": {"mode": "classic", "theme": null, "round_time": 60, "rounds": 5}}),
    );
    assert_eq!(
        event,
        InboundEvent::GameOptions(GameOptions {
            mode: Some("classic".into()),
            theme: None,
            round_time: Some(60),
            rounds: Some(5),
        })
    );
}

#[test]
fn test_game_options_without_data_is_rejected() {
    let err = InboundEvent::parse(&Envelope::new("message", json!({"state": "game_options"})))
        .expect_err("data is required");
    assert_eq!(err.event, "game_options");
}

#[test]
fn test_control_states() {
    assert_eq!(parse("message", json!({"state": "start_game"})), InboundEvent::StartGame);
    assert_eq!(parse("message", json!({"state": "game_reload"})), InboundEvent::GameReload);
}

#[test]
fn test_unhandled_states_and_events_are_ignored() {
    for state in ["start_round", "drawer", "chat"] {
        assert_eq!(
            parse("message", json!({"state": state})),
            InboundEvent::Ignored { name: state.into() }
        );
    }
    assert_eq!(
        parse("heartbeat", serde_json::Value::Null),
        InboundEvent::Ignored {
            name: "heartbeat".into()
        }
    );
}

#[test]
fn test_message_without_state_is_rejected() {
    assert!(InboundEvent::parse(&Envelope::new("message", json!({"payload": {}}))).is_err());
    assert!(InboundEvent::parse(&Envelope::new("message", json!("start_game"))).is_err());
}

#[test]
fn test_bad_player_entries_are_skipped() {
    let players = parse_players(
        "joined",
        &json!([
            {"uuid": "p1", "username": "alice"},
            "not a player",
            {"username": "no id"},
            {"uuid": "p2"},
            {"uuid": "p3", "username": "   "}
        ]),
    )
    .expect("list is an array");
    let ids: Vec<&str> = players.iter().map(|p| p.uuid.as_str()).collect();
    assert_eq!(ids, ["p1", "p2", "p3"]);
    assert_eq!(players[1].username, UNKNOWN_PLAYER);
    assert_eq!(players[2].username, UNKNOWN_PLAYER);
}

#[test]
fn test_outbound_names() {
    assert_eq!(OutboundEvent::Join.to_envelope().event, "join");
    assert_eq!(OutboundEvent::StartGame.to_envelope().event, "start-game");
    assert!(OutboundEvent::StartGame.to_envelope().data.is_null());
}

#[test]
fn test_envelope_json_shape() {
    let envelope: Envelope =
        serde_json::from_str(r#"{"event":"message","data":{"state":"start_game"}}"#)
            .expect("valid json");
    assert_eq!(envelope.event, "message");

    let bare: Envelope = serde_json::from_str(r#"{"event":"join"}"#).expect("data defaults");
    assert!(bare.data.is_null());
}
