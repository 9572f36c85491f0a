//! Tests for the WebSocket channel and the connect boundary against a local server.

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use lobby_sync::{
    ClientConfig, Envelope, LobbyError, OutboundEvent, RealtimeChannel, WebSocketChannel,
    connect_lobby,
};

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    (listener, format!("ws://{}", addr))
}

fn envelope_of(message: &Message) -> Envelope {
    serde_json::from_str(message.to_text().expect("text frame")).expect("envelope json")
}

#[tokio::test]
async fn test_round_trip_and_server_close() {
    let (listener, url) = bind().await;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake");

        let join = envelope_of(&ws.next().await.expect("join frame").expect("read"));
        assert_eq!(join.event, "join");
        assert!(join.data.is_null());

        ws.send(Message::Ping(Default::default()))
            .await
            .expect("send ping");
        let ack = json!({
            "event": "joined",
            "data": {"lobby_id": "3f2a9c1b", "owner_uuid": "p1", "player_data": []}
        });
        ws.send(Message::text(ack.to_string()))
            .await
            .expect("send ack");

        let start = envelope_of(&ws.next().await.expect("start frame").expect("read"));
        assert_eq!(start.event, "start-game");

        ws.close(None).await.expect("server close");
        while let Some(Ok(_)) = ws.next().await {}
    });

    let mut channel = WebSocketChannel::connect(&url).await.expect("connect");
    assert_eq!(channel.url(), url);

    channel.emit(OutboundEvent::Join).await.expect("emit join");
    let inbound = channel
        .recv()
        .await
        .expect("frame")
        .expect("valid envelope");
    assert_eq!(inbound.event, "joined");
    assert_eq!(inbound.data["lobby_id"], "3f2a9c1b");

    channel
        .emit(OutboundEvent::StartGame)
        .await
        .expect("emit start");
    assert!(channel.recv().await.is_none());

    channel.close().await.expect("close");
    channel.close().await.expect("second close");
    assert!(channel.is_closed());
    assert!(channel.recv().await.is_none());
    assert!(channel.emit(OutboundEvent::Join).await.is_err());

    server.await.expect("server task");
}

#[tokio::test]
async fn test_unreadable_frame_is_an_error_not_the_end() {
    let (listener, url) = bind().await;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake");
        ws.send(Message::text("not json")).await.expect("send junk");
        ws.send(Message::binary(
            br#"{"event":"message","data":{"state":"start_game"}}"#.to_vec(),
        ))
        .await
        .expect("send binary");
        while let Some(Ok(_)) = ws.next().await {}
    });

    let mut channel = WebSocketChannel::connect(&url).await.expect("connect");
    assert!(channel.recv().await.expect("frame").is_err());
    let next = channel.recv().await.expect("frame").expect("valid envelope");
    assert_eq!(next.event, "message");

    channel.close().await.expect("close");
    server.await.expect("server task");
}

#[tokio::test]
async fn test_connect_lobby_builds_controller() {
    let (listener, url) = bind().await;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake");
        while let Some(Ok(_)) = ws.next().await {}
    });

    let config = ClientConfig::default()
        .with_server_url(Some(url))
        .with_player_uuid(Some("p1".into()));
    let mut controller = connect_lobby(&config).await.expect("connect");
    assert_eq!(
        controller.view().session().current_user_uuid().as_deref(),
        Some("p1")
    );
    controller.unload().await.expect("unload");
    assert!(controller.channel().is_closed());

    server.await.expect("server task");
}

#[tokio::test]
async fn test_connect_lobby_rejects_bad_config() {
    let config = ClientConfig::default().with_player_uuid(Some("has space".into()));
    let err = connect_lobby(&config).await.expect_err("invalid id");
    assert!(matches!(err, LobbyError::Config(_)));
}

#[tokio::test]
async fn test_connect_lobby_reports_refused_connection() {
    let (listener, url) = bind().await;
    drop(listener);

    let config = ClientConfig::default().with_server_url(Some(url));
    let err = connect_lobby(&config).await.expect_err("nobody listening");
    assert!(matches!(err, LobbyError::Channel(_)));
}
