//! WebSocket channel carrying JSON envelopes in text frames.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, instrument, trace, warn};

use super::RealtimeChannel;
use crate::error::ChannelError;
use crate::protocol::{Envelope, OutboundEvent};

/// Lobby channel over a WebSocket connection.
pub struct WebSocketChannel {
    url: String,
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    closed: bool,
}

impl WebSocketChannel {
    /// Opens a connection to the lobby server.
    #[instrument]
    pub async fn connect(url: &str) -> Result<Self, ChannelError> {
        info!(url = %url, "Connecting to lobby server");
        let (socket, response) = connect_async(url).await.map_err(|e| {
            warn!(error = %e, url = %url, "WebSocket connect failed");
            ChannelError::from(e)
        })?;
        debug!(status = %response.status(), "WebSocket handshake complete");
        Ok(Self {
            url: url.to_string(),
            socket,
            closed: false,
        })
    }

    /// Server URL this channel is connected to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Debug for WebSocketChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketChannel")
            .field("url", &self.url)
            .field("closed", &self.closed)
            .finish()
    }
}

#[async_trait::async_trait]
impl RealtimeChannel for WebSocketChannel {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn emit(&mut self, event: OutboundEvent) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::new("emit on closed channel"));
        }
        let text = serde_json::to_string(&event.to_envelope())?;
        debug!(frame = %text, "Sending frame");
        self.socket.send(Message::text(text)).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<Envelope, ChannelError>> {
        if self.closed {
            return None;
        }
        loop {
            let message = match self.socket.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(ChannelError::from(e))),
            };
            match message {
                Message::Text(text) => {
                    trace!(frame = %text.as_str(), "Received frame");
                    return Some(serde_json::from_str(text.as_str()).map_err(ChannelError::from));
                }
                Message::Binary(bytes) => {
                    return Some(serde_json::from_slice(&bytes).map_err(ChannelError::from));
                }
                Message::Close(frame) => {
                    info!(frame = ?frame, "Server closed the channel");
                    return None;
                }
                // Ping replies are queued by tungstenite itself.
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn close(&mut self) -> Result<(), ChannelError> {
        if self.closed {
            debug!("WebSocket already closed");
            return Ok(());
        }
        self.closed = true;
        info!("Closing lobby channel");
        match self.socket.close(None).await {
            Ok(()) => Ok(()),
            Err(
                tokio_tungstenite::tungstenite::Error::ConnectionClosed
                | tokio_tungstenite::tungstenite::Error::AlreadyClosed,
            ) => Ok(()),
            Err(e) => Err(ChannelError::from(e)),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
