//! Real-time channel between the lobby client and the server.

mod memory;
mod websocket;

pub use memory::{MemoryChannel, MemoryPeer};
pub use websocket::WebSocketChannel;

use crate::error::ChannelError;
use crate::protocol::{Envelope, OutboundEvent};

/// Bidirectional event channel to the lobby server.
#[async_trait::async_trait]
pub trait RealtimeChannel: Send {
    /// Sends a request to the server.
    async fn emit(&mut self, event: OutboundEvent) -> Result<(), ChannelError>;

    /// Waits for the next frame.
    ///
    /// Returns `None` once the channel has ended. Cancel safe.
    async fn recv(&mut self) -> Option<Result<Envelope, ChannelError>>;

    /// Closes the channel. Closing an already closed channel does nothing.
    async fn close(&mut self) -> Result<(), ChannelError>;

    /// Whether [`RealtimeChannel::close`] has completed.
    fn is_closed(&self) -> bool;
}
