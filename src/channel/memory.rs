//! In-process channel used by tests and the replay tool.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc;
use tracing::{debug, instrument};

use super::RealtimeChannel;
use crate::error::ChannelError;
use crate::protocol::{Envelope, OutboundEvent};

/// Client end of an in-memory channel.
#[derive(Debug)]
pub struct MemoryChannel {
    inbound: mpsc::UnboundedReceiver<Envelope>,
    outbound: mpsc::UnboundedSender<Envelope>,
    closes: Arc<AtomicUsize>,
    closed: bool,
}

/// Server end of an in-memory channel.
#[derive(Debug)]
pub struct MemoryPeer {
    to_client: mpsc::UnboundedSender<Envelope>,
    from_client: mpsc::UnboundedReceiver<Envelope>,
    closes: Arc<AtomicUsize>,
}

impl MemoryChannel {
    /// Creates a connected client/server pair.
    #[instrument]
    pub fn pair() -> (MemoryChannel, MemoryPeer) {
        let (to_client, inbound) = mpsc::unbounded_channel();
        let (outbound, from_client) = mpsc::unbounded_channel();
        let closes = Arc::new(AtomicUsize::new(0));
        let channel = MemoryChannel {
            inbound,
            outbound,
            closes: Arc::clone(&closes),
            closed: false,
        };
        let peer = MemoryPeer {
            to_client,
            from_client,
            closes,
        };
        (channel, peer)
    }
}

#[async_trait::async_trait]
impl RealtimeChannel for MemoryChannel {
    #[instrument(skip(self))]
    async fn emit(&mut self, event: OutboundEvent) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::new("emit on closed channel"));
        }
        self.outbound
            .send(event.to_envelope())
            .map_err(|_| ChannelError::new("peer dropped"))
    }

    async fn recv(&mut self) -> Option<Result<Envelope, ChannelError>> {
        if self.closed {
            return None;
        }
        self.inbound.recv().await.map(Ok)
    }

    #[instrument(skip(self))]
    async fn close(&mut self) -> Result<(), ChannelError> {
        if self.closed {
            debug!("Memory channel already closed");
            return Ok(());
        }
        self.closed = true;
        self.inbound.close();
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl MemoryPeer {
    /// Pushes a frame to the client.
    #[instrument(skip(self, envelope), fields(event = %envelope.event))]
    pub fn send(&self, envelope: Envelope) -> Result<(), ChannelError> {
        self.to_client
            .send(envelope)
            .map_err(|_| ChannelError::new("client dropped"))
    }

    /// Takes the next frame the client emitted, if one is waiting.
    pub fn try_recv(&mut self) -> Option<Envelope> {
        self.from_client.try_recv().ok()
    }

    /// Waits for the next frame the client emits.
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.from_client.recv().await
    }

    /// How many times the client closed the channel.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}
