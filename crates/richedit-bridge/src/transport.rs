//! The raw channel to the surface.
//!
//! A transport delivers strings to the surface in send order. Delivery
//! failures are the transport's business; `send` never reports them.
//! Inbound strings are fed to `BridgeSession::handle_message` by whoever
//! owns the receiving end.

use tokio::sync::mpsc;
use tracing::debug;

pub trait Transport: Send + Sync + 'static {
    fn send(&self, message: String);
}

/// Transport backed by an unbounded tokio channel. The receiver is handed
/// to the task that talks to the surface.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Transport for ChannelTransport {
    fn send(&self, message: String) {
        if self.tx.send(message).is_err() {
            debug!("transport closed; outbound message dropped");
        }
    }
}
