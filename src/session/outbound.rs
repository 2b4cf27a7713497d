//! Transport seam.
//!
//! The session layer never touches sockets. It hands messages to an
//! `Outbound`, which routes them to whatever transport a connection uses.

use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use tracing::{trace, warn};

use super::protocol::ServerMessage;
use crate::core::ConnectionId;

/// Delivers server messages to connections.
///
/// Delivery is best-effort: a closed or unknown connection drops the
/// message.
pub trait Outbound: Send + Sync + 'static {
    fn send(&self, conn: ConnectionId, message: ServerMessage);

    fn send_all(&self, conns: &[ConnectionId], message: &ServerMessage) {
        for &conn in conns {
            self.send(conn, message.clone());
        }
    }
}

/// One unbounded channel per connection.
#[derive(Clone, Default)]
pub struct ChannelOutbound {
    senders: Arc<RwLock<FxHashMap<ConnectionId, mpsc::UnboundedSender<ServerMessage>>>>,
}

impl ChannelOutbound {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a channel for `conn`, replacing any previous one.
    pub fn register(&self, conn: ConnectionId) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        match self.senders.write() {
            Ok(mut senders) => {
                senders.insert(conn, tx);
            }
            Err(_) => warn!(%conn, "outbound registry lock poisoned"),
        }
        rx
    }

    pub fn unregister(&self, conn: ConnectionId) {
        if let Ok(mut senders) = self.senders.write() {
            senders.remove(&conn);
        }
    }

    #[must_use]
    pub fn is_registered(&self, conn: ConnectionId) -> bool {
        self.senders
            .read()
            .map(|senders| senders.contains_key(&conn))
            .unwrap_or(false)
    }
}

impl Outbound for ChannelOutbound {
    fn send(&self, conn: ConnectionId, message: ServerMessage) {
        let Ok(senders) = self.senders.read() else {
            warn!(%conn, "outbound registry lock poisoned");
            return;
        };
        match senders.get(&conn) {
            Some(tx) => {
                if tx.send(message).is_err() {
                    trace!(%conn, "receiver dropped");
                }
            }
            None => trace!(%conn, "no channel for connection"),
        }
    }
}
