//! Connection registry: live connections and their outbound channels.

use std::collections::HashMap;

use gambit_protocol::ServerEvent;
use gambit_transport::ConnectionId;
use tokio::sync::mpsc;

/// Channel sender for delivering outbound events to one connection.
///
/// Unbounded so that fan-out never waits on a slow client.
pub type ClientSender = mpsc::UnboundedSender<ServerEvent>;

/// Tracks every live connection by id.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    senders: HashMap<ConnectionId, ClientSender>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection. Returns `false` if the id was already
    /// registered, in which case the sender is replaced.
    pub fn register(&mut self, id: ConnectionId, sender: ClientSender) -> bool {
        let fresh = self.senders.insert(id, sender).is_none();
        tracing::debug!(conn_id = %id, live = self.senders.len(), "connection registered");
        fresh
    }

    /// Forgets a connection. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: ConnectionId) -> bool {
        self.senders.remove(&id).is_some()
    }

    /// Enqueues `event` for one connection.
    ///
    /// Silently drops the event if the connection is unknown or its
    /// receiver is gone (the socket is already closing).
    pub fn send_to(&self, id: ConnectionId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&id) {
            if sender.send(event).is_err() {
                tracing::debug!(conn_id = %id, "outbound channel closed, event dropped");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, id: ConnectionId) -> bool {
        self.senders.contains_key(&id)
    }

    /// Returns the number of live connections.
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}
