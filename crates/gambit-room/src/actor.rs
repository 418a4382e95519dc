//! Relay actor: a single Tokio task that owns the [`Relay`].
//!
//! Connection handlers never touch rooms directly. They send commands
//! through a [`RelayHandle`], and the actor applies them one at a time in
//! arrival order. That single consumer is the serialization point for the
//! whole server: no locks, and every broadcast caused by one event is
//! enqueued before the next event is looked at.

use gambit_protocol::{ClientEvent, RoomCode};
use gambit_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};

use crate::{ClientSender, Relay, RoomError, RoomInfo, RoomStore};

/// Default command channel size for the relay actor.
pub const DEFAULT_CHANNEL_SIZE: usize = 256;

/// Commands sent to the relay actor through its channel.
///
/// The `oneshot::Sender` in some variants is a reply channel: the caller
/// sends a command and waits for the answer on it.
pub(crate) enum RelayCommand {
    /// Register a connection's outbound channel.
    Connect {
        id: ConnectionId,
        sender: ClientSender,
    },

    /// Apply an inbound event.
    Event {
        sender: ConnectionId,
        event: ClientEvent,
    },

    /// Tear down the connection's rooms and forget it.
    Disconnect {
        id: ConnectionId,
        reply: oneshot::Sender<usize>,
    },

    /// Request a copy of one room.
    RoomInfo {
        room_code: RoomCode,
        reply: oneshot::Sender<Option<RoomInfo>>,
    },

    /// Request the number of open rooms.
    RoomCount { reply: oneshot::Sender<usize> },

    /// Stop the actor.
    Shutdown,
}

/// Handle to the running relay actor.
///
/// Cheap to clone: it's just an `mpsc::Sender` wrapper. Every connection
/// task holds one.
#[derive(Clone)]
pub struct RelayHandle {
    sender: mpsc::Sender<RelayCommand>,
}

impl RelayHandle {
    /// Registers a connection. Must be awaited before the connection's
    /// first [`dispatch`](Self::dispatch) so replies have somewhere to go.
    pub async fn connect(
        &self,
        id: ConnectionId,
        sender: ClientSender,
    ) -> Result<(), RoomError> {
        self.send(RelayCommand::Connect { id, sender }).await
    }

    /// Queues an inbound event (fire-and-forget).
    pub async fn dispatch(
        &self,
        sender: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), RoomError> {
        self.send(RelayCommand::Event { sender, event }).await
    }

    /// Disconnects a connection and returns how many rooms were deleted.
    pub async fn disconnect(
        &self,
        id: ConnectionId,
    ) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RelayCommand::Disconnect {
            id,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Returns a copy of the room, or `None` if no room has this code.
    ///
    /// Answered after every command queued before it, so it doubles as a
    /// barrier for callers that want to observe their own events.
    pub async fn room_info(
        &self,
        room_code: RoomCode,
    ) -> Result<Option<RoomInfo>, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RelayCommand::RoomInfo {
            room_code,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Returns the number of open rooms.
    pub async fn room_count(&self) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RelayCommand::RoomCount { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Tells the actor to stop. Commands already queued are processed first.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RelayCommand::Shutdown).await
    }

    async fn send(&self, cmd: RelayCommand) -> Result<(), RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::Unavailable)
    }
}

/// The actor state. Runs inside a Tokio task.
struct RelayActor {
    relay: Relay,
    receiver: mpsc::Receiver<RelayCommand>,
}

impl RelayActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!("relay started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RelayCommand::Connect { id, sender } => {
                    self.relay.connect(id, sender);
                }
                RelayCommand::Event { sender, event } => {
                    self.relay.handle(sender, event);
                }
                RelayCommand::Disconnect { id, reply } => {
                    let closed = self.relay.disconnect(id);
                    let _ = reply.send(closed);
                }
                RelayCommand::RoomInfo { room_code, reply } => {
                    let _ = reply.send(self.relay.room_info(&room_code));
                }
                RelayCommand::RoomCount { reply } => {
                    let _ = reply.send(self.relay.rooms().len());
                }
                RelayCommand::Shutdown => {
                    let connections = self.relay.connections();
                    if !connections.is_empty() {
                        tracing::debug!(
                            live = connections.len(),
                            "connections still registered at shutdown"
                        );
                    }
                    tracing::info!(
                        rooms = self.relay.rooms().len(),
                        "relay shutting down"
                    );
                    break;
                }
            }
        }

        tracing::info!("relay stopped");
    }
}

/// Spawns the relay actor around `store` and returns a handle to it.
///
/// `channel_size` bounds the command queue; when it fills up, senders
/// wait.
pub fn spawn_relay(store: RoomStore, channel_size: usize) -> RelayHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RelayActor {
        relay: Relay::new(store),
        receiver: rx,
    };
    tokio::spawn(actor.run());

    RelayHandle { sender: tx }
}
