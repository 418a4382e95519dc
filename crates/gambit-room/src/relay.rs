//! The event relay: binds each inbound event to a room transition and fans
//! the resulting events out to room members.
//!
//! [`Relay`] is plain synchronous code. Every call runs to completion and
//! enqueues all of its outbound events before returning, which is what
//! gives the relay its ordering guarantee once a single task owns it (see
//! [`spawn_relay`](crate::spawn_relay)).

use gambit_protocol::{ClientEvent, Color, MoveSnapshot, RoomCode, ServerEvent};
use gambit_transport::ConnectionId;
use serde_json::Value;

use crate::{
    ClientSender, ConnectionRegistry, Readiness, RoomError, RoomInfo,
    RoomState, RoomStore,
};

/// Who should receive an outbound event, relative to one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every seated player.
    All,
    /// One connection, seated or not.
    Player(ConnectionId),
    /// Every seated player except this one.
    AllExcept(ConnectionId),
}

/// Owns the room store and the connection registry and applies events.
#[derive(Debug, Default)]
pub struct Relay {
    rooms: RoomStore,
    connections: ConnectionRegistry,
}

impl Relay {
    /// Creates a relay around an injected store.
    pub fn new(rooms: RoomStore) -> Self {
        Self {
            rooms,
            connections: ConnectionRegistry::new(),
        }
    }

    pub fn rooms(&self) -> &RoomStore {
        &self.rooms
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    pub fn room_info(&self, code: &RoomCode) -> Option<RoomInfo> {
        self.rooms.get(code).ok().map(|room| room.info())
    }

    /// Registers a live connection and its outbound channel.
    pub fn connect(&mut self, id: ConnectionId, sender: ClientSender) {
        if !self.connections.register(id, sender) {
            tracing::warn!(conn_id = %id, "connection id registered twice");
        }
    }

    /// Applies one inbound event from `sender`.
    pub fn handle(&mut self, sender: ConnectionId, event: ClientEvent) {
        tracing::debug!(conn_id = %sender, event = event.kind(), room_code = %event.room_code(), "event received");

        match event {
            ClientEvent::CreateRoom { room_code } => {
                self.create_room(sender, room_code);
            }
            ClientEvent::JoinRoom { room_code } => {
                self.join_room(sender, room_code);
            }
            ClientEvent::SetImpostors {
                room_code,
                impostors,
            } => {
                self.set_impostors(sender, room_code, impostors);
            }
            ClientEvent::MakeMove {
                room_code,
                snapshot,
            } => {
                self.make_move(room_code, snapshot);
            }
            ClientEvent::ActivateImpostor {
                room_code,
                position,
            } => {
                self.forward(
                    &room_code,
                    ServerEvent::ImpostorActivated { position },
                );
            }
            ClientEvent::GameOver { room_code, winner } => {
                self.forward(&room_code, ServerEvent::GameEnded { winner });
            }
        }
    }

    /// Tears down every room `id` is seated in, notifies the players left
    /// behind, and forgets the connection.
    ///
    /// Returns the number of rooms deleted.
    pub fn disconnect(&mut self, id: ConnectionId) -> usize {
        let codes = self.rooms.rooms_of(id);
        for code in &codes {
            if let Some(room) = self.rooms.delete(code) {
                self.dispatch(
                    &room.members(),
                    vec![(
                        Recipient::AllExcept(id),
                        ServerEvent::OpponentDisconnected,
                    )],
                );
            }
        }
        self.connections.unregister(id);
        tracing::debug!(conn_id = %id, rooms_closed = codes.len(), "connection removed");
        codes.len()
    }

    // -- Handlers ----------------------------------------------------------

    fn create_room(&mut self, sender: ConnectionId, room_code: RoomCode) {
        match self.rooms.create(room_code.clone(), sender) {
            Ok(room) => {
                let color = room.players()[0].color;
                self.connections.send_to(
                    sender,
                    ServerEvent::RoomCreated { room_code, color },
                );
            }
            Err(e) => self.reject(sender, e),
        }
    }

    fn join_room(&mut self, sender: ConnectionId, room_code: RoomCode) {
        let joined: Result<(Color, Vec<ConnectionId>, RoomState), RoomError> =
            match self.rooms.get_mut(&room_code) {
                Ok(room) => room
                    .join(sender)
                    .map(|color| (color, room.members(), room.state())),
                Err(e) => Err(e),
            };

        match joined {
            Ok((color, members, state)) => {
                let mut msgs = vec![
                    (
                        Recipient::Player(sender),
                        ServerEvent::RoomJoined { room_code, color },
                    ),
                    (Recipient::All, ServerEvent::OpponentJoined),
                ];
                msgs.extend(phase_update(state));
                self.dispatch(&members, msgs);
            }
            Err(e) => self.reject(sender, e),
        }
    }

    fn set_impostors(
        &mut self,
        sender: ConnectionId,
        room_code: RoomCode,
        impostors: Value,
    ) {
        let Ok(room) = self.rooms.get_mut(&room_code) else {
            tracing::debug!(%room_code, "setImpostors for unknown room dropped");
            return;
        };

        match room.select_impostors(sender, impostors) {
            Ok(Readiness::WaitingForOpponent) => {
                self.connections
                    .send_to(sender, ServerEvent::WaitingForOpponent);
            }
            Ok(Readiness::AllReady) => {
                let members = room.members();
                let msgs = phase_update(room.state()).into_iter().collect();
                self.dispatch(&members, msgs);
            }
            Err(e) => {
                tracing::debug!(conn_id = %sender, error = %e, "setImpostors ignored");
            }
        }
    }

    fn make_move(&mut self, room_code: RoomCode, snapshot: MoveSnapshot) {
        let Ok(room) = self.rooms.get_mut(&room_code) else {
            tracing::debug!(%room_code, "makeMove for unknown room dropped");
            return;
        };
        room.record_move(snapshot.clone());
        let members = room.members();
        self.dispatch(
            &members,
            vec![(Recipient::All, ServerEvent::MoveMade(snapshot))],
        );
    }

    /// Broadcasts a pass-through event to a room without touching it.
    fn forward(&self, room_code: &RoomCode, event: ServerEvent) {
        match self.rooms.get(room_code) {
            Ok(room) => {
                self.dispatch(&room.members(), vec![(Recipient::All, event)]);
            }
            Err(_) => {
                tracing::debug!(%room_code, "event for unknown room dropped");
            }
        }
    }

    /// Surfaces a rejected create/join to the requesting connection only.
    fn reject(&self, sender: ConnectionId, error: RoomError) {
        tracing::debug!(conn_id = %sender, error = ?error, "request rejected");
        self.connections.send_to(
            sender,
            ServerEvent::Error {
                message: error.to_string(),
            },
        );
    }

    /// Delivers events in order to the recipients drawn from `members`.
    fn dispatch(
        &self,
        members: &[ConnectionId],
        msgs: Vec<(Recipient, ServerEvent)>,
    ) {
        for (recipient, event) in msgs {
            match recipient {
                Recipient::All => {
                    for id in members {
                        self.connections.send_to(*id, event.clone());
                    }
                }
                Recipient::Player(id) => {
                    self.connections.send_to(id, event);
                }
                Recipient::AllExcept(excluded) => {
                    for id in members {
                        if *id != excluded {
                            self.connections.send_to(*id, event.clone());
                        }
                    }
                }
            }
        }
    }
}

/// The `gameStateUpdate` broadcast announcing `state`, if it is announced.
fn phase_update(state: RoomState) -> Option<(Recipient, ServerEvent)> {
    state.phase().map(|game_state| {
        (Recipient::All, ServerEvent::GameStateUpdate { game_state })
    })
}
