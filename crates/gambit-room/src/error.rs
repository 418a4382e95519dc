//! Error types for the room layer.

use gambit_protocol::RoomCode;
use gambit_transport::ConnectionId;

use crate::RoomState;

/// Errors that can occur during room operations.
///
/// The messages of the first four variants are sent to clients verbatim
/// in `error{message}`, so they are phrased for players, not operators.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room is registered under this code.
    #[error("Room not found")]
    NotFound(RoomCode),

    /// Both seats of the room are taken.
    #[error("Room is full")]
    RoomFull(RoomCode),

    /// A room with this code is already open.
    #[error("Room already exists")]
    AlreadyExists(RoomCode),

    /// The connection already holds a seat in this room.
    #[error("Already in room")]
    AlreadyInRoom(ConnectionId, RoomCode),

    /// The connection holds no seat in this room.
    #[error("{0} is not in room {1}")]
    NotInRoom(ConnectionId, RoomCode),

    /// The player already submitted impostors.
    #[error("{0} already selected impostors in room {1}")]
    AlreadySelected(ConnectionId, RoomCode),

    /// The room is in a state that doesn't allow this operation.
    #[error("room {room_code} cannot go from {from} to {to}")]
    InvalidTransition {
        room_code: RoomCode,
        from: RoomState,
        to: RoomState,
    },

    /// The operation needs a state the room is not in.
    #[error("room {room_code} is {state}, expected {expected}")]
    WrongState {
        room_code: RoomCode,
        state: RoomState,
        expected: RoomState,
    },

    /// The relay task is gone (shut down or panicked).
    #[error("relay is unavailable")]
    Unavailable,
}
