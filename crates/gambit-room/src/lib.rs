//! Rooms and the event relay for Gambit.
//!
//! A room pairs two connections for one match. The relay binds each inbound
//! client event to a room transition and fans the resulting server events
//! out to the room's members. All of it runs inside one Tokio task (the
//! relay actor), so events are applied strictly one at a time.
//!
//! # Key types
//!
//! - [`RelayHandle`]: send events to the running relay actor
//! - [`Relay`]: the synchronous event relay the actor owns
//! - [`RoomStore`]: code-to-room mapping
//! - [`Room`]: seats, readiness and the last move snapshot
//! - [`RoomState`]: `Waiting -> Selecting -> Playing`
//! - [`ConnectionRegistry`]: outbound channel per live connection

mod actor;
mod error;
mod registry;
mod relay;
mod room;
mod state;
mod store;

pub use actor::{DEFAULT_CHANNEL_SIZE, RelayHandle, spawn_relay};
pub use error::RoomError;
pub use registry::{ClientSender, ConnectionRegistry};
pub use relay::{Recipient, Relay};
pub use room::{MAX_PLAYERS, Player, Readiness, Room, RoomInfo};
pub use state::RoomState;
pub use store::RoomStore;
