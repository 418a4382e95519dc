//! Wire protocol for the Gambit relay.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Events** ([`ClientEvent`], [`ServerEvent`]): one tagged JSON object
//!   per frame.
//! - **Values** ([`RoomCode`], [`Color`], [`GamePhase`], [`MoveSnapshot`]):
//!   the typed fields those events carry.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how events become frames.
//! - **Errors** ([`ProtocolError`]).
//!
//! It knows nothing about connections or rooms.
//!
//! ```text
//! Transport (text frames) -> Protocol (events) -> Room (state machine)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    ClientEvent, Color, GamePhase, MoveSnapshot, RoomCode, ServerEvent,
};
