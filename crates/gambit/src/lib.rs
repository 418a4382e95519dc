//! # Gambit
//!
//! Room-based WebSocket relay for two-player impostor chess.
//!
//! Clients open a room under a code of their choosing, a second client
//! joins it, both submit their impostor selections, and from then on the
//! server relays moves, impostor reveals and the game-over notice between
//! them. The server judges nothing: payloads are forwarded as sent.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gambit::prelude::*;
//!
//! # async fn start() -> Result<(), GambitError> {
//! let server = GambitServer::builder()
//!     .bind("0.0.0.0:3001")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{ConfigError, DEFAULT_HOST, DEFAULT_PORT, ServerConfig};
pub use error::GambitError;
pub use server::{GambitServer, GambitServerBuilder};

/// Everything needed to run a server and talk about its events.
pub mod prelude {
    pub use crate::{
        ConfigError, GambitError, GambitServer, GambitServerBuilder,
        ServerConfig,
    };
    pub use gambit_protocol::{
        ClientEvent, Codec, Color, GamePhase, JsonCodec, MoveSnapshot,
        ProtocolError, RoomCode, ServerEvent,
    };
    pub use gambit_room::{RelayHandle, RoomError, RoomInfo, RoomState};
    pub use gambit_transport::{ConnectionId, TransportError};
}
