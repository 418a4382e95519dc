//! Unified error type for the Gambit server.

use gambit_protocol::ProtocolError;
use gambit_room::RoomError;
use gambit_transport::TransportError;

use crate::ConfigError;

/// Top-level error that wraps every crate-specific error.
///
/// `#[from]` on each variant lets `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum GambitError {
    /// Binding, accepting, or a socket read/write failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The relay rejected a request or is no longer running.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The environment holds an invalid setting.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
