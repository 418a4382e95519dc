//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into a frame).
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Deserialization failed (turning a frame into a Rust value).
    ///
    /// Common causes: malformed JSON, an unknown `type` tag, or a missing
    /// `roomCode`.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}
