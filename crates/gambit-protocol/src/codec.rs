//! Codec trait and the JSON implementation.
//!
//! A codec converts between Rust types and the text frames the transport
//! carries. The relay only ever talks to the [`Codec`] trait, so the wire
//! format can change without touching room logic.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values into text frames and decodes frames back.
///
/// `Send + Sync + 'static` lets one codec be shared by every connection
/// task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes a frame back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the frame is malformed or does
    /// not match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        frame: &str,
    ) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use gambit_protocol::{ClientEvent, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let event: ClientEvent =
///     codec.decode(r#"{"type":"joinRoom","roomCode":"R1"}"#).unwrap();
/// assert_eq!(event.room_code().as_str(), "R1");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        frame: &str,
    ) -> Result<T, ProtocolError> {
        serde_json::from_str(frame).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientEvent, Color, ServerEvent};

    #[test]
    fn test_json_codec_encodes_server_event_as_single_line() {
        let frame = JsonCodec
            .encode(&ServerEvent::RoomJoined {
                room_code: "R1".into(),
                color: Color::Black,
            })
            .unwrap();
        assert!(!frame.contains('\n'));
        assert!(frame.contains(r#""type":"roomJoined""#));
        assert!(frame.contains(r#""color":"black""#));
    }

    #[test]
    fn test_json_codec_decode_garbage_returns_decode_error() {
        let result: Result<ClientEvent, _> = JsonCodec.decode("not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_decode_wrong_shape_returns_decode_error() {
        let result: Result<ClientEvent, _> =
            JsonCodec.decode(r#"{"roomCode":"R1"}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
