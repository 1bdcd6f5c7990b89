//! Codec trait and implementations for serializing/deserializing messages.
//!
//! The client core only needs something that implements [`Codec`]. Today
//! that is [`JsonCodec`], because the chat server speaks JSON, but the
//! session and dispatcher never depend on the format directly.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `decode` is generic so that the same codec works for
/// [`IncomingMessage`](crate::IncomingMessage) (classified on the way in)
/// and for plain serde types in tests.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::MalformedPacket` if the bytes are not a
    /// valid document for `T`.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use simplechat_protocol::{Codec, IncomingMessage, JsonCodec, OutgoingCommand};
///
/// let codec = JsonCodec;
///
/// let bytes = codec
///     .encode(&OutgoingCommand::Join { room: "lobby".into() })
///     .unwrap();
/// assert_eq!(bytes, br#"{"type":"join","room":"lobby"}"#);
///
/// let msg: IncomingMessage = codec.decode(br#"{"type":"welcome"}"#).unwrap();
/// assert_eq!(msg, IncomingMessage::Welcome);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::MalformedPacket)
    }
}
