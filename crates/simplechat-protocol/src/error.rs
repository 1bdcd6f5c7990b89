//! Error types for the protocol layer.
//!
//! Each crate in SimpleChat defines its own error enum. A `ProtocolError`
//! always means the problem is in turning commands into JSON or JSON back
//! into messages, never in networking or session state.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization of an outgoing command failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// An incoming frame was not valid JSON.
    ///
    /// The client treats this as recoverable: the frame is logged and
    /// dropped, and the session carries on.
    #[error("malformed packet: {0}")]
    MalformedPacket(serde_json::Error),
}
