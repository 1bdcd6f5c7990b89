//! Unified error type for the SimpleChat client.

use simplechat_protocol::ProtocolError;
use simplechat_session::SessionError;
use simplechat_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum SimpleChatError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, malformed packet).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (nickname, connection state).
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl SimpleChatError {
    /// Returns `true` for errors the user should see in an alert.
    pub fn is_user_facing(&self) -> bool {
        match self {
            Self::Session(e) => e.is_user_facing(),
            Self::Transport(_) | Self::Protocol(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let chat_err: SimpleChatError = err.into();
        assert!(matches!(chat_err, SimpleChatError::Transport(_)));
        assert!(chat_err.to_string().contains("gone"));
        assert!(!chat_err.is_user_facing());
    }

    #[test]
    fn test_from_session_error() {
        let chat_err: SimpleChatError = SessionError::NotConnected.into();
        assert!(matches!(
            chat_err,
            SimpleChatError::Session(SessionError::NotConnected)
        ));
        assert!(chat_err.is_user_facing());
        assert_eq!(chat_err.to_string(), "not connected to the chat server");
    }

    #[test]
    fn test_from_protocol_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{")
            .expect_err("truncated json");
        let chat_err: SimpleChatError =
            ProtocolError::MalformedPacket(json_err).into();
        assert!(matches!(chat_err, SimpleChatError::Protocol(_)));
        assert!(!chat_err.is_user_facing());
    }
}
