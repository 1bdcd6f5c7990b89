//! Error types for the session layer.

use simplechat_protocol::ProtocolError;

/// Errors that can occur while opening, using, or closing a session.
///
/// The first three are user-facing: the client shows them through its
/// alert surface rather than treating them as failures of the program.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The nickname was empty (or only whitespace).
    #[error("please specify a nickname")]
    InvalidNickname,

    /// The operation needs a connected session and there isn't one.
    #[error("not connected to the chat server")]
    NotConnected,

    /// A session is already open or still connecting.
    #[error("already connected as {0}")]
    AlreadyConnected(String),

    /// An outgoing command could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl SessionError {
    /// Returns `true` for errors that should be shown to the user rather
    /// than only logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidNickname | Self::NotConnected | Self::AlreadyConnected(_)
        )
    }
}
