//! Session types: the client's record of its one connection to the server.
//!
//! A session tracks:
//! - WHO we are on the server (the [`Nickname`])
//! - WHAT state the connection is in ([`ConnectionState`])
//! - HOW to reach the transport (the outbound queue to the driver task)

use std::fmt;

use simplechat_protocol::{Codec, JsonCodec, OutgoingCommand};
use simplechat_transport::ConnectionId;
use tokio::sync::mpsc;

use crate::SessionError;

// ---------------------------------------------------------------------------
// Nickname
// ---------------------------------------------------------------------------

/// A validated nickname: never empty, no surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nickname(String);

impl Nickname {
    /// Validates user input as a nickname.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidNickname`] if nothing is left after
    /// trimming whitespace.
    pub fn parse(input: &str) -> Result<Self, SessionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SessionError::InvalidNickname);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the nickname as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// ConnectionState
// ---------------------------------------------------------------------------

/// The lifecycle state of the client's connection.
///
/// ```text
///   Disconnected ──(connect)──→ Connecting ──(open)──→ Connected
///        ↑                          │                      │
///        └─────────(close)──────────┴────(close)───────────┘
/// ```
///
/// There are no retry transitions. A connect attempt that fails or times
/// out is reported as a close, which lands back in `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    /// Returns `true` if moving from `self` to `next` is a legal step.
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        matches!(
            (self, next),
            (Self::Disconnected, Self::Connecting)
                | (Self::Connecting, Self::Connected)
                | (Self::Connecting, Self::Disconnected)
                | (Self::Connected, Self::Disconnected)
        )
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Instructions from the session to the task that owns the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Send one encoded frame.
    Frame(Vec<u8>),
    /// Close the connection.
    Close,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The single active logical connection to the chat server.
///
/// Created in `Connecting` when the user asks to connect, and dropped by
/// the client once the close notification has been processed. The
/// session is the only holder of the outbound queue, so dropping it also
/// tells the driver task to shut the transport down.
#[derive(Debug)]
pub struct Session {
    nickname: Nickname,
    connection: ConnectionId,
    state: ConnectionState,
    outbound: mpsc::UnboundedSender<Outbound>,
    close_requested: bool,
    codec: JsonCodec,
}

impl Session {
    /// Creates a session in the `Connecting` state.
    pub fn new(
        nickname: Nickname,
        connection: ConnectionId,
        outbound: mpsc::UnboundedSender<Outbound>,
    ) -> Self {
        tracing::info!(%connection, %nickname, "session connecting");
        Self {
            nickname,
            connection,
            state: ConnectionState::Connecting,
            outbound,
            close_requested: false,
            codec: JsonCodec,
        }
    }

    /// The nickname this session identifies with.
    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    /// The transport connection this session drives.
    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns `true` once the transport is open.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Moves to `next` if the step is legal.
    ///
    /// Returns `false` (and changes nothing) for an illegal step, such as
    /// a second open notification.
    pub fn transition(&mut self, next: ConnectionState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::warn!(
                connection = %self.connection,
                from = %self.state,
                to = %next,
                "ignoring illegal session transition"
            );
            return false;
        }
        tracing::info!(
            connection = %self.connection,
            from = %self.state,
            to = %next,
            "session state changed"
        );
        self.state = next;
        true
    }

    /// Encodes `cmd` and queues it for the transport.
    ///
    /// # Errors
    /// - [`SessionError::NotConnected`] unless the session is `Connected`,
    ///   no close has been requested, and the driver task is still running
    /// - [`SessionError::Protocol`] if encoding fails
    pub fn send(&self, cmd: &OutgoingCommand) -> Result<(), SessionError> {
        if !self.is_connected() || self.close_requested {
            return Err(SessionError::NotConnected);
        }
        let frame = self.codec.encode(cmd)?;
        tracing::debug!(
            connection = %self.connection,
            kind = cmd.kind(),
            bytes = frame.len(),
            "queueing command"
        );
        self.outbound
            .send(Outbound::Frame(frame))
            .map_err(|_| SessionError::NotConnected)
    }

    /// Asks the driver task to close the transport.
    ///
    /// The state stays `Connected` until the close notification comes
    /// back. Repeated calls while that is pending queue nothing further.
    ///
    /// # Errors
    /// Returns [`SessionError::NotConnected`] unless the session is
    /// `Connected`.
    pub fn request_close(&mut self) -> Result<(), SessionError> {
        if !self.is_connected() {
            return Err(SessionError::NotConnected);
        }
        if self.close_requested {
            tracing::debug!(connection = %self.connection, "close already requested");
            return Ok(());
        }
        self.outbound
            .send(Outbound::Close)
            .map_err(|_| SessionError::NotConnected)?;
        self.close_requested = true;
        tracing::info!(connection = %self.connection, "close requested");
        Ok(())
    }
}
