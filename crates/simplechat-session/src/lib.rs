//! Client session management for SimpleChat.
//!
//! A client has at most one [`Session`] at a time. The session owns:
//!
//! 1. **Identity**: the validated [`Nickname`] sent in the `ident` command
//! 2. **Lifecycle state**: [`ConnectionState`] and its legal transitions
//! 3. **The outbound queue**: encoded commands and close requests, drained
//!    by the task that owns the transport ([`Outbound`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Client core (above)     ← creates sessions, feeds them transport events
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Protocol Layer (below)  ← provides OutgoingCommand and the codec
//! ```

mod error;
mod session;

pub use error::SessionError;
pub use session::{ConnectionState, Nickname, Outbound, Session};
