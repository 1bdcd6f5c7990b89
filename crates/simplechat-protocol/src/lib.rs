//! Wire protocol for SimpleChat.
//!
//! This crate defines the "language" the chat client and server speak:
//!
//! - **Commands** ([`OutgoingCommand`]): what the client asks for.
//! - **Messages** ([`IncomingMessage`], [`ClientEvent`], [`RoomEvent`]):
//!   what the server sends back, classified into a closed set of variants.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those are converted
//!   to and from bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (IncomingMessage) → Dispatcher (UI calls)
//! ```
//!
//! The protocol layer knows nothing about connections or sessions.

mod codec;
mod error;
mod message;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use message::{ClientEvent, IncomingMessage, RoomEvent};
pub use types::{OutgoingCommand, RoomSummary};
