//! # SimpleChat
//!
//! Client core for a JSON-over-WebSocket chat service.
//!
//! The crate owns the connection lifecycle and turns server messages into
//! calls on a small set of UI traits. It renders nothing itself: a host
//! implements [`ui::RoomListView`], [`ui::RoomWindows`],
//! [`ui::AlertSurface`], [`ui::RoomController`] and
//! [`ui::ConnectionObserver`], and drives a [`ChatClient`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use simplechat::prelude::*;
//!
//! # async fn start(ui: Collaborators) -> Result<(), SimpleChatError> {
//! let mut client = ChatClient::websocket(ClientConfig::default(), ui);
//! client.connect("alice")?;
//! client.run_until_disconnected().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! ```text
//! simplechat            ← ChatClient, Dispatcher, UI traits (this crate)
//! simplechat-session    ← Session, Nickname, ConnectionState
//! simplechat-protocol   ← OutgoingCommand, IncomingMessage, JsonCodec
//! simplechat-transport  ← Connector / Connection, WebSocket impl
//! ```

mod client;
mod config;
mod dispatch;
mod driver;
mod error;
pub mod ui;

pub use client::ChatClient;
pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use dispatch::Dispatcher;
pub use driver::{SessionEvent, TransportEvent};
pub use error::SimpleChatError;

pub use simplechat_protocol as protocol;
pub use simplechat_session as session;
pub use simplechat_transport as transport;

/// Everything a host usually needs.
pub mod prelude {
    pub use crate::ui::{
        AlertSurface, Collaborators, ConnectionObserver, NicknamePrompt, RoomController,
        RoomListView, RoomWindowSpec, RoomWindows,
    };
    pub use crate::{ChatClient, ClientConfig, SessionEvent, SimpleChatError, TransportEvent};
    pub use simplechat_protocol::{RoomEvent, RoomSummary};
    pub use simplechat_session::{ConnectionState, SessionError};
}
