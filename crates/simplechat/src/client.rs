//! [`ChatClient`]: the connection lifecycle and the user-facing commands.

use std::sync::Arc;

use simplechat_protocol::{Codec, IncomingMessage, JsonCodec, OutgoingCommand};
use simplechat_session::{ConnectionState, Nickname, Session, SessionError};
use simplechat_transport::{ConnectionId, Connector, WebSocketConnector};
use tokio::sync::mpsc;

use crate::config::ClientConfig;
use crate::dispatch::Dispatcher;
use crate::driver::{self, DriverSettings, SessionEvent, TransportEvent};
use crate::error::SimpleChatError;
use crate::ui::{Collaborators, NicknamePrompt, ALERT_TITLE};

/// A chat client: at most one session, plus the UI it drives.
///
/// The client is single-threaded by construction. Transport activity
/// happens on a spawned driver task and comes back as [`SessionEvent`]s;
/// the owner pulls them with [`next_event`](Self::next_event) and applies
/// them with [`process`](Self::process), interleaved with user commands:
///
/// ```rust,no_run
/// # use simplechat::prelude::*;
/// # async fn run(mut client: ChatClient) -> Result<(), SimpleChatError> {
/// client.connect("alice")?;
/// while let Some(event) = client.next_event().await {
///     client.process(event);
///     if client.state() == ConnectionState::Disconnected {
///         break;
///     }
/// }
/// # Ok(())
/// # }
/// ```
///
/// Commands that start a connection spawn a tokio task, so they must be
/// called from inside a runtime.
pub struct ChatClient<C: Connector = WebSocketConnector> {
    config: ClientConfig,
    connector: Arc<C>,
    ui: Collaborators,
    session: Option<Session>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    next_connection: u64,
    codec: JsonCodec,
}

impl ChatClient<WebSocketConnector> {
    /// Creates a client that talks WebSocket to `config.endpoint`.
    pub fn websocket(config: ClientConfig, ui: Collaborators) -> Self {
        Self::new(config, WebSocketConnector, ui)
    }
}

impl<C: Connector> ChatClient<C> {
    /// Creates a disconnected client.
    pub fn new(config: ClientConfig, connector: C, ui: Collaborators) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            connector: Arc::new(connector),
            ui,
            session: None,
            events_tx,
            events_rx,
            next_connection: 0,
            codec: JsonCodec,
        }
    }

    /// Current connection state. `Disconnected` whenever there is no session.
    pub fn state(&self) -> ConnectionState {
        self.session
            .as_ref()
            .map_or(ConnectionState::Disconnected, Session::state)
    }

    /// The nickname of the current session, if any.
    pub fn nickname(&self) -> Option<&Nickname> {
        self.session.as_ref().map(Session::nickname)
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Starts connecting as `nickname`.
    ///
    /// Returns as soon as the attempt has started; the outcome arrives as
    /// events. Once the transport opens, the observer is told and an
    /// `ident` with the nickname is sent.
    ///
    /// # Errors
    /// - [`SessionError::InvalidNickname`] if `nickname` is blank
    /// - [`SessionError::AlreadyConnected`] if a session exists
    pub fn connect(&mut self, nickname: &str) -> Result<(), SimpleChatError> {
        let nickname = Nickname::parse(nickname)?;
        if let Some(session) = &self.session {
            return Err(SessionError::AlreadyConnected(session.nickname().to_string()).into());
        }

        self.next_connection += 1;
        let connection = ConnectionId::new(self.next_connection);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let settings = DriverSettings {
            url: self.config.endpoint.clone(),
            connect_timeout: self.config.connect_timeout,
            close_timeout: self.config.close_timeout,
        };

        self.session = Some(Session::new(nickname, connection, outbound_tx));
        driver::spawn(
            Arc::clone(&self.connector),
            settings,
            connection,
            outbound_rx,
            self.events_tx.clone(),
        );
        Ok(())
    }

    /// Asks the server to close the connection.
    ///
    /// The state stays `Connected` until the close is processed; calling
    /// again in the meantime does nothing.
    ///
    /// # Errors
    /// Returns [`SessionError::NotConnected`] unless connected.
    pub fn disconnect(&mut self) -> Result<(), SimpleChatError> {
        match self.session.as_mut() {
            Some(session) => Ok(session.request_close()?),
            None => Err(SessionError::NotConnected.into()),
        }
    }

    /// Disconnects when connected; otherwise asks `prompt` for a nickname
    /// and connects with it.
    ///
    /// A cancelled prompt does nothing.
    pub async fn toggle_connection<P: NicknamePrompt>(
        &mut self,
        prompt: &mut P,
    ) -> Result<(), SimpleChatError> {
        if self.state() == ConnectionState::Connected {
            return self.disconnect();
        }
        match prompt.request_nickname().await {
            Some(nickname) => self.connect(&nickname),
            None => {
                tracing::debug!("nickname prompt cancelled");
                Ok(())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Joins (or creates) `room`.
    pub fn join(&self, room: &str) -> Result<(), SimpleChatError> {
        self.send(OutgoingCommand::Join {
            room: room.to_string(),
        })
    }

    /// Leaves `room`.
    pub fn part(&self, room: &str) -> Result<(), SimpleChatError> {
        self.send(OutgoingCommand::Part {
            room: room.to_string(),
        })
    }

    /// Says `body` in `room`.
    pub fn say(&self, room: &str, body: &str) -> Result<(), SimpleChatError> {
        self.send(OutgoingCommand::Say {
            room: room.to_string(),
            body: body.to_string(),
        })
    }

    /// Asks for the active room list. The answer goes to the room list view.
    pub fn list_rooms(&self) -> Result<(), SimpleChatError> {
        self.send(OutgoingCommand::ListRooms)
    }

    fn send(&self, cmd: OutgoingCommand) -> Result<(), SimpleChatError> {
        let session = self.session.as_ref().ok_or(SessionError::NotConnected)?;
        Ok(session.send(&cmd)?)
    }

    /// Shows a user-facing error through the alert surface; logs the rest.
    pub fn report(&mut self, err: &SimpleChatError) {
        if err.is_user_facing() {
            self.ui.alerts.alert(ALERT_TITLE, &err.to_string());
        } else {
            tracing::error!(error = %err, "client error");
        }
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Waits for the next transport event.
    ///
    /// Cancel-safe, so it can sit in a `tokio::select!` next to user input.
    /// Only returns `None` if the client's own queue is closed, which
    /// cannot happen while the client exists.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    /// Applies one event. Events from connections other than the current
    /// one are ignored.
    pub fn process(&mut self, event: SessionEvent) {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(connection = %event.connection, "event with no session, ignoring");
            return;
        };
        if session.connection() != event.connection {
            tracing::debug!(
                connection = %event.connection,
                current = %session.connection(),
                "event from stale connection, ignoring"
            );
            return;
        }

        match event.kind {
            TransportEvent::Opened => {
                if !session.transition(ConnectionState::Connected) {
                    return;
                }
                self.ui.observer.connected(session.nickname().as_str());
                let ident = OutgoingCommand::Ident {
                    name: session.nickname().to_string(),
                };
                if let Err(e) = session.send(&ident) {
                    tracing::error!(error = %e, "failed to send ident");
                }
            }
            TransportEvent::Frame(bytes) => {
                if !session.is_connected() {
                    tracing::warn!(connection = %event.connection, "frame before open, dropping");
                    return;
                }
                match self.codec.decode::<IncomingMessage>(&bytes) {
                    Ok(msg) => Dispatcher::new(&mut self.ui).handle(session, msg),
                    Err(e) => {
                        tracing::warn!(
                            connection = %event.connection,
                            error = %e,
                            "dropping malformed packet"
                        );
                    }
                }
            }
            TransportEvent::Error(e) => {
                tracing::warn!(connection = %event.connection, error = %e, "transport error");
            }
            TransportEvent::Closed => {
                session.transition(ConnectionState::Disconnected);
                self.session = None;
                self.ui.observer.disconnected();
            }
        }
    }

    /// Processes events until the session is gone.
    ///
    /// Returns immediately when already disconnected.
    pub async fn run_until_disconnected(&mut self) {
        while self.session.is_some() {
            match self.next_event().await {
                Some(event) => self.process(event),
                None => break,
            }
        }
    }
}

impl<C: Connector> std::fmt::Debug for ChatClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("endpoint", &self.config.endpoint)
            .field("state", &self.state())
            .field("nickname", &self.nickname())
            .finish_non_exhaustive()
    }
}
