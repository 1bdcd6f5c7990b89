//! The task that owns a transport connection.
//!
//! One driver task runs per session. It is the only code that touches the
//! [`Connection`]; everything it observes is turned into a
//! [`SessionEvent`] on the client's event queue, and everything the
//! session wants done arrives on the [`Outbound`] queue.
//!
//! ```text
//!   Session ──Outbound──→ driver task ──bytes──→ server
//!   ChatClient ←─SessionEvent── driver task ←──bytes── server
//! ```
//!
//! The driver always ends by sending [`TransportEvent::Closed`], unless
//! the session was dropped first (then nobody is listening).

use std::sync::Arc;
use std::time::Duration;

use simplechat_session::Outbound;
use simplechat_transport::{Connection, ConnectionId, Connector, TransportError};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Something that happened on a connection, tagged with its id so the
/// client can drop events from a connection it has already forgotten.
#[derive(Debug)]
pub struct SessionEvent {
    pub connection: ConnectionId,
    pub kind: TransportEvent,
}

/// What a driver task reports.
#[derive(Debug)]
pub enum TransportEvent {
    /// The transport is open.
    Opened,
    /// One text or binary frame arrived.
    Frame(Vec<u8>),
    /// The transport failed. Always followed by `Closed`.
    Error(TransportError),
    /// The transport is gone. Last event for this connection.
    Closed,
}

/// Settings the driver needs from [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Clone)]
pub(crate) struct DriverSettings {
    pub url: String,
    pub connect_timeout: Option<Duration>,
    pub close_timeout: Duration,
}

/// Spawns the driver for `connection` onto the current tokio runtime.
///
/// The task is detached; it ends on its own once the transport closes or
/// the session's outbound queue is dropped.
pub(crate) fn spawn<C: Connector>(
    connector: Arc<C>,
    settings: DriverSettings,
    connection: ConnectionId,
    outbound: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::UnboundedSender<SessionEvent>,
) {
    tokio::spawn(drive(connector, settings, connection, outbound, events));
}

async fn drive<C: Connector>(
    connector: Arc<C>,
    settings: DriverSettings,
    connection: ConnectionId,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::UnboundedSender<SessionEvent>,
) {
    let notify = |kind: TransportEvent| {
        // A closed queue means the client is gone; nothing left to tell.
        let _ = events.send(SessionEvent { connection, kind });
    };

    tracing::debug!(%connection, url = %settings.url, "connecting");
    let conn = match open(connector.as_ref(), &settings).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!(%connection, error = %e, "connect failed");
            notify(TransportEvent::Error(e));
            notify(TransportEvent::Closed);
            return;
        }
    };
    tracing::info!(%connection, url = %settings.url, "connection open");
    notify(TransportEvent::Opened);

    let mut close_deadline: Option<Instant> = None;

    loop {
        let deadline = close_deadline;
        tokio::select! {
            out = outbound.recv() => match out {
                Some(Outbound::Frame(bytes)) => {
                    if let Err(e) = conn.send(&bytes).await {
                        tracing::warn!(%connection, error = %e, "send failed");
                        notify(TransportEvent::Error(e));
                        break;
                    }
                }
                Some(Outbound::Close) => {
                    tracing::debug!(%connection, "closing");
                    if let Err(e) = conn.close().await {
                        notify(TransportEvent::Error(e));
                        break;
                    }
                    close_deadline = Some(Instant::now() + settings.close_timeout);
                }
                None => {
                    // Session dropped without waiting for the close.
                    let _ = conn.close().await;
                    tracing::debug!(%connection, "session dropped, driver exiting");
                    return;
                }
            },
            incoming = conn.recv() => match incoming {
                Ok(Some(bytes)) => notify(TransportEvent::Frame(bytes)),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(%connection, error = %e, "receive failed");
                    notify(TransportEvent::Error(e));
                    break;
                }
            },
            () = wait_until(deadline) => {
                tracing::warn!(%connection, "server did not acknowledge close");
                break;
            }
        }
    }

    tracing::info!(%connection, "connection closed");
    notify(TransportEvent::Closed);
}

async fn open<C: Connector>(
    connector: &C,
    settings: &DriverSettings,
) -> Result<C::Connection, TransportError> {
    let Some(limit) = settings.connect_timeout else {
        return connector.connect(&settings.url).await;
    };
    match tokio::time::timeout(limit, connector.connect(&settings.url)).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::ConnectTimedOut {
            url: settings.url.clone(),
            millis: limit.as_millis(),
        }),
    }
}

/// Sleeps until `deadline`, or forever if there is none.
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
