//! The interfaces the client core drives.
//!
//! The core never renders anything itself. Whatever hosts it (a terminal,
//! a GUI, a test) implements these traits and hands them over in a
//! [`Collaborators`] bundle. Every method is called from the task that
//! owns the [`ChatClient`](crate::ChatClient), one at a time.

use std::future::Future;

use serde_json::Value;
use simplechat_protocol::{RoomEvent, RoomSummary};

/// Title used for every server-sent or user-facing alert.
pub const ALERT_TITLE: &str = "Alert!";

/// Id of the window that shows messages for `room`.
///
/// Legacy `message` packets are routed by this id.
pub fn room_window_id(room: &str) -> String {
    format!("room-{room}-win")
}

/// What to open when the server confirms a join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomWindowSpec {
    /// Room name; also the window's title.
    pub name: String,
    /// Topic to show under the title, when the server sent one.
    pub topic: Option<String>,
}

impl RoomWindowSpec {
    /// The window id this room's messages are routed to.
    pub fn window_id(&self) -> String {
        room_window_id(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Shows the list of active rooms.
pub trait RoomListView: Send {
    /// Replaces the whole list.
    fn update_list(&mut self, rooms: Vec<RoomSummary>);
}

/// Opens and looks up per-room windows.
pub trait RoomWindows: Send {
    /// Opens (or focuses) the window for a room we just joined.
    fn show_room(&mut self, spec: RoomWindowSpec);

    /// Appends a legacy message to the window with id `window_id`.
    ///
    /// Returns `false` if no such window exists.
    fn append_room_event(&mut self, window_id: &str, message: &Value) -> bool;
}

/// Shows modal notices to the user.
pub trait AlertSurface: Send {
    fn alert(&mut self, title: &str, message: &str);
}

/// Receives every room event, untouched.
pub trait RoomController: Send {
    fn handle_event(&mut self, event: RoomEvent);
}

/// Told when the connection opens and closes.
pub trait ConnectionObserver: Send {
    /// The transport opened and `nickname` is about to be sent.
    fn connected(&mut self, nickname: &str);

    /// The transport closed, or a connect attempt failed.
    fn disconnected(&mut self);
}

/// Asks the user for a nickname.
///
/// Used by [`ChatClient::toggle_connection`](crate::ChatClient::toggle_connection).
/// Resolving to `None` means the user cancelled.
pub trait NicknamePrompt {
    fn request_nickname(&mut self) -> impl Future<Output = Option<String>>;
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Everything the client core calls out to.
pub struct Collaborators {
    pub room_list: Box<dyn RoomListView>,
    pub room_windows: Box<dyn RoomWindows>,
    pub alerts: Box<dyn AlertSurface>,
    pub rooms: Box<dyn RoomController>,
    pub observer: Box<dyn ConnectionObserver>,
}

impl Collaborators {
    /// Bundles one value that implements every collaborator trait.
    ///
    /// Handy when a single UI object plays all the roles. The value is
    /// cloned once per role, so it should share its state internally.
    pub fn from_shared<T>(ui: T) -> Self
    where
        T: RoomListView
            + RoomWindows
            + AlertSurface
            + RoomController
            + ConnectionObserver
            + Clone
            + 'static,
    {
        Self {
            room_list: Box::new(ui.clone()),
            room_windows: Box::new(ui.clone()),
            alerts: Box::new(ui.clone()),
            rooms: Box::new(ui.clone()),
            observer: Box::new(ui),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
