//! Outgoing command types and the room summary shape.
//!
//! Everything here maps one-to-one onto JSON objects on the wire. The
//! incoming side lives in [`message`](crate::message) because it needs
//! hand-written classification rather than a plain derive.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// OutgoingCommand: client → server
// ---------------------------------------------------------------------------

/// A request the client sends to the chat server.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
///   `{ "type": "say", "room": "lobby", "body": "hi" }`
/// which is exactly what the server expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutgoingCommand {
    /// Identify this connection with a nickname. Sent once, right after
    /// the transport opens.
    Ident { name: String },

    /// Join (or create) a room.
    Join { room: String },

    /// Leave a room.
    Part { room: String },

    /// Say something in a room.
    Say { room: String, body: String },

    /// Ask for the current list of active rooms.
    #[serde(rename = "active_rooms")]
    ListRooms,
}

impl OutgoingCommand {
    /// The wire `type` tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ident { .. } => "ident",
            Self::Join { .. } => "join",
            Self::Part { .. } => "part",
            Self::Say { .. } => "say",
            Self::ListRooms => "active_rooms",
        }
    }
}

// ---------------------------------------------------------------------------
// RoomSummary
// ---------------------------------------------------------------------------

/// One entry of an `active_rooms` response.
///
/// Servers send either bare names (`["lobby", "dev"]`) or objects with a
/// `name` and extra metadata. Both decode into this type; unknown fields
/// are kept in `extra` so a room list view can render them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RoomSummaryRepr")]
pub struct RoomSummary {
    /// The room name, used as its identifier in `join`/`part`/`say`.
    pub name: String,

    /// The room topic, if the server sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Any other fields the server attached to the entry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoomSummary {
    /// A summary carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            topic: None,
            extra: Map::new(),
        }
    }
}

/// The accepted wire shapes of a [`RoomSummary`].
#[derive(Deserialize)]
#[serde(untagged)]
enum RoomSummaryRepr {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        topic: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl From<RoomSummaryRepr> for RoomSummary {
    fn from(repr: RoomSummaryRepr) -> Self {
        match repr {
            RoomSummaryRepr::Name(name) => Self::named(name),
            RoomSummaryRepr::Detailed { name, topic, extra } => {
                Self { name, topic, extra }
            }
        }
    }
}
