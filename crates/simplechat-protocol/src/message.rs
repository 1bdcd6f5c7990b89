//! Incoming messages and their classification.
//!
//! The server sends two families of JSON objects:
//!
//! - **command responses**, identified by `type` alone
//!   (`welcome`, `active_rooms`, `error`, legacy `message`)
//! - **events**, which carry a `source` discriminator (`client` or `room`)
//!   next to their `type`
//!
//! Every parsed document maps to exactly one [`IncomingMessage`] variant.
//! Anything that doesn't fit a known shape becomes
//! [`IncomingMessage::Unknown`] instead of an error, so a newer server can
//! never crash an older client.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::RoomSummary;

/// A decoded server → client message.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage {
    /// The server accepted our `ident`.
    Welcome,

    /// The full list of active rooms.
    ActiveRooms(Vec<RoomSummary>),

    /// The server rejected something; the text is meant for the user.
    Error(String),

    /// Deprecated per-room message. New servers use room events instead.
    Message {
        /// The room the message belongs to.
        room: String,
        /// The whole message object as received.
        raw: Value,
    },

    /// An event about this client (`source: "client"`).
    ClientEvent(ClientEvent),

    /// An event inside a room (`source: "room"`).
    RoomEvent(RoomEvent),

    /// Anything else. Holds the document as received, for logging.
    Unknown(Value),
}

/// Events whose `source` is `client`.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// The server put this client into a room.
    Joined {
        room: String,
        topic: Option<String>,
    },

    /// A client event this version doesn't understand.
    Unrecognized { kind: String, raw: Value },
}

/// An event whose `source` is `room`.
///
/// The client core never interprets room events; it hands them to the
/// room controller exactly as they arrived, in `raw`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomEvent {
    /// The event `type` (e.g. `said`, `joined`, `parted`), when present.
    pub kind: Option<String>,
    /// The room the event happened in, when present.
    pub room: Option<String>,
    /// The untouched event object.
    pub raw: Value,
}

impl IncomingMessage {
    /// Classifies an already-parsed JSON document.
    pub fn classify(value: Value) -> Self {
        match classify_known(&value) {
            Some(msg) => msg,
            None => Self::Unknown(value),
        }
    }

    /// A short label for logging.
    pub fn kind(&self) -> &str {
        match self {
            Self::Welcome => "welcome",
            Self::ActiveRooms(_) => "active_rooms",
            Self::Error(_) => "error",
            Self::Message { .. } => "message",
            Self::ClientEvent(ClientEvent::Joined { .. }) => "client:joined",
            Self::ClientEvent(ClientEvent::Unrecognized { .. }) => "client:?",
            Self::RoomEvent(_) => "room",
            Self::Unknown(_) => "unknown",
        }
    }
}

fn classify_known(value: &Value) -> Option<IncomingMessage> {
    let obj = value.as_object()?;

    if let Some(source) = obj.get("source") {
        return classify_event(source, obj, value);
    }

    match obj.get("type").and_then(Value::as_str)? {
        "welcome" => Some(IncomingMessage::Welcome),
        "active_rooms" => obj
            .get("rooms")
            .and_then(Value::as_array)
            .map(|rooms| IncomingMessage::ActiveRooms(room_summaries(rooms))),
        "error" => obj
            .get("message")
            .and_then(Value::as_str)
            .map(|message| IncomingMessage::Error(message.to_string())),
        "message" => room_name(obj).map(|room| IncomingMessage::Message {
            room,
            raw: value.clone(),
        }),
        _ => None,
    }
}

fn classify_event(
    source: &Value,
    obj: &Map<String, Value>,
    value: &Value,
) -> Option<IncomingMessage> {
    let kind = obj.get("type").and_then(Value::as_str);
    match source.as_str()? {
        "client" => {
            let kind = kind?;
            let event = match (kind, room_name(obj)) {
                ("joined", Some(room)) => ClientEvent::Joined {
                    room,
                    topic: obj
                        .get("topic")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                },
                _ => ClientEvent::Unrecognized {
                    kind: kind.to_string(),
                    raw: value.clone(),
                },
            };
            Some(IncomingMessage::ClientEvent(event))
        }
        "room" => Some(IncomingMessage::RoomEvent(RoomEvent {
            kind: kind.map(str::to_string),
            room: room_name(obj),
            raw: value.clone(),
        })),
        _ => None,
    }
}

/// Decodes each room entry on its own. Entries of an unexpected shape are
/// skipped so one bad entry doesn't cost the whole list.
fn room_summaries(rooms: &[Value]) -> Vec<RoomSummary> {
    rooms
        .iter()
        .filter_map(|entry| match RoomSummary::deserialize(entry) {
            Ok(room) => Some(room),
            Err(e) => {
                tracing::warn!(%entry, error = %e, "skipping malformed room entry");
                None
            }
        })
        .collect()
}

/// Reads the `room` field. Numeric room ids are accepted as text.
fn room_name(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("room")? {
        Value::String(name) => Some(name.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for IncomingMessage {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::classify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> IncomingMessage {
        serde_json::from_value(value).unwrap()
    }

    // =====================================================================
    // Command responses
    // =====================================================================

    #[test]
    fn test_welcome() {
        assert_eq!(decode(json!({ "type": "welcome" })), IncomingMessage::Welcome);
    }

    #[test]
    fn test_active_rooms_with_names() {
        let msg = decode(json!({ "type": "active_rooms", "rooms": ["lobby", "dev"] }));
        assert_eq!(
            msg,
            IncomingMessage::ActiveRooms(vec![
                RoomSummary::named("lobby"),
                RoomSummary::named("dev"),
            ])
        );
    }

    #[test]
    fn test_active_rooms_empty_list() {
        let msg = decode(json!({ "type": "active_rooms", "rooms": [] }));
        assert_eq!(msg, IncomingMessage::ActiveRooms(Vec::new()));
    }

    #[test]
    fn test_active_rooms_skips_malformed_entries() {
        let msg = decode(json!({
            "type": "active_rooms",
            "rooms": ["lobby", { "name": "dev", "topic": 5 }, 42, { "name": "ops" }]
        }));
        assert_eq!(
            msg,
            IncomingMessage::ActiveRooms(vec![
                RoomSummary::named("lobby"),
                RoomSummary::named("ops"),
            ])
        );
    }

    #[test]
    fn test_active_rooms_with_non_array_rooms_is_unknown() {
        let msg = decode(json!({ "type": "active_rooms", "rooms": "lobby" }));
        assert!(matches!(msg, IncomingMessage::Unknown(_)));
    }

    #[test]
    fn test_active_rooms_without_rooms_field_is_unknown() {
        let msg = decode(json!({ "type": "active_rooms" }));
        assert!(matches!(msg, IncomingMessage::Unknown(_)));
    }

    #[test]
    fn test_error_carries_message() {
        let msg = decode(json!({ "type": "error", "message": "nick taken" }));
        assert_eq!(msg, IncomingMessage::Error("nick taken".into()));
    }

    #[test]
    fn test_error_without_message_is_unknown() {
        let msg = decode(json!({ "type": "error", "code": 7 }));
        assert!(matches!(msg, IncomingMessage::Unknown(_)));
    }

    #[test]
    fn test_legacy_message_keeps_raw_object() {
        let raw = json!({ "type": "message", "room": "lobby", "body": "old" });
        match decode(raw.clone()) {
            IncomingMessage::Message { room, raw: kept } => {
                assert_eq!(room, "lobby");
                assert_eq!(kept, raw);
            }
            other => panic!("expected legacy Message, got {other:?}"),
        }
    }

    #[test]
    fn test_legacy_message_with_numeric_room() {
        let msg = decode(json!({ "type": "message", "room": 12 }));
        assert!(matches!(msg, IncomingMessage::Message { room, .. } if room == "12"));
    }

    // =====================================================================
    // Events
    // =====================================================================

    #[test]
    fn test_client_joined_event() {
        let msg = decode(json!({ "source": "client", "type": "joined", "room": "lobby" }));
        assert_eq!(
            msg,
            IncomingMessage::ClientEvent(ClientEvent::Joined {
                room: "lobby".into(),
                topic: None,
            })
        );
    }

    #[test]
    fn test_client_joined_event_with_topic() {
        let msg = decode(json!({
            "source": "client", "type": "joined", "room": "dev", "topic": "builds"
        }));
        assert!(matches!(
            msg,
            IncomingMessage::ClientEvent(ClientEvent::Joined { topic: Some(t), .. }) if t == "builds"
        ));
    }

    #[test]
    fn test_client_event_of_unknown_kind_is_unrecognized() {
        let msg = decode(json!({ "source": "client", "type": "kicked", "room": "dev" }));
        assert!(matches!(
            msg,
            IncomingMessage::ClientEvent(ClientEvent::Unrecognized { kind, .. }) if kind == "kicked"
        ));
    }

    #[test]
    fn test_room_event_is_kept_verbatim() {
        let raw = json!({ "source": "room", "type": "said", "room": "lobby", "body": "hi" });
        let msg = decode(raw.clone());
        assert_eq!(
            msg,
            IncomingMessage::RoomEvent(RoomEvent {
                kind: Some("said".into()),
                room: Some("lobby".into()),
                raw,
            })
        );
    }

    #[test]
    fn test_room_event_without_type_is_still_a_room_event() {
        let raw = json!({ "source": "room", "room": "lobby", "body": "x" });
        let msg = decode(raw.clone());
        assert_eq!(
            msg,
            IncomingMessage::RoomEvent(RoomEvent {
                kind: None,
                room: Some("lobby".into()),
                raw,
            })
        );
    }

    #[test]
    fn test_client_event_without_type_is_unknown() {
        let msg = decode(json!({ "source": "client", "room": "lobby" }));
        assert!(matches!(msg, IncomingMessage::Unknown(_)));
    }

    #[test]
    fn test_source_takes_precedence_over_response_type() {
        // A `source` field makes this an event even though `welcome`
        // would otherwise be a command response.
        let msg = decode(json!({ "source": "room", "type": "welcome" }));
        assert!(matches!(msg, IncomingMessage::RoomEvent(_)));
    }

    // =====================================================================
    // Unknown shapes: never an error
    // =====================================================================

    #[test]
    fn test_unknown_shapes_map_to_unknown() {
        let cases = [
            json!({ "type": "teleport" }),
            json!({ "source": "server", "type": "reboot" }),
            json!({ "source": "client" }),
            json!({ "source": 5, "type": "joined" }),
            json!({}),
            json!([1, 2, 3]),
            json!("welcome"),
            json!(null),
        ];
        for case in cases {
            let msg = decode(case.clone());
            assert_eq!(msg, IncomingMessage::Unknown(case));
        }
    }
}
