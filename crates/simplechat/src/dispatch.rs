//! Routing decoded server messages to the collaborators.
//!
//! | Message                  | Action                                   |
//! |--------------------------|------------------------------------------|
//! | `welcome`                | send `active_rooms`                      |
//! | `active_rooms`           | [`RoomListView::update_list`]            |
//! | `error`                  | [`AlertSurface::alert`]                  |
//! | `message` (legacy)       | append to `room-{room}-win`, warn        |
//! | client `joined`          | [`RoomWindows::show_room`]               |
//! | other client event       | warn                                     |
//! | room event               | [`RoomController::handle_event`]         |
//! | anything else            | warn                                     |
//!
//! [`RoomListView::update_list`]: crate::ui::RoomListView::update_list
//! [`AlertSurface::alert`]: crate::ui::AlertSurface::alert
//! [`RoomWindows::show_room`]: crate::ui::RoomWindows::show_room
//! [`RoomController::handle_event`]: crate::ui::RoomController::handle_event

use simplechat_protocol::{ClientEvent, IncomingMessage, OutgoingCommand};
use simplechat_session::Session;

use crate::ui::{room_window_id, Collaborators, RoomWindowSpec, ALERT_TITLE};

/// Applies one decoded message to the UI, borrowing the collaborators for
/// the duration of the call.
pub struct Dispatcher<'a> {
    ui: &'a mut Collaborators,
}

impl<'a> Dispatcher<'a> {
    pub fn new(ui: &'a mut Collaborators) -> Self {
        Self { ui }
    }

    /// Handles `msg`, which arrived on `session`.
    ///
    /// Never fails: problems are logged and the message is dropped.
    pub fn handle(&mut self, session: &Session, msg: IncomingMessage) {
        let connection = session.connection();
        tracing::debug!(%connection, kind = msg.kind(), "dispatching message");

        match msg {
            IncomingMessage::Welcome => {
                if let Err(e) = session.send(&OutgoingCommand::ListRooms) {
                    tracing::warn!(%connection, error = %e, "failed to request room list");
                }
            }
            IncomingMessage::ActiveRooms(rooms) => {
                tracing::debug!(%connection, count = rooms.len(), "room list updated");
                self.ui.room_list.update_list(rooms);
            }
            IncomingMessage::Error(message) => {
                self.ui.alerts.alert(ALERT_TITLE, &message);
            }
            IncomingMessage::Message { room, raw } => {
                tracing::warn!(%connection, %room, "server sent deprecated `message` packet");
                let window_id = room_window_id(&room);
                if !self.ui.room_windows.append_room_event(&window_id, &raw) {
                    tracing::warn!(%connection, window = %window_id, "no window for message");
                }
            }
            IncomingMessage::ClientEvent(ClientEvent::Joined { room, topic }) => {
                tracing::info!(%connection, %room, "joined room");
                self.ui
                    .room_windows
                    .show_room(RoomWindowSpec { name: room, topic });
            }
            IncomingMessage::ClientEvent(ClientEvent::Unrecognized { kind, raw }) => {
                tracing::warn!(%connection, %kind, %raw, "unknown client event");
            }
            IncomingMessage::RoomEvent(event) => {
                self.ui.rooms.handle_event(event);
            }
            IncomingMessage::Unknown(raw) => {
                tracing::warn!(%connection, %raw, "unknown packet type");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Dispatch table tests against a recording UI.
    //!
    //! Naming convention: `test_{message}_{expected}`.

    use std::sync::{Arc, Mutex};

    use serde_json::{json, Value};
    use simplechat_protocol::{RoomEvent, RoomSummary};
    use simplechat_session::{ConnectionState, Nickname, Outbound};
    use simplechat_transport::ConnectionId;
    use tokio::sync::mpsc;

    use super::*;
    use crate::ui::{
        AlertSurface, ConnectionObserver, RoomController, RoomListView, RoomWindows,
    };

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        UpdateList(Vec<RoomSummary>),
        ShowRoom(RoomWindowSpec),
        Append(String, Value),
        Alert(String, String),
        RoomEvent(RoomEvent),
    }

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<Call>>>,
        windows: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl RoomListView for Recorder {
        fn update_list(&mut self, rooms: Vec<RoomSummary>) {
            self.record(Call::UpdateList(rooms));
        }
    }

    impl RoomWindows for Recorder {
        fn show_room(&mut self, spec: RoomWindowSpec) {
            self.windows.lock().unwrap().push(spec.window_id());
            self.record(Call::ShowRoom(spec));
        }

        fn append_room_event(&mut self, window_id: &str, message: &Value) -> bool {
            let found = self.windows.lock().unwrap().iter().any(|w| w == window_id);
            if found {
                self.record(Call::Append(window_id.to_string(), message.clone()));
            }
            found
        }
    }

    impl AlertSurface for Recorder {
        fn alert(&mut self, title: &str, message: &str) {
            self.record(Call::Alert(title.to_string(), message.to_string()));
        }
    }

    impl RoomController for Recorder {
        fn handle_event(&mut self, event: RoomEvent) {
            self.record(Call::RoomEvent(event));
        }
    }

    impl ConnectionObserver for Recorder {
        fn connected(&mut self, _nickname: &str) {}
        fn disconnected(&mut self) {}
    }

    struct Harness {
        recorder: Recorder,
        ui: Collaborators,
        session: Session,
        outbound: mpsc::UnboundedReceiver<Outbound>,
    }

    impl Harness {
        fn new() -> Self {
            let recorder = Recorder::default();
            let ui = Collaborators::from_shared(recorder.clone());
            let (tx, outbound) = mpsc::unbounded_channel();
            let mut session = Session::new(
                Nickname::parse("alice").unwrap(),
                ConnectionId::new(1),
                tx,
            );
            session.transition(ConnectionState::Connected);
            Self {
                recorder,
                ui,
                session,
                outbound,
            }
        }

        fn dispatch(&mut self, value: Value) {
            let msg = IncomingMessage::classify(value);
            Dispatcher::new(&mut self.ui).handle(&self.session, msg);
        }

        fn sent(&mut self) -> Vec<Value> {
            let mut frames = Vec::new();
            while let Ok(out) = self.outbound.try_recv() {
                match out {
                    Outbound::Frame(bytes) => {
                        frames.push(serde_json::from_slice(&bytes).unwrap());
                    }
                    Outbound::Close => panic!("dispatcher must never close"),
                }
            }
            frames
        }
    }

    // =====================================================================
    // Command responses
    // =====================================================================

    #[test]
    fn test_welcome_requests_room_list_once() {
        let mut h = Harness::new();
        h.dispatch(json!({ "type": "welcome" }));

        assert_eq!(h.sent(), vec![json!({ "type": "active_rooms" })]);
        assert!(h.recorder.calls().is_empty());
    }

    #[test]
    fn test_active_rooms_updates_list_once() {
        let mut h = Harness::new();
        h.dispatch(json!({ "type": "active_rooms", "rooms": ["lobby", "dev"] }));

        assert_eq!(
            h.recorder.calls(),
            vec![Call::UpdateList(vec![
                RoomSummary::named("lobby"),
                RoomSummary::named("dev"),
            ])]
        );
        assert!(h.sent().is_empty());
    }

    #[test]
    fn test_error_raises_alert() {
        let mut h = Harness::new();
        h.dispatch(json!({ "type": "error", "message": "nickname in use" }));

        assert_eq!(
            h.recorder.calls(),
            vec![Call::Alert("Alert!".into(), "nickname in use".into())]
        );
    }

    #[test]
    fn test_legacy_message_appends_to_open_window() {
        let mut h = Harness::new();
        h.dispatch(json!({ "source": "client", "type": "joined", "room": "lobby" }));
        let raw = json!({ "type": "message", "room": "lobby", "body": "old style" });
        h.dispatch(raw.clone());

        let calls = h.recorder.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], Call::Append("room-lobby-win".into(), raw));
    }

    #[test]
    fn test_legacy_message_without_window_is_dropped() {
        let mut h = Harness::new();
        h.dispatch(json!({ "type": "message", "room": "nowhere", "body": "lost" }));
        assert!(h.recorder.calls().is_empty());
    }

    // =====================================================================
    // Events
    // =====================================================================

    #[test]
    fn test_client_joined_shows_room_window() {
        let mut h = Harness::new();
        h.dispatch(json!({
            "source": "client", "type": "joined", "room": "dev", "topic": "builds"
        }));

        assert_eq!(
            h.recorder.calls(),
            vec![Call::ShowRoom(RoomWindowSpec {
                name: "dev".into(),
                topic: Some("builds".into()),
            })]
        );
    }

    #[test]
    fn test_unrecognized_client_event_changes_nothing() {
        let mut h = Harness::new();
        h.dispatch(json!({ "source": "client", "type": "kicked", "room": "dev" }));
        assert!(h.recorder.calls().is_empty());
        assert!(h.sent().is_empty());
    }

    #[test]
    fn test_room_event_forwarded_verbatim() {
        let mut h = Harness::new();
        let raw = json!({
            "source": "room", "type": "said", "room": "lobby",
            "nick": "bob", "body": "hi", "extra": { "nested": [1, 2] }
        });
        h.dispatch(raw.clone());

        match h.recorder.calls().as_slice() {
            [Call::RoomEvent(event)] => {
                assert_eq!(event.kind.as_deref(), Some("said"));
                assert_eq!(event.room.as_deref(), Some("lobby"));
                assert_eq!(event.raw, raw);
            }
            other => panic!("expected one room event, got {other:?}"),
        }
    }

    #[test]
    fn test_room_event_without_type_still_reaches_controller() {
        let mut h = Harness::new();
        let raw = json!({ "source": "room", "room": "lobby", "body": "x" });
        h.dispatch(raw.clone());

        assert_eq!(
            h.recorder.calls(),
            vec![Call::RoomEvent(RoomEvent {
                kind: None,
                room: Some("lobby".into()),
                raw,
            })]
        );
    }

    #[test]
    fn test_unknown_packet_changes_nothing() {
        let mut h = Harness::new();
        h.dispatch(json!({ "type": "teleport", "to": "mars" }));

        assert!(h.recorder.calls().is_empty());
        assert!(h.sent().is_empty());
        assert!(h.session.is_connected());
    }
}
