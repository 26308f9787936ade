use comms::{event::InboundMessage, frame::{self, FrameError}};
use reqwest::Url;
use serde_json::Value;

use crate::{connection::ConnectionStatus, error::ClientError};

/// Value of the pot field before the user typed anything
pub const DEFAULT_PENDING_POT: &str = "0";

/// The person behind the session, fixed once the session starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    name: String,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        User { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Room holds the data for the active room
#[derive(Debug, Clone)]
pub struct Room {
    /// The uri or id the room is addressed with
    pub identifier: String,
    /// The name shown to the user, also used when leaving
    pub display_name: String,
    /// Every value received while the room was active, in arrival order
    pub messages: Vec<InboundMessage>,
    /// Text typed but not sent yet
    pub pending_input: String,
}

impl Room {
    pub fn new(identifier: &str) -> Self {
        Room {
            identifier: String::from(identifier),
            display_name: String::from(identifier),
            messages: Vec::new(),
            pending_input: String::new(),
        }
    }
}

/// State holds the state of the application
#[derive(Debug, Clone)]
pub struct State {
    user: User,
    /// Currently active room, at most one at a time
    pub room: Option<Room>,
    pub connection_status: ConnectionStatus,
    /// Raw text of the pot field
    pub pending_pot: String,
    /// Last failure worth telling the user about
    pub last_error: Option<String>,
}

impl State {
    pub fn new(user: User) -> Self {
        State {
            user,
            room: None,
            connection_status: ConnectionStatus::Closed,
            pending_pot: String::from(DEFAULT_PENDING_POT),
            last_error: None,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn active_room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    /// Makes `identifier` the active room with an empty log.
    /// The previous room is dropped, nothing of it is carried over.
    pub fn replace_room(&mut self, identifier: &str) -> &mut Room {
        self.room.insert(Room::new(identifier))
    }

    pub fn set_pending_input(&mut self, text: String) {
        if let Some(room) = self.room.as_mut() {
            room.pending_input = text;
        }
    }

    /// Appends every value of the frame to the active room, in frame order.
    ///
    /// Values are not checked against the room the connection was opened for,
    /// whatever room is active receives them. Decoding stops at the first
    /// invalid segment; values before it stay in the log. Returns the number
    /// of appended values.
    pub fn handle_inbound_frame(&mut self, payload: &str) -> Result<usize, FrameError> {
        let mut appended = 0;

        for value in frame::decode_frame::<Value>(payload) {
            let value = value?;

            if let Some(room) = self.room.as_mut() {
                room.messages.push(InboundMessage::from_value(value));
                appended += 1;
            }
        }

        Ok(appended)
    }

    pub fn mark_connection_request_start(&mut self, url: &Url) {
        self.connection_status = ConnectionStatus::Connecting {
            url: url.to_string(),
        };
    }

    /// Processes the result of a connection request to change the state of the application
    pub fn process_connection_request_result(&mut self, result: Result<&Url, &ClientError>) {
        self.connection_status = match result {
            Ok(url) => ConnectionStatus::Open {
                url: url.to_string(),
            },
            Err(err) => {
                self.record_error(err);

                ConnectionStatus::Errored {
                    err: err.to_string(),
                }
            }
        }
    }

    pub fn mark_connection_closed(&mut self) {
        self.connection_status = ConnectionStatus::Closed;
    }

    pub fn record_error(&mut self, err: &ClientError) {
        self.last_error = Some(err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn logged_values(state: &State) -> Vec<Value> {
        state
            .active_room()
            .unwrap()
            .messages
            .iter()
            .map(|message| message.raw().clone())
            .collect()
    }

    #[test]
    fn test_frame_values_are_appended_in_order() {
        let mut state = State::new(User::new("alice"));
        state.replace_room("abc");

        assert_eq!(
            state.handle_inbound_frame("{\"a\":1}\r\n{\"b\":2}").unwrap(),
            2
        );
        assert_eq!(logged_values(&state), vec![json!({"a": 1}), json!({"b": 2})]);
    }

    #[test]
    fn test_invalid_segment_stops_the_frame() {
        let mut state = State::new(User::new("alice"));
        state.replace_room("abc");

        let result = state.handle_inbound_frame("{\"a\":1}\n{oops\n{\"c\":3}");

        assert!(matches!(result, Err(FrameError::InvalidSegment { index: 1, .. })));
        assert_eq!(logged_values(&state), vec![json!({"a": 1})]);
    }

    #[test]
    fn test_frames_without_active_room_are_dropped() {
        let mut state = State::new(User::new("alice"));

        assert_eq!(state.handle_inbound_frame("{\"a\":1}").unwrap(), 0);
        assert!(state.active_room().is_none());
    }

    #[test]
    fn test_replacing_the_room_clears_the_log() {
        let mut state = State::new(User::new("alice"));
        state.replace_room("first");
        state.handle_inbound_frame("{\"a\":1}").unwrap();
        state.set_pending_input(String::from("draft"));

        let room = state.replace_room("second");

        assert_eq!(room.identifier, "second");
        assert!(room.messages.is_empty());
        assert_eq!(room.pending_input, "");
    }

    #[test]
    fn test_messages_for_the_previous_room_land_in_the_new_one() {
        let mut state = State::new(User::new("alice"));
        state.replace_room("first");
        state.replace_room("second");

        state
            .handle_inbound_frame(r#"{"action":"send-message","message":"late","target":"first"}"#)
            .unwrap();

        let room = state.active_room().unwrap();
        assert_eq!(room.identifier, "second");
        assert_eq!(room.messages.len(), 1);
        assert_eq!(room.messages[0].text(), Some("late"));
    }

    #[test]
    fn test_connection_status_transitions() {
        let mut state = State::new(User::new("alice"));
        let url = Url::parse("ws://localhost:8080/ws?name=alice&uri=abc").unwrap();

        assert_eq!(state.connection_status, ConnectionStatus::Closed);

        state.mark_connection_request_start(&url);
        assert_eq!(
            state.connection_status,
            ConnectionStatus::Connecting {
                url: url.to_string()
            }
        );

        state.process_connection_request_result(Ok(&url));
        assert_eq!(
            state.connection_status,
            ConnectionStatus::Open {
                url: url.to_string()
            }
        );

        state.process_connection_request_result(Err(&ClientError::NotConnected));
        assert!(matches!(
            state.connection_status,
            ConnectionStatus::Errored { .. }
        ));
        assert_eq!(state.last_error.as_deref(), Some("no open room connection"));
    }

    #[test]
    fn test_pending_pot_starts_at_zero() {
        let state = State::new(User::new("alice"));

        assert_eq!(state.pending_pot, "0");
        assert_eq!(state.user().name(), "alice");
    }
}
