use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The member of a room which caused an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sender {
    /// Name the member connected with, empty when the server does not expose it
    #[serde(default)]
    pub name: String,
}

/// Room detail attached to some events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// A room reference, some servers send only the name and some send the room detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Name(String),
    Room(RoomTarget),
}

/// A chat line posted to the room, either by a member or by the server itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageEvent {
    /// The content of the message
    #[serde(default)]
    pub message: String,
    /// The room the message was addressed to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    /// The member that has sent the message, absent for server notices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Sender>,
}

/// The room pot has changed, or a member failed to change it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotUpdateEvent {
    /// Human readable outcome of the pot request
    #[serde(default)]
    pub message: String,
    /// Chips in the room pot after the request was processed
    #[serde(default)]
    pub pot: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Sender>,
}

/// A member has joined or left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Sender>,
}

/// Reply to the member that joined a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomJoinedEvent {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
/// Events that can be sent to the client
/// Events are related to the room the connection is bound to, the receipient is a single connection
pub enum Event {
    SendMessage(ChatMessageEvent),
    UpdatePot(PotUpdateEvent),
    UserJoin(ParticipationEvent),
    UserLeft(ParticipationEvent),
    RoomJoined(RoomJoinedEvent),
}

/// A single value received from the server.
///
/// The raw JSON is kept as it was received, the typed [Event] view is only
/// present when the value carries a known `action`.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    raw: Value,
    event: Option<Event>,
}

impl InboundMessage {
    pub fn from_value(raw: Value) -> Self {
        let event = Event::deserialize(&raw).ok();

        InboundMessage { raw, event }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn event(&self) -> Option<&Event> {
        self.event.as_ref()
    }

    pub fn action(&self) -> Option<&str> {
        self.raw.get("action").and_then(Value::as_str)
    }

    /// The textual payload of the message, if it has one
    pub fn text(&self) -> Option<&str> {
        self.raw.get("message").and_then(Value::as_str)
    }
}

impl From<Value> for InboundMessage {
    fn from(raw: Value) -> Self {
        InboundMessage::from_value(raw)
    }
}
