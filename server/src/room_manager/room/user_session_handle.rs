use anyhow::Context;
use comms::event::{self, Event};
use tokio::sync::broadcast;

#[derive(Debug, Clone)]
pub struct SessionAndUserName {
    pub session_id: String,
    pub user_name: String,
}

#[derive(Debug)]
/// [UserSessionHandle] is a handle that allows a specific session to post to a specific room.
///
/// It is created when a connection joins a room and is handed back to the room when it leaves.
pub struct UserSessionHandle {
    /// The uri of the room which is associated with this handle
    room: String,
    /// The channel to use for sending events to the all members of the room
    broadcast_tx: broadcast::Sender<Event>,
    session_and_user_name: SessionAndUserName,
}

impl UserSessionHandle {
    pub(super) fn new(
        room: String,
        broadcast_tx: broadcast::Sender<Event>,
        session_and_user_name: SessionAndUserName,
    ) -> Self {
        UserSessionHandle {
            room,
            broadcast_tx,
            session_and_user_name,
        }
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn session_id(&self) -> &str {
        &self.session_and_user_name.session_id
    }

    pub fn user_name(&self) -> &str {
        &self.session_and_user_name.user_name
    }

    pub fn sender(&self) -> event::Sender {
        event::Sender {
            name: String::from(self.user_name()),
        }
    }

    /// Send a chat line to the room, the sender receives it too
    pub fn send_message(&self, message: String, target: Option<String>) -> anyhow::Result<()> {
        self.broadcast_tx
            .send(Event::SendMessage(event::ChatMessageEvent {
                message,
                target: target.map(event::Target::Name),
                sender: Some(self.sender()),
            }))
            .with_context(|| format!("could not write to the broadcast channel of room {}", self.room))?;

        Ok(())
    }
}
