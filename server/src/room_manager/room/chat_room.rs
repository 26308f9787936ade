use std::collections::BTreeMap;

use comms::{
    command::PotAmount,
    event::{self, Event},
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use super::{
    pot_ledger::PotLedger,
    user_registry::UserRegistry,
    user_session_handle::{SessionAndUserName, UserSessionHandle},
};

#[derive(Debug, Clone)]
/// ChatRoomMetadata is a struct that holds the identity of a chat room.
pub struct ChatRoomMetadata {
    pub id: String,
    /// Public identifier, connections pick the room with it
    pub uri: String,
}

impl ChatRoomMetadata {
    pub fn new(id: &str, uri: &str) -> Self {
        ChatRoomMetadata {
            id: String::from(id),
            uri: String::from(uri),
        }
    }
}

/// What the HTTP api tells about a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetail {
    pub id: String,
    pub uri: String,
    pub pot: i64,
    pub record: BTreeMap<String, i64>,
}

const BROADCAST_CHANNEL_CAPACITY: usize = 100;

#[derive(Debug)]
/// [ChatRoom] handles the members of a chat room, its chips and the primary broadcast channel
/// A [UserSessionHandle] is handed out to a connection when it joins the room
pub struct ChatRoom {
    metadata: ChatRoomMetadata,
    broadcast_tx: broadcast::Sender<Event>,
    user_registry: UserRegistry,
    pot_ledger: PotLedger,
}

impl ChatRoom {
    pub fn new(metadata: ChatRoomMetadata, chips_per_user: i64) -> Self {
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CHANNEL_CAPACITY);

        ChatRoom {
            metadata,
            broadcast_tx,
            user_registry: UserRegistry::new(),
            pot_ledger: PotLedger::new(chips_per_user),
        }
    }

    pub fn uri(&self) -> &str {
        &self.metadata.uri
    }

    pub fn detail(&self) -> RoomDetail {
        RoomDetail {
            id: self.metadata.id.clone(),
            uri: self.metadata.uri.clone(),
            pot: self.pot_ledger.pot(),
            record: self.pot_ledger.record().clone(),
        }
    }

    pub fn member_names(&self) -> Vec<String> {
        self.user_registry.names()
    }

    /// Seats a member without connecting them, used for the creator of the room
    pub fn seat(&mut self, user_name: &str) -> bool {
        self.pot_ledger.seat(user_name)
    }

    /// Add a connection to the room, the members already in the room are told who joined
    ///
    /// # Returns
    ///
    /// - A broadcast receiver for the connection to receive the events of the room
    /// - A [UserSessionHandle] for the connection to be able to post to the room
    pub fn join(
        &mut self,
        session_and_user_name: &SessionAndUserName,
    ) -> (broadcast::Receiver<Event>, UserSessionHandle) {
        // the welcome goes out before subscribing, so the newcomer does not see their own
        let _ = self
            .broadcast_tx
            .send(Event::SendMessage(event::ChatMessageEvent {
                message: format!("{} joined the room", session_and_user_name.user_name),
                target: Some(self.target()),
                sender: None,
            }));

        let broadcast_rx = self.broadcast_tx.subscribe();
        let user_session_handle = UserSessionHandle::new(
            self.metadata.uri.clone(),
            self.broadcast_tx.clone(),
            session_and_user_name.clone(),
        );

        self.pot_ledger.seat(&session_and_user_name.user_name);
        if self.user_registry.insert(&user_session_handle) {
            debug!(room = %self.metadata.uri, user = %session_and_user_name.user_name, "new member");
        }

        (broadcast_rx, user_session_handle)
    }

    /// Remove a connection from the room
    /// Consume the [UserSessionHandle] to drop it
    pub fn leave(&mut self, user_session_handle: UserSessionHandle) {
        if self.user_registry.remove(&user_session_handle) {
            debug!(room = %user_session_handle.room(), user = %user_session_handle.user_name(), "member is gone");
        }
    }

    /// Bet chips of the member into the pot, the outcome is broadcast to the room
    pub fn add_pot(&mut self, user_session_handle: &UserSessionHandle, amount: PotAmount) -> Event {
        let name = user_session_handle.user_name();
        let message = match self.pot_ledger.bet(name, amount) {
            Ok(_) => format!("{} bet for {}", name, describe(amount)),
            Err(err) => {
                debug!(room = %self.metadata.uri, error = %err, "bet rejected");
                String::from("not enough pot to bet dude")
            }
        };

        self.broadcast_pot(user_session_handle, message)
    }

    /// Take chips from the pot back to the member, the outcome is broadcast to the room
    pub fn retrieve_pot(
        &mut self,
        user_session_handle: &UserSessionHandle,
        amount: PotAmount,
    ) -> Event {
        let name = user_session_handle.user_name();
        let message = match self.pot_ledger.retrieve(name, amount) {
            Ok(_) => format!("{} retrieve for {}", name, describe(amount)),
            Err(err) => {
                debug!(room = %self.metadata.uri, error = %err, "retrieve rejected");
                String::from("not enough pot to retrieved dude")
            }
        };

        self.broadcast_pot(user_session_handle, message)
    }

    fn broadcast_pot(&self, user_session_handle: &UserSessionHandle, message: String) -> Event {
        let event = Event::UpdatePot(event::PotUpdateEvent {
            message,
            pot: self.pot_ledger.pot(),
            sender: Some(user_session_handle.sender()),
        });

        let _ = self.broadcast_tx.send(event.clone());

        event
    }

    fn target(&self) -> event::Target {
        event::Target::Room(event::RoomTarget {
            id: Some(self.metadata.id.clone()),
            name: self.metadata.uri.clone(),
        })
    }
}

fn describe(amount: PotAmount) -> String {
    match amount.as_number() {
        Some(amount) => amount.to_string(),
        None => String::from("NaN"),
    }
}
