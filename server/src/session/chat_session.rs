use std::sync::Arc;

use comms::{command::UserCommand, event::Event};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

use crate::room_manager::{ChatRoom, SessionAndUserName, UserSessionHandle};

/// The bond between a connection and its room while the connection is a member
struct Membership {
    broadcast_rx: broadcast::Receiver<Event>,
    user_session_handle: UserSessionHandle,
}

/// [ChatSession] runs the room commands of a single connection
///
/// A connection is bound to one room for its whole life, leaving the room only
/// stops the membership, a later join-room picks it up again
pub(super) struct ChatSession {
    session_and_user_name: SessionAndUserName,
    room: Arc<Mutex<ChatRoom>>,
    membership: Option<Membership>,
}

impl ChatSession {
    pub fn new(session_id: &str, user_name: &str, room: Arc<Mutex<ChatRoom>>) -> Self {
        ChatSession {
            session_and_user_name: SessionAndUserName {
                session_id: String::from(session_id),
                user_name: String::from(user_name),
            },
            room,
            membership: None,
        }
    }

    pub fn is_member(&self) -> bool {
        self.membership.is_some()
    }

    pub async fn join(&mut self) {
        if self.is_member() {
            return;
        }

        let (broadcast_rx, user_session_handle) =
            self.room.lock().await.join(&self.session_and_user_name);

        self.membership = Some(Membership {
            broadcast_rx,
            user_session_handle,
        });
    }

    pub async fn leave(&mut self) {
        if let Some(membership) = self.membership.take() {
            self.room.lock().await.leave(membership.user_session_handle);
        }
    }

    pub async fn handle_user_command(&mut self, cmd: UserCommand) -> anyhow::Result<()> {
        match cmd {
            UserCommand::JoinRoom(_) => self.join().await,
            UserCommand::LeaveRoom(_) => self.leave().await,
            cmd => {
                let Some(membership) = self.membership.as_ref() else {
                    debug!(user = %self.session_and_user_name.user_name, ?cmd, "not in the room, command ignored");
                    return Ok(());
                };
                let handle = &membership.user_session_handle;

                match cmd {
                    UserCommand::SendMessage(cmd) => {
                        handle.send_message(cmd.message, cmd.target)?;
                    }
                    UserCommand::AddPot(cmd) => {
                        self.room.lock().await.add_pot(handle, cmd.pot);
                    }
                    UserCommand::RetrievePot(cmd) => {
                        self.room.lock().await.retrieve_pot(handle, cmd.pot);
                    }
                    UserCommand::JoinRoom(_) | UserCommand::LeaveRoom(_) => {}
                }
            }
        }

        Ok(())
    }

    /// Waits for the next events of the room, everything already queued comes along in the same batch
    /// Never resolves while the connection is not a member
    pub async fn recv(&mut self) -> anyhow::Result<Vec<Event>> {
        let Some(membership) = self.membership.as_mut() else {
            return std::future::pending().await;
        };

        let first = loop {
            match membership.broadcast_rx.recv().await {
                Ok(event) => break event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(user = %self.session_and_user_name.user_name, skipped, "connection is lagging behind the room");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    anyhow::bail!("the room broadcast channel is closed")
                }
            }
        };

        let mut events = vec![first];
        while let Ok(event) = membership.broadcast_rx.try_recv() {
            events.push(event);
        }

        Ok(events)
    }
}
