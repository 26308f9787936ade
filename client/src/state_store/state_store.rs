use comms::command::UserCommand;
use tokio::sync::{
    broadcast,
    mpsc::{self, UnboundedReceiver, UnboundedSender},
};
use tracing::{info, warn};

use crate::{
    config::ClientConfig,
    connection::Connection,
    dispatcher::{CommandDispatcher, PotAction},
    error::ClientError,
    room_api::RoomApi,
    termination::{Interrupted, Terminator},
};

use super::{action::Action, State, User};

/// Owns the session state and the room connection.
///
/// Actions from the frontend and frames from the server are processed one at
/// a time, a fresh [State] is emitted after each of them.
pub struct StateStore {
    state_tx: UnboundedSender<State>,
    config: ClientConfig,
    user: User,
    room_api: RoomApi,
    dispatcher: CommandDispatcher,
}

impl StateStore {
    pub fn new(config: ClientConfig, user: User) -> (Self, UnboundedReceiver<State>) {
        let (state_tx, state_rx) = mpsc::unbounded_channel::<State>();
        let room_api = RoomApi::new(config.api_url.clone());
        let dispatcher = CommandDispatcher::new(config.send_target);

        (
            StateStore {
                state_tx,
                config,
                user,
                room_api,
                dispatcher,
            },
            state_rx,
        )
    }
}

impl StateStore {
    pub async fn main_loop(
        self,
        mut terminator: Terminator,
        mut action_rx: UnboundedReceiver<Action>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let mut opt_connection: Option<Connection> = None;
        let mut state = State::new(self.user.clone());

        // the initial state once
        self.state_tx.send(state.clone())?;

        let result = loop {
            if let Some(connection) = opt_connection.as_mut() {
                tokio::select! {
                    // Handle the server frames as they come in
                    maybe_frame = connection.next_frame() => match maybe_frame {
                        Some(Ok(payload)) => {
                            if let Err(err) = state.handle_inbound_frame(&payload) {
                                warn!(error = %err, "dropping the rest of a malformed frame");
                                state.record_error(&ClientError::Frame(err));
                            }
                        },
                        Some(Err(err)) => {
                            warn!(error = %err, "room connection failed");
                            opt_connection = None;
                            state.mark_connection_closed();
                        },
                        // server closed the connection, the room stays as it is
                        None => {
                            info!("room connection closed by the server");
                            opt_connection = None;
                            state.mark_connection_closed();
                        },
                    },
                    // Handle the actions coming from the frontend
                    // and process them to do async operations
                    Some(action) = action_rx.recv() => {
                        if let Some(interrupted) = self
                            .handle_action(action, &mut state, &mut opt_connection, &mut terminator)
                            .await?
                        {
                            break interrupted;
                        }
                    },
                    // Catch and handle interrupt signal to gracefully shutdown
                    Ok(interrupted) = interrupt_rx.recv() => {
                        break interrupted;
                    }
                }
            } else {
                tokio::select! {
                    Some(action) = action_rx.recv() => {
                        if let Some(interrupted) = self
                            .handle_action(action, &mut state, &mut opt_connection, &mut terminator)
                            .await?
                        {
                            break interrupted;
                        }
                    },
                    // Catch and handle interrupt signal to gracefully shutdown
                    Ok(interrupted) = interrupt_rx.recv() => {
                        break interrupted;
                    }
                }
            }

            self.state_tx.send(state.clone())?;
        };

        if let Some(connection) = opt_connection.take() {
            connection.close().await;
        }

        Ok(result)
    }

    /// Processes a single frontend action, returns the interrupt reason when the action ends the session
    async fn handle_action(
        &self,
        action: Action,
        state: &mut State,
        opt_connection: &mut Option<Connection>,
        terminator: &mut Terminator,
    ) -> anyhow::Result<Option<Interrupted>> {
        match action {
            Action::CreateRoom => match self.room_api.create_room(self.user.name()).await {
                Ok(identifier) => {
                    info!(room = %identifier, "room created");
                    state.replace_room(&identifier);
                    self.open_connection(state, opt_connection).await?;
                }
                Err(err) => {
                    warn!(error = %err, "could not create room");
                    state.record_error(&err);
                }
            },
            Action::JoinRoom { identifier } => {
                state.replace_room(&identifier);

                if self.open_connection(state, opt_connection).await? {
                    if let Some(room) = state.active_room() {
                        let command = self.dispatcher.join_room(room);
                        self.send(state, opt_connection, command).await;
                    }
                }
            }
            Action::LeaveRoom => {
                // the connection stays open, only the server is told
                if let Some(room) = state.active_room() {
                    let command = self.dispatcher.leave_room(room);
                    self.send(state, opt_connection, command).await;
                }
            }
            Action::UpdatePendingInput { text } => {
                state.set_pending_input(text);
            }
            Action::SendMessage => {
                let command = state
                    .active_room()
                    .and_then(|room| self.dispatcher.send_message(room));

                // the typed text is kept until it actually went out
                if let Some(command) = command {
                    if self.send(state, opt_connection, command).await {
                        state.set_pending_input(String::new());
                    }
                }
            }
            Action::UpdatePendingPot { text } => {
                state.pending_pot = text;
            }
            Action::AddPot => {
                let command = self.dispatcher.adjust_pot(PotAction::Add, &state.pending_pot);
                self.send(state, opt_connection, command).await;
            }
            Action::RetrievePot => {
                let command = self
                    .dispatcher
                    .adjust_pot(PotAction::Retrieve, &state.pending_pot);
                self.send(state, opt_connection, command).await;
            }
            Action::Exit => {
                let _ = terminator.terminate(Interrupted::UserInt);

                return Ok(Some(Interrupted::UserInt));
            }
        }

        Ok(None)
    }

    /// Opens a connection for the active room, replacing the previous one.
    /// Returns whether the new connection is open.
    async fn open_connection(
        &self,
        state: &mut State,
        opt_connection: &mut Option<Connection>,
    ) -> anyhow::Result<bool> {
        // a connection is bound to the room it was opened for
        if let Some(previous) = opt_connection.take() {
            info!(room = previous.room(), "closing the previous room connection");
            previous.close().await;
            state.mark_connection_closed();
        }

        let Some(room) = state.active_room() else {
            return Ok(false);
        };
        let identifier = room.identifier.clone();

        let url = match self.config.connection_url(self.user.name(), &identifier) {
            Ok(url) => url,
            Err(err) => {
                state.process_connection_request_result(Err(&err));
                return Ok(false);
            }
        };

        state.mark_connection_request_start(&url);
        // emit event to re-render any part depending on the connection status
        self.state_tx.send(state.clone())?;

        match Connection::open(url, &identifier).await {
            Ok(connection) => {
                state.process_connection_request_result(Ok(connection.url()));
                let _ = opt_connection.insert(connection);

                Ok(true)
            }
            Err(err) => {
                warn!(room = %identifier, error = %err, "could not open room connection");
                state.process_connection_request_result(Err(&err));

                Ok(false)
            }
        }
    }

    /// Returns whether the command was written to the room connection
    async fn send(
        &self,
        state: &mut State,
        opt_connection: &mut Option<Connection>,
        command: UserCommand,
    ) -> bool {
        let Some(connection) = opt_connection.as_mut() else {
            warn!(?command, "dropping command, there is no open room connection");
            state.record_error(&ClientError::NotConnected);
            return false;
        };

        let result = connection.send(&command).await;

        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "could not send command, dropping the room connection");
                state.record_error(&err);
                *opt_connection = None;
                state.mark_connection_closed();

                false
            }
        }
    }
}
