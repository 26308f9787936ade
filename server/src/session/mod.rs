use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use comms::{command::UserCommand, event::Event, frame};
use nanoid::nanoid;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::room_manager::ChatRoom;

use self::chat_session::ChatSession;

mod chat_session;

/// Given a websocket bound to a room, handles the connection until the client
/// closes it, the socket breaks or the server shuts down
pub async fn handle_user_session(
    room: Arc<Mutex<ChatRoom>>,
    user_name: String,
    mut quit_rx: broadcast::Receiver<()>,
    mut socket: WebSocket,
) -> anyhow::Result<()> {
    let session_id = nanoid!();
    let room_uri = String::from(room.lock().await.uri());
    let mut chat_session = ChatSession::new(&session_id, &user_name, room);

    // connecting is joining, there is no separate handshake
    chat_session.join().await;
    info!(%session_id, room = %room_uri, user = %user_name, "connection joined the room");

    loop {
        tokio::select! {
            msg = socket.recv() => match msg {
                Some(Ok(Message::Text(text))) => {
                    for cmd in frame::decode_frame::<UserCommand>(text.as_str()) {
                        match cmd {
                            Ok(cmd) => {
                                if let Err(err) = chat_session.handle_user_command(cmd).await {
                                    warn!(%session_id, error = %err, "could not handle the command");
                                }
                            }
                            Err(err) => warn!(%session_id, error = %err, "could not read the command"),
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(%session_id, error = %err, "websocket failed");
                    break;
                }
            },
            // everything queued for the connection goes out in a single frame
            events = chat_session.recv() => match events {
                Ok(events) => {
                    if let Err(err) = write_events(&mut socket, &events).await {
                        warn!(%session_id, error = %err, "could not write to the websocket");
                        break;
                    }
                }
                Err(err) => {
                    warn!(%session_id, error = %err, "lost the room");
                    break;
                }
            },
            // the server is going away, nobody needs to be told about the departure
            Ok(_) = quit_rx.recv() => {
                let _ = socket.send(Message::Close(None)).await;
                info!(%session_id, "closing the connection for the shutdown");
                return Ok(());
            }
        }
    }

    chat_session.leave().await;
    info!(%session_id, room = %room_uri, user = %user_name, "connection closed");

    Ok(())
}

async fn write_events(socket: &mut WebSocket, events: &[Event]) -> anyhow::Result<()> {
    let payload = frame::encode_frame(events)?;

    socket.send(Message::Text(payload.into())).await?;

    Ok(())
}
