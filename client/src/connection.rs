use comms::{
    command::UserCommand,
    transport::{
        self,
        client::{CommandWriter, FrameStream},
    },
};
use reqwest::Url;
use tokio_stream::StreamExt;
use tracing::{debug, info};

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Closed,
    Connecting { url: String },
    Open { url: String },
    Errored { err: String },
}

/// An open websocket bound to the room and user it was opened with.
///
/// A connection is never re-targeted, switching rooms means opening a new one.
pub struct Connection {
    url: Url,
    room: String,
    frames: FrameStream,
    writer: CommandWriter,
}

impl Connection {
    /// Opens the websocket, resolves once the handshake has completed
    pub async fn open(url: Url, room: &str) -> Result<Self, ClientError> {
        let (frames, writer) = transport::client::connect(url.as_str())
            .await
            .map_err(ClientError::Connect)?;

        info!(%url, room, "room connection open");

        Ok(Connection {
            url,
            room: String::from(room),
            frames,
            writer,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    /// Next raw frame from the server, `None` once the server closed the websocket
    ///
    /// # Cancel Safety
    ///
    /// This method is cancel safe.
    pub async fn next_frame(&mut self) -> Option<anyhow::Result<String>> {
        self.frames.next().await
    }

    pub async fn send(&mut self, command: &UserCommand) -> Result<(), ClientError> {
        debug!(room = %self.room, ?command, "sending command");

        self.writer.write(command).await.map_err(ClientError::Send)
    }

    pub async fn close(mut self) {
        if let Err(err) = self.writer.close().await {
            debug!(room = %self.room, error = %err, "websocket was not closed cleanly");
        }
    }
}
