use anyhow::Context;
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::command;

use super::common::BoxedStream;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// [FrameStream] is a stream of raw text frames sent by the server.
/// A single frame may carry several values, see [crate::frame::decode_frame]
///
/// # Cancel Safety
///
/// This stream is cancel-safe, meaning that it can be used in [tokio::select!]
/// without the risk of missing frames.
pub type FrameStream = BoxedStream<anyhow::Result<String>>;

/// [CommandWriter] is a wrapper around the write half of a websocket which writes [crate::command::UserCommand]s to the server
pub struct CommandWriter {
    sink: SplitSink<WsStream, Message>,
}

impl CommandWriter {
    pub fn new(sink: SplitSink<WsStream, Message>) -> Self {
        Self { sink }
    }

    /// Send a [crate::command::UserCommand] as a single text frame
    ///
    /// # Cancel Safety
    ///
    /// This method is not cancellation safe. If it is used as the event
    /// in a [tokio::select!] statement and some other
    /// branch completes first, then the provided [crate::command::UserCommand] may have been
    /// queued without being flushed to the server.
    pub async fn write(&mut self, command: &command::UserCommand) -> anyhow::Result<()> {
        let serialized = serde_json::to_string(command)?;

        self.sink
            .send(Message::text(serialized))
            .await
            .context("could not write command to the websocket")?;

        Ok(())
    }

    /// Starts the closing handshake of the websocket
    pub async fn close(&mut self) -> anyhow::Result<()> {
        self.sink
            .close()
            .await
            .context("could not close the websocket")?;

        Ok(())
    }
}

/// Opens a websocket to the given url and splits it, see [split_ws_stream]
pub async fn connect(url: &str) -> anyhow::Result<(FrameStream, CommandWriter)> {
    let (stream, _response) = connect_async(url)
        .await
        .with_context(|| format!("could not open websocket to {}", url))?;

    Ok(split_ws_stream(stream))
}

/// Splits a websocket into a stream of text frames and a command writer.
///
/// Control frames are handled by the websocket itself and never reach the stream.
///
/// # Arguments
///
/// - `stream` - A [WebSocketStream] whose handshake has completed
pub fn split_ws_stream(stream: WsStream) -> (FrameStream, CommandWriter) {
    let (sink, stream) = stream.split();

    (
        Box::pin(stream.filter_map(|message| async move {
            match message {
                Ok(Message::Text(text)) => Some(Ok(text.as_str().to_owned())),
                Ok(Message::Binary(bytes)) => Some(
                    String::from_utf8(bytes.to_vec())
                        .context("server sent a binary frame which is not utf-8"),
                ),
                Ok(_) => None,
                Err(err) => {
                    Some(Err(anyhow::Error::new(err).context("could not read frame from the server")))
                }
            }
        })),
        CommandWriter::new(sink),
    )
}
