use comms::frame::FrameError;

/// Failures surfaced by the room session, none of them are retried
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("room creation failed with HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("room creation response carried no room identifier")]
    MissingRoomIdentifier,
    #[error("invalid websocket url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("websocket connect failed: {0:#}")]
    Connect(anyhow::Error),
    #[error("could not send command: {0:#}")]
    Send(anyhow::Error),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("no open room connection")]
    NotConnected,
}
