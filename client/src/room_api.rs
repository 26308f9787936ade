use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClientError;

pub const CREATE_ROOM_PATH: &str = "/api/room";

#[derive(Debug, Serialize)]
struct CreateRoomRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateRoomResponse {
    #[serde(default)]
    data: Option<CreatedRoom>,
}

#[derive(Debug, Deserialize)]
struct CreatedRoom {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

impl CreateRoomResponse {
    // the uri is preferred, older servers only hand out an id
    fn into_identifier(self) -> Option<String> {
        let room = self.data?;

        room.uri
            .filter(|uri| !uri.is_empty())
            .or(room.id.filter(|id| !id.is_empty()))
    }
}

/// Client of the room HTTP endpoint
#[derive(Debug, Clone)]
pub struct RoomApi {
    http: reqwest::Client,
    base_url: String,
}

impl RoomApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        RoomApi {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Asks the server to create a room on behalf of `user_name` and returns the room identifier
    pub async fn create_room(&self, user_name: &str) -> Result<String, ClientError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), CREATE_ROOM_PATH);

        debug!(%url, user = user_name, "requesting a new room");

        let response = self
            .http
            .post(url)
            .json(&CreateRoomRequest { name: user_name })
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<CreateRoomResponse>()
            .await?
            .into_identifier()
            .ok_or(ClientError::MissingRoomIdentifier)
    }
}
