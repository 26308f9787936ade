use clap::ValueEnum;
use reqwest::Url;

use crate::error::ClientError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_WS_URL: &str = "ws://localhost:8080/ws";

/// Query parameter carrying the room identifier when a connection is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoomParam {
    Uri,
    Room,
}

impl RoomParam {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomParam::Uri => "uri",
            RoomParam::Room => "room",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base url of the HTTP api, room creation is posted to `<api_url>/api/room`
    pub api_url: String,
    /// Websocket endpoint, connection parameters are appended as a query
    pub ws_url: String,
    pub room_param: RoomParam,
    /// Attach the room display name as `target` to outgoing messages
    pub send_target: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: String::from(DEFAULT_API_URL),
            ws_url: String::from(DEFAULT_WS_URL),
            room_param: RoomParam::Uri,
            send_target: false,
        }
    }
}

impl ClientConfig {
    /// Builds the address a room connection is opened to, e.g. `ws://localhost:8080/ws?name=alice&uri=abc`
    pub fn connection_url(&self, user: &str, room: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.ws_url).map_err(|err| ClientError::InvalidUrl {
            url: self.ws_url.clone(),
            reason: err.to_string(),
        })?;

        url.query_pairs_mut()
            .append_pair("name", user)
            .append_pair(self.room_param.as_str(), room);

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_url_carries_user_and_room() {
        let config = ClientConfig::default();
        let url = config.connection_url("alice", "abc").unwrap();

        assert_eq!(url.as_str(), "ws://localhost:8080/ws?name=alice&uri=abc");
    }

    #[test]
    fn test_connection_url_with_room_param() {
        let config = ClientConfig {
            room_param: RoomParam::Room,
            ..Default::default()
        };
        let url = config.connection_url("alice smith", "r&1").unwrap();

        assert_eq!(
            url.as_str(),
            "ws://localhost:8080/ws?name=alice+smith&room=r%261"
        );
    }

    #[test]
    fn test_invalid_ws_url() {
        let config = ClientConfig {
            ws_url: String::from("not a url"),
            ..Default::default()
        };

        assert!(matches!(
            config.connection_url("alice", "abc"),
            Err(ClientError::InvalidUrl { .. })
        ));
    }
}
