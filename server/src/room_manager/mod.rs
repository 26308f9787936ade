use std::{collections::HashMap, sync::Arc};

use nanoid::nanoid;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

pub use self::room::{
    ChatRoom, ChatRoomMetadata, PotError, RoomDetail, SessionAndUserName, UserSessionHandle,
};

mod room;

pub const DEFAULT_CHIPS_PER_USER: i64 = 1000;

// length of the public room identifiers
const ROOM_URI_LENGTH: usize = 10;

#[derive(Debug, Clone)]
/// [RoomManager] owns every room of the server, rooms are created on demand and live until shutdown
pub struct RoomManager {
    chat_rooms: Arc<RwLock<HashMap<String, Arc<Mutex<ChatRoom>>>>>,
    chips_per_user: i64,
}

impl RoomManager {
    pub fn new(chips_per_user: i64) -> Self {
        RoomManager {
            chat_rooms: Arc::new(RwLock::new(HashMap::new())),
            chips_per_user,
        }
    }

    /// Creates a room with a fresh uri and seats its creator
    pub async fn create_room(&self, creator: &str) -> RoomDetail {
        let mut chat_rooms = self.chat_rooms.write().await;

        let mut uri = nanoid!(ROOM_URI_LENGTH);
        while chat_rooms.contains_key(&uri) {
            uri = nanoid!(ROOM_URI_LENGTH);
        }

        let mut room = ChatRoom::new(ChatRoomMetadata::new(&nanoid!(), &uri), self.chips_per_user);
        room.seat(creator);
        let detail = room.detail();

        chat_rooms.insert(uri, Arc::new(Mutex::new(room)));
        info!(room = %detail.uri, creator, "room created");

        detail
    }

    pub async fn find_room(&self, uri: &str) -> Option<Arc<Mutex<ChatRoom>>> {
        self.chat_rooms.read().await.get(uri).cloned()
    }

    pub async fn room_detail(&self, uri: &str) -> Option<RoomDetail> {
        let room = self.find_room(uri).await?;
        let detail = room.lock().await.detail();

        Some(detail)
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        RoomManager::new(DEFAULT_CHIPS_PER_USER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_created_rooms_can_be_found() {
        let room_manager = RoomManager::new(50);

        let first = room_manager.create_room("alice").await;
        let second = room_manager.create_room("bob").await;

        assert_ne!(first.uri, second.uri);
        assert_eq!(first.uri.len(), ROOM_URI_LENGTH);
        assert_eq!(first.pot, 0);
        assert_eq!(first.record.get("alice"), Some(&50));

        let found = room_manager.room_detail(&second.uri).await.unwrap();
        assert_eq!(found, second);
    }

    #[tokio::test]
    async fn test_unknown_room() {
        let room_manager = RoomManager::default();

        assert!(room_manager.find_room("nope").await.is_none());
    }
}
