mod chat_room;
mod pot_ledger;
mod user_registry;
mod user_session_handle;

pub use self::chat_room::{ChatRoom, ChatRoomMetadata, RoomDetail};
pub use self::pot_ledger::PotError;
pub use self::user_session_handle::{SessionAndUserName, UserSessionHandle};
