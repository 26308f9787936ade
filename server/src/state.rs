use tokio::sync::broadcast;

use crate::room_manager::RoomManager;

/// Shared by every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub room_manager: RoomManager,
    /// Fired once when the server shuts down, open websockets close on it
    pub quit_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(room_manager: RoomManager) -> Self {
        let (quit_tx, _) = broadcast::channel(1);

        AppState {
            room_manager,
            quit_tx,
        }
    }
}
