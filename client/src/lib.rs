/// Endpoints and wire options the client connects with
pub mod config;
/// Single websocket per session, bound to the room it was opened for
pub mod connection;
/// Translation of user actions into outbound commands
pub mod dispatcher;
pub mod error;
/// HTTP calls to the room endpoint
pub mod room_api;
/// Application state and the task owning it
pub mod state_store;
pub mod termination;
