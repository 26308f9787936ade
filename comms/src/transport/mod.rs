/// Transport over websocket implementation for a client to be able to interact with a room
#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "client")]
mod common;
