/// Set of commands which the client sends to the server
pub mod command;
/// Set of events the server broadcasts to the members of a room
pub mod event;
/// Newline-delimited JSON framing shared by both ends of the websocket
pub mod frame;
/// Implementation of command and frame transportation over a websocket.
/// Requires the 'client' feature to be enabled and will bring in tokio alongside with the websocket dependencies
pub mod transport;
