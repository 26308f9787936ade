pub mod config;
pub mod room_manager;
pub mod routes;
pub mod state;

mod session;
