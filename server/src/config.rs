use clap::Parser;

use crate::room_manager::DEFAULT_CHIPS_PER_USER;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Parser, Debug, Clone)]
#[command(name = "server", about = "In-memory chat room server with room pots")]
pub struct ServerConfig {
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Chips a member holds when first seen in a room
    #[arg(
        long,
        env = "CHIPS_PER_USER",
        default_value_t = DEFAULT_CHIPS_PER_USER,
        value_parser = clap::value_parser!(i64).range(0..)
    )]
    pub chips_per_user: i64,
}
