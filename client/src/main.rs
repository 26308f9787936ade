use clap::Parser;
use client::{
    config::{ClientConfig, RoomParam, DEFAULT_API_URL, DEFAULT_WS_URL},
    state_store::{StateStore, User},
    termination::{create_termination, Interrupted},
};
use tracing_subscriber::EnvFilter;

use crate::cli::LineFrontend;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "chat", about = "Create or join a chat room from the terminal")]
struct Cli {
    /// Name shown to the other members of the room
    #[arg(long, env = "CHAT_USER_NAME")]
    name: String,

    #[arg(long, env = "CHAT_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[arg(long, env = "CHAT_WS_URL", default_value = DEFAULT_WS_URL)]
    ws_url: String,

    /// Query parameter the room identifier is passed with
    #[arg(long, value_enum, default_value_t = RoomParam::Uri)]
    room_param: RoomParam,

    /// Attach the room name as `target` to sent messages
    #[arg(long, default_value_t = false)]
    send_target: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // logs go to stderr, stdout belongs to the conversation
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig {
        api_url: cli.api_url,
        ws_url: cli.ws_url,
        room_param: cli.room_param,
        send_target: cli.send_target,
    };

    let (terminator, mut interrupt_rx) = create_termination();
    let (state_store, state_rx) = StateStore::new(config, User::new(cli.name));
    let (frontend, action_rx) = LineFrontend::new();

    tokio::try_join!(
        state_store.main_loop(terminator, action_rx, interrupt_rx.resubscribe()),
        frontend.main_loop(state_rx, interrupt_rx.resubscribe()),
    )?;

    if let Ok(reason) = interrupt_rx.recv().await {
        match reason {
            Interrupted::UserInt => println!("exited per user request"),
            Interrupted::OsSigInt => println!("exited because of an os sig int"),
        }
    } else {
        println!("exited because of an unexpected error");
    }

    Ok(())
}
