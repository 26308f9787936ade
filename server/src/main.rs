use anyhow::Context;
use clap::Parser;
use server::{config::ServerConfig, room_manager::RoomManager, routes, state::AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();
    let state = AppState::new(RoomManager::new(config.chips_per_user));
    let quit_tx = state.quit_tx.clone();

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("could not bind to the port {}", config.port))?;

    info!(port = config.port, "listening");
    axum::serve(listener, routes::app(state))
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("server interrupted, gracefully shutting down");
            // open websockets are not covered by the graceful shutdown of the listener
            let _ = quit_tx.send(());
        })
        .await
        .context("server failed")?;

    info!("server shut down");

    Ok(())
}
