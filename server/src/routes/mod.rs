//! Router assembly, the HTTP room api and the websocket entry point share one router.

pub mod room;
pub mod ws;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/room", post(room::create_room))
        .route("/api/room/{uri}", get(room::get_room))
        .route("/ws", get(ws::handle_ws))
        .route("/ping", get(ping))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ping() -> Json<serde_json::Value> {
    Json(json!({"status": "success", "message": "pong"}))
}

/// Body of every successful api response
#[derive(Debug, Serialize)]
pub struct Success<T> {
    status: &'static str,
    data: T,
}

impl<T> Success<T> {
    pub fn new(data: T) -> Self {
        Success {
            status: "success",
            data,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("room not found")]
    RoomNotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Missing(_) => StatusCode::BAD_REQUEST,
            ApiError::RoomNotFound => StatusCode::NOT_FOUND,
        };

        (
            status,
            Json(json!({"status": "fail", "message": self.to_string()})),
        )
            .into_response()
    }
}
