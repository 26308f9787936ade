use std::collections::HashMap;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use super::ApiError;
use crate::session;
use crate::state::AppState;

/// Query parameters a client can name the room with, `uri` wins over `room`
const ROOM_PARAMS: [&str; 2] = ["uri", "room"];

pub async fn handle_ws(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(user_name) = params.get("name").filter(|name| !name.is_empty()).cloned() else {
        return ApiError::Missing("name").into_response();
    };
    let Some(uri) = ROOM_PARAMS.iter().find_map(|param| params.get(*param)) else {
        return ApiError::Missing("uri").into_response();
    };
    let Some(room) = state.room_manager.find_room(uri).await else {
        return ApiError::RoomNotFound.into_response();
    };

    let quit_rx = state.quit_tx.subscribe();

    ws.on_upgrade(move |socket| async move {
        if let Err(err) = session::handle_user_session(room, user_name, quit_rx, socket).await {
            warn!(error = %err, "session ended with an error");
        }
    })
}
