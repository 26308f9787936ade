use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::{ApiError, Success};
use crate::room_manager::RoomDetail;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRoomInput {
    /// Name of the creator, seated in the room with the default chips
    #[serde(default)]
    pub name: String,
}

pub async fn create_room(
    State(state): State<AppState>,
    Json(input): Json<CreateRoomInput>,
) -> Result<(StatusCode, Json<Success<RoomDetail>>), ApiError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ApiError::Missing("name"));
    }

    let detail = state.room_manager.create_room(name).await;

    Ok((StatusCode::CREATED, Json(Success::new(detail))))
}

pub async fn get_room(
    State(state): State<AppState>,
    Path(uri): Path<String>,
) -> Result<Json<Success<RoomDetail>>, ApiError> {
    let detail = state
        .room_manager
        .room_detail(&uri)
        .await
        .ok_or(ApiError::RoomNotFound)?;

    Ok(Json(Success::new(detail)))
}
