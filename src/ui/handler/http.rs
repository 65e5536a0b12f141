//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::infrastructure::dto::http::RoomSummaryDto;
use crate::ui::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the list of rooms currently in the directory
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let summaries = state.repository.room_summaries().await;

    Json(
        summaries
            .into_iter()
            .map(|summary| RoomSummaryDto {
                id: summary.id.into_string(),
                user_count: summary.user_count,
            })
            .collect(),
    )
}
