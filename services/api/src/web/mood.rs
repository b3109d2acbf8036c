//! services/api/src/web/mood.rs
//!
//! The mood journal.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Local;
use karma_core::MoodRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::web::{port_failure, state::AppState};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Deserialize, ToSchema)]
pub struct NewMoodRequest {
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteMoodRequest {
    pub timestamp: String,
}

#[derive(Serialize, ToSchema)]
pub struct MoodView {
    pub emoji: String,
    pub note: String,
    pub timestamp: String,
}

#[derive(Serialize, ToSchema)]
pub struct MoodsResponse {
    /// Newest first.
    pub moods: Vec<MoodView>,
}

async fn moods_response(state: &AppState) -> Result<MoodsResponse, (StatusCode, String)> {
    let moods = state
        .moods
        .list_recent_first()
        .await
        .map_err(|e| port_failure("Failed to load moods", e))?;
    Ok(MoodsResponse {
        moods: moods
            .into_iter()
            .map(|m| MoodView {
                emoji: m.emoji,
                note: m.note,
                timestamp: m.timestamp,
            })
            .collect(),
    })
}

/// GET /mood - List logged moods
#[utoipa::path(
    get,
    path = "/mood",
    responses((status = 200, description = "Logged moods", body = MoodsResponse))
)]
pub async fn moods_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MoodsResponse>, (StatusCode, String)> {
    Ok(Json(moods_response(&state).await?))
}

/// POST /mood - Log a mood. Requests without an emoji are ignored.
#[utoipa::path(
    post,
    path = "/mood",
    request_body = NewMoodRequest,
    responses((status = 200, description = "Moods after the update", body = MoodsResponse))
)]
pub async fn add_mood_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewMoodRequest>,
) -> Result<Json<MoodsResponse>, (StatusCode, String)> {
    if let Some(emoji) = req.emoji.filter(|e| !e.is_empty()) {
        let mood = MoodRecord {
            emoji,
            note: req.note.unwrap_or_default().trim().to_string(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };
        info!(timestamp = %mood.timestamp, "Logging mood");
        state
            .moods
            .append(mood)
            .await
            .map_err(|e| port_failure("Failed to save mood", e))?;
    }
    Ok(Json(moods_response(&state).await?))
}

/// POST /mood/delete - Remove moods logged at an exact timestamp
#[utoipa::path(
    post,
    path = "/mood/delete",
    request_body = DeleteMoodRequest,
    responses((status = 200, description = "Moods after the deletion", body = MoodsResponse))
)]
pub async fn delete_mood_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteMoodRequest>,
) -> Result<Json<MoodsResponse>, (StatusCode, String)> {
    state
        .moods
        .delete_by_timestamp(&req.timestamp)
        .await
        .map_err(|e| port_failure("Failed to delete mood", e))?;
    Ok(Json(moods_response(&state).await?))
}
