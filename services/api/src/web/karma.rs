//! services/api/src/web/karma.rs
//!
//! The deed log: listing, scoring new deeds, and deleting by position.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use karma_core::{scoring, DeedRecord, KarmaSummary};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::web::{port_failure, state::AppState};

#[derive(Deserialize, ToSchema)]
pub struct NewDeedRequest {
    #[serde(default)]
    pub deed: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct DeedView {
    /// Row position, used for deletion.
    pub id: usize,
    pub text: String,
    pub points: i32,
    pub reason: String,
}

#[derive(Serialize, ToSchema)]
pub struct KarmaView {
    pub deeds: Vec<DeedView>,
    pub total_points: i32,
    pub progress_percent: u8,
}

async fn karma_view(state: &AppState) -> Result<KarmaView, (StatusCode, String)> {
    let deeds = state
        .deeds
        .list()
        .await
        .map_err(|e| port_failure("Failed to load deeds", e))?;
    let summary = KarmaSummary::from_deeds(deeds.iter().map(|(_, deed)| deed));

    Ok(KarmaView {
        deeds: deeds
            .into_iter()
            .map(|(id, deed)| DeedView {
                id,
                text: deed.description,
                points: deed.points,
                reason: deed.reason,
            })
            .collect(),
        total_points: summary.total_points,
        progress_percent: summary.progress_percent,
    })
}

/// GET /karma - List deeds and the running total
#[utoipa::path(
    get,
    path = "/karma",
    responses(
        (status = 200, description = "Current deed log", body = KarmaView),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn karma_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<KarmaView>, (StatusCode, String)> {
    Ok(Json(karma_view(&state).await?))
}

/// POST /karma - Score and record a deed. Blank deeds are ignored.
#[utoipa::path(
    post,
    path = "/karma",
    request_body = NewDeedRequest,
    responses(
        (status = 200, description = "Deed log after the update", body = KarmaView),
        (status = 500, description = "Sentiment classifier or storage failed")
    )
)]
pub async fn add_deed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewDeedRequest>,
) -> Result<Json<KarmaView>, (StatusCode, String)> {
    let text = req.deed.as_deref().map(str::trim).unwrap_or_default();
    if !text.is_empty() {
        let scored = scoring::score(state.sentiment.as_ref(), text)
            .await
            .map_err(|e| port_failure("Failed to score deed", e))?;
        info!(points = scored.points, reason = %scored.reason, "Recording deed");

        state
            .deeds
            .append(DeedRecord {
                description: text.to_string(),
                points: scored.points,
                reason: scored.reason,
            })
            .await
            .map_err(|e| port_failure("Failed to save deed", e))?;
    }
    Ok(Json(karma_view(&state).await?))
}

/// POST /karma/{id}/delete - Remove the deed at a row position
#[utoipa::path(
    post,
    path = "/karma/{id}/delete",
    params(("id" = usize, Path, description = "Row position of the deed")),
    responses(
        (status = 200, description = "Deed log after the deletion", body = KarmaView)
    )
)]
pub async fn delete_deed_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<usize>,
) -> Result<Json<KarmaView>, (StatusCode, String)> {
    state
        .deeds
        .delete_at(id)
        .await
        .map_err(|e| port_failure("Failed to delete deed", e))?;
    Ok(Json(karma_view(&state).await?))
}
