//! services/api/src/web/rest.rs
//!
//! The dashboard handler and the master definition for the OpenAPI specification.

use crate::web::{auth, confession, karma, mood, session::CurrentSession, state::AppState};
use axum::{extract::State, Extension, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login_handler,
        auth::logout_handler,
        dashboard_handler,
        karma::karma_handler,
        karma::add_deed_handler,
        karma::delete_deed_handler,
        mood::moods_handler,
        mood::add_mood_handler,
        mood::delete_mood_handler,
        confession::conversation_handler,
        confession::confess_handler,
        confession::reset_handler,
    ),
    components(
        schemas(
            auth::LoginRequest,
            auth::LoginResponse,
            DashboardResponse,
            karma::NewDeedRequest,
            karma::DeedView,
            karma::KarmaView,
            mood::NewMoodRequest,
            mood::DeleteMoodRequest,
            mood::MoodView,
            mood::MoodsResponse,
            confession::ConfessionRequest,
            confession::TurnView,
            confession::ConversationResponse,
        )
    ),
    tags(
        (name = "Karma Tracker API", description = "Deeds, moods and the confession bot.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Dashboard
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub user_name: String,
    /// A random motivational quote, if any are configured.
    pub quote: Option<String>,
}

/// GET /dashboard - Greeting and quote of the moment
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<CurrentSession>,
) -> Json<DashboardResponse> {
    let user_name = session.handle.lock().await.user_name.clone();
    Json(DashboardResponse {
        user_name,
        quote: state.quotes.random().await,
    })
}
