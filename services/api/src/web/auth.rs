//! services/api/src/web/auth.rs
//!
//! Login and logout for the single configured account.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::web::{
    session::{clear_cookie_header, session_cookie, set_cookie_header},
    state::AppState,
};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub user_name: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Start a session
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let credentials = &state.config.credentials;
    if !credentials.matches(&req.email, &req.password) {
        warn!("Rejected login attempt");
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()));
    }

    let cookie = state.sessions.create(credentials.display_name.clone()).await;
    info!("User logged in");

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, set_cookie_header(&cookie))],
        Json(LoginResponse {
            user_name: credentials.display_name.clone(),
        }),
    ))
}

/// POST /auth/logout - Drop the session and its conversation
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(cookie) = session_cookie(&headers) {
        if let Some(session) = state.sessions.resolve(cookie).await {
            state.sessions.remove(session.id).await;
            info!("User logged out");
        }
    }
    (StatusCode::OK, [(header::SET_COOKIE, clear_cookie_header())])
}
