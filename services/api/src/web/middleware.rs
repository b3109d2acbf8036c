//! services/api/src/web/middleware.rs
//!
//! Session middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::web::{session::session_cookie, state::AppState};

/// Middleware that resolves the session cookie.
///
/// If valid, inserts a `CurrentSession` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let unauthorized = || (StatusCode::UNAUTHORIZED, "Please login first".to_string());

    let cookie = session_cookie(req.headers()).ok_or_else(unauthorized)?;
    let session = state.sessions.resolve(cookie).await.ok_or_else(|| {
        debug!("Rejected unknown or tampered session cookie");
        unauthorized()
    })?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
