pub mod auth;
pub mod confession;
pub mod karma;
pub mod middleware;
pub mod mood;
pub mod rest;
pub mod session;
pub mod state;

pub use middleware::require_session;

use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use karma_core::PortError;
use std::sync::Arc;
use tracing::error;

use state::AppState;

/// Builds the API router: public auth routes plus the session-gated pages.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Protected routes (session required)
    let protected_routes = Router::new()
        .route("/dashboard", get(rest::dashboard_handler))
        .route("/karma", get(karma::karma_handler).post(karma::add_deed_handler))
        .route("/karma/{id}/delete", post(karma::delete_deed_handler))
        .route("/mood", get(mood::moods_handler).post(mood::add_mood_handler))
        .route("/mood/delete", post(mood::delete_mood_handler))
        .route(
            "/confession",
            get(confession::conversation_handler).post(confession::confess_handler),
        )
        .route("/confession/reset", post(confession::reset_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}

/// Logs a port failure and turns it into a handler error.
pub(crate) fn port_failure(context: &str, e: PortError) -> (StatusCode, String) {
    error!("{}: {:?}", context, e);
    (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_failures_surface_as_server_errors() {
        let (status, body) = port_failure(
            "Failed to load deeds",
            PortError::Unexpected("disk gone".into()),
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Failed to load deeds");
    }
}
