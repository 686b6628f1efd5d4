use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use shared_store::AppState;

use crate::handlers;

/// Mounted at the API root: mutations live under `/session`, listings
/// under `/sessions`, matching the shapes clients already use.
pub fn session_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/session/create", post(handlers::book_session))
        .route("/sessions/{role}/{user_id}", get(handlers::list_sessions))
        .route(
            "/session/{session_id}/update",
            patch(handlers::set_session_status),
        )
        .route("/session/{session_id}/edit", patch(handlers::request_edit))
        .route(
            "/session/{session_id}/edit/decision",
            patch(handlers::decide_edit),
        )
        .with_state(state)
}
