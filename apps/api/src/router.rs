use std::sync::Arc;

use axum::{routing::get, Router};

use care_cell::router::care_routes;
use directory_cell::router::directory_routes;
use session_cell::router::session_routes;
use shared_store::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "MindLink API is running!" }))
        .nest("/directory", directory_routes(state.clone()))
        .nest("/care", care_routes(state.clone()))
        .merge(session_routes(state))
}
