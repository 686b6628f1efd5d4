use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_store::AppState;

use crate::handlers;

pub fn directory_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/patients", post(handlers::create_patient))
        .route(
            "/patients/{patient_id}",
            get(handlers::get_patient).patch(handlers::update_patient),
        )
        .route(
            "/doctors",
            post(handlers::create_doctor).get(handlers::list_doctors),
        )
        .route(
            "/doctors/{doctor_id}",
            get(handlers::get_doctor).patch(handlers::update_doctor),
        )
        .with_state(state)
}
