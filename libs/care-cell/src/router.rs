use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use shared_store::AppState;

use crate::handlers;

pub fn care_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/assign", post(handlers::assign_patient))
        .route(
            "/patients/{patient_id}/doctor",
            delete(handlers::remove_assigned_doctor),
        )
        .route("/doctors/{doctor_id}/patients", get(handlers::get_roster))
        .route(
            "/doctors/{doctor_id}/patients/{patient_id}",
            get(handlers::get_roster_member),
        )
        .route("/requests", post(handlers::create_request))
        .route(
            "/doctors/{doctor_id}/requests",
            get(handlers::list_pending_requests),
        )
        .route(
            "/requests/{request_id}/approve",
            post(handlers::approve_request),
        )
        .route(
            "/requests/{request_id}/reject",
            post(handlers::reject_request),
        )
        .with_state(state)
}
