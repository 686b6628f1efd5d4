use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::Actor;
use shared_store::AppState;

use crate::models::{
    BookSessionRequest, DecideEditRequest, RequestEditRequest, SessionError,
    SetSessionStatusRequest,
};
use crate::services::booking::SessionBookingService;
use crate::services::negotiation::EditNegotiationService;

fn map_error(err: SessionError) -> AppError {
    match err {
        SessionError::UnknownPatient => AppError::NotFound("Patient not found".to_string()),
        SessionError::UnknownDoctor => AppError::NotFound("Doctor not found".to_string()),
        SessionError::NotFound => AppError::NotFound("Session not found".to_string()),
        SessionError::SlotTakenByDoctor | SessionError::SlotTakenByPatient => {
            AppError::Conflict(err.to_string())
        }
        SessionError::NoPendingEdit => {
            AppError::BadRequest("No pending edit request for this session".to_string())
        }
        SessionError::AlreadyDecided => AppError::Conflict("Session already decided".to_string()),
        SessionError::InvalidStatus(_) | SessionError::InvalidDecision(_) => {
            AppError::BadRequest(err.to_string())
        }
        SessionError::InvalidInput(msg) => AppError::ValidationError(msg),
    }
}

#[axum::debug_handler]
pub async fn book_session(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookSessionRequest>,
) -> Result<Json<Value>, AppError> {
    let booking = SessionBookingService::new(&state);

    let session = booking.book(request).await.map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "session_id": session.id,
        "message": "Session booked successfully."
    })))
}

#[axum::debug_handler]
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Path((role, user_id)): Path<(Actor, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let booking = SessionBookingService::new(&state);

    let sessions = booking.list_for(role, user_id).await.map_err(map_error)?;

    Ok(Json(json!(sessions)))
}

#[axum::debug_handler]
pub async fn set_session_status(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SetSessionStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let booking = SessionBookingService::new(&state);

    booking
        .set_status(session_id, &request.status)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Session {}.", request.status)
    })))
}

#[axum::debug_handler]
pub async fn request_edit(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<RequestEditRequest>,
) -> Result<Json<Value>, AppError> {
    let negotiation = EditNegotiationService::new(&state);

    negotiation
        .request_edit(
            session_id,
            request.new_date,
            request.new_time,
            request.requested_by,
        )
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Edit requested. Awaiting the other party's decision."
    })))
}

#[axum::debug_handler]
pub async fn decide_edit(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<DecideEditRequest>,
) -> Result<Json<Value>, AppError> {
    let negotiation = EditNegotiationService::new(&state);

    negotiation
        .decide_edit(session_id, &request.decision, request.decided_by)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Edit {}ed.", request.decision)
    })))
}
