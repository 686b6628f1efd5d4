use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{AssignPatientRequest, CareError, CreateConnectionRequest, RequestCreation};
use crate::services::relationship::RelationshipService;
use crate::services::requests::ConnectionRequestService;

fn map_error(err: CareError) -> AppError {
    match err {
        CareError::UnknownPatient => AppError::NotFound("Patient not found".to_string()),
        CareError::UnknownDoctor => AppError::NotFound("Doctor not found".to_string()),
        CareError::RequestNotFound => AppError::NotFound("Request not found".to_string()),
        CareError::AlreadyDecided => AppError::Conflict("Request already decided".to_string()),
        CareError::NotAssigned => AppError::BadRequest("No doctor assigned".to_string()),
        CareError::Unauthorized => {
            AppError::Auth("Unauthorized access or patient not assigned".to_string())
        }
    }
}

#[axum::debug_handler]
pub async fn assign_patient(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AssignPatientRequest>,
) -> Result<Json<Value>, AppError> {
    let relationships = RelationshipService::new(&state);

    relationships
        .assign(request.patient_id, request.doctor_id)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Patient assigned to doctor successfully!"
    })))
}

#[axum::debug_handler]
pub async fn remove_assigned_doctor(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let relationships = RelationshipService::new(&state);

    let doctor_id = relationships.unassign(patient_id).await.map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "doctor_id": doctor_id,
        "message": "Doctor removed successfully."
    })))
}

#[axum::debug_handler]
pub async fn get_roster(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let relationships = RelationshipService::new(&state);

    let roster = relationships.roster(doctor_id).await.map_err(map_error)?;

    Ok(Json(json!(roster)))
}

#[axum::debug_handler]
pub async fn get_roster_member(
    State(state): State<Arc<AppState>>,
    Path((doctor_id, patient_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let relationships = RelationshipService::new(&state);

    let patient = relationships
        .roster_member(doctor_id, patient_id)
        .await
        .map_err(map_error)?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateConnectionRequest>,
) -> Result<Json<Value>, AppError> {
    let requests = ConnectionRequestService::new(&state);

    let creation = requests
        .create(request.patient_id, request.doctor_id)
        .await
        .map_err(map_error)?;

    let message = match creation {
        RequestCreation::Created(_) => "Request sent successfully!",
        RequestCreation::AlreadyPending(_) => "Request already sent.",
    };

    Ok(Json(json!({
        "success": true,
        "request_id": creation.request_id(),
        "message": message
    })))
}

#[axum::debug_handler]
pub async fn list_pending_requests(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let requests = ConnectionRequestService::new(&state);

    let pending = requests.list_pending(doctor_id).await;

    Ok(Json(json!(pending)))
}

#[axum::debug_handler]
pub async fn approve_request(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let requests = ConnectionRequestService::new(&state);

    requests.approve(request_id).await.map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Request approved and patient assigned."
    })))
}

#[axum::debug_handler]
pub async fn reject_request(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let requests = ConnectionRequestService::new(&state);

    requests.reject(request_id).await.map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Request rejected."
    })))
}
