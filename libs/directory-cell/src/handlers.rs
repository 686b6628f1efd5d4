use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{
    CreateDoctorRequest, CreatePatientRequest, DirectoryError, UpdateDoctorRequest,
    UpdatePatientRequest,
};
use crate::services::directory::DirectoryService;

fn map_error(err: DirectoryError) -> AppError {
    match err {
        DirectoryError::PatientNotFound => AppError::NotFound("Patient not found".to_string()),
        DirectoryError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        DirectoryError::EmailAlreadyExists(_) => AppError::Conflict(err.to_string()),
        DirectoryError::ValidationError(msg) => AppError::ValidationError(msg),
    }
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(&state);

    let patient = directory.create_patient(request).await.map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "patient": patient,
        "message": "Patient profile created"
    })))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(&state);

    let patient = directory.get_patient(patient_id).await.map_err(map_error)?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(&state);

    let doctor = directory.create_doctor(request).await.map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor,
        "message": "Doctor profile created"
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(&state);

    let doctor = directory.get_doctor(doctor_id).await.map_err(map_error)?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(&state);

    let patient = directory
        .update_patient(patient_id, request)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "patient": patient,
        "message": "Patient profile updated"
    })))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(&state);

    let doctor = directory
        .update_doctor(doctor_id, request)
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor,
        "message": "Doctor profile updated"
    })))
}

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(&state);

    let doctors = directory.list_doctors().await;

    Ok(Json(json!(doctors)))
}
