use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub email: String,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub profession: Option<String>,
    pub diagnosed: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub email: String,
    pub specialization: Option<String>,
    pub experience: Option<String>,
    pub clinic_name: Option<String>,
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub profession: Option<String>,
    pub diagnosed: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub specialization: Option<String>,
    pub experience: Option<String>,
    pub clinic_name: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("A profile with email {0} already exists")]
    EmailAlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
