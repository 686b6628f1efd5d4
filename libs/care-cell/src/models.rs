use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::Patient;

/// The patient fields a doctor sees in roster and request views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub profession: Option<String>,
    pub diagnosed: Option<String>,
}

impl From<&Patient> for PatientSummary {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            email: patient.email.clone(),
            age: patient.age,
            gender: patient.gender.clone(),
            profession: patient.profession.clone(),
            diagnosed: patient.diagnosed.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignPatientRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConnectionRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
}

/// One pending connection request, joined with the requesting
/// patient's summary at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRequestView {
    pub request_id: Uuid,
    #[serde(flatten)]
    pub patient: PatientSummary,
}

/// Outcome of an idempotent request creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestCreation {
    Created(Uuid),
    AlreadyPending(Uuid),
}

impl RequestCreation {
    pub fn request_id(&self) -> Uuid {
        match *self {
            RequestCreation::Created(id) | RequestCreation::AlreadyPending(id) => id,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CareError {
    #[error("Patient not found")]
    UnknownPatient,

    #[error("Doctor not found")]
    UnknownDoctor,

    #[error("Request not found")]
    RequestNotFound,

    #[error("Request already decided")]
    AlreadyDecided,

    #[error("No doctor assigned")]
    NotAssigned,

    #[error("Patient not assigned to this doctor")]
    Unauthorized,
}
