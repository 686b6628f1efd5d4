use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::{Actor, EditProposal, Session};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSessionRequest {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date: String,
    pub time: String,
    pub created_by: Actor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSessionStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEditRequest {
    pub new_date: String,
    pub new_time: String,
    pub requested_by: Actor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecideEditRequest {
    pub decision: String,
    pub decided_by: Actor,
}

/// Flat session shape for clients: status as a string, the edit
/// proposal present only while one is outstanding, and both party
/// names joined at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub doctor_name: String,
    pub patient_name: String,
    pub date: String,
    pub time: String,
    pub status: String,
    pub created_by: Actor,
    pub edit_request: Option<EditProposal>,
    pub edit_decided_by: Option<Actor>,
}

impl SessionView {
    pub fn from_session(session: &Session, doctor_name: &str, patient_name: &str) -> Self {
        Self {
            id: session.id,
            doctor_id: session.doctor_id,
            patient_id: session.patient_id,
            doctor_name: doctor_name.to_string(),
            patient_name: patient_name.to_string(),
            date: session.slot.date.clone(),
            time: session.slot.time.clone(),
            status: session.state.label().to_string(),
            created_by: session.created_by,
            edit_request: session.edit_proposal().cloned(),
            edit_decided_by: session.edit_decided_by,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error("Patient not found")]
    UnknownPatient,

    #[error("Doctor not found")]
    UnknownDoctor,

    #[error("Session not found")]
    NotFound,

    #[error("Doctor already has a session at this slot")]
    SlotTakenByDoctor,

    #[error("Patient already has a session at this slot")]
    SlotTakenByPatient,

    #[error("No pending edit request for this session")]
    NoPendingEdit,

    #[error("Session already decided")]
    AlreadyDecided,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid edit decision: {0}")]
    InvalidDecision(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
