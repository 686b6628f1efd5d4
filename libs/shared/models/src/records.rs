use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_config::SchedulingPolicy;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub profession: Option<String>,
    pub diagnosed: Option<String>,
    pub assigned_doctor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialization: Option<String>,
    pub experience: Option<String>,
    pub clinic_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// A patient's proposal to establish a care relationship with a
/// doctor. Transitions out of `pending` exactly once, then is
/// immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRequest {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl ConnectionRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// Which side of the care relationship performed an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    Patient,
    Doctor,
}

/// A `(date, time)` pair treated as an opaque exclusivity key. The
/// engine never does calendar arithmetic on these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub date: String,
    pub time: String,
}

impl Slot {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
        }
    }
}

/// A replacement slot proposed by one party, awaiting the
/// counterparty's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditProposal {
    pub new_date: String,
    pub new_time: String,
    pub requested_by: Actor,
}

impl EditProposal {
    pub fn slot(&self) -> Slot {
        Slot::new(self.new_date.clone(), self.new_time.clone())
    }
}

/// Session workflow state. The edit proposal lives inside the
/// `EditRequested` variant, so a session can never carry a proposal
/// while in any other state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Pending,
    Accepted,
    Rejected,
    EditRequested(EditProposal),
    EditRejected,
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Pending => "pending",
            SessionState::Accepted => "accepted",
            SessionState::Rejected => "rejected",
            SessionState::EditRequested(_) => "edit_requested",
            SessionState::EditRejected => "edit_rejected",
        }
    }

    pub fn is_decided(&self) -> bool {
        matches!(self, SessionState::Accepted | SessionState::Rejected)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub slot: Slot,
    pub state: SessionState,
    pub created_by: Actor,
    pub edit_decided_by: Option<Actor>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn edit_proposal(&self) -> Option<&EditProposal> {
        match &self.state {
            SessionState::EditRequested(proposal) => Some(proposal),
            _ => None,
        }
    }

    /// Whether this session currently holds its slot for conflict
    /// purposes. A session in edit negotiation still holds its
    /// original slot; the proposal takes effect only on acceptance.
    pub fn blocks_slot(&self, policy: &SchedulingPolicy) -> bool {
        if policy.release_rejected_slots && self.state == SessionState::Rejected {
            return false;
        }
        true
    }
}
