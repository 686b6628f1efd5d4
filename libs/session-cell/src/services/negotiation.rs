use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use shared_models::{Actor, EditProposal, SessionState};
use shared_store::AppState;

use crate::models::SessionError;

/// Two-phase slot amendment: one party proposes a replacement slot,
/// the counterparty accepts or rejects it. The proposed slot is
/// conflict-checked both when proposed and again when accepted, since
/// another booking may have taken it in between.
#[derive(Clone)]
pub struct EditNegotiationService {
    state: Arc<AppState>,
}

impl EditNegotiationService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: Arc::clone(state),
        }
    }

    /// Propose a new slot for an existing session. Allowed from any
    /// session state; a proposal already outstanding is replaced, so
    /// at most one exists at a time.
    pub async fn request_edit(
        &self,
        session_id: Uuid,
        new_date: String,
        new_time: String,
        requested_by: Actor,
    ) -> Result<(), SessionError> {
        if new_date.trim().is_empty() || new_time.trim().is_empty() {
            return Err(SessionError::InvalidInput(
                "new_date and new_time are required".to_string(),
            ));
        }

        let policy = self.state.config.scheduling;
        let mut state = self.state.store.write().await;

        let session = state.sessions.get(&session_id).ok_or(SessionError::NotFound)?;
        let (doctor_id, patient_id, proposal) = (
            session.doctor_id,
            session.patient_id,
            EditProposal {
                new_date,
                new_time,
                requested_by,
            },
        );

        if state.doctor_slot_taken(doctor_id, &proposal.slot(), Some(session_id), &policy) {
            warn!(
                "Edit request rejected for session {}: slot {} {} already booked",
                session_id, proposal.new_date, proposal.new_time
            );
            return Err(SessionError::SlotTakenByDoctor);
        }
        if state.patient_slot_taken(patient_id, doctor_id, &proposal.slot(), &policy) {
            warn!(
                "Edit request rejected for session {}: patient {} holds slot {} {} elsewhere",
                session_id, patient_id, proposal.new_date, proposal.new_time
            );
            return Err(SessionError::SlotTakenByPatient);
        }

        if let Some(session) = state.sessions.get_mut(&session_id) {
            info!(
                "Session {} edit requested by {:?}: {} {}",
                session_id, requested_by, proposal.new_date, proposal.new_time
            );
            session.state = SessionState::EditRequested(proposal);
        }
        Ok(())
    }

    /// Resolve the outstanding proposal. Acceptance re-validates the
    /// proposed slot against current state before applying it; on
    /// conflict the session is left exactly as it was, proposal
    /// included.
    pub async fn decide_edit(
        &self,
        session_id: Uuid,
        decision: &str,
        decided_by: Actor,
    ) -> Result<(), SessionError> {
        let accept = match decision {
            "accept" => true,
            "reject" => false,
            other => return Err(SessionError::InvalidDecision(other.to_string())),
        };

        let policy = self.state.config.scheduling;
        let mut state = self.state.store.write().await;

        let session = state.sessions.get(&session_id).ok_or(SessionError::NotFound)?;
        let proposal = session
            .edit_proposal()
            .cloned()
            .ok_or(SessionError::NoPendingEdit)?;
        let (doctor_id, patient_id) = (session.doctor_id, session.patient_id);

        if accept {
            // Mandatory re-validation on both axes: the slot may have
            // been taken by a session created after the proposal was
            // filed.
            if state.doctor_slot_taken(doctor_id, &proposal.slot(), Some(session_id), &policy) {
                warn!(
                    "Stale edit for session {}: slot {} {} taken since proposal",
                    session_id, proposal.new_date, proposal.new_time
                );
                return Err(SessionError::SlotTakenByDoctor);
            }
            if state.patient_slot_taken(patient_id, doctor_id, &proposal.slot(), &policy) {
                warn!(
                    "Stale edit for session {}: patient {} holds slot {} {} elsewhere",
                    session_id, patient_id, proposal.new_date, proposal.new_time
                );
                return Err(SessionError::SlotTakenByPatient);
            }

            if let Some(session) = state.sessions.get_mut(&session_id) {
                session.slot = proposal.slot();
                session.state = SessionState::Accepted;
                session.edit_decided_by = Some(decided_by);
            }
            info!("Session {} edit accepted by {:?}", session_id, decided_by);
        } else {
            if let Some(session) = state.sessions.get_mut(&session_id) {
                session.state = SessionState::EditRejected;
                session.edit_decided_by = Some(decided_by);
            }
            info!("Session {} edit rejected by {:?}", session_id, decided_by);
        }
        Ok(())
    }
}
