use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_models::{Actor, Session, SessionState, Slot};
use shared_store::AppState;

use crate::models::{BookSessionRequest, SessionError, SessionView};

/// Session booking. Slot exclusivity is checked and the session
/// inserted under one store write guard, so two concurrent bookings
/// for the same doctor and slot resolve to exactly one success.
#[derive(Clone)]
pub struct SessionBookingService {
    state: Arc<AppState>,
}

impl SessionBookingService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: Arc::clone(state),
        }
    }

    pub async fn book(&self, request: BookSessionRequest) -> Result<Session, SessionError> {
        if request.date.trim().is_empty() || request.time.trim().is_empty() {
            return Err(SessionError::InvalidInput(
                "date and time are required".to_string(),
            ));
        }

        let policy = self.state.config.scheduling;
        let mut state = self.state.store.write().await;

        if !state.doctors.contains_key(&request.doctor_id) {
            return Err(SessionError::UnknownDoctor);
        }
        if !state.patients.contains_key(&request.patient_id) {
            return Err(SessionError::UnknownPatient);
        }

        let slot = Slot::new(request.date, request.time);

        if state.doctor_slot_taken(request.doctor_id, &slot, None, &policy) {
            warn!(
                "Booking rejected: doctor {} already holds slot {} {}",
                request.doctor_id, slot.date, slot.time
            );
            return Err(SessionError::SlotTakenByDoctor);
        }
        if state.patient_slot_taken(request.patient_id, request.doctor_id, &slot, &policy) {
            warn!(
                "Booking rejected: patient {} already holds slot {} {} elsewhere",
                request.patient_id, slot.date, slot.time
            );
            return Err(SessionError::SlotTakenByPatient);
        }

        let session = Session {
            id: Uuid::new_v4(),
            doctor_id: request.doctor_id,
            patient_id: request.patient_id,
            slot,
            state: SessionState::Pending,
            created_by: request.created_by,
            edit_decided_by: None,
            created_at: Utc::now(),
        };

        info!(
            "Booked session {} (doctor {}, patient {}, {} {})",
            session.id, session.doctor_id, session.patient_id, session.slot.date, session.slot.time
        );
        state.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    /// Sessions for one side of the relationship, names joined at read
    /// time, sorted by date then time ascending. Sessions whose
    /// counterparty no longer resolves are omitted, like pending
    /// requests for vanished patients.
    pub async fn list_for(
        &self,
        role: Actor,
        user_id: Uuid,
    ) -> Result<Vec<SessionView>, SessionError> {
        debug!("Listing sessions for {:?} {}", role, user_id);
        let state = self.state.store.read().await;

        match role {
            Actor::Doctor if !state.doctors.contains_key(&user_id) => {
                return Err(SessionError::UnknownDoctor)
            }
            Actor::Patient if !state.patients.contains_key(&user_id) => {
                return Err(SessionError::UnknownPatient)
            }
            _ => {}
        }

        let mut views: Vec<SessionView> = state
            .sessions
            .values()
            .filter(|s| match role {
                Actor::Doctor => s.doctor_id == user_id,
                Actor::Patient => s.patient_id == user_id,
            })
            .filter_map(|s| {
                let doctor_name = state.doctors.get(&s.doctor_id)?.name.as_str();
                let patient_name = state.patients.get(&s.patient_id)?.name.as_str();
                Some(SessionView::from_session(s, doctor_name, patient_name))
            })
            .collect();

        views.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
        Ok(views)
    }

    /// Accept or reject a session. With the default policy a session
    /// may be re-decided; the strict policy turns that into an error.
    pub async fn set_status(&self, session_id: Uuid, status: &str) -> Result<(), SessionError> {
        let new_state = match status {
            "accepted" => SessionState::Accepted,
            "rejected" => SessionState::Rejected,
            other => return Err(SessionError::InvalidStatus(other.to_string())),
        };

        let strict = self.state.config.scheduling.strict_redecision;
        let mut state = self.state.store.write().await;

        let session = state
            .sessions
            .get_mut(&session_id)
            .ok_or(SessionError::NotFound)?;

        if strict && session.state.is_decided() {
            return Err(SessionError::AlreadyDecided);
        }

        info!("Session {} set to {}", session_id, new_state.label());
        session.state = new_state;
        Ok(())
    }
}
