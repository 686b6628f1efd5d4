use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use shared_store::AppState;

use crate::models::{CareError, PatientSummary};

/// Owns the patient -> doctor assignment edge. The per-doctor roster
/// is derived from that edge on read, so assigning and unassigning are
/// single-field writes and the two views can never diverge.
#[derive(Clone)]
pub struct RelationshipService {
    state: Arc<AppState>,
}

impl RelationshipService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: Arc::clone(state),
        }
    }

    /// Assign a patient to a doctor. Idempotent when the patient is
    /// already assigned to the same doctor; a different existing
    /// assignment is replaced, keeping the single-active-edge rule.
    pub async fn assign(&self, patient_id: Uuid, doctor_id: Uuid) -> Result<(), CareError> {
        let mut state = self.state.store.write().await;

        if !state.doctors.contains_key(&doctor_id) {
            return Err(CareError::UnknownDoctor);
        }
        let patient = state
            .patients
            .get_mut(&patient_id)
            .ok_or(CareError::UnknownPatient)?;

        if patient.assigned_doctor_id == Some(doctor_id) {
            debug!("Patient {} already assigned to doctor {}", patient_id, doctor_id);
            return Ok(());
        }

        patient.assigned_doctor_id = Some(doctor_id);
        info!("Assigned patient {} to doctor {}", patient_id, doctor_id);
        Ok(())
    }

    /// Remove the patient's current assignment, returning the doctor
    /// that was assigned.
    pub async fn unassign(&self, patient_id: Uuid) -> Result<Uuid, CareError> {
        let mut state = self.state.store.write().await;

        let patient = state
            .patients
            .get_mut(&patient_id)
            .ok_or(CareError::UnknownPatient)?;

        let doctor_id = patient.assigned_doctor_id.take().ok_or(CareError::NotAssigned)?;

        info!("Removed doctor {} from patient {}", doctor_id, patient_id);
        Ok(doctor_id)
    }

    /// All patients currently assigned to the doctor. An empty roster
    /// is a normal result, not an error.
    pub async fn roster(&self, doctor_id: Uuid) -> Result<Vec<PatientSummary>, CareError> {
        let state = self.state.store.read().await;

        if !state.doctors.contains_key(&doctor_id) {
            return Err(CareError::UnknownDoctor);
        }

        let mut roster: Vec<PatientSummary> = state
            .roster(doctor_id)
            .into_iter()
            .map(PatientSummary::from)
            .collect();
        roster.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roster)
    }

    /// Roster-visibility check: the summary is only released to the
    /// doctor the patient is assigned to.
    pub async fn roster_member(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
    ) -> Result<PatientSummary, CareError> {
        let state = self.state.store.read().await;

        if !state.doctors.contains_key(&doctor_id) {
            return Err(CareError::UnknownDoctor);
        }
        let patient = state
            .patients
            .get(&patient_id)
            .ok_or(CareError::UnknownPatient)?;

        if patient.assigned_doctor_id != Some(doctor_id) {
            return Err(CareError::Unauthorized);
        }

        Ok(PatientSummary::from(patient))
    }
}
