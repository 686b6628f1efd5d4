use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_models::{ConnectionRequest, RequestStatus};
use shared_store::AppState;

use crate::models::{CareError, PatientSummary, PendingRequestView, RequestCreation};

/// Proposal/approval workflow for the care relationship edge. A
/// request transitions out of `pending` exactly once; approval commits
/// the assignment in the same transaction as the status change.
#[derive(Clone)]
pub struct ConnectionRequestService {
    state: Arc<AppState>,
}

impl ConnectionRequestService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: Arc::clone(state),
        }
    }

    /// Idempotent creation: while a pending request for the pair
    /// exists, creating again returns that request instead of a
    /// duplicate.
    pub async fn create(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
    ) -> Result<RequestCreation, CareError> {
        let mut state = self.state.store.write().await;

        if !state.patients.contains_key(&patient_id) {
            return Err(CareError::UnknownPatient);
        }
        if !state.doctors.contains_key(&doctor_id) {
            return Err(CareError::UnknownDoctor);
        }

        if let Some(existing) = state.pending_request(patient_id, doctor_id) {
            debug!(
                "Request from patient {} to doctor {} already pending as {}",
                patient_id, doctor_id, existing.id
            );
            return Ok(RequestCreation::AlreadyPending(existing.id));
        }

        let request = ConnectionRequest {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        };
        let request_id = request.id;
        state.requests.insert(request_id, request);

        info!(
            "Created connection request {} (patient {} -> doctor {})",
            request_id, patient_id, doctor_id
        );
        Ok(RequestCreation::Created(request_id))
    }

    /// Pending requests for a doctor in creation order, each joined
    /// with the requesting patient's summary. Requests whose patient
    /// no longer resolves are omitted.
    pub async fn list_pending(&self, doctor_id: Uuid) -> Vec<PendingRequestView> {
        let state = self.state.store.read().await;

        let mut pending: Vec<&ConnectionRequest> = state
            .requests
            .values()
            .filter(|r| r.doctor_id == doctor_id && r.is_pending())
            .collect();
        pending.sort_by_key(|r| r.created_at);

        pending
            .into_iter()
            .filter_map(|request| {
                let patient = state.patients.get(&request.patient_id)?;
                Some(PendingRequestView {
                    request_id: request.id,
                    patient: PatientSummary::from(patient),
                })
            })
            .collect()
    }

    /// Approve a pending request: mark it approved and assign the
    /// patient to the doctor under one write guard, so no caller can
    /// observe one without the other.
    pub async fn approve(&self, request_id: Uuid) -> Result<(), CareError> {
        let mut state = self.state.store.write().await;

        let request = state
            .requests
            .get(&request_id)
            .ok_or(CareError::RequestNotFound)?;
        if !request.is_pending() {
            warn!("Request {} already decided", request_id);
            return Err(CareError::AlreadyDecided);
        }
        let (patient_id, doctor_id) = (request.patient_id, request.doctor_id);

        // The patient may have been deleted since the request was
        // filed; leave the request pending and surface the failure.
        if !state.patients.contains_key(&patient_id) {
            return Err(CareError::UnknownPatient);
        }

        if let Some(patient) = state.patients.get_mut(&patient_id) {
            patient.assigned_doctor_id = Some(doctor_id);
        }
        if let Some(request) = state.requests.get_mut(&request_id) {
            request.status = RequestStatus::Approved;
        }

        info!(
            "Approved request {}: patient {} assigned to doctor {}",
            request_id, patient_id, doctor_id
        );
        Ok(())
    }

    /// Reject a pending request. The relationship store is untouched.
    pub async fn reject(&self, request_id: Uuid) -> Result<(), CareError> {
        let mut state = self.state.store.write().await;

        let request = state
            .requests
            .get_mut(&request_id)
            .ok_or(CareError::RequestNotFound)?;
        if !request.is_pending() {
            warn!("Request {} already decided", request_id);
            return Err(CareError::AlreadyDecided);
        }

        request.status = RequestStatus::Rejected;
        info!("Rejected request {}", request_id);
        Ok(())
    }
}
