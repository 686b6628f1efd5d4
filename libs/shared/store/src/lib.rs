use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use uuid::Uuid;

use shared_config::{AppConfig, SchedulingPolicy};
use shared_models::{ConnectionRequest, Doctor, Patient, Session, Slot};

/// All care-coordination documents, guarded by one lock.
///
/// A held write guard is the transaction boundary: every check-then-act
/// sequence (conflict check + insert, approve + assign, re-validate +
/// apply) must complete under a single guard so the loser of a
/// concurrent race observes the winner's write and fails cleanly.
#[derive(Debug, Default)]
pub struct CareState {
    pub patients: HashMap<Uuid, Patient>,
    pub doctors: HashMap<Uuid, Doctor>,
    pub requests: HashMap<Uuid, ConnectionRequest>,
    pub sessions: HashMap<Uuid, Session>,
}

impl CareState {
    /// The roster is computed from the authoritative `assigned_doctor_id`
    /// relation, so there is no mirror collection to keep in sync.
    pub fn roster(&self, doctor_id: Uuid) -> Vec<&Patient> {
        self.patients
            .values()
            .filter(|p| p.assigned_doctor_id == Some(doctor_id))
            .collect()
    }

    pub fn pending_request(&self, patient_id: Uuid, doctor_id: Uuid) -> Option<&ConnectionRequest> {
        self.requests
            .values()
            .find(|r| r.patient_id == patient_id && r.doctor_id == doctor_id && r.is_pending())
    }

    /// Doctor-axis slot exclusivity check. `exclude` skips the session
    /// being edited so it cannot conflict with itself.
    pub fn doctor_slot_taken(
        &self,
        doctor_id: Uuid,
        slot: &Slot,
        exclude: Option<Uuid>,
        policy: &SchedulingPolicy,
    ) -> bool {
        self.sessions.values().any(|s| {
            s.doctor_id == doctor_id
                && exclude != Some(s.id)
                && s.slot == *slot
                && s.blocks_slot(policy)
        })
    }

    /// Patient-axis slot exclusivity check. A second booking for the
    /// same patient at the same slot only conflicts when it involves a
    /// different doctor; the same-doctor case is already covered by the
    /// doctor axis.
    pub fn patient_slot_taken(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        slot: &Slot,
        policy: &SchedulingPolicy,
    ) -> bool {
        self.sessions.values().any(|s| {
            s.patient_id == patient_id
                && s.doctor_id != doctor_id
                && s.slot == *slot
                && s.blocks_slot(policy)
        })
    }
}

/// In-process document store for the coordination core. Persistence
/// technology is an external concern; this store only promises that a
/// write guard spans a whole mutation.
#[derive(Debug, Default)]
pub struct CareStore {
    state: RwLock<CareState>,
}

impl CareStore {
    pub fn new() -> Self {
        debug!("Initializing in-process care store");
        Self {
            state: RwLock::new(CareState::default()),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, CareState> {
        self.state.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, CareState> {
        self.state.write().await
    }
}

/// Shared application state handed to every cell router.
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub store: CareStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            store: CareStore::new(),
        })
    }
}
