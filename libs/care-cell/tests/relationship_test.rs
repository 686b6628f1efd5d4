use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Utc;
use uuid::Uuid;

use care_cell::models::CareError;
use care_cell::services::relationship::RelationshipService;
use shared_config::AppConfig;
use shared_models::{Doctor, Patient};
use shared_store::AppState;

async fn seed_patient(state: &Arc<AppState>, name: &str) -> Uuid {
    let patient = Patient {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name),
        gender: None,
        age: Some(30),
        profession: None,
        diagnosed: None,
        assigned_doctor_id: None,
        created_at: Utc::now(),
    };
    let id = patient.id;
    state.store.write().await.patients.insert(id, patient);
    id
}

async fn seed_doctor(state: &Arc<AppState>, name: &str) -> Uuid {
    let doctor = Doctor {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name),
        specialization: Some("Psychiatry".to_string()),
        experience: None,
        clinic_name: None,
        created_at: Utc::now(),
    };
    let id = doctor.id;
    state.store.write().await.doctors.insert(id, doctor);
    id
}

async fn assigned_doctor(state: &Arc<AppState>, patient_id: Uuid) -> Option<Uuid> {
    state.store.read().await.patients[&patient_id].assigned_doctor_id
}

#[tokio::test]
async fn roster_mirrors_assignments() {
    let state = AppState::new(AppConfig::default());
    let service = RelationshipService::new(&state);

    let d1 = seed_doctor(&state, "dr-grey").await;
    let d2 = seed_doctor(&state, "dr-house").await;
    let p1 = seed_patient(&state, "alice").await;
    let p2 = seed_patient(&state, "bob").await;

    service.assign(p1, d1).await.unwrap();
    service.assign(p2, d1).await.unwrap();

    let roster = service.roster(d1).await.unwrap();
    let ids: Vec<Uuid> = roster.iter().map(|p| p.id).collect();
    assert_eq!(roster.len(), 2);
    assert!(ids.contains(&p1) && ids.contains(&p2));
    assert!(service.roster(d2).await.unwrap().is_empty());

    // Every roster entry must agree with the patient's own edge.
    for id in ids {
        assert_eq!(assigned_doctor(&state, id).await, Some(d1));
    }

    service.unassign(p1).await.unwrap();
    let roster = service.roster(d1).await.unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, p2);
    assert_eq!(assigned_doctor(&state, p1).await, None);
}

#[tokio::test]
async fn assign_is_idempotent_for_same_doctor() {
    let state = AppState::new(AppConfig::default());
    let service = RelationshipService::new(&state);

    let doctor = seed_doctor(&state, "dr-grey").await;
    let patient = seed_patient(&state, "alice").await;

    service.assign(patient, doctor).await.unwrap();
    service.assign(patient, doctor).await.unwrap();

    assert_eq!(service.roster(doctor).await.unwrap().len(), 1);
}

#[tokio::test]
async fn reassignment_keeps_a_single_active_edge() {
    let state = AppState::new(AppConfig::default());
    let service = RelationshipService::new(&state);

    let d1 = seed_doctor(&state, "dr-grey").await;
    let d2 = seed_doctor(&state, "dr-house").await;
    let patient = seed_patient(&state, "alice").await;

    service.assign(patient, d1).await.unwrap();
    service.assign(patient, d2).await.unwrap();

    assert_eq!(assigned_doctor(&state, patient).await, Some(d2));
    assert!(service.roster(d1).await.unwrap().is_empty());
    assert_eq!(service.roster(d2).await.unwrap().len(), 1);
}

#[tokio::test]
async fn assign_rejects_unknown_identities() {
    let state = AppState::new(AppConfig::default());
    let service = RelationshipService::new(&state);

    let doctor = seed_doctor(&state, "dr-grey").await;
    let patient = seed_patient(&state, "alice").await;

    assert_matches!(
        service.assign(Uuid::new_v4(), doctor).await,
        Err(CareError::UnknownPatient)
    );
    assert_matches!(
        service.assign(patient, Uuid::new_v4()).await,
        Err(CareError::UnknownDoctor)
    );
    assert_matches!(
        service.roster(Uuid::new_v4()).await,
        Err(CareError::UnknownDoctor)
    );
}

#[tokio::test]
async fn unassign_without_assignment_fails() {
    let state = AppState::new(AppConfig::default());
    let service = RelationshipService::new(&state);

    let patient = seed_patient(&state, "alice").await;

    assert_matches!(service.unassign(patient).await, Err(CareError::NotAssigned));
}

#[tokio::test]
async fn roster_member_requires_the_care_link() {
    let state = AppState::new(AppConfig::default());
    let service = RelationshipService::new(&state);

    let d1 = seed_doctor(&state, "dr-grey").await;
    let d2 = seed_doctor(&state, "dr-house").await;
    let patient = seed_patient(&state, "alice").await;

    service.assign(patient, d1).await.unwrap();

    let summary = service.roster_member(d1, patient).await.unwrap();
    assert_eq!(summary.id, patient);

    assert_matches!(
        service.roster_member(d2, patient).await,
        Err(CareError::Unauthorized)
    );
}
