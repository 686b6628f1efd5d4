use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Utc;
use uuid::Uuid;

use session_cell::models::{BookSessionRequest, SessionError};
use session_cell::services::booking::SessionBookingService;
use shared_config::{AppConfig, SchedulingPolicy};
use shared_models::{Actor, Doctor, Patient, SessionState};
use shared_store::AppState;

async fn seed_patient(state: &Arc<AppState>, name: &str) -> Uuid {
    let patient = Patient {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name),
        gender: None,
        age: None,
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
        specialization: None,
        experience: None,
        clinic_name: None,
        created_at: Utc::now(),
    };
    let id = doctor.id;
    state.store.write().await.doctors.insert(id, doctor);
    id
}

fn booking(doctor_id: Uuid, patient_id: Uuid, date: &str, time: &str) -> BookSessionRequest {
    BookSessionRequest {
        doctor_id,
        patient_id,
        date: date.to_string(),
        time: time.to_string(),
        created_by: Actor::Patient,
    }
}

#[tokio::test]
async fn booked_session_starts_pending() {
    let state = AppState::new(AppConfig::default());
    let service = SessionBookingService::new(&state);

    let doctor = seed_doctor(&state, "dr-grey").await;
    let patient = seed_patient(&state, "alice").await;

    let session = service
        .book(booking(doctor, patient, "2024-06-01", "09:00"))
        .await
        .unwrap();

    assert_eq!(session.state, SessionState::Pending);
    assert_eq!(session.created_by, Actor::Patient);
    assert_eq!(session.slot.date, "2024-06-01");
}

#[tokio::test]
async fn doctor_cannot_be_double_booked() {
    let state = AppState::new(AppConfig::default());
    let service = SessionBookingService::new(&state);

    let doctor = seed_doctor(&state, "dr-grey").await;
    let alice = seed_patient(&state, "alice").await;
    let bob = seed_patient(&state, "bob").await;

    service
        .book(booking(doctor, alice, "2024-06-01", "09:00"))
        .await
        .unwrap();

    assert_matches!(
        service.book(booking(doctor, bob, "2024-06-01", "09:00")).await,
        Err(SessionError::SlotTakenByDoctor)
    );
    assert_eq!(state.store.read().await.sessions.len(), 1);
}

#[tokio::test]
async fn patient_cannot_hold_one_slot_with_two_doctors() {
    let state = AppState::new(AppConfig::default());
    let service = SessionBookingService::new(&state);

    let d1 = seed_doctor(&state, "dr-grey").await;
    let d2 = seed_doctor(&state, "dr-house").await;
    let patient = seed_patient(&state, "alice").await;

    service
        .book(booking(d1, patient, "2024-06-01", "09:00"))
        .await
        .unwrap();

    assert_matches!(
        service.book(booking(d2, patient, "2024-06-01", "09:00")).await,
        Err(SessionError::SlotTakenByPatient)
    );
}

#[tokio::test]
async fn rejected_session_blocks_its_slot_by_default() {
    let state = AppState::new(AppConfig::default());
    let service = SessionBookingService::new(&state);

    let doctor = seed_doctor(&state, "dr-grey").await;
    let alice = seed_patient(&state, "alice").await;
    let bob = seed_patient(&state, "bob").await;

    let session = service
        .book(booking(doctor, alice, "2024-06-01", "09:00"))
        .await
        .unwrap();
    service.set_status(session.id, "rejected").await.unwrap();

    assert_matches!(
        service.book(booking(doctor, bob, "2024-06-01", "09:00")).await,
        Err(SessionError::SlotTakenByDoctor)
    );
}

#[tokio::test]
async fn release_policy_frees_rejected_slots() {
    let config = AppConfig {
        scheduling: SchedulingPolicy {
            release_rejected_slots: true,
            strict_redecision: false,
        },
        ..AppConfig::default()
    };
    let state = AppState::new(config);
    let service = SessionBookingService::new(&state);

    let doctor = seed_doctor(&state, "dr-grey").await;
    let alice = seed_patient(&state, "alice").await;
    let bob = seed_patient(&state, "bob").await;

    let session = service
        .book(booking(doctor, alice, "2024-06-01", "09:00"))
        .await
        .unwrap();
    service.set_status(session.id, "rejected").await.unwrap();

    service
        .book(booking(doctor, bob, "2024-06-01", "09:00"))
        .await
        .unwrap();
}

#[tokio::test]
async fn set_status_accepts_only_terminal_decisions() {
    let state = AppState::new(AppConfig::default());
    let service = SessionBookingService::new(&state);

    let doctor = seed_doctor(&state, "dr-grey").await;
    let patient = seed_patient(&state, "alice").await;

    let session = service
        .book(booking(doctor, patient, "2024-06-01", "09:00"))
        .await
        .unwrap();

    assert_matches!(
        service.set_status(session.id, "completed").await,
        Err(SessionError::InvalidStatus(_))
    );
    assert_matches!(
        service.set_status(Uuid::new_v4(), "accepted").await,
        Err(SessionError::NotFound)
    );

    service.set_status(session.id, "accepted").await.unwrap();
    // Default policy allows re-deciding.
    service.set_status(session.id, "rejected").await.unwrap();
}

#[tokio::test]
async fn strict_policy_forbids_redeciding() {
    let config = AppConfig {
        scheduling: SchedulingPolicy {
            release_rejected_slots: false,
            strict_redecision: true,
        },
        ..AppConfig::default()
    };
    let state = AppState::new(config);
    let service = SessionBookingService::new(&state);

    let doctor = seed_doctor(&state, "dr-grey").await;
    let patient = seed_patient(&state, "alice").await;

    let session = service
        .book(booking(doctor, patient, "2024-06-01", "09:00"))
        .await
        .unwrap();
    service.set_status(session.id, "accepted").await.unwrap();

    assert_matches!(
        service.set_status(session.id, "rejected").await,
        Err(SessionError::AlreadyDecided)
    );
}

#[tokio::test]
async fn listing_joins_names_and_sorts_by_date() {
    let state = AppState::new(AppConfig::default());
    let service = SessionBookingService::new(&state);

    let doctor = seed_doctor(&state, "dr-grey").await;
    let patient = seed_patient(&state, "alice").await;

    service
        .book(booking(doctor, patient, "2024-06-03", "09:00"))
        .await
        .unwrap();
    service
        .book(booking(doctor, patient, "2024-06-01", "10:00"))
        .await
        .unwrap();
    service
        .book(booking(doctor, patient, "2024-06-01", "09:00"))
        .await
        .unwrap();

    let sessions = service.list_for(Actor::Doctor, doctor).await.unwrap();
    assert_eq!(sessions.len(), 3);
    assert_eq!(sessions[0].date, "2024-06-01");
    assert_eq!(sessions[0].time, "09:00");
    assert_eq!(sessions[1].time, "10:00");
    assert_eq!(sessions[2].date, "2024-06-03");
    assert_eq!(sessions[0].doctor_name, "dr-grey");
    assert_eq!(sessions[0].patient_name, "alice");
    assert_eq!(sessions[0].status, "pending");
    assert!(sessions[0].edit_request.is_none());

    assert_matches!(
        service.list_for(Actor::Patient, Uuid::new_v4()).await,
        Err(SessionError::UnknownPatient)
    );
}

#[tokio::test]
async fn listing_omits_sessions_with_vanished_counterparties() {
    let state = AppState::new(AppConfig::default());
    let service = SessionBookingService::new(&state);

    let doctor = seed_doctor(&state, "dr-grey").await;
    let alice = seed_patient(&state, "alice").await;
    let bob = seed_patient(&state, "bob").await;

    service
        .book(booking(doctor, alice, "2024-06-01", "09:00"))
        .await
        .unwrap();
    service
        .book(booking(doctor, bob, "2024-06-01", "10:00"))
        .await
        .unwrap();

    state.store.write().await.patients.remove(&alice);

    let sessions = service.list_for(Actor::Doctor, doctor).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].patient_name, "bob");
}

#[tokio::test]
async fn booking_requires_date_and_time() {
    let state = AppState::new(AppConfig::default());
    let service = SessionBookingService::new(&state);

    let doctor = seed_doctor(&state, "dr-grey").await;
    let patient = seed_patient(&state, "alice").await;

    assert_matches!(
        service.book(booking(doctor, patient, "", "09:00")).await,
        Err(SessionError::InvalidInput(_))
    );
    assert_matches!(
        service.book(booking(doctor, patient, "2024-06-01", " ")).await,
        Err(SessionError::InvalidInput(_))
    );
}

#[tokio::test]
async fn concurrent_bookings_resolve_to_one_winner() {
    let state = AppState::new(AppConfig::default());

    let doctor = seed_doctor(&state, "dr-grey").await;
    let alice = seed_patient(&state, "alice").await;
    let bob = seed_patient(&state, "bob").await;

    let service_a = SessionBookingService::new(&state);
    let service_b = SessionBookingService::new(&state);

    let task_a = tokio::spawn(async move {
        service_a
            .book(booking(doctor, alice, "2024-06-01", "09:00"))
            .await
    });
    let task_b = tokio::spawn(async move {
        service_b
            .book(booking(doctor, bob, "2024-06-01", "09:00"))
            .await
    });

    let results = [task_a.await.unwrap(), task_b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(SessionError::SlotTakenByDoctor)))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(state.store.read().await.sessions.len(), 1);
}
