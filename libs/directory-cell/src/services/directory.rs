use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::{Doctor, Patient};
use shared_store::AppState;

use crate::models::{
    CreateDoctorRequest, CreatePatientRequest, DirectoryError, UpdateDoctorRequest,
    UpdatePatientRequest,
};

/// Identity registry for the coordination core. Every opaque ID the
/// other cells receive must resolve here to exactly one record.
#[derive(Clone)]
pub struct DirectoryService {
    state: Arc<AppState>,
}

impl DirectoryService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: Arc::clone(state),
        }
    }

    pub async fn create_patient(
        &self,
        request: CreatePatientRequest,
    ) -> Result<Patient, DirectoryError> {
        if request.name.trim().is_empty() || request.email.trim().is_empty() {
            return Err(DirectoryError::ValidationError(
                "name and email are required".to_string(),
            ));
        }

        let mut state = self.state.store.write().await;

        if state.patients.values().any(|p| p.email == request.email) {
            return Err(DirectoryError::EmailAlreadyExists(request.email));
        }

        let patient = Patient {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            gender: request.gender,
            age: request.age,
            profession: request.profession,
            diagnosed: request.diagnosed,
            assigned_doctor_id: None,
            created_at: Utc::now(),
        };

        info!("Registered patient profile {}", patient.id);
        state.patients.insert(patient.id, patient.clone());
        Ok(patient)
    }

    pub async fn create_doctor(
        &self,
        request: CreateDoctorRequest,
    ) -> Result<Doctor, DirectoryError> {
        if request.name.trim().is_empty() || request.email.trim().is_empty() {
            return Err(DirectoryError::ValidationError(
                "name and email are required".to_string(),
            ));
        }

        let mut state = self.state.store.write().await;

        if state.doctors.values().any(|d| d.email == request.email) {
            return Err(DirectoryError::EmailAlreadyExists(request.email));
        }

        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            specialization: request.specialization,
            experience: request.experience,
            clinic_name: request.clinic_name,
            created_at: Utc::now(),
        };

        info!("Registered doctor profile {}", doctor.id);
        state.doctors.insert(doctor.id, doctor.clone());
        Ok(doctor)
    }

    /// Apply a partial update to a patient profile. A changed email
    /// gets the same uniqueness check as registration.
    pub async fn update_patient(
        &self,
        patient_id: Uuid,
        request: UpdatePatientRequest,
    ) -> Result<Patient, DirectoryError> {
        validate_update(&request.name, &request.email)?;

        let mut state = self.state.store.write().await;

        if let Some(email) = &request.email {
            if state
                .patients
                .values()
                .any(|p| p.id != patient_id && p.email == *email)
            {
                return Err(DirectoryError::EmailAlreadyExists(email.clone()));
            }
        }

        let patient = state
            .patients
            .get_mut(&patient_id)
            .ok_or(DirectoryError::PatientNotFound)?;

        if let Some(name) = request.name {
            patient.name = name;
        }
        if let Some(email) = request.email {
            patient.email = email;
        }
        if let Some(gender) = request.gender {
            patient.gender = Some(gender);
        }
        if let Some(age) = request.age {
            patient.age = Some(age);
        }
        if let Some(profession) = request.profession {
            patient.profession = Some(profession);
        }
        if let Some(diagnosed) = request.diagnosed {
            patient.diagnosed = Some(diagnosed);
        }

        info!("Updated patient profile {}", patient_id);
        Ok(patient.clone())
    }

    /// Apply a partial update to a doctor profile.
    pub async fn update_doctor(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, DirectoryError> {
        validate_update(&request.name, &request.email)?;

        let mut state = self.state.store.write().await;

        if let Some(email) = &request.email {
            if state
                .doctors
                .values()
                .any(|d| d.id != doctor_id && d.email == *email)
            {
                return Err(DirectoryError::EmailAlreadyExists(email.clone()));
            }
        }

        let doctor = state
            .doctors
            .get_mut(&doctor_id)
            .ok_or(DirectoryError::DoctorNotFound)?;

        if let Some(name) = request.name {
            doctor.name = name;
        }
        if let Some(email) = request.email {
            doctor.email = email;
        }
        if let Some(specialization) = request.specialization {
            doctor.specialization = Some(specialization);
        }
        if let Some(experience) = request.experience {
            doctor.experience = Some(experience);
        }
        if let Some(clinic_name) = request.clinic_name {
            doctor.clinic_name = Some(clinic_name);
        }

        info!("Updated doctor profile {}", doctor_id);
        Ok(doctor.clone())
    }

    pub async fn get_patient(&self, patient_id: Uuid) -> Result<Patient, DirectoryError> {
        debug!("Resolving patient {}", patient_id);
        let state = self.state.store.read().await;
        state
            .patients
            .get(&patient_id)
            .cloned()
            .ok_or(DirectoryError::PatientNotFound)
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DirectoryError> {
        debug!("Resolving doctor {}", doctor_id);
        let state = self.state.store.read().await;
        state
            .doctors
            .get(&doctor_id)
            .cloned()
            .ok_or(DirectoryError::DoctorNotFound)
    }

    /// Browse list for patients picking a doctor to request.
    pub async fn list_doctors(&self) -> Vec<Doctor> {
        let state = self.state.store.read().await;
        let mut doctors: Vec<Doctor> = state.doctors.values().cloned().collect();
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        doctors
    }
}

// A profile update may omit name and email, but cannot blank them.
fn validate_update(
    name: &Option<String>,
    email: &Option<String>,
) -> Result<(), DirectoryError> {
    if name.as_deref().is_some_and(|n| n.trim().is_empty())
        || email.as_deref().is_some_and(|e| e.trim().is_empty())
    {
        return Err(DirectoryError::ValidationError(
            "name and email cannot be empty".to_string(),
        ));
    }
    Ok(())
}
