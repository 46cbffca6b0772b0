use chrono::Utc;

use super::migrate::upgrade_ai_config;
use super::{AppState, StorageError, StoragePort, StoreError};
use crate::ai::tokens;
use crate::demo::build_demo_patients;
use crate::models::{
    AiConfig, AiProvider, AiToken, AiTokenEvent, Patient, PatientStatus, TriageAssessment,
    TriageResult,
};

/// Application state bound to a storage backend.
///
/// Every mutation stamps `updated_at` and saves immediately. Callers that
/// share one store across tasks wrap it in a mutex; `&mut self` serializes
/// token audit updates within a process.
pub struct AppStore<S: StoragePort> {
    storage: S,
    state: AppState,
}

impl<S: StoragePort> AppStore<S> {
    /// Load the stored state, or start empty.
    pub fn open(storage: S) -> Result<Self, StoreError> {
        let state = match storage.load()? {
            Some(state) => state,
            None => {
                tracing::info!("No usable stored state, starting empty");
                AppState::empty(Utc::now())
            }
        };
        Ok(Self { storage, state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn patients(&self) -> &[Patient] {
        &self.state.patients
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.state.patients.iter().find(|p| p.id == id)
    }

    pub fn config(&self) -> &AiConfig {
        &self.state.config
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        self.state.updated_at = Utc::now();
        self.storage.save(&self.state)
    }

    fn patient_mut(&mut self, id: &str) -> Result<&mut Patient, StoreError> {
        self.state
            .patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::PatientNotFound(id.to_string()))
    }

    // ── Patients ────────────────────────────────

    /// Newest patients go first.
    pub fn add_patient(&mut self, patient: Patient) -> Result<(), StoreError> {
        tracing::info!(patient_id = %patient.id, "Patient added");
        self.state.patients.insert(0, patient);
        Ok(self.persist()?)
    }

    pub fn update_patient(&mut self, mut updated: Patient) -> Result<(), StoreError> {
        let slot = self.patient_mut(&updated.id)?;
        updated.updated_at = Utc::now();
        *slot = updated;
        Ok(self.persist()?)
    }

    /// Replace the patient with the same id, or add it. Returns whether an
    /// existing record was replaced.
    pub fn upsert_patient(&mut self, patient: Patient) -> Result<bool, StoreError> {
        if self.patient(&patient.id).is_some() {
            tracing::info!(patient_id = %patient.id, "Patient replaced");
            self.update_patient(patient)?;
            Ok(true)
        } else {
            self.add_patient(patient)?;
            Ok(false)
        }
    }

    pub fn remove_patient(&mut self, id: &str) -> Result<Patient, StoreError> {
        let index = self
            .state
            .patients
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::PatientNotFound(id.to_string()))?;
        let removed = self.state.patients.remove(index);
        self.persist()?;
        Ok(removed)
    }

    /// Store the assessment, and optionally its result.
    ///
    /// A waiting patient moves to `en_triaje`. The result keeps an existing
    /// `triage_at`.
    pub fn set_assessment(
        &mut self,
        id: &str,
        assessment: TriageAssessment,
        result: Option<TriageResult>,
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        let patient = self.patient_mut(id)?;
        patient.assessment = Some(assessment);
        if let Some(mut result) = result {
            result.triage_at.get_or_insert(now);
            patient.result = Some(result);
        }
        if patient.status == PatientStatus::Waiting {
            patient.status = PatientStatus::InTriage;
        }
        patient.updated_at = now;
        Ok(self.persist()?)
    }

    pub fn set_result(&mut self, id: &str, mut result: TriageResult) -> Result<(), StoreError> {
        let now = Utc::now();
        let patient = self.patient_mut(id)?;
        result.triage_at.get_or_insert(now);
        patient.result = Some(result);
        patient.updated_at = now;
        Ok(self.persist()?)
    }

    // ── AI configuration ────────────────────────

    /// Replace the AI settings; the new value goes through the same upgrade
    /// as a loaded one.
    pub fn update_config(&mut self, config: AiConfig) -> Result<(), StoreError> {
        let raw = serde_json::to_value(&config).map_err(StorageError::from)?;
        self.state.config = upgrade_ai_config(&raw, Utc::now());
        Ok(self.persist()?)
    }

    /// Fold an attempt trail into the token audit fields. Returns whether
    /// anything changed.
    pub fn record_ai_token_events(&mut self, events: &[AiTokenEvent]) -> Result<bool, StoreError> {
        if events.is_empty() {
            return Ok(false);
        }
        let touched = tokens::record_token_events(&mut self.state.config.tokens, events);
        if touched {
            self.persist()?;
        }
        Ok(touched)
    }

    pub fn add_token(&mut self, provider: AiProvider, value: &str) -> Result<AiToken, StoreError> {
        let token = tokens::add_token(&mut self.state.config, provider, value, Utc::now())?;
        tracing::info!(provider = %provider, token = %tokens::token_suffix(&token.value), "Token added");
        self.persist()?;
        Ok(token)
    }

    pub fn remove_token(&mut self, id: &str) -> Result<AiToken, StoreError> {
        let token = tokens::remove_token(&mut self.state.config, id)?;
        self.persist()?;
        Ok(token)
    }

    // ── Demo data ───────────────────────────────

    /// Seed the demo patients into an empty list. Returns how many were added.
    pub fn load_demo(&mut self) -> Result<usize, StoreError> {
        if !self.state.patients.is_empty() {
            return Ok(0);
        }
        self.import_demo_patients()
    }

    /// Put the demo patients ahead of the existing ones.
    pub fn import_demo_patients(&mut self) -> Result<usize, StoreError> {
        let mut patients = build_demo_patients(Utc::now());
        let added = patients.len();
        patients.append(&mut self.state.patients);
        self.state.patients = patients;
        tracing::info!(added, "Demo patients imported");
        self.persist()?;
        Ok(added)
    }

    /// Drop every patient; the AI settings survive.
    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        let config = std::mem::take(&mut self.state.config);
        self.state = AppState {
            config,
            ..AppState::empty(Utc::now())
        };
        self.storage.clear()?;
        Ok(self.persist()?)
    }
}
