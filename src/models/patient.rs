use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::assessment::TriageAssessment;
use super::enums::{PatientStatus, PregnancyStatus};
use super::triage_result::{Priority, TriageResult};

/// A patient in the emergency-department queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: PatientStatus,
    pub demographics: Demographics,
    #[serde(default)]
    pub clinical: ClinicalHistory,
    #[serde(default)]
    pub assessment: Option<TriageAssessment>,
    #[serde(default)]
    pub result: Option<TriageResult>,
    #[serde(default)]
    pub follow_ups: Vec<FollowUp>,
}

impl Patient {
    /// Blank patient waiting for triage, with a fresh random id.
    pub fn new_empty(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            status: PatientStatus::Waiting,
            demographics: Demographics::default(),
            clinical: ClinicalHistory::default(),
            assessment: None,
            result: None,
            follow_ups: Vec::new(),
        }
    }

    /// "Nombre Apellidos", or the id when both are blank.
    pub fn display_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.demographics.first_name.trim(),
            self.demographics.last_names.trim()
        );
        let full = full.trim();
        if full.is_empty() {
            self.id.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Demographics {
    pub first_name: String,
    pub last_names: String,
    /// Free text, as recorded at the desk.
    pub sex: String,
    pub age_years: f64,
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicalHistory {
    pub background: String,
    pub allergies: String,
    pub medication: String,
    pub pregnancy: PregnancyStatus,
    pub pregnancy_weeks: Option<u32>,
    pub vaccination: String,
    pub social_risks: String,
}

impl Default for PregnancyStatus {
    fn default() -> Self {
        PregnancyStatus::Unknown
    }
}

/// Re-evaluation note appended after the initial triage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub at: DateTime<Utc>,
    pub note: String,
    #[serde(default)]
    pub priority: Option<Priority>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_empty_patient_is_waiting() {
        let patient = Patient::new_empty(Utc::now());
        assert_eq!(patient.status, PatientStatus::Waiting);
        assert!(patient.assessment.is_none());
        assert!(patient.result.is_none());
        assert_eq!(patient.clinical.pregnancy, PregnancyStatus::Unknown);
        assert!(Uuid::parse_str(&patient.id).is_ok());
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let mut patient = Patient::new_empty(Utc::now());
        assert_eq!(patient.display_name(), patient.id);
        patient.demographics.first_name = "Lucía".into();
        patient.demographics.last_names = " Pérez ".into();
        assert_eq!(patient.display_name(), "Lucía Pérez");
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let json = r#"{
            "id": "p-1",
            "created_at": "2026-01-10T08:00:00Z",
            "updated_at": "2026-01-10T08:00:00Z",
            "status": "en_espera",
            "demographics": {"age_years": 45, "sex": "M"}
        }"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.demographics.age_years, 45.0);
        assert!(patient.follow_ups.is_empty());
        assert_eq!(patient.clinical.pregnancy, PregnancyStatus::Unknown);
    }
}
