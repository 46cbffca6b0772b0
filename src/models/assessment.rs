use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::enums::ClinicalArea;

/// Data captured at the triage desk for one episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageAssessment {
    pub chief_complaint: String,
    /// `None` only while the form is incomplete.
    pub clinical_area: Option<ClinicalArea>,
    pub symptoms: Vec<String>,
    /// Selected red-flag ids from the catalog.
    pub red_flags: Vec<String>,
    pub vitals: VitalSigns,
    pub glasgow: Option<GlasgowAssessment>,
    /// EVA pain score, 1-10.
    pub pain: Option<f64>,
    pub observations: String,
    pub infection_suspected: bool,
}

impl TriageAssessment {
    /// Area used for rule lookups; an unset area is treated as `otros`.
    pub fn effective_area(&self) -> ClinicalArea {
        self.clinical_area.unwrap_or(ClinicalArea::Other)
    }
}

/// Vital signs. Every reading is optional; NaN is treated like absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalSigns {
    /// Heart rate, bpm.
    pub hr: Option<f64>,
    /// Respiratory rate, rpm.
    pub rr: Option<f64>,
    /// Systolic blood pressure, mmHg.
    pub sbp: Option<f64>,
    /// Diastolic blood pressure, mmHg.
    pub dbp: Option<f64>,
    /// Oxygen saturation, %.
    pub spo2: Option<f64>,
    /// Temperature, °C.
    pub temp: Option<f64>,
    /// Capillary glucose, mg/dL.
    pub glucose: Option<f64>,
    /// Directly supplied GCS (used when the breakdown is incomplete).
    pub gcs: Option<f64>,
}

/// Glasgow Coma Scale breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlasgowAssessment {
    /// Eye opening, 1-4.
    #[serde(deserialize_with = "ocular_component")]
    pub ocular: Option<u8>,
    /// Verbal response, 1-5.
    #[serde(deserialize_with = "verbal_component")]
    pub verbal: Option<u8>,
    /// Motor response, 1-6.
    #[serde(deserialize_with = "motor_component")]
    pub motor: Option<u8>,
}

pub const OCULAR_MAX: u8 = 4;
pub const VERBAL_MAX: u8 = 5;
pub const MOTOR_MAX: u8 = 6;

fn component<'de, D>(deserializer: D, field: &str, max: u8) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<u8>::deserialize(deserializer)? {
        Some(value) if !(1..=max).contains(&value) => Err(D::Error::custom(format!(
            "Glasgow {field} must be between 1 and {max}, got {value}"
        ))),
        value => Ok(value),
    }
}

fn ocular_component<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
    component(d, "ocular", OCULAR_MAX)
}

fn verbal_component<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
    component(d, "verbal", VERBAL_MAX)
}

fn motor_component<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
    component(d, "motor", MOTOR_MAX)
}

impl GlasgowAssessment {
    pub fn is_complete(&self) -> bool {
        self.ocular.is_some() && self.verbal.is_some() && self.motor.is_some()
    }

    /// Total score, only when all three components are recorded and in range.
    pub fn score(&self) -> Option<u8> {
        let in_range = |value: u8, max: u8| (1..=max).contains(&value).then_some(value);
        match (self.ocular, self.verbal, self.motor) {
            (Some(o), Some(v), Some(m)) => {
                let o = in_range(o, OCULAR_MAX)?;
                let v = in_range(v, VERBAL_MAX)?;
                let m = in_range(m, MOTOR_MAX)?;
                Some(o + v + m)
            }
            _ => None,
        }
    }
}
