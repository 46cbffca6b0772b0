//! Sample patients for trying the tool without real data.

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    ClinicalArea, Demographics, Patient, PatientStatus, TriageAssessment, VitalSigns,
};
use crate::triage::compute_triage_at;

struct DemoCase {
    first_name: &'static str,
    last_names: &'static str,
    sex: &'static str,
    age_years: f64,
    minutes_ago: i64,
    complaint: &'static str,
    area: ClinicalArea,
    red_flags: &'static [&'static str],
    vitals: VitalSigns,
    pain: Option<f64>,
}

fn cases() -> Vec<DemoCase> {
    vec![
        DemoCase {
            first_name: "Carmen",
            last_names: "Ruiz Ortega",
            sex: "mujer",
            age_years: 78.0,
            minutes_ago: 5,
            complaint: "Disnea progresiva desde esta mañana",
            area: ClinicalArea::Respiratory,
            red_flags: &[],
            vitals: VitalSigns {
                hr: Some(118.0),
                rr: Some(30.0),
                sbp: Some(135.0),
                dbp: Some(80.0),
                spo2: Some(85.0),
                temp: Some(37.9),
                ..VitalSigns::default()
            },
            pain: Some(2.0),
        },
        DemoCase {
            first_name: "Javier",
            last_names: "Martín Gómez",
            sex: "hombre",
            age_years: 61.0,
            minutes_ago: 20,
            complaint: "Dolor torácico opresivo irradiado a brazo izquierdo",
            area: ClinicalArea::Cardiovascular,
            red_flags: &["dolor_toracico"],
            vitals: VitalSigns {
                hr: Some(96.0),
                rr: Some(20.0),
                sbp: Some(150.0),
                dbp: Some(92.0),
                spo2: Some(96.0),
                temp: Some(36.6),
                ..VitalSigns::default()
            },
            pain: Some(7.0),
        },
        DemoCase {
            first_name: "Lucía",
            last_names: "Fernández Sanz",
            sex: "mujer",
            age_years: 4.0,
            minutes_ago: 45,
            complaint: "Fiebre de 48 horas y rechazo de tomas",
            area: ClinicalArea::Pediatric,
            red_flags: &[],
            vitals: VitalSigns {
                hr: Some(130.0),
                rr: Some(26.0),
                spo2: Some(97.0),
                temp: Some(39.1),
                ..VitalSigns::default()
            },
            pain: Some(3.0),
        },
        DemoCase {
            first_name: "Pablo",
            last_names: "Navarro Gil",
            sex: "hombre",
            age_years: 29.0,
            minutes_ago: 90,
            complaint: "Torcedura de tobillo derecho jugando al fútbol",
            area: ClinicalArea::Trauma,
            red_flags: &[],
            vitals: VitalSigns {
                hr: Some(78.0),
                rr: Some(14.0),
                sbp: Some(122.0),
                dbp: Some(76.0),
                spo2: Some(99.0),
                temp: Some(36.4),
                ..VitalSigns::default()
            },
            pain: Some(4.0),
        },
    ]
}

/// Demo patients already triaged, newest first.
pub fn build_demo_patients(now: DateTime<Utc>) -> Vec<Patient> {
    cases()
        .into_iter()
        .map(|case| {
            let arrived = now - Duration::minutes(case.minutes_ago);
            let mut patient = Patient::new_empty(arrived);
            patient.status = PatientStatus::InTriage;
            patient.demographics = Demographics {
                first_name: case.first_name.to_string(),
                last_names: case.last_names.to_string(),
                sex: case.sex.to_string(),
                age_years: case.age_years,
                weight_kg: None,
            };
            let assessment = TriageAssessment {
                chief_complaint: case.complaint.to_string(),
                clinical_area: Some(case.area),
                red_flags: case.red_flags.iter().map(|id| id.to_string()).collect(),
                vitals: case.vitals,
                pain: case.pain,
                ..TriageAssessment::default()
            };
            let mut result = compute_triage_at(&assessment, &patient, arrived);
            result.triage_at = Some(arrived);
            patient.assessment = Some(assessment);
            patient.result = Some(result);
            patient
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    #[test]
    fn demo_patients_are_triaged() {
        let now = Utc::now();
        let patients = build_demo_patients(now);
        assert_eq!(patients.len(), 4);
        for patient in &patients {
            let result = patient.result.as_ref().unwrap();
            assert!(result.triage_at.unwrap() <= now);
            assert_eq!(patient.status, PatientStatus::InTriage);
            assert!(!result.evolutivo.is_empty());
        }
        assert_eq!(
            patients[0].result.as_ref().unwrap().priority,
            Priority::RESUSCITATION
        );
        assert!(patients[1].result.as_ref().unwrap().priority <= Priority::EMERGENCY);
    }

    #[test]
    fn each_build_has_fresh_ids() {
        let now = Utc::now();
        let a = build_demo_patients(now);
        let b = build_demo_patients(now);
        assert!(a.iter().all(|p| b.iter().all(|q| q.id != p.id)));
    }
}
