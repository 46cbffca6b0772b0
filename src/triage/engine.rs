//! Deterministic triage engine.
//!
//! Pure over its inputs: the only ambient value is the timestamp printed in
//! the narrative, which `compute_triage_at` takes as an argument.

use chrono::{DateTime, Local, Utc};

use crate::models::{
    ClinicalArea, Patient, Priority, TriageAssessment, TriageResult, VitalSigns,
};

use super::actions::build_actions;
use super::catalog::{area_red_flags, red_flag_by_id, RED_FLAG_CATALOG};
use super::glasgow::resolve_glasgow_score;
use super::ordered_set::{dedupe_trimmed, OrderedSet};
use super::vitals::{evaluate_vitals, AgeBand, Severity};

pub const STABLE_REASON: &str = "Paciente estable sin signos de alarma críticos";
pub const NO_RED_FLAGS: &str = "Sin signos de alarma críticos identificados";

const ND: &str = "ND";

// ═══════════════════════════════════════════
// Missing data
// ═══════════════════════════════════════════

/// Labels of the assessment fields still to be filled in.
pub fn compute_missing_data(assessment: &TriageAssessment) -> Vec<String> {
    let absent = |v: Option<f64>| v.map_or(true, f64::is_nan);
    let glasgow = assessment.glasgow.unwrap_or_default();
    let vitals = &assessment.vitals;

    [
        (assessment.chief_complaint.trim().is_empty(), "Motivo de consulta"),
        (assessment.clinical_area.is_none(), "Categoría clínica"),
        (absent(vitals.hr), "Frecuencia cardiaca"),
        (absent(vitals.rr), "Frecuencia respiratoria"),
        (absent(vitals.spo2), "SatO2"),
        (absent(vitals.sbp), "Tensión arterial sistólica"),
        (absent(vitals.temp), "Temperatura"),
        (glasgow.ocular.is_none(), "Glasgow ocular"),
        (glasgow.verbal.is_none(), "Glasgow verbal"),
        (glasgow.motor.is_none(), "Glasgow motora"),
    ]
    .into_iter()
    .filter(|(missing, _)| *missing)
    .map(|(_, label)| label.to_string())
    .collect()
}

// ═══════════════════════════════════════════
// Priority computation
// ═══════════════════════════════════════════

/// Reasons grouped by priority level; index 0 is P1.
#[derive(Debug, Default)]
struct ReasonBuckets([Vec<String>; 5]);

impl ReasonBuckets {
    fn push(&mut self, level: u8, reason: impl Into<String>) {
        if let Some(bucket) = self.0.get_mut(usize::from(level.saturating_sub(1))) {
            bucket.push(reason.into());
        }
    }

    /// Lowest non-empty level and its first reason.
    fn resolve(self) -> (Priority, String) {
        for (priority, bucket) in Priority::ALL.into_iter().zip(self.0) {
            if let Some(reason) = bucket.into_iter().next() {
                return (priority, reason);
            }
        }
        (Priority::NON_URGENT, STABLE_REASON.to_string())
    }
}

pub fn compute_triage(assessment: &TriageAssessment, patient: &Patient) -> TriageResult {
    compute_triage_at(assessment, patient, Utc::now())
}

/// Rule-based triage for one assessment. `now` stamps the narrative.
pub fn compute_triage_at(
    assessment: &TriageAssessment,
    patient: &Patient,
    now: DateTime<Utc>,
) -> TriageResult {
    let missing_data = compute_missing_data(assessment);
    let age = patient.demographics.age_years;
    let area = assessment.effective_area();

    let vitals = VitalSigns {
        gcs: resolve_glasgow_score(assessment),
        ..assessment.vitals
    };
    let evaluation = evaluate_vitals(&vitals, age);

    let mut buckets = ReasonBuckets::default();
    let mut present = OrderedSet::new();

    for flag in RED_FLAG_CATALOG
        .iter()
        .filter(|f| assessment.red_flags.iter().any(|id| id == f.id))
    {
        present.insert(flag.label);
        buckets.push(flag.level, flag.label);
    }

    if !evaluation.flags.is_empty() {
        present.extend(evaluation.flags.iter().cloned());
        match evaluation.severity {
            Severity::Critical => buckets.push(1, "Constantes vitales críticas"),
            Severity::Urgent => buckets.push(2, "Constantes vitales muy alteradas"),
            Severity::Warning => buckets.push(3, "Constantes vitales alteradas"),
            Severity::Normal => {}
        }
    }

    match assessment.pain {
        Some(pain) if pain >= 8.0 => buckets.push(3, "Dolor muy intenso"),
        Some(pain) if pain >= 4.0 => buckets.push(4, "Dolor moderado"),
        _ => {}
    }

    if assessment.infection_suspected {
        buckets.push(3, "Sospecha infecciosa");
    }

    let (priority, reason) = buckets.resolve();
    let present = present.into_vec();
    let actions = build_actions(priority, area, assessment, &present);
    let red_flags_absent = compute_absent_flags(area, &present);

    let red_flags_present = if present.is_empty() {
        vec![NO_RED_FLAGS.to_string()]
    } else {
        present
    };

    let mut result = TriageResult {
        priority,
        reason,
        red_flags_present,
        red_flags_absent,
        actions,
        missing_data,
        evolutivo: String::new(),
        ai: None,
        priority_modified_by_ai: false,
        deterministic_priority: None,
        deterministic_reason: None,
        triage_at: None,
    };
    result.evolutivo = build_readable_evolutivo(patient, assessment, &result, now);
    result
}

/// Area-relevant flags first, then every catalog level, minus the present ones.
fn compute_absent_flags(area: ClinicalArea, present: &[String]) -> Vec<String> {
    let mut ids = OrderedSet::new();
    ids.extend(area_red_flags(area).iter().copied());
    for level in 1..=3 {
        ids.extend(
            RED_FLAG_CATALOG
                .iter()
                .filter(|f| f.level == level)
                .map(|f| f.id),
        );
    }

    ids.iter()
        .filter_map(red_flag_by_id)
        .map(|f| f.label)
        .filter(|label| !present.iter().any(|p| p == label))
        .map(str::to_string)
        .collect()
}

// ═══════════════════════════════════════════
// Narrative
// ═══════════════════════════════════════════

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => v.to_string(),
        _ => ND.to_string(),
    }
}

fn format_pain(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{}/10", v.round().clamp(1.0, 10.0)),
        _ => ND.to_string(),
    }
}

fn format_signs(result: &TriageResult) -> String {
    let ai_signs = result
        .ai
        .as_ref()
        .and_then(|ai| ai.json.as_ref())
        .map(|json| json.red_flags_present.as_slice())
        .unwrap_or_default();
    let source = if ai_signs.is_empty() {
        result.red_flags_present.as_slice()
    } else {
        ai_signs
    };
    let signs = dedupe_trimmed(source);
    if signs.is_empty() {
        "no referidos".to_string()
    } else {
        signs.join(", ")
    }
}

fn format_actions(result: &TriageResult) -> String {
    let ai_actions = result
        .ai
        .as_ref()
        .and_then(|ai| ai.json.as_ref())
        .map(|json| json.nursing_actions.as_slice())
        .unwrap_or_default();
    let source = if ai_actions.is_empty() {
        result.actions.as_slice()
    } else {
        ai_actions
    };
    let mut actions = dedupe_trimmed(source);
    actions.truncate(4);
    if actions.is_empty() {
        "Sin actuaciones específicas registradas".to_string()
    } else {
        actions.join("; ")
    }
}

/// Multi-line clinical note for the episode.
///
/// Prefers the AI's signs, actions and priority reason when the result
/// carries a structured AI document. The timestamp is `triage_at` when set,
/// otherwise `now`, rendered in local time.
pub fn build_readable_evolutivo(
    patient: &Patient,
    assessment: &TriageAssessment,
    result: &TriageResult,
    now: DateTime<Utc>,
) -> String {
    let timestamp = result
        .triage_at
        .unwrap_or(now)
        .with_timezone(&Local)
        .format("%-d/%-m/%Y, %-H:%M:%S");
    let demographics = &patient.demographics;
    let band = AgeBand::from_age(demographics.age_years).label();
    let sex = match demographics.sex.trim() {
        "" => "no especificado",
        s => s,
    };
    let complaint = match assessment.chief_complaint.trim() {
        "" => ND,
        c => c,
    };
    let area = assessment.clinical_area.map_or(ND, |a| a.as_str());

    let vitals = &assessment.vitals;
    let gcs = resolve_glasgow_score(assessment).map_or_else(|| ND.to_string(), |g| g.to_string());
    let gcs_breakdown = assessment.glasgow.map_or_else(String::new, |g| {
        let part = |v: Option<u8>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        format!(" (O{} V{} M{})", part(g.ocular), part(g.verbal), part(g.motor))
    });

    let ai_reason = result
        .ai
        .as_ref()
        .and_then(|ai| ai.json.as_ref())
        .map(|json| json.priority_reason.trim())
        .filter(|r| !r.is_empty());
    let priority_reason = ai_reason.unwrap_or(&result.reason);

    let mut lines = vec![
        format!(
            "{timestamp} - Paciente {} años ({band}), sexo {sex}.",
            demographics.age_years
        ),
        format!("Motivo: {complaint}. Categoría: {area}."),
        format!(
            "Constantes: FC {} lpm, FR {} rpm, TA {}/{} mmHg, SatO2 {}%, Temp {}°C, GCS {gcs}{gcs_breakdown}. Dolor EVA {}.",
            format_value(vitals.hr),
            format_value(vitals.rr),
            format_value(vitals.sbp),
            format_value(vitals.dbp),
            format_value(vitals.spo2),
            format_value(vitals.temp),
            format_pain(assessment.pain),
        ),
        format!("Signos de alarma: {}.", format_signs(result)),
        format!(
            "Prioridad orientativa {}: {priority_reason}.",
            result.priority
        ),
    ];

    if result.priority_modified_by_ai {
        if let Some(original) = result.deterministic_priority {
            let detail = result
                .deterministic_reason
                .as_deref()
                .map(|r| format!(" ({r})"))
                .unwrap_or_default();
            lines.push(format!(
                "Resultado modificado por IA según criterio SET orientativo. Prioridad original determinista: P{original}{detail}."
            ));
        }
    }

    lines.push(format!("Actuaciones enfermeras: {}.", format_actions(result)));

    if !result.missing_data.is_empty() {
        lines.push(format!(
            "Datos pendientes: {}.",
            result.missing_data.join(", ")
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GlasgowAssessment;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap()
    }

    fn patient(age: f64) -> Patient {
        let mut p = Patient::new_empty(now());
        p.demographics.age_years = age;
        p.demographics.sex = "F".into();
        p
    }

    fn normal_vitals() -> VitalSigns {
        VitalSigns {
            hr: Some(80.0),
            rr: Some(16.0),
            sbp: Some(120.0),
            dbp: Some(70.0),
            spo2: Some(98.0),
            temp: Some(36.5),
            glucose: None,
            gcs: Some(15.0),
        }
    }

    fn base_assessment() -> TriageAssessment {
        TriageAssessment {
            chief_complaint: "Malestar".into(),
            clinical_area: Some(ClinicalArea::Other),
            vitals: normal_vitals(),
            glasgow: Some(GlasgowAssessment {
                ocular: Some(4),
                verbal: Some(5),
                motor: Some(6),
            }),
            ..TriageAssessment::default()
        }
    }

    #[test]
    fn stable_patient_is_p5() {
        let result = compute_triage_at(&base_assessment(), &patient(40.0), now());
        assert_eq!(result.priority, Priority::NON_URGENT);
        assert_eq!(result.reason, STABLE_REASON);
        assert_eq!(result.red_flags_present, vec![NO_RED_FLAGS]);
        assert!(result.missing_data.is_empty());
        assert_eq!(result.red_flags_absent.len(), RED_FLAG_CATALOG.len());
    }

    #[test]
    fn critical_spo2_in_respiratory_patient() {
        let assessment = TriageAssessment {
            clinical_area: Some(ClinicalArea::Respiratory),
            vitals: VitalSigns {
                spo2: Some(85.0),
                ..normal_vitals()
            },
            ..base_assessment()
        };
        let result = compute_triage_at(&assessment, &patient(55.0), now());
        assert_eq!(result.priority, Priority::RESUSCITATION);
        assert!(result.reason.contains("críticas"));
        assert!(result
            .red_flags_present
            .contains(&"SatO2 críticamente baja".to_string()));
    }

    #[test]
    fn preschool_tachycardia_is_at_least_p2() {
        let assessment = TriageAssessment {
            clinical_area: Some(ClinicalArea::Pediatric),
            vitals: VitalSigns {
                hr: Some(170.0),
                rr: Some(30.0),
                sbp: Some(100.0),
                ..normal_vitals()
            },
            ..base_assessment()
        };
        let result = compute_triage_at(&assessment, &patient(3.0), now());
        assert!(result.priority <= Priority::EMERGENCY);
    }

    #[test]
    fn level_one_flag_outranks_everything() {
        let assessment = TriageAssessment {
            red_flags: vec![
                "dolor_intenso".into(),
                "sepsis".into(),
                "shock".into(),
            ],
            pain: Some(9.0),
            infection_suspected: true,
            ..base_assessment()
        };
        let result = compute_triage_at(&assessment, &patient(40.0), now());
        assert_eq!(result.priority, Priority::RESUSCITATION);
        assert_eq!(result.reason, "Signos de shock");
        // catalog order, not selection order
        assert_eq!(
            result.red_flags_present,
            vec!["Signos de shock", "Sospecha de sepsis", "Dolor muy intenso"]
        );
    }

    #[test]
    fn pain_alone_sets_priority() {
        let cases = [
            (9.0, Priority::URGENT),
            (8.0, Priority::URGENT),
            (5.0, Priority::PRIORITY),
            (4.0, Priority::PRIORITY),
            (3.0, Priority::NON_URGENT),
        ];
        for (pain, expected) in cases {
            let assessment = TriageAssessment {
                pain: Some(pain),
                ..base_assessment()
            };
            let result = compute_triage_at(&assessment, &patient(40.0), now());
            assert_eq!(result.priority, expected, "pain {pain}");
        }
    }

    #[test]
    fn present_and_absent_are_disjoint() {
        let assessment = TriageAssessment {
            clinical_area: Some(ClinicalArea::Cardiovascular),
            red_flags: vec!["dolor_toracico".into(), "parada".into()],
            vitals: VitalSigns {
                sbp: Some(75.0),
                ..normal_vitals()
            },
            ..base_assessment()
        };
        let result = compute_triage_at(&assessment, &patient(70.0), now());
        for flag in &result.red_flags_present {
            assert!(!result.red_flags_absent.contains(flag), "{flag}");
        }
        assert!(result
            .actions
            .contains(&"Monitorización cardiaca continua".to_string()));
        // area-relevant flags lead the absent list
        assert_eq!(result.red_flags_absent[0], "Signos de shock");
    }

    #[test]
    fn deterministic_for_fixed_timestamp() {
        let assessment = TriageAssessment {
            pain: Some(6.4),
            infection_suspected: true,
            ..base_assessment()
        };
        let p = patient(33.0);
        let a = compute_triage_at(&assessment, &p, now());
        let b = compute_triage_at(&assessment, &p, now());
        assert_eq!(a, b);
        assert_eq!(a.reason, "Sospecha infecciosa");
        assert!(a.actions.contains(&"Medidas de aislamiento según protocolo".to_string()));
    }

    #[test]
    fn missing_data_labels() {
        let missing = compute_missing_data(&TriageAssessment::default());
        assert_eq!(missing.len(), 10);
        assert_eq!(missing[0], "Motivo de consulta");
        assert_eq!(missing[1], "Categoría clínica");
        assert_eq!(missing[9], "Glasgow motora");
    }

    #[test]
    fn computed_glasgow_drives_vitals() {
        let assessment = TriageAssessment {
            glasgow: Some(GlasgowAssessment {
                ocular: Some(1),
                verbal: Some(2),
                motor: Some(4),
            }),
            ..base_assessment()
        };
        let result = compute_triage_at(&assessment, &patient(40.0), now());
        assert_eq!(result.priority, Priority::RESUSCITATION);
        assert!(result.red_flags_present.contains(&"GCS críticamente baja".to_string()));
    }

    #[test]
    fn evolutivo_lines() {
        let assessment = TriageAssessment {
            pain: Some(12.0),
            vitals: VitalSigns {
                temp: None,
                ..normal_vitals()
            },
            ..base_assessment()
        };
        let result = compute_triage_at(&assessment, &patient(40.0), now());
        let lines: Vec<&str> = result.evolutivo.lines().collect();
        assert!(lines[0].ends_with(" - Paciente 40 años (adulto), sexo F."));
        assert_eq!(lines[1], "Motivo: Malestar. Categoría: otros.");
        assert_eq!(
            lines[2],
            "Constantes: FC 80 lpm, FR 16 rpm, TA 120/70 mmHg, SatO2 98%, Temp ND°C, GCS 15 (O4 V5 M6). Dolor EVA 10/10."
        );
        assert_eq!(lines[3], format!("Signos de alarma: {NO_RED_FLAGS}."));
        assert_eq!(lines[4], "Prioridad orientativa 3: Dolor muy intenso.");
        assert!(lines[5].starts_with("Actuaciones enfermeras: Constantes completas"));
        assert_eq!(lines[6], "Datos pendientes: Temperatura.");
    }
}
