//! Folding an AI enrichment into a rule-based result.

use chrono::{DateTime, Utc};

use crate::models::{AiEnrichment, Patient, TriageAssessment, TriageResult};

use super::engine::build_readable_evolutivo;

/// Attach a full AI triage document to `result`.
pub fn apply_ai_triage(
    result: &TriageResult,
    assessment: &TriageAssessment,
    patient: &Patient,
    enrichment: AiEnrichment,
    now: DateTime<Utc>,
) -> TriageResult {
    merge(result, assessment, patient, enrichment, now)
}

/// Attach a priority-only AI answer to `result`.
///
/// A priority-only enrichment carries no structured document, so the
/// narrative keeps the rule-based signs and actions.
pub fn apply_ai_priority(
    result: &TriageResult,
    assessment: &TriageAssessment,
    patient: &Patient,
    mut enrichment: AiEnrichment,
    now: DateTime<Utc>,
) -> TriageResult {
    enrichment.json = None;
    merge(result, assessment, patient, enrichment, now)
}

fn merge(
    result: &TriageResult,
    assessment: &TriageAssessment,
    patient: &Patient,
    enrichment: AiEnrichment,
    now: DateTime<Utc>,
) -> TriageResult {
    let mut merged = result.clone();
    let suggested = enrichment.suggested_priority;

    if suggested != merged.priority {
        // The first override records what the rules said.
        if merged.deterministic_priority.is_none() {
            merged.deterministic_priority = Some(merged.priority);
            merged.deterministic_reason = Some(merged.reason.clone());
        }
        merged.priority_modified_by_ai = true;
        merged.priority = suggested;
        let reason = enrichment.priority_reason.trim();
        if !reason.is_empty() {
            merged.reason = reason.to_string();
        }
    }

    tracing::debug!(
        patient_id = %patient.id,
        suggested = suggested.level(),
        overridden = merged.priority_modified_by_ai,
        "AI result merged"
    );

    merged.ai = Some(enrichment);
    merged.evolutivo = build_readable_evolutivo(patient, assessment, &merged, now);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AiProvider, ClinicalArea, Priority};
    use crate::triage::engine::compute_triage_at;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn fixture() -> (Patient, TriageAssessment, TriageResult) {
        let mut patient = Patient::new_empty(now());
        patient.demographics.age_years = 50.0;
        let assessment = TriageAssessment {
            chief_complaint: "Dolor lumbar".into(),
            clinical_area: Some(ClinicalArea::Urology),
            pain: Some(5.0),
            ..TriageAssessment::default()
        };
        let result = compute_triage_at(&assessment, &patient, now());
        (patient, assessment, result)
    }

    fn enrichment(priority: Priority, reason: &str) -> AiEnrichment {
        AiEnrichment {
            provider: AiProvider::Gemini,
            model: "gemini-2.5-flash".into(),
            generated_at: now(),
            token_id: "t1".into(),
            token_suffix: "abcd".into(),
            suggested_priority: priority,
            priority_reason: reason.into(),
            json: None,
            raw_text: "{}".into(),
        }
    }

    #[test]
    fn agreeing_ai_keeps_priority() {
        let (patient, assessment, result) = fixture();
        assert_eq!(result.priority, Priority::PRIORITY);
        let merged = apply_ai_priority(
            &result,
            &assessment,
            &patient,
            enrichment(Priority::PRIORITY, "Dolor moderado estable"),
            now(),
        );
        assert!(!merged.priority_modified_by_ai);
        assert_eq!(merged.reason, result.reason);
        assert!(merged.ai.is_some());
    }

    #[test]
    fn override_records_deterministic_values_once() {
        let (patient, assessment, result) = fixture();
        let first = apply_ai_priority(
            &result,
            &assessment,
            &patient,
            enrichment(Priority::URGENT, "Posible cólico renal"),
            now(),
        );
        assert!(first.priority_modified_by_ai);
        assert_eq!(first.priority, Priority::URGENT);
        assert_eq!(first.deterministic_priority, Some(Priority::PRIORITY));
        assert_eq!(first.deterministic_reason.as_deref(), Some("Dolor moderado"));
        assert!(first
            .evolutivo
            .contains("Prioridad original determinista: P4 (Dolor moderado)."));

        let second = apply_ai_priority(
            &first,
            &assessment,
            &patient,
            enrichment(Priority::EMERGENCY, "Empeoramiento"),
            now(),
        );
        assert_eq!(second.priority, Priority::EMERGENCY);
        assert_eq!(second.deterministic_priority, Some(Priority::PRIORITY));
        assert_eq!(second.reason, "Empeoramiento");
    }
}
