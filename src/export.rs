//! Exporters for the patient list and a single triage.
//!
//! Every exporter returns the rendered text; writing it somewhere is the
//! caller's business.

use chrono::{DateTime, Local, Utc};

use crate::models::{Patient, TriageResult};
use crate::triage::priority_info;

pub const CSV_HEADERS: [&str; 10] = [
    "id",
    "nombre",
    "apellidos",
    "edad",
    "sexo",
    "estado",
    "categoria",
    "prioridad",
    "motivo",
    "fecha",
];

const DISCLAIMER: &str = "Uso académico. No sustituye protocolos oficiales ni el juicio clínico.\n\
La prioridad es orientativa y debe validarse según el centro.";

/// Quote a CSV field when it holds a comma, quote or line break.
fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn or_nd(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        "ND"
    } else {
        value
    }
}

/// One row per patient, header first, `\n` between records.
pub fn export_list_csv(patients: &[Patient]) -> String {
    let mut lines = Vec::with_capacity(patients.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for patient in patients {
        let assessment = patient.assessment.as_ref();
        let fields = [
            patient.id.clone(),
            patient.demographics.first_name.clone(),
            patient.demographics.last_names.clone(),
            patient.demographics.age_years.to_string(),
            patient.demographics.sex.clone(),
            patient.status.to_string(),
            assessment
                .and_then(|a| a.clinical_area)
                .map(|area| area.to_string())
                .unwrap_or_default(),
            patient
                .result
                .as_ref()
                .map(|r| r.priority.to_string())
                .unwrap_or_default(),
            assessment
                .map(|a| a.chief_complaint.clone())
                .unwrap_or_default(),
            patient.created_at.to_rfc3339(),
        ];
        let row: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

pub fn export_patient_json(patient: &Patient) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(patient)
}

pub fn export_list_json(patients: &[Patient]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(patients)
}

/// Plain-text triage report.
///
/// AI lines appear only when the stored result carries the full AI document.
pub fn export_triage_summary(patient: &Patient, result: &TriageResult, now: DateTime<Utc>) -> String {
    let demographics = &patient.demographics;
    let assessment = patient.assessment.as_ref();
    let info = priority_info(result.priority);

    let name = format!("{} {}", demographics.first_name.trim(), demographics.last_names.trim());
    let name = match name.trim() {
        "" => "Paciente sin nombre".to_string(),
        full => full.to_string(),
    };
    let weight = demographics
        .weight_kg
        .map(|w| w.to_string())
        .unwrap_or_else(|| "ND".to_string());
    let pain = assessment
        .and_then(|a| a.pain)
        .map(|p| format!("{p}/10"))
        .unwrap_or_else(|| "ND".to_string());
    let area = assessment
        .and_then(|a| a.clinical_area)
        .map(|area| area.to_string())
        .unwrap_or_else(|| "ND".to_string());

    let mut lines = vec![
        "TRIAJE - Informe de Triaje".to_string(),
        format!(
            "Fecha: {}",
            now.with_timezone(&Local).format("%-d/%-m/%Y, %-H:%M:%S")
        ),
        String::new(),
        format!("Paciente: {name}"),
        format!(
            "Edad: {} años | Sexo: {} | Peso: {weight} kg",
            demographics.age_years,
            or_nd(&demographics.sex)
        ),
        format!(
            "Motivo: {}",
            or_nd(assessment.map(|a| a.chief_complaint.as_str()).unwrap_or(""))
        ),
        format!("Categoría: {area}"),
        format!("Dolor EVA: {pain}"),
        format!(
            "Prioridad orientativa: {} ({}) - {}",
            result.priority, info.label, result.reason
        ),
    ];

    if let Some(json) = result.ai.as_ref().and_then(|ai| ai.json.as_ref()) {
        if !json.priority_reason.trim().is_empty() {
            lines.push(format!(
                "Justificación de prioridad (IA): {}",
                json.priority_reason.trim()
            ));
        }
        if !json.suspected_conditions.is_empty() {
            lines.push(format!(
                "Sospecha clínica orientativa (IA): {}",
                json.suspected_conditions.join("; ")
            ));
        }
    }

    lines.push(format!(
        "Signos de alarma presentes: {}",
        result.red_flags_present.join("; ")
    ));
    lines.push(format!("Actuaciones enfermeras: {}", result.actions.join("; ")));
    lines.push(format!(
        "Datos faltantes: {}",
        if result.missing_data.is_empty() {
            "Ninguno".to_string()
        } else {
            result.missing_data.join("; ")
        }
    ));
    lines.push(String::new());
    lines.push("Evolutivo:".to_string());
    lines.push(result.evolutivo.clone());
    lines.push(String::new());
    lines.push(DISCLAIMER.to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClinicalArea, TriageAssessment, VitalSigns};
    use crate::triage::compute_triage;

    fn patient() -> Patient {
        let mut patient = Patient::new_empty(Utc::now());
        patient.demographics.first_name = "Ana".into();
        patient.demographics.last_names = "García, López".into();
        patient.demographics.age_years = 34.0;
        patient.demographics.sex = "mujer".into();
        patient
    }

    fn assessed() -> Patient {
        let mut patient = patient();
        let assessment = TriageAssessment {
            chief_complaint: "Disnea \"súbita\"".into(),
            clinical_area: Some(ClinicalArea::Respiratory),
            vitals: VitalSigns {
                spo2: Some(85.0),
                ..VitalSigns::default()
            },
            ..TriageAssessment::default()
        };
        patient.result = Some(compute_triage(&assessment, &patient));
        patient.assessment = Some(assessment);
        patient
    }

    #[test]
    fn csv_escape_quotes_only_when_needed() {
        assert_eq!(csv_escape("simple"), "simple");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn csv_has_header_and_one_row_per_patient() {
        let patients = vec![assessed(), patient()];
        let csv = export_list_csv(&patients);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,nombre,apellidos,edad,sexo,estado,categoria,prioridad,motivo,fecha")
        );

        let first = lines.next().unwrap();
        assert!(first.contains(",Ana,\"García, López\",34,mujer,en_espera,respiratorio,1,"));
        assert!(first.contains("\"Disnea \"\"súbita\"\"\""));

        let second = lines.next().unwrap();
        assert!(second.contains(",en_espera,,,,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_list_is_header_only() {
        assert_eq!(export_list_csv(&[]), CSV_HEADERS.join(","));
    }

    #[test]
    fn json_exports_are_pretty_and_parse_back() {
        let patients = vec![assessed()];
        let text = export_list_json(&patients).unwrap();
        assert!(text.contains('\n'));
        let back: Vec<Patient> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, patients);

        let single = export_patient_json(&patients[0]).unwrap();
        assert!(single.starts_with('{'));
    }

    #[test]
    fn summary_lists_exporter_fields() {
        let patient = assessed();
        let result = patient.result.clone().unwrap();
        let summary = export_triage_summary(&patient, &result, Utc::now());

        assert!(summary.starts_with("TRIAJE - Informe de Triaje"));
        assert!(summary.contains("Paciente: Ana García, López"));
        assert!(summary.contains("Motivo: Disnea \"súbita\""));
        assert!(summary.contains("Categoría: respiratorio"));
        assert!(summary.contains("Dolor EVA: ND"));
        assert!(summary.contains("Prioridad orientativa: 1 (Reanimación)"));
        assert!(summary.contains(&result.evolutivo));
        assert!(!summary.contains("(IA)"));
    }

    #[test]
    fn summary_without_name_or_missing_data() {
        let mut patient = Patient::new_empty(Utc::now());
        patient.assessment = Some(TriageAssessment::default());
        let mut result = compute_triage(&TriageAssessment::default(), &patient);
        result.missing_data.clear();
        let summary = export_triage_summary(&patient, &result, Utc::now());
        assert!(summary.contains("Paciente: Paciente sin nombre"));
        assert!(summary.contains("Sexo: ND"));
        assert!(summary.contains("Datos faltantes: Ninguno"));
    }
}
