//! Prompt builders. Missing values are rendered as "ND".

use std::fmt::Write as _;

use crate::models::{Patient, PregnancyStatus, TriageAssessment};
use crate::triage::catalog::red_flag_by_id;
use crate::triage::glasgow::resolve_glasgow_score;

const ND: &str = "ND";

const TRIAGE_INSTRUCTIONS: &str = r#"Actúa como un asistente de TRIAJE para enfermería en Urgencias. Tu función es proponer una PRIORIDAD ORIENTATIVA y generar documentación de triaje de forma estructurada, basándote SOLO en los datos aportados.

Reglas:
- Si faltan datos clave, NO inventes: indícalos en "datos_faltantes".
- No des indicaciones médicas (tratamientos farmacológicos). Limítate a ACTUACIONES ENFERMERAS iniciales habituales y seguras.
- Incluye una SOSPECHA CLÍNICA orientativa (pre-diagnóstico diferencial corto), sin afirmar diagnósticos definitivos.
- La prioridad debe basarse en SET como referencia principal: 1 Reanimación, 2 Emergencia, 3 Urgencia, 4 Prioritario, 5 No urgente.
- En actuaciones de enfermería, prioriza por tiempo y operatividad (0-5 min, 5-15 min, 15-30 min).
- Añade recomendaciones de monitorización y criterios de escalada clínicos claros.
- "resumen_clinico": entre 45 y 90 palabras.
- Resto de strings: máximo 18 palabras.
- Máximo 4 elementos por array.
- "preguntas_clave" deben ser preguntas clínicas reales, redactadas en formato interrogativo (¿...?).
- Sé breve, claro y operativo.

Salida obligatoria:
Devuelve SOLO un JSON válido (sin markdown ni texto adicional) con el siguiente esquema exacto:
{
  "resumen_clinico": "",
  "sospecha_clinica": [""],
  "prioridad_sugerida": 1,
  "motivo_prioridad": "",
  "red_flags_presentes": [""],
  "red_flags_ausentes": [""],
  "actuaciones_enfermeras": [""],
  "actuaciones_priorizadas": [""],
  "objetivos_monitorizacion": [""],
  "criterios_escalada": [""],
  "preguntas_clave": [""],
  "datos_faltantes": [""],
  "evolutivo_triaje": ""
}
No añadas texto fuera del JSON."#;

const PRIORITY_INSTRUCTIONS: &str = r#"Actúa como enfermera/o de TRIAJE en Urgencias. Asigna una PRIORIDAD ORIENTATIVA según la escala SET (1 Reanimación, 2 Emergencia, 3 Urgencia, 4 Prioritario, 5 No urgente) basándote SOLO en los datos aportados. No inventes datos.

Devuelve SOLO un JSON válido con el siguiente esquema exacto:
{
  "prioridad_sugerida": 1,
  "motivo_prioridad": ""
}
"motivo_prioridad": máximo 18 palabras. No añadas texto fuera del JSON."#;

fn or_nd(value: &str) -> &str {
    match value.trim() {
        "" => ND,
        v => v,
    }
}

fn num_or_nd(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => v.to_string(),
        _ => ND.to_string(),
    }
}

fn list_or_nd(values: &[String]) -> String {
    let items: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();
    if items.is_empty() {
        ND.to_string()
    } else {
        items.join(", ")
    }
}

fn pregnancy_line(patient: &Patient) -> String {
    let status = match patient.clinical.pregnancy {
        PregnancyStatus::Unknown => ND,
        other => other.as_str(),
    };
    match patient.clinical.pregnancy_weeks {
        Some(weeks) if weeks > 0 => format!("{status} ({weeks} semanas)"),
        _ => status.to_string(),
    }
}

/// Patient and assessment data block shared by both prompts.
pub fn patient_block(assessment: &TriageAssessment, patient: &Patient) -> String {
    let demographics = &patient.demographics;
    let clinical = &patient.clinical;
    let vitals = &assessment.vitals;

    let gcs = num_or_nd(resolve_glasgow_score(assessment));
    let gcs_detail = assessment.glasgow.map_or_else(
        || ND.to_string(),
        |g| {
            let part = |v: Option<u8>| v.map_or_else(|| ND.to_string(), |v| v.to_string());
            format!("O{} V{} M{}", part(g.ocular), part(g.verbal), part(g.motor))
        },
    );
    let declared_flags: Vec<String> = assessment
        .red_flags
        .iter()
        .map(|id| red_flag_by_id(id).map_or_else(|| id.clone(), |f| f.label.to_string()))
        .collect();
    let area = assessment.clinical_area.map_or(ND, |a| a.as_str());
    let pain = assessment
        .pain
        .filter(|p| !p.is_nan())
        .map_or_else(|| ND.to_string(), |p| format!("{p}/10"));

    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "Datos del paciente:");
    let _ = writeln!(out, "- Edad: {} años", demographics.age_years);
    let _ = writeln!(out, "- Sexo: {}", match demographics.sex.trim() {
        "" => "no especificado",
        s => s,
    });
    let _ = writeln!(out, "- Peso: {} kg", num_or_nd(demographics.weight_kg));
    let _ = writeln!(out, "- Antecedentes: {}", or_nd(&clinical.background));
    let _ = writeln!(out, "- Alergias: {}", or_nd(&clinical.allergies));
    let _ = writeln!(out, "- Medicación: {}", or_nd(&clinical.medication));
    let _ = writeln!(out, "- Embarazo: {}", pregnancy_line(patient));
    let _ = writeln!(out, "- Vacunación: {}", or_nd(&clinical.vaccination));
    let _ = writeln!(out, "- Riesgos sociales: {}", or_nd(&clinical.social_risks));
    let _ = writeln!(out);
    let _ = writeln!(out, "Datos de triaje:");
    let _ = writeln!(out, "- Motivo consulta: {}", or_nd(&assessment.chief_complaint));
    let _ = writeln!(out, "- Categoría clínica: {area}");
    let _ = writeln!(out, "- Síntomas: {}", list_or_nd(&assessment.symptoms));
    let _ = writeln!(out, "- Signos de alarma declarados: {}", list_or_nd(&declared_flags));
    let _ = writeln!(
        out,
        "- Constantes: FC {}, FR {}, TA {}/{}, SatO2 {}, Temp {}, GCS {gcs} ({gcs_detail}), Glucemia {}",
        num_or_nd(vitals.hr),
        num_or_nd(vitals.rr),
        num_or_nd(vitals.sbp),
        num_or_nd(vitals.dbp),
        num_or_nd(vitals.spo2),
        num_or_nd(vitals.temp),
        num_or_nd(vitals.glucose),
    );
    let _ = writeln!(out, "- Dolor EVA (1-10): {pain}");
    let _ = writeln!(out, "- Observaciones: {}", or_nd(&assessment.observations));
    let _ = writeln!(
        out,
        "- Sospecha infecciosa: {}",
        if assessment.infection_suspected { "sí" } else { "no" }
    );
    out
}

/// Full triage documentation prompt.
pub fn build_triage_prompt(assessment: &TriageAssessment, patient: &Patient) -> String {
    format!("{TRIAGE_INSTRUCTIONS}\n\n{}", patient_block(assessment, patient))
}

/// Short prompt asking only for a priority and its reason.
pub fn build_priority_prompt(assessment: &TriageAssessment, patient: &Patient) -> String {
    format!("{PRIORITY_INSTRUCTIONS}\n\n{}", patient_block(assessment, patient))
}
