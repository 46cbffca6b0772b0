//! Nursing action rules.

use crate::models::{ClinicalArea, Priority, TriageAssessment};

use super::ordered_set::OrderedSet;

pub const ISOLATION_ACTION: &str = "Medidas de aislamiento según protocolo";
pub const CARDIAC_MONITORING_ACTION: &str = "Monitorización cardiaca continua";

const CHEST_PAIN_MARKER: &str = "dolor torácico";

pub fn base_actions(priority: Priority) -> &'static [&'static str] {
    match priority.level() {
        1 => &[
            "Activar circuito de críticos y aviso inmediato al equipo médico",
            "Monitorización continua y constantes frecuentes",
            "Canalizar vía venosa y extracción según protocolo",
            "Oxígeno si SatO2 < 94% o dificultad respiratoria",
        ],
        2 => &[
            "Monitorización continua o seriada según protocolo",
            "Constantes completas y reevaluación frecuente",
            "Canalizar vía venosa si procede",
            "ECG si dolor torácico, síncope o palpitaciones",
            "Glucemia capilar si alteración del nivel de consciencia",
        ],
        3 => &[
            "Constantes completas y reevaluación periódica",
            "Control de dolor no farmacológico y confort",
            "Educación breve de signos de alarma",
        ],
        4 => &[
            "Constantes básicas y reevaluación si cambios",
            "Información de tiempos de espera y signos de alarma",
        ],
        _ => &[
            "Orientación y educación sanitaria básica",
            "Recomendación de seguimiento ambulatorio si procede",
        ],
    }
}

pub fn area_actions(area: ClinicalArea) -> &'static [&'static str] {
    match area {
        ClinicalArea::Respiratory => &["Ajuste de posición y evaluación de disnea"],
        ClinicalArea::Cardiovascular => {
            &["ECG de 12 derivaciones si dolor torácico o palpitaciones"]
        }
        ClinicalArea::Neurological => &["Escala neurológica seriada (GCS/FAST)"],
        ClinicalArea::Trauma => &["Control de hemorragias e inmovilización si procede"],
        ClinicalArea::Abdominal => &["Control de dolor y valoración de abdomen"],
        ClinicalArea::Infectious => &[
            "Aislamiento si sospecha infecciosa",
            "Control de temperatura",
        ],
        ClinicalArea::Toxicology => &["Retirar acceso a tóxicos y vigilar vía aérea"],
        ClinicalArea::Urology => &["Control de diuresis si procede"],
        ClinicalArea::Gynecology => &["Valoración de sangrado y monitorización fetal si procede"],
        ClinicalArea::Ophthalmology => &["Protección ocular si trauma"],
        ClinicalArea::Otorhinolaryngology => &["Compresión local en epistaxis si protocolo"],
        ClinicalArea::Dermatology => &["Observación de lesiones y signos de anafilaxia"],
        ClinicalArea::Endocrine => &["Glucemia capilar y monitorización"],
        ClinicalArea::Psychiatric => &["Entorno seguro y valoración de riesgo autolesivo"],
        ClinicalArea::Pediatric => &["Escala pediátrica y confort familiar"],
        ClinicalArea::Other => &["Reevaluación según evolución"],
    }
}

/// Recommended actions: base for the priority, then area, then conditionals.
pub fn build_actions(
    priority: Priority,
    area: ClinicalArea,
    assessment: &TriageAssessment,
    red_flags_present: &[String],
) -> Vec<String> {
    let mut actions = OrderedSet::new();
    actions.extend(base_actions(priority).iter().copied());
    actions.extend(area_actions(area).iter().copied());

    if assessment.infection_suspected {
        actions.insert(ISOLATION_ACTION);
    }
    if red_flags_present
        .iter()
        .any(|flag| flag.to_lowercase().contains(CHEST_PAIN_MARKER))
    {
        actions.insert(CARDIAC_MONITORING_ACTION);
    }

    actions.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_then_area_order() {
        let actions = build_actions(
            Priority::URGENT,
            ClinicalArea::Infectious,
            &TriageAssessment::default(),
            &[],
        );
        assert_eq!(
            actions,
            vec![
                "Constantes completas y reevaluación periódica",
                "Control de dolor no farmacológico y confort",
                "Educación breve de signos de alarma",
                "Aislamiento si sospecha infecciosa",
                "Control de temperatura",
            ]
        );
    }

    #[test]
    fn conditionals_are_appended_last() {
        let assessment = TriageAssessment {
            infection_suspected: true,
            ..TriageAssessment::default()
        };
        let present = vec!["DOLOR TORÁCICO sugestivo de SCA".to_string()];
        let actions = build_actions(
            Priority::EMERGENCY,
            ClinicalArea::Cardiovascular,
            &assessment,
            &present,
        );
        let n = actions.len();
        assert_eq!(actions[n - 2], ISOLATION_ACTION);
        assert_eq!(actions[n - 1], CARDIAC_MONITORING_ACTION);
    }

    #[test]
    fn no_duplicates() {
        let actions = build_actions(
            Priority::RESUSCITATION,
            ClinicalArea::Respiratory,
            &TriageAssessment::default(),
            &[],
        );
        let mut sorted = actions.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), actions.len());
        assert!(!actions.contains(&CARDIAC_MONITORING_ACTION.to_string()));
    }
}
