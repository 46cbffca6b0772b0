use serde::Serialize;

use crate::models::TriageAssessment;

/// One selectable answer for a Glasgow component.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GlasgowOption {
    pub value: u8,
    pub short_label: &'static str,
    pub long_label: &'static str,
}

const fn opt(value: u8, short_label: &'static str, long_label: &'static str) -> GlasgowOption {
    GlasgowOption {
        value,
        short_label,
        long_label,
    }
}

pub const OCULAR_OPTIONS: [GlasgowOption; 4] = [
    opt(4, "Espontánea", "Abre los ojos espontáneamente"),
    opt(3, "A la voz", "Abre los ojos al estímulo verbal"),
    opt(2, "Al dolor", "Abre los ojos al estímulo doloroso"),
    opt(1, "Ninguna", "No apertura ocular"),
];

pub const VERBAL_OPTIONS: [GlasgowOption; 5] = [
    opt(5, "Orientado", "Orientado y conversa adecuadamente"),
    opt(4, "Confuso", "Confuso pero responde en frases"),
    opt(3, "Palabras", "Palabras inapropiadas"),
    opt(2, "Sonidos", "Sonidos incomprensibles"),
    opt(1, "Ninguna", "Sin respuesta verbal"),
];

pub const MOTOR_OPTIONS: [GlasgowOption; 6] = [
    opt(6, "Obedece", "Obedece órdenes"),
    opt(5, "Localiza", "Localiza el dolor"),
    opt(4, "Retira", "Retirada al dolor"),
    opt(3, "Flexión", "Flexión anormal (decorticación)"),
    opt(2, "Extensión", "Extensión anormal (descerebración)"),
    opt(1, "Ninguna", "Sin respuesta motora"),
];

/// Effective GCS for an assessment.
///
/// The computed breakdown wins over a directly supplied value; a NaN
/// direct value counts as absent.
pub fn resolve_glasgow_score(assessment: &TriageAssessment) -> Option<f64> {
    if let Some(score) = assessment.glasgow.as_ref().and_then(|g| g.score()) {
        return Some(f64::from(score));
    }
    assessment.vitals.gcs.filter(|v| !v.is_nan())
}

/// Clinical band for a GCS total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GlasgowSeverity {
    NotAssessed,
    Critical,
    Severe,
    Moderate,
    Mild,
}

impl GlasgowSeverity {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => GlasgowSeverity::NotAssessed,
            Some(s) if s <= 8.0 => GlasgowSeverity::Critical,
            Some(s) if s <= 12.0 => GlasgowSeverity::Severe,
            Some(s) if s <= 14.0 => GlasgowSeverity::Moderate,
            Some(_) => GlasgowSeverity::Mild,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GlasgowSeverity::NotAssessed => "Sin valorar",
            GlasgowSeverity::Critical => "Crítico",
            GlasgowSeverity::Severe => "Grave",
            GlasgowSeverity::Moderate => "Moderado",
            GlasgowSeverity::Mild => "Leve / normal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GlasgowAssessment, VitalSigns};

    fn assessment(glasgow: Option<GlasgowAssessment>, gcs: Option<f64>) -> TriageAssessment {
        TriageAssessment {
            glasgow,
            vitals: VitalSigns {
                gcs,
                ..VitalSigns::default()
            },
            ..TriageAssessment::default()
        }
    }

    #[test]
    fn computed_score_beats_direct_value() {
        let g = GlasgowAssessment {
            ocular: Some(2),
            verbal: Some(2),
            motor: Some(4),
        };
        assert_eq!(resolve_glasgow_score(&assessment(Some(g), Some(15.0))), Some(8.0));
    }

    #[test]
    fn incomplete_breakdown_falls_back_to_direct_value() {
        let g = GlasgowAssessment {
            ocular: Some(4),
            verbal: None,
            motor: Some(6),
        };
        assert_eq!(resolve_glasgow_score(&assessment(Some(g), Some(13.0))), Some(13.0));
        assert_eq!(resolve_glasgow_score(&assessment(Some(g), Some(f64::NAN))), None);
        assert_eq!(resolve_glasgow_score(&assessment(None, None)), None);
    }

    #[test]
    fn severity_bands() {
        assert_eq!(GlasgowSeverity::from_score(None), GlasgowSeverity::NotAssessed);
        assert_eq!(GlasgowSeverity::from_score(Some(8.0)), GlasgowSeverity::Critical);
        assert_eq!(GlasgowSeverity::from_score(Some(12.0)), GlasgowSeverity::Severe);
        assert_eq!(GlasgowSeverity::from_score(Some(14.0)), GlasgowSeverity::Moderate);
        assert_eq!(GlasgowSeverity::from_score(Some(15.0)).label(), "Leve / normal");
    }

    #[test]
    fn option_tables_cover_component_ranges() {
        assert_eq!(OCULAR_OPTIONS.iter().map(|o| o.value).max(), Some(4));
        assert_eq!(VERBAL_OPTIONS.iter().map(|o| o.value).max(), Some(5));
        assert_eq!(MOTOR_OPTIONS.iter().map(|o| o.value).max(), Some(6));
    }
}
