use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serde uses the same string as the wire value.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(ClinicalArea {
    Respiratory => "respiratorio",
    Cardiovascular => "cardiovascular",
    Neurological => "neurologico",
    Trauma => "trauma",
    Abdominal => "abdominal",
    Infectious => "infeccioso",
    Toxicology => "toxicos",
    Urology => "urologico",
    Gynecology => "gineco",
    Ophthalmology => "oftalmologico",
    Otorhinolaryngology => "otorrino",
    Dermatology => "dermatologico",
    Endocrine => "endocrino",
    Psychiatric => "psiquiatrico",
    Pediatric => "pediatrico",
    Other => "otros",
});

impl ClinicalArea {
    /// Every area, in catalog display order.
    pub const ALL: [ClinicalArea; 16] = [
        ClinicalArea::Respiratory,
        ClinicalArea::Cardiovascular,
        ClinicalArea::Neurological,
        ClinicalArea::Trauma,
        ClinicalArea::Abdominal,
        ClinicalArea::Infectious,
        ClinicalArea::Toxicology,
        ClinicalArea::Urology,
        ClinicalArea::Gynecology,
        ClinicalArea::Ophthalmology,
        ClinicalArea::Otorhinolaryngology,
        ClinicalArea::Dermatology,
        ClinicalArea::Endocrine,
        ClinicalArea::Psychiatric,
        ClinicalArea::Pediatric,
        ClinicalArea::Other,
    ];
}

// Patient lifecycle. Only `Waiting -> InTriage` is automatic; the rest are
// set by whoever closes the episode.
str_enum!(PatientStatus {
    Waiting => "en_espera",
    InTriage => "en_triaje",
    Attended => "atendido",
    Discharged => "alta",
});

str_enum!(PregnancyStatus {
    Yes => "si",
    No => "no",
    Unknown => "desconocido",
});

str_enum!(AiProvider {
    Gemini => "gemini",
    OpenAi => "openai",
});

impl AiProvider {
    /// Human-facing provider name, used in error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "Gemini",
            AiProvider::OpenAi => "OpenAI",
        }
    }
}
