//! Static clinical catalog: areas, symptom shortcuts and red flags.

use serde::Serialize;

use crate::models::ClinicalArea;

/// A named clinical warning sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RedFlag {
    pub id: &'static str,
    pub label: &'static str,
    /// 1 = critical, 2 = urgent, 3 = moderate.
    pub level: u8,
}

const fn flag(id: &'static str, label: &'static str, level: u8) -> RedFlag {
    RedFlag { id, label, level }
}

/// Catalog order is also the order in which selected flags contribute
/// reasons to the engine.
pub const RED_FLAG_CATALOG: [RedFlag; 13] = [
    flag("parada", "Parada cardiorrespiratoria", 1),
    flag("via_aerea", "Compromiso de vía aérea", 1),
    flag("resp_severa", "Dificultad respiratoria severa", 1),
    flag("shock", "Signos de shock", 1),
    flag("gcs_bajo", "Alteración grave del nivel de consciencia", 1),
    flag("convulsion", "Convulsión activa o reciente", 2),
    flag("dolor_toracico", "Dolor torácico sugestivo de SCA", 2),
    flag("ictus", "Síntomas neurológicos focales", 2),
    flag("sepsis", "Sospecha de sepsis", 2),
    flag("hemorragia", "Hemorragia activa importante", 2),
    flag("trauma_alto", "Trauma de alta energía", 2),
    flag("dolor_intenso", "Dolor muy intenso", 3),
    flag("embarazo_riesgo", "Embarazo con signos de riesgo", 3),
];

pub fn red_flag_by_id(id: &str) -> Option<&'static RedFlag> {
    RED_FLAG_CATALOG.iter().find(|f| f.id == id)
}

/// Red-flag ids clinically relevant to an area.
pub fn area_red_flags(area: ClinicalArea) -> &'static [&'static str] {
    match area {
        ClinicalArea::Respiratory => &["resp_severa", "via_aerea", "shock"],
        ClinicalArea::Cardiovascular => &["dolor_toracico", "shock", "parada"],
        ClinicalArea::Neurological => &["ictus", "gcs_bajo", "convulsion"],
        ClinicalArea::Trauma => &["hemorragia", "trauma_alto", "shock"],
        ClinicalArea::Abdominal => &["shock", "hemorragia", "dolor_intenso"],
        ClinicalArea::Infectious => &["sepsis", "shock"],
        ClinicalArea::Toxicology => &["gcs_bajo", "shock"],
        ClinicalArea::Urology => &["hemorragia", "dolor_intenso"],
        ClinicalArea::Gynecology => &["embarazo_riesgo", "hemorragia", "shock"],
        ClinicalArea::Ophthalmology => &["dolor_intenso"],
        ClinicalArea::Otorhinolaryngology => &["hemorragia", "resp_severa"],
        ClinicalArea::Dermatology => &["resp_severa", "shock"],
        ClinicalArea::Endocrine => &["gcs_bajo", "shock"],
        ClinicalArea::Psychiatric => &["gcs_bajo"],
        ClinicalArea::Pediatric => &["resp_severa", "gcs_bajo", "shock"],
        ClinicalArea::Other => &["dolor_intenso"],
    }
}

/// Display label and one-line description of an area.
pub fn area_info(area: ClinicalArea) -> (&'static str, &'static str) {
    match area {
        ClinicalArea::Respiratory => ("Respiratorio", "Disnea, tos, hipoxemia, asma, EPOC."),
        ClinicalArea::Cardiovascular => ("Cardiovascular", "Dolor torácico, palpitaciones, síncope."),
        ClinicalArea::Neurological => ("Neurológico", "Déficit focal, cefalea, convulsión."),
        ClinicalArea::Trauma => ("Trauma", "Politrauma, heridas, caídas."),
        ClinicalArea::Abdominal => ("Abdominal/Digestivo", "Dolor abdominal, vómitos, diarrea."),
        ClinicalArea::Infectious => ("Infeccioso/Sepsis", "Fiebre, foco infeccioso, sepsis."),
        ClinicalArea::Toxicology => ("Tóxicos/Intoxicación", "Ingesta, exposición, intoxicaciones."),
        ClinicalArea::Urology => ("Urológico", "Dolor cólico, hematuria, retención."),
        ClinicalArea::Gynecology => ("Gineco-Obstétrico", "Dolor pélvico, sangrado, embarazo."),
        ClinicalArea::Ophthalmology => ("Oftalmológico", "Visión borrosa, dolor ocular."),
        ClinicalArea::Otorhinolaryngology => ("Otorrino", "Epistaxis, odinofagia, vértigo."),
        ClinicalArea::Dermatology => ("Dermatológico/Alérgico", "Urticaria, erupciones, edema."),
        ClinicalArea::Endocrine => ("Endocrino/Metabólico", "Hipoglucemia, cetoacidosis."),
        ClinicalArea::Psychiatric => ("Psiquiátrico/Agitación", "Riesgo autolesivo, agitación."),
        ClinicalArea::Pediatric => ("Pediátrico", "Consulta infantil general."),
        ClinicalArea::Other => ("Otros/No clasificado", "Situaciones no incluidas."),
    }
}

/// Symptom shortcuts offered per area.
pub fn symptom_options(area: ClinicalArea) -> &'static [&'static str] {
    match area {
        ClinicalArea::Respiratory => &[
            "Disnea",
            "Tos",
            "Sibilancias",
            "Dolor torácico pleurítico",
            "Expectoración",
            "Fiebre",
        ],
        ClinicalArea::Cardiovascular => {
            &["Dolor torácico", "Palpitaciones", "Síncope", "Disnea", "Edema"]
        }
        ClinicalArea::Neurological => &[
            "Cefalea intensa",
            "Déficit focal",
            "Convulsión",
            "Alteración conciencia",
            "Vértigo",
        ],
        ClinicalArea::Trauma => &[
            "Caída",
            "Herida abierta",
            "Dolor intenso",
            "Hemorragia",
            "Pérdida conciencia",
        ],
        ClinicalArea::Abdominal => &[
            "Dolor abdominal",
            "Náuseas",
            "Vómitos",
            "Diarrea",
            "Hematemesis",
            "Melena",
        ],
        ClinicalArea::Infectious => &[
            "Fiebre",
            "Escalofríos",
            "Confusión",
            "Dolor localizado",
            "Disuria",
        ],
        ClinicalArea::Toxicology => &[
            "Ingesta tóxica",
            "Somnolencia",
            "Vómitos",
            "Alucinaciones",
            "Olor a alcohol/drogas",
        ],
        ClinicalArea::Urology => &[
            "Dolor cólico",
            "Hematuria",
            "Retención urinaria",
            "Disuria",
            "Fiebre",
        ],
        ClinicalArea::Gynecology => &[
            "Dolor pélvico",
            "Sangrado vaginal",
            "Embarazo",
            "Síncope",
            "Fiebre",
        ],
        ClinicalArea::Ophthalmology => {
            &["Dolor ocular", "Pérdida visión", "Trauma ocular", "Fotofobia"]
        }
        ClinicalArea::Otorhinolaryngology => {
            &["Odinofagia", "Epistaxis", "Otalgia", "Vértigo", "Fiebre"]
        }
        ClinicalArea::Dermatology => {
            &["Urticaria", "Edema", "Eritema", "Prurito", "Lesión extensa"]
        }
        ClinicalArea::Endocrine => &[
            "Poliuria",
            "Polidipsia",
            "Confusión",
            "Dolor abdominal",
            "Vómitos",
        ],
        ClinicalArea::Psychiatric => &[
            "Agitación",
            "Ideación suicida",
            "Desorientación",
            "Consumo sustancias",
        ],
        ClinicalArea::Pediatric => &[
            "Fiebre",
            "Llanto inconsolable",
            "Letargo",
            "Dificultad respiratoria",
            "Vómitos",
        ],
        ClinicalArea::Other => &[
            "Malestar general",
            "Dolor inespecífico",
            "Consulta administrativa",
        ],
    }
}
