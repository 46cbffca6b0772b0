//! Age-banded vital-sign thresholds.
//!
//! Each reading is classified against its band's table from the outside in:
//! critical, then urgent, then warning. Bounds are inclusive, so a reading
//! sitting exactly on `critical_low` is critical.

use serde::{Deserialize, Serialize};

use crate::models::VitalSigns;

/// Age band used to pick a threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    /// [0, 1) years
    Infant,
    /// [1, 5) years
    Preschool,
    /// [5, 13) years
    SchoolAge,
    /// [13, 14) years
    Adolescent,
    /// 14 years and older
    Adult,
}

impl AgeBand {
    pub fn from_age(age_years: f64) -> Self {
        if age_years < 1.0 {
            AgeBand::Infant
        } else if age_years < 5.0 {
            AgeBand::Preschool
        } else if age_years < 13.0 {
            AgeBand::SchoolAge
        } else if age_years < 14.0 {
            AgeBand::Adolescent
        } else {
            AgeBand::Adult
        }
    }

    /// Label used in the generated narrative.
    pub fn label(self) -> &'static str {
        match self {
            AgeBand::Infant => "lactante",
            AgeBand::Preschool => "preescolar",
            AgeBand::SchoolAge => "escolar",
            AgeBand::Adolescent => "adolescente",
            AgeBand::Adult => "adulto",
        }
    }

    pub fn thresholds(self) -> &'static VitalThresholds {
        match self {
            AgeBand::Infant => &INFANT,
            AgeBand::Preschool => &PRESCHOOL,
            AgeBand::SchoolAge => &SCHOOL_AGE,
            // Adolescents share the adult table.
            AgeBand::Adolescent | AgeBand::Adult => &ADULT,
        }
    }
}

/// Severity of a single reading or of a whole evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical = 1,
    Urgent = 2,
    Warning = 3,
    Normal = 5,
}

impl Severity {
    pub fn level(self) -> u8 {
        self as u8
    }
}

/// Bounds for one parameter. `None` means no limit on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Threshold {
    pub critical_low: Option<f64>,
    pub urgent_low: Option<f64>,
    pub warning_low: Option<f64>,
    pub warning_high: Option<f64>,
    pub urgent_high: Option<f64>,
    pub critical_high: Option<f64>,
}

impl Threshold {
    const fn full(cl: f64, ul: f64, wl: f64, wh: f64, uh: f64, ch: f64) -> Self {
        Self {
            critical_low: Some(cl),
            urgent_low: Some(ul),
            warning_low: Some(wl),
            warning_high: Some(wh),
            urgent_high: Some(uh),
            critical_high: Some(ch),
        }
    }

    const fn low_only(cl: f64, ul: f64, wl: f64) -> Self {
        Self {
            critical_low: Some(cl),
            urgent_low: Some(ul),
            warning_low: Some(wl),
            warning_high: None,
            urgent_high: None,
            critical_high: None,
        }
    }

    /// Classify one reading. Returns `None` for a normal value.
    pub fn classify(&self, value: f64) -> Option<(Severity, Direction)> {
        let at_or_below = |bound: Option<f64>| bound.is_some_and(|b| value <= b);
        let at_or_above = |bound: Option<f64>| bound.is_some_and(|b| value >= b);

        if at_or_below(self.critical_low) {
            Some((Severity::Critical, Direction::Low))
        } else if at_or_above(self.critical_high) {
            Some((Severity::Critical, Direction::High))
        } else if at_or_below(self.urgent_low) {
            Some((Severity::Urgent, Direction::Low))
        } else if at_or_above(self.urgent_high) {
            Some((Severity::Urgent, Direction::High))
        } else if at_or_below(self.warning_low) {
            Some((Severity::Warning, Direction::Low))
        } else if at_or_above(self.warning_high) {
            Some((Severity::Warning, Direction::High))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Low,
    High,
}

/// Threshold table for one age band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalThresholds {
    pub hr: Threshold,
    pub rr: Threshold,
    pub sbp: Threshold,
    pub spo2: Threshold,
    pub temp: Threshold,
    pub gcs: Threshold,
}

const SPO2: Threshold = Threshold::low_only(90.0, 92.0, 94.0);
const TEMP: Threshold = Threshold::full(34.0, 35.0, 36.0, 38.5, 40.0, 41.0);
const GCS: Threshold = Threshold::low_only(8.0, 12.0, 14.0);

static ADULT: VitalThresholds = VitalThresholds {
    hr: Threshold::full(40.0, 50.0, 60.0, 110.0, 130.0, 150.0),
    rr: Threshold::full(8.0, 10.0, 12.0, 24.0, 30.0, 35.0),
    sbp: Threshold::full(80.0, 90.0, 100.0, 160.0, 180.0, 200.0),
    spo2: SPO2,
    temp: TEMP,
    gcs: GCS,
};

static INFANT: VitalThresholds = VitalThresholds {
    hr: Threshold::full(80.0, 90.0, 100.0, 160.0, 180.0, 200.0),
    rr: Threshold::full(20.0, 25.0, 30.0, 50.0, 60.0, 70.0),
    sbp: Threshold::full(60.0, 70.0, 80.0, 120.0, 130.0, 140.0),
    spo2: SPO2,
    temp: TEMP,
    gcs: GCS,
};

static PRESCHOOL: VitalThresholds = VitalThresholds {
    hr: Threshold::full(70.0, 80.0, 90.0, 140.0, 160.0, 180.0),
    rr: Threshold::full(20.0, 22.0, 24.0, 40.0, 50.0, 60.0),
    sbp: Threshold::full(70.0, 80.0, 90.0, 120.0, 130.0, 140.0),
    spo2: SPO2,
    temp: TEMP,
    gcs: GCS,
};

static SCHOOL_AGE: VitalThresholds = VitalThresholds {
    hr: Threshold::full(60.0, 70.0, 80.0, 120.0, 140.0, 160.0),
    rr: Threshold::full(12.0, 14.0, 18.0, 30.0, 35.0, 45.0),
    sbp: Threshold::full(70.0, 80.0, 90.0, 130.0, 140.0, 160.0),
    spo2: SPO2,
    temp: TEMP,
    gcs: GCS,
};

/// Result of evaluating a full set of vitals.
#[derive(Debug, Clone, PartialEq)]
pub struct VitalsEvaluation {
    /// Worst severity across all parameters.
    pub severity: Severity,
    /// One human-readable flag per abnormal parameter.
    pub flags: Vec<String>,
}

fn flag_text(label: &str, severity: Severity, direction: Direction) -> String {
    let qualifier = match (severity, direction) {
        (Severity::Critical, Direction::Low) => "críticamente baja",
        (Severity::Critical, Direction::High) => "críticamente alta",
        (Severity::Urgent, Direction::Low) => "muy baja",
        (Severity::Urgent, Direction::High) => "muy alta",
        (_, Direction::Low) => "baja",
        (_, Direction::High) => "alta",
    };
    format!("{label} {qualifier}")
}

/// Evaluate vitals for a patient of the given age.
///
/// `gcs` is read from `vitals.gcs`; callers resolve it beforehand. Absent or
/// NaN readings are skipped.
pub fn evaluate_vitals(vitals: &VitalSigns, age_years: f64) -> VitalsEvaluation {
    let table = AgeBand::from_age(age_years).thresholds();
    let checks: [(Option<f64>, &Threshold, &str); 6] = [
        (vitals.hr, &table.hr, "Frecuencia cardiaca"),
        (vitals.rr, &table.rr, "Frecuencia respiratoria"),
        (vitals.sbp, &table.sbp, "Tensión sistólica"),
        (vitals.spo2, &table.spo2, "SatO2"),
        (vitals.temp, &table.temp, "Temperatura"),
        (vitals.gcs, &table.gcs, "GCS"),
    ];

    let mut severity = Severity::Normal;
    let mut flags = Vec::new();

    for (value, threshold, label) in checks {
        let Some(value) = value.filter(|v| !v.is_nan()) else {
            continue;
        };
        if let Some((found, direction)) = threshold.classify(value) {
            flags.push(flag_text(label, found, direction));
            severity = severity.min(found);
        }
    }

    VitalsEvaluation { severity, flags }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adult_vitals() -> VitalSigns {
        VitalSigns {
            hr: Some(80.0),
            rr: Some(16.0),
            sbp: Some(120.0),
            dbp: Some(75.0),
            spo2: Some(98.0),
            temp: Some(36.8),
            glucose: None,
            gcs: Some(15.0),
        }
    }

    #[test]
    fn all_absent_is_normal() {
        let eval = evaluate_vitals(&VitalSigns::default(), 40.0);
        assert_eq!(eval.severity, Severity::Normal);
        assert!(eval.flags.is_empty());
    }

    #[test]
    fn nan_readings_are_skipped() {
        let vitals = VitalSigns {
            hr: Some(f64::NAN),
            spo2: Some(f64::NAN),
            ..VitalSigns::default()
        };
        let eval = evaluate_vitals(&vitals, 40.0);
        assert_eq!(eval.severity, Severity::Normal);
        assert!(eval.flags.is_empty());
    }

    #[test]
    fn normal_adult_has_no_flags() {
        let eval = evaluate_vitals(&adult_vitals(), 40.0);
        assert_eq!(eval.severity, Severity::Normal);
        assert!(eval.flags.is_empty());
    }

    #[test]
    fn critical_bounds_are_inclusive_for_every_band() {
        for age in [0.5, 3.0, 8.0, 13.5, 50.0] {
            let table = AgeBand::from_age(age).thresholds();
            let low = VitalSigns {
                hr: table.hr.critical_low,
                ..VitalSigns::default()
            };
            assert_eq!(evaluate_vitals(&low, age).severity, Severity::Critical, "age {age}");
            let high = VitalSigns {
                hr: table.hr.critical_high,
                ..VitalSigns::default()
            };
            assert_eq!(evaluate_vitals(&high, age).severity, Severity::Critical, "age {age}");
        }
    }

    #[test]
    fn worst_severity_wins_and_flags_keep_parameter_order() {
        let vitals = VitalSigns {
            hr: Some(115.0),  // warning high
            spo2: Some(89.0), // critical low
            temp: Some(39.0), // warning high
            ..VitalSigns::default()
        };
        let eval = evaluate_vitals(&vitals, 40.0);
        assert_eq!(eval.severity, Severity::Critical);
        assert_eq!(
            eval.flags,
            vec![
                "Frecuencia cardiaca alta",
                "SatO2 críticamente baja",
                "Temperatura alta",
            ]
        );
    }

    #[test]
    fn spo2_has_no_upper_limit() {
        let vitals = VitalSigns {
            spo2: Some(100.0),
            ..VitalSigns::default()
        };
        assert_eq!(evaluate_vitals(&vitals, 30.0).severity, Severity::Normal);
    }

    #[test]
    fn preschool_tachycardia_is_urgent() {
        let vitals = VitalSigns {
            hr: Some(170.0),
            ..VitalSigns::default()
        };
        let eval = evaluate_vitals(&vitals, 3.0);
        assert_eq!(eval.severity, Severity::Urgent);
        assert_eq!(eval.flags, vec!["Frecuencia cardiaca muy alta"]);
        // Same reading in an adult is critical.
        assert_eq!(evaluate_vitals(&vitals, 30.0).severity, Severity::Critical);
    }

    #[test]
    fn low_gcs_is_critical() {
        let vitals = VitalSigns {
            gcs: Some(7.0),
            ..VitalSigns::default()
        };
        let eval = evaluate_vitals(&vitals, 60.0);
        assert_eq!(eval.severity, Severity::Critical);
        assert_eq!(eval.flags, vec!["GCS críticamente baja"]);
    }

    #[test]
    fn age_band_boundaries() {
        assert_eq!(AgeBand::from_age(0.0), AgeBand::Infant);
        assert_eq!(AgeBand::from_age(1.0), AgeBand::Preschool);
        assert_eq!(AgeBand::from_age(5.0), AgeBand::SchoolAge);
        assert_eq!(AgeBand::from_age(13.0), AgeBand::Adolescent);
        assert_eq!(AgeBand::from_age(14.0), AgeBand::Adult);
    }
}
