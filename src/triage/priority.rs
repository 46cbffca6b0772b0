//! Priority metadata and remaining attention time.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Priority;

/// Display metadata for one priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriorityInfo {
    pub level: Priority,
    pub label: &'static str,
    pub wait_label: &'static str,
    pub max_wait_minutes: i64,
}

pub fn priority_info(priority: Priority) -> PriorityInfo {
    let (label, wait_label, max_wait_minutes) = match priority.level() {
        1 => ("Reanimación", "Atención inmediata", 0),
        2 => ("Emergencia", "10-15 minutos", 15),
        3 => ("Urgencia", "60 minutos", 60),
        4 => ("Prioritario", "2 horas", 120),
        _ => ("No urgente", "4 horas", 240),
    };
    PriorityInfo {
        level: priority,
        label,
        wait_label,
        max_wait_minutes,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionStatus {
    Immediate,
    Unknown,
    Overdue,
    Warning,
    Ok,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemainingAttention {
    pub status: AttentionStatus,
    pub label: String,
}

/// Minutes left before the priority's maximum wait runs out.
///
/// Elapsed time is floored to whole minutes. Within 15 minutes of the limit
/// the status is `Warning`.
pub fn remaining_attention(
    priority: Priority,
    triage_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> RemainingAttention {
    if priority == Priority::RESUSCITATION {
        return RemainingAttention {
            status: AttentionStatus::Immediate,
            label: "Atención inmediata".into(),
        };
    }
    let Some(triage_at) = triage_at else {
        return RemainingAttention {
            status: AttentionStatus::Unknown,
            label: "No disponible (sin hora de triaje)".into(),
        };
    };

    let elapsed = (now - triage_at).num_seconds().div_euclid(60);
    let remaining = priority_info(priority).max_wait_minutes - elapsed;

    if remaining < 0 {
        RemainingAttention {
            status: AttentionStatus::Overdue,
            label: format!("Superado hace {}", format_duration(remaining.abs())),
        }
    } else {
        let status = if remaining <= 15 {
            AttentionStatus::Warning
        } else {
            AttentionStatus::Ok
        };
        RemainingAttention {
            status,
            label: format!("Restan {}", format_duration(remaining)),
        }
    }
}

/// "0 min", "45 min", "2 h", "1 h 5 min".
pub fn format_duration(minutes: i64) -> String {
    if minutes <= 0 {
        return "0 min".into();
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} h"),
        (h, m) => format!("{h} h {m} min"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, h, m, 0).unwrap()
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0), "0 min");
        assert_eq!(format_duration(-3), "0 min");
        assert_eq!(format_duration(45), "45 min");
        assert_eq!(format_duration(120), "2 h");
        assert_eq!(format_duration(65), "1 h 5 min");
    }

    #[test]
    fn resuscitation_is_always_immediate() {
        let r = remaining_attention(Priority::RESUSCITATION, None, at(10, 0));
        assert_eq!(r.status, AttentionStatus::Immediate);
    }

    #[test]
    fn missing_triage_time_is_unknown() {
        let r = remaining_attention(Priority::URGENT, None, at(10, 0));
        assert_eq!(r.status, AttentionStatus::Unknown);
        assert_eq!(r.label, "No disponible (sin hora de triaje)");
    }

    #[test]
    fn countdown_states() {
        let triaged = at(10, 0);
        let ok = remaining_attention(Priority::URGENT, Some(triaged), at(10, 20));
        assert_eq!(ok.status, AttentionStatus::Ok);
        assert_eq!(ok.label, "Restan 40 min");

        let warn = remaining_attention(Priority::URGENT, Some(triaged), at(10, 50));
        assert_eq!(warn.status, AttentionStatus::Warning);

        let late = remaining_attention(
            Priority::EMERGENCY,
            Some(triaged),
            triaged + Duration::minutes(90) + Duration::seconds(30),
        );
        assert_eq!(late.status, AttentionStatus::Overdue);
        assert_eq!(late.label, "Superado hace 1 h 15 min");
    }

    #[test]
    fn info_table() {
        assert_eq!(priority_info(Priority::NON_URGENT).max_wait_minutes, 240);
        assert_eq!(priority_info(Priority::EMERGENCY).label, "Emergencia");
    }
}
