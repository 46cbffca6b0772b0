//! Rule-based triage: vitals, red flags, priority, actions and narrative.

pub mod actions;
pub mod catalog;
pub mod engine;
pub mod glasgow;
pub mod merge;
pub mod ordered_set;
pub mod priority;
pub mod vitals;

pub use actions::build_actions;
pub use engine::{build_readable_evolutivo, compute_missing_data, compute_triage, compute_triage_at};
pub use glasgow::{resolve_glasgow_score, GlasgowSeverity};
pub use merge::{apply_ai_priority, apply_ai_triage};
pub use priority::{priority_info, remaining_attention, PriorityInfo, RemainingAttention};
pub use vitals::{evaluate_vitals, AgeBand, Severity, VitalsEvaluation};
