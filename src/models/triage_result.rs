use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ai::AiEnrichment;
use super::ModelError;

/// SET-style priority, 1 (resuscitation) to 5 (non-urgent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const RESUSCITATION: Priority = Priority(1);
    pub const EMERGENCY: Priority = Priority(2);
    pub const URGENT: Priority = Priority(3);
    pub const PRIORITY: Priority = Priority(4);
    pub const NON_URGENT: Priority = Priority(5);

    /// All levels, most critical first.
    pub const ALL: [Priority; 5] = [
        Priority::RESUSCITATION,
        Priority::EMERGENCY,
        Priority::URGENT,
        Priority::PRIORITY,
        Priority::NON_URGENT,
    ];

    pub fn new(level: u8) -> Option<Self> {
        (1..=5).contains(&level).then_some(Priority(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Priority {
    type Error = ModelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Priority::new)
            .ok_or(ModelError::InvalidPriority(value))
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a triage evaluation.
///
/// Produced by the rule engine; afterwards only the AI merge fields and
/// `triage_at` change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    pub priority: Priority,
    /// First rationale that triggered the winning priority.
    pub reason: String,
    pub red_flags_present: Vec<String>,
    pub red_flags_absent: Vec<String>,
    pub actions: Vec<String>,
    pub missing_data: Vec<String>,
    pub evolutivo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiEnrichment>,
    #[serde(default)]
    pub priority_modified_by_ai: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deterministic_priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deterministic_reason: Option<String>,
    /// Set once when the result is first stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triage_at: Option<DateTime<Utc>>,
}
