use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::AiProvider;
use super::triage_result::Priority;
use crate::config;

// ──────────────────────────────────────────────
// Configuration & credentials
// ──────────────────────────────────────────────

/// Process-wide AI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    pub enabled: bool,
    pub provider: AiProvider,
    pub model: String,
    pub tokens: Vec<AiToken>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: AiProvider::Gemini,
            model: config::DEFAULT_GEMINI_MODEL.to_string(),
            tokens: Vec::new(),
        }
    }
}

/// One API credential plus its usage audit.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AiToken {
    pub id: String,
    pub provider: AiProvider,
    pub value: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

// Secret never reaches logs.
impl std::fmt::Debug for AiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiToken")
            .field("id", &self.id)
            .field("provider", &self.provider)
            .field("value", &crate::ai::tokens::mask_token(&self.value))
            .field("created_at", &self.created_at)
            .field("last_used_at", &self.last_used_at)
            .field("last_error_at", &self.last_error_at)
            .field("last_error", &self.last_error)
            .finish()
    }
}

/// Provider settings with a single credential substituted in, as handed to
/// an adapter for one call.
#[derive(Clone)]
pub struct ActiveAiConfig {
    pub provider: AiProvider,
    pub model: String,
    pub api_key: String,
}

impl std::fmt::Debug for ActiveAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveAiConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &crate::ai::tokens::mask_token(&self.api_key))
            .finish()
    }
}

/// One token-use attempt inside an orchestration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiTokenEvent {
    pub token_id: String,
    pub provider: AiProvider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl AiTokenEvent {
    pub fn success(token: &AiToken, at: DateTime<Utc>) -> Self {
        Self {
            token_id: token.id.clone(),
            provider: token.provider,
            used_at: Some(at),
            error_at: None,
            error_message: None,
            status_code: None,
        }
    }

    pub fn failure(
        token: &AiToken,
        at: DateTime<Utc>,
        message: String,
        status_code: Option<u16>,
    ) -> Self {
        Self {
            token_id: token.id.clone(),
            provider: token.provider,
            used_at: None,
            error_at: Some(at),
            error_message: Some(message),
            status_code,
        }
    }

    pub fn is_success(&self) -> bool {
        self.used_at.is_some()
    }
}

// ──────────────────────────────────────────────
// Model output
// ──────────────────────────────────────────────

/// Structured triage document returned by the model.
///
/// Field names on the wire are the Spanish keys requested in the prompt.
/// Every field is required; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiTriageJson {
    #[serde(rename = "resumen_clinico")]
    pub clinical_summary: String,
    #[serde(rename = "sospecha_clinica")]
    pub suspected_conditions: Vec<String>,
    #[serde(rename = "prioridad_sugerida")]
    pub suggested_priority: Priority,
    #[serde(rename = "motivo_prioridad")]
    pub priority_reason: String,
    #[serde(rename = "red_flags_presentes")]
    pub red_flags_present: Vec<String>,
    #[serde(rename = "red_flags_ausentes")]
    pub red_flags_absent: Vec<String>,
    #[serde(rename = "actuaciones_enfermeras")]
    pub nursing_actions: Vec<String>,
    #[serde(rename = "actuaciones_priorizadas")]
    pub prioritized_actions: Vec<String>,
    #[serde(rename = "objetivos_monitorizacion")]
    pub monitoring_objectives: Vec<String>,
    #[serde(rename = "criterios_escalada")]
    pub escalation_criteria: Vec<String>,
    #[serde(rename = "preguntas_clave")]
    pub key_questions: Vec<String>,
    #[serde(rename = "datos_faltantes")]
    pub missing_data: Vec<String>,
    #[serde(rename = "evolutivo_triaje")]
    pub evolving_note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiTriageResponse {
    pub json: AiTriageJson,
    pub raw_text: String,
}

/// Reduced output for priority-only calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiPriorityJson {
    #[serde(rename = "prioridad_sugerida")]
    pub suggested_priority: Priority,
    #[serde(rename = "motivo_prioridad")]
    pub priority_reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiPriorityResponse {
    pub json: AiPriorityJson,
    pub raw_text: String,
}

/// Provider payload plus the credential that produced it and the full
/// attempt trail.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenTagged<T> {
    pub payload: T,
    pub token_id: String,
    /// Last four characters of the credential.
    pub token_suffix: String,
    pub token_events: Vec<AiTokenEvent>,
}

/// AI payload attached to a stored triage result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiEnrichment {
    pub provider: AiProvider,
    pub model: String,
    pub generated_at: DateTime<Utc>,
    pub token_id: String,
    pub token_suffix: String,
    pub suggested_priority: Priority,
    pub priority_reason: String,
    /// Full document; absent for priority-only calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<AiTriageJson>,
    pub raw_text: String,
}

impl AiEnrichment {
    pub fn from_triage(
        config: &AiConfig,
        tagged: TokenTagged<AiTriageResponse>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let TokenTagged {
            payload,
            token_id,
            token_suffix,
            ..
        } = tagged;
        Self {
            provider: config.provider,
            model: config.model.clone(),
            generated_at,
            token_id,
            token_suffix,
            suggested_priority: payload.json.suggested_priority,
            priority_reason: payload.json.priority_reason.clone(),
            json: Some(payload.json),
            raw_text: payload.raw_text,
        }
    }

    pub fn from_priority(
        config: &AiConfig,
        tagged: TokenTagged<AiPriorityResponse>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let TokenTagged {
            payload,
            token_id,
            token_suffix,
            ..
        } = tagged;
        Self {
            provider: config.provider,
            model: config.model.clone(),
            generated_at,
            token_id,
            token_suffix,
            suggested_priority: payload.json.suggested_priority,
            priority_reason: payload.json.priority_reason,
            json: None,
            raw_text: payload.raw_text,
        }
    }
}
