//! Upgrade of stored AI settings to the current shape.
//!
//! Accepts every shape written so far: camelCase or snake_case keys, a
//! single legacy `apiKey`, tokens without ids or dates, retired model ids.
//! Total over any JSON value and deterministic for a given `now`.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::config;
use crate::models::{AiConfig, AiProvider, AiToken};
use crate::triage::ordered_set::OrderedSet;

fn field<'a>(raw: &'a Value, camel: &str, snake: &str) -> Option<&'a Value> {
    raw.get(camel).or_else(|| raw.get(snake))
}

fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn date(value: Option<&Value>) -> Option<DateTime<Utc>> {
    text(value)
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|d| d.with_timezone(&Utc))
}

fn provider(value: Option<&Value>) -> Option<AiProvider> {
    value.and_then(Value::as_str).and_then(|s| s.parse().ok())
}

/// Stable id for a token stored without one.
pub fn derived_token_id(provider: AiProvider, value: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("{provider}:{value}").as_bytes()).to_string()
}

fn sanitize_token(raw: &Value, fallback: AiProvider, now: DateTime<Utc>) -> Option<AiToken> {
    let value = text(raw.get("value"))?;
    let provider = provider(raw.get("provider")).unwrap_or(fallback);
    Some(AiToken {
        id: text(raw.get("id")).unwrap_or_else(|| derived_token_id(provider, &value)),
        provider,
        created_at: date(field(raw, "createdAt", "created_at")).unwrap_or(now),
        last_used_at: date(field(raw, "lastUsedAt", "last_used_at")),
        last_error_at: date(field(raw, "lastErrorAt", "last_error_at")),
        last_error: text(field(raw, "lastError", "last_error")),
        value,
    })
}

pub fn upgrade_ai_config(raw: &Value, now: DateTime<Utc>) -> AiConfig {
    let provider = match raw.get("provider").and_then(Value::as_str) {
        Some("openai") => AiProvider::OpenAi,
        _ => AiProvider::Gemini,
    };

    let mut model =
        text(raw.get("model")).unwrap_or_else(|| config::DEFAULT_GEMINI_MODEL.to_string());
    if provider == AiProvider::Gemini && model == config::LEGACY_GEMINI_MODEL {
        model = config::DEFAULT_GEMINI_MODEL.to_string();
    }

    let mut seen = OrderedSet::new();
    let mut tokens = Vec::new();
    let mut push_unique = |token: AiToken| {
        if seen.insert(format!("{}:{}", token.provider, token.value)) {
            tokens.push(token);
        }
    };

    if let Some(list) = raw.get("tokens").and_then(Value::as_array) {
        for entry in list {
            if let Some(token) = sanitize_token(entry, provider, now) {
                push_unique(token);
            }
        }
    }

    if let Some(legacy) = text(field(raw, "apiKey", "api_key")) {
        push_unique(AiToken {
            id: derived_token_id(provider, &legacy),
            provider,
            value: legacy,
            created_at: now,
            last_used_at: None,
            last_error_at: None,
            last_error: None,
        });
    }

    AiConfig {
        enabled: raw.get("enabled").and_then(Value::as_bool).unwrap_or(false),
        provider,
        model,
        tokens,
    }
}
