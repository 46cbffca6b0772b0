//! Credential list management and the audit fold.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AiConfig, AiProvider, AiToken, AiTokenEvent};

const UNKNOWN_ERROR: &str = "Error desconocido";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenStoreError {
    #[error("El token está vacío")]
    Empty,

    #[error("El token ya existe para {0}")]
    Duplicate(AiProvider),

    #[error("Token no encontrado: {0}")]
    NotFound(String),
}

/// Usable tokens for `provider`, in list order.
pub fn provider_tokens(config: &AiConfig, provider: AiProvider) -> Vec<&AiToken> {
    config
        .tokens
        .iter()
        .filter(|t| t.provider == provider && !t.value.trim().is_empty())
        .collect()
}

pub fn has_provider_tokens(config: &AiConfig, provider: AiProvider) -> bool {
    config
        .tokens
        .iter()
        .any(|t| t.provider == provider && !t.value.trim().is_empty())
}

/// Last four characters of a credential.
pub fn token_suffix(value: &str) -> String {
    let count = value.chars().count();
    value.chars().skip(count.saturating_sub(4)).collect()
}

pub fn mask_token(value: &str) -> String {
    format!("••••{}", token_suffix(value))
}

/// Append a new credential. Returns the stored token.
pub fn add_token(
    config: &mut AiConfig,
    provider: AiProvider,
    value: &str,
    now: DateTime<Utc>,
) -> Result<AiToken, TokenStoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TokenStoreError::Empty);
    }
    if config
        .tokens
        .iter()
        .any(|t| t.provider == provider && t.value == value)
    {
        return Err(TokenStoreError::Duplicate(provider));
    }

    let token = AiToken {
        id: Uuid::new_v4().to_string(),
        provider,
        value: value.to_string(),
        created_at: now,
        last_used_at: None,
        last_error_at: None,
        last_error: None,
    };
    config.tokens.push(token.clone());
    Ok(token)
}

pub fn remove_token(config: &mut AiConfig, id: &str) -> Result<AiToken, TokenStoreError> {
    let index = config
        .tokens
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| TokenStoreError::NotFound(id.to_string()))?;
    Ok(config.tokens.remove(index))
}

/// Fold an attempt trail into the tokens' audit fields.
///
/// Events are matched by token id and provider; unmatched events are
/// ignored. Returns whether any token changed.
pub fn record_token_events(tokens: &mut [AiToken], events: &[AiTokenEvent]) -> bool {
    let mut changed = false;
    for event in events {
        let Some(token) = tokens
            .iter_mut()
            .find(|t| t.id == event.token_id && t.provider == event.provider)
        else {
            continue;
        };
        if let Some(used_at) = event.used_at {
            token.last_used_at = Some(used_at);
            changed = true;
        }
        if let Some(error_at) = event.error_at {
            token.last_error_at = Some(error_at);
            token.last_error = Some(
                event
                    .error_message
                    .clone()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            );
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(values: &[(AiProvider, &str)]) -> AiConfig {
        let mut config = AiConfig::default();
        for (provider, value) in values {
            add_token(&mut config, *provider, value, Utc::now()).unwrap();
        }
        config
    }

    #[test]
    fn suffix_and_mask() {
        assert_eq!(token_suffix("sk-abcdef1234"), "1234");
        assert_eq!(token_suffix("ab"), "ab");
        assert_eq!(mask_token("AIzaXYZ9"), "••••XYZ9");
        assert_eq!(mask_token(""), "••••");
    }

    #[test]
    fn add_rejects_empty_and_duplicates() {
        let mut config = config_with(&[(AiProvider::Gemini, "key-1")]);
        assert_eq!(
            add_token(&mut config, AiProvider::Gemini, "   ", Utc::now()),
            Err(TokenStoreError::Empty)
        );
        assert_eq!(
            add_token(&mut config, AiProvider::Gemini, " key-1 ", Utc::now()),
            Err(TokenStoreError::Duplicate(AiProvider::Gemini))
        );
        // Same value under another provider is a different credential.
        assert!(add_token(&mut config, AiProvider::OpenAi, "key-1", Utc::now()).is_ok());
        assert_eq!(config.tokens.len(), 2);
    }

    #[test]
    fn provider_filter_keeps_order() {
        let config = config_with(&[
            (AiProvider::Gemini, "g1"),
            (AiProvider::OpenAi, "o1"),
            (AiProvider::Gemini, "g2"),
        ]);
        let values: Vec<&str> = provider_tokens(&config, AiProvider::Gemini)
            .iter()
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(values, vec!["g1", "g2"]);
        assert!(has_provider_tokens(&config, AiProvider::OpenAi));
        assert!(!has_provider_tokens(&AiConfig::default(), AiProvider::Gemini));
    }

    #[test]
    fn remove_by_id() {
        let mut config = config_with(&[(AiProvider::Gemini, "g1")]);
        let id = config.tokens[0].id.clone();
        assert!(remove_token(&mut config, &id).is_ok());
        assert!(config.tokens.is_empty());
        assert!(matches!(
            remove_token(&mut config, &id),
            Err(TokenStoreError::NotFound(_))
        ));
    }

    #[test]
    fn fold_updates_audit_fields() {
        let mut config = config_with(&[(AiProvider::Gemini, "g1"), (AiProvider::Gemini, "g2")]);
        let now = Utc::now();
        let events = vec![
            AiTokenEvent::failure(&config.tokens[0], now, "Gemini error 429".into(), Some(429)),
            AiTokenEvent::success(&config.tokens[1], now),
        ];
        assert!(record_token_events(&mut config.tokens, &events));
        assert_eq!(config.tokens[0].last_error.as_deref(), Some("Gemini error 429"));
        assert_eq!(config.tokens[0].last_error_at, Some(now));
        assert_eq!(config.tokens[1].last_used_at, Some(now));
        assert!(config.tokens[1].last_error.is_none());
    }

    #[test]
    fn fold_ignores_unknown_tokens_and_defaults_message() {
        let mut config = config_with(&[(AiProvider::Gemini, "g1")]);
        let mut stray = AiTokenEvent::success(&config.tokens[0], Utc::now());
        stray.provider = AiProvider::OpenAi;
        assert!(!record_token_events(&mut config.tokens, &[stray]));

        let mut blank = AiTokenEvent::failure(&config.tokens[0], Utc::now(), " ".into(), None);
        blank.error_message = None;
        assert!(record_token_events(&mut config.tokens, &[blank]));
        assert_eq!(config.tokens[0].last_error.as_deref(), Some(UNKNOWN_ERROR));
    }
}
