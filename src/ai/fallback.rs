//! Sequential token rotation around a single provider call.
//!
//! Tokens for the configured provider are tried in list order, one request
//! in flight at a time. Only a 429 moves on to the next token; every other
//! failure aborts the run. The full attempt trail is returned either way so
//! the caller can fold it into the token store.

use std::future::Future;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use thiserror::Error;

use super::tokens::{provider_tokens, token_suffix};
use super::ProviderError;
use crate::models::{ActiveAiConfig, AiConfig, AiTokenEvent, TokenTagged};

const RATE_LIMITED: u16 = 429;
const MAX_EVENT_MESSAGE_CHARS: usize = 220;
const UNKNOWN_CALL_ERROR: &str = "Error desconocido en llamada IA.";
const EXHAUSTED: &str = "No se pudo obtener respuesta IA con los tokens configurados.";

static STATUS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)error\s+(\d{3})").expect("static status pattern"));

/// A failed orchestration run with its attempt trail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TokenFallbackError {
    pub message: String,
    pub events: Vec<AiTokenEvent>,
    pub status_code: Option<u16>,
}

/// Status of a failed call: the explicit one, else an `error NNN` in the text.
fn resolve_status_code(error: &ProviderError) -> Option<u16> {
    error.status().or_else(|| {
        STATUS_PATTERN
            .captures(&error.to_string())
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    })
}

fn resolve_error_message(error: &ProviderError) -> String {
    let message = error.to_string();
    let message = message.trim();
    if message.is_empty() {
        UNKNOWN_CALL_ERROR.to_string()
    } else {
        message.chars().take(MAX_EVENT_MESSAGE_CHARS).collect()
    }
}

/// Run `operation` with each token of `config.provider` until one succeeds.
pub async fn execute_with_token_fallback<T, F, Fut>(
    config: &AiConfig,
    mut operation: F,
) -> Result<TokenTagged<T>, TokenFallbackError>
where
    F: FnMut(ActiveAiConfig) -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let tokens = provider_tokens(config, config.provider);
    if tokens.is_empty() {
        return Err(TokenFallbackError {
            message: format!("No hay tokens configurados para {}.", config.provider),
            events: Vec::new(),
            status_code: None,
        });
    }

    let mut events = Vec::with_capacity(tokens.len());
    let last = tokens.len() - 1;

    for (index, token) in tokens.into_iter().enumerate() {
        let active = ActiveAiConfig {
            provider: config.provider,
            model: config.model.clone(),
            api_key: token.value.clone(),
        };
        let suffix = token_suffix(&token.value);

        match operation(active).await {
            Ok(payload) => {
                events.push(AiTokenEvent::success(token, Utc::now()));
                tracing::info!(
                    provider = %config.provider,
                    token = %suffix,
                    attempts = events.len(),
                    "AI call succeeded"
                );
                return Ok(TokenTagged {
                    payload,
                    token_id: token.id.clone(),
                    token_suffix: suffix,
                    token_events: events,
                });
            }
            Err(err) => {
                let status_code = resolve_status_code(&err);
                let message = resolve_error_message(&err);
                events.push(AiTokenEvent::failure(
                    token,
                    Utc::now(),
                    message.clone(),
                    status_code,
                ));

                if status_code == Some(RATE_LIMITED) && index < last {
                    tracing::warn!(
                        provider = %config.provider,
                        token = %suffix,
                        "Rate limited, rotating to next token"
                    );
                    continue;
                }

                tracing::error!(
                    provider = %config.provider,
                    token = %suffix,
                    status = ?status_code,
                    error = %message,
                    "AI call aborted"
                );
                return Err(TokenFallbackError {
                    message,
                    events,
                    status_code,
                });
            }
        }
    }

    // Not reached: the last attempt always returns.
    Err(TokenFallbackError {
        message: EXHAUSTED.to_string(),
        events,
        status_code: None,
    })
}
