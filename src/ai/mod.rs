//! AI enrichment: provider adapters, token rotation and response parsing.

pub mod fallback;
pub mod gemini;
pub mod openai;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod service;
pub mod tokens;

pub use fallback::{execute_with_token_fallback, TokenFallbackError};
pub use parser::{parse_ai_priority, parse_ai_response, ParseError};
pub use provider::{AiProviderPort, ProviderRegistry};
pub use service::AiTriageService;

use thiserror::Error;

use crate::models::AiTokenEvent;

/// Errors returned by a single provider call.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Falta el token de {0}")]
    MissingCredential(String),

    /// Non-2xx answer. The message always reads "<Provider> error <status>".
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Error de red: {0}")]
    Transport(String),

    #[error("Respuesta vacía de {0}")]
    EmptyResponse(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ProviderError {
    pub fn http(provider: &str, status: u16) -> Self {
        ProviderError::Http {
            status,
            message: format!("{provider} error {status}"),
        }
    }

    /// Explicit HTTP status, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from the service entry points.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Proveedor de IA no soportado: {0}")]
    UnsupportedProvider(String),

    #[error(transparent)]
    Fallback(#[from] TokenFallbackError),
}

impl AiError {
    /// Attempt trail to fold back into the token store.
    pub fn token_events(&self) -> &[AiTokenEvent] {
        match self {
            AiError::UnsupportedProvider(_) => &[],
            AiError::Fallback(e) => &e.events,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            AiError::UnsupportedProvider(_) => None,
            AiError::Fallback(e) => e.status_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message_encodes_status() {
        let err = ProviderError::http("Gemini", 429);
        assert_eq!(err.to_string(), "Gemini error 429");
        assert_eq!(err.status(), Some(429));
        assert_eq!(ProviderError::Transport("reset".into()).status(), None);
    }

    #[test]
    fn unsupported_provider_has_no_events() {
        let err = AiError::UnsupportedProvider("claude".into());
        assert!(err.token_events().is_empty());
        assert!(err.to_string().contains("no soportado"));
    }
}
