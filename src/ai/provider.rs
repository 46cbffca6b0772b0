//! Provider port and the registry of available adapters.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::gemini::GeminiAdapter;
use super::openai::OpenAiAdapter;
use super::ProviderError;
use crate::config;
use crate::models::{
    ActiveAiConfig, AiPriorityResponse, AiProvider, AiTriageResponse, Patient, TriageAssessment,
};

/// One LLM backend. Each call issues a single HTTP request with the
/// credential in `config`.
#[async_trait]
pub trait AiProviderPort: Send + Sync {
    async fn generate(
        &self,
        assessment: &TriageAssessment,
        patient: &Patient,
        config: &ActiveAiConfig,
    ) -> Result<AiTriageResponse, ProviderError>;

    async fn generate_priority(
        &self,
        assessment: &TriageAssessment,
        patient: &Patient,
        config: &ActiveAiConfig,
    ) -> Result<AiPriorityResponse, ProviderError>;
}

/// HTTP client with the configured network timeout.
pub(crate) fn http_client() -> reqwest::Client {
    let timeout = Duration::from_secs(config::http_timeout_secs());
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "HTTP client builder failed, using defaults");
            reqwest::Client::new()
        })
}

/// Map a reqwest failure to a provider error.
///
/// The request URL is stripped: Gemini carries the key in the query string.
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> ProviderError {
    let err = err.without_url();
    if let Some(status) = err.status() {
        return ProviderError::http(provider, status.as_u16());
    }
    if err.is_timeout() {
        ProviderError::Transport(format!("{provider}: tiempo de espera agotado"))
    } else if err.is_connect() {
        ProviderError::Transport(format!("{provider}: sin conexión"))
    } else {
        ProviderError::Transport(format!("{provider}: {err}"))
    }
}

/// Adapters keyed by provider.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    adapters: HashMap<AiProvider, Arc<dyn AiProviderPort>>,
}

impl ProviderRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Gemini and OpenAI against their public endpoints.
    pub fn with_defaults() -> Self {
        Self::empty()
            .with(AiProvider::Gemini, Arc::new(GeminiAdapter::new()))
            .with(AiProvider::OpenAi, Arc::new(OpenAiAdapter::new()))
    }

    pub fn with(mut self, provider: AiProvider, adapter: Arc<dyn AiProviderPort>) -> Self {
        self.adapters.insert(provider, adapter);
        self
    }

    pub fn get(&self, provider: AiProvider) -> Option<Arc<dyn AiProviderPort>> {
        self.adapters.get(&provider).cloned()
    }
}
