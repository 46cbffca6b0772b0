//! Entry points for AI enrichment: adapter lookup plus token rotation.

use super::fallback::execute_with_token_fallback;
use super::provider::ProviderRegistry;
use super::AiError;
use crate::models::{
    AiConfig, AiPriorityResponse, AiTriageResponse, Patient, TokenTagged, TriageAssessment,
};

pub struct AiTriageService {
    registry: ProviderRegistry,
}

impl AiTriageService {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Full triage document from the configured provider.
    pub async fn generate_ai_triage(
        &self,
        assessment: &TriageAssessment,
        patient: &Patient,
        config: &AiConfig,
    ) -> Result<TokenTagged<AiTriageResponse>, AiError> {
        let adapter = self
            .registry
            .get(config.provider)
            .ok_or_else(|| AiError::UnsupportedProvider(config.provider.to_string()))?;

        tracing::debug!(provider = %config.provider, model = %config.model, "Requesting AI triage");
        let tagged = execute_with_token_fallback(config, |active| {
            let adapter = adapter.clone();
            async move { adapter.generate(assessment, patient, &active).await }
        })
        .await?;
        Ok(tagged)
    }

    /// Priority and reason only.
    pub async fn generate_ai_priority(
        &self,
        assessment: &TriageAssessment,
        patient: &Patient,
        config: &AiConfig,
    ) -> Result<TokenTagged<AiPriorityResponse>, AiError> {
        let adapter = self
            .registry
            .get(config.provider)
            .ok_or_else(|| AiError::UnsupportedProvider(config.provider.to_string()))?;

        tracing::debug!(provider = %config.provider, model = %config.model, "Requesting AI priority");
        let tagged = execute_with_token_fallback(config, |active| {
            let adapter = adapter.clone();
            async move { adapter.generate_priority(assessment, patient, &active).await }
        })
        .await?;
        Ok(tagged)
    }
}

impl Default for AiTriageService {
    fn default() -> Self {
        Self::new(ProviderRegistry::with_defaults())
    }
}
