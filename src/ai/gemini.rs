//! Google Gemini `generateContent` adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::parser::{parse_ai_priority, parse_ai_response};
use super::prompt::{build_priority_prompt, build_triage_prompt};
use super::provider::{http_client, transport_error, AiProviderPort};
use super::ProviderError;
use crate::config;
use crate::models::{
    ActiveAiConfig, AiPriorityResponse, AiTriageResponse, Patient, TriageAssessment,
};

const PROVIDER: &str = "Gemini";

pub struct GeminiAdapter {
    base_url: String,
    client: reqwest::Client,
}

impl GeminiAdapter {
    pub fn new() -> Self {
        Self::with_base_url(config::GEMINI_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(),
        }
    }

    /// POST one prompt and return the concatenated candidate text.
    async fn complete(&self, prompt: &str, config: &ActiveAiConfig) -> Result<String, ProviderError> {
        let key = config.api_key.trim();
        if key.is_empty() {
            return Err(ProviderError::MissingCredential(PROVIDER.into()));
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, config.model
        );
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                top_p: 0.8,
                top_k: 40,
                max_output_tokens: 800,
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::http(PROVIDER, status.as_u16()));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse(PROVIDER.into()));
        }
        Ok(text)
    }
}

impl Default for GeminiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProviderPort for GeminiAdapter {
    async fn generate(
        &self,
        assessment: &TriageAssessment,
        patient: &Patient,
        config: &ActiveAiConfig,
    ) -> Result<AiTriageResponse, ProviderError> {
        let text = self
            .complete(&build_triage_prompt(assessment, patient), config)
            .await?;
        Ok(parse_ai_response(&text)?)
    }

    async fn generate_priority(
        &self,
        assessment: &TriageAssessment,
        patient: &Patient,
        config: &ActiveAiConfig,
    ) -> Result<AiPriorityResponse, ProviderError> {
        let text = self
            .complete(&build_priority_prompt(assessment, patient), config)
            .await?;
        Ok(parse_ai_priority(&text)?)
    }
}

// ── Wire types ──────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
