//! OpenAI chat completions adapter.

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

const PROVIDER: &str = "OpenAI";

pub struct OpenAiAdapter {
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiAdapter {
    pub fn new() -> Self {
        Self::with_base_url(config::OPENAI_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(),
        }
    }

    async fn complete(&self, prompt: &str, config: &ActiveAiConfig) -> Result<String, ProviderError> {
        let key = config.api_key.trim();
        if key.is_empty() {
            return Err(ProviderError::MissingCredential(PROVIDER.into()));
        }

        let body = ChatRequest {
            model: &config.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: 0.2,
            max_tokens: 900,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::http(PROVIDER, status.as_u16()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::EmptyResponse(PROVIDER.into()))
    }
}

impl Default for OpenAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProviderPort for OpenAiAdapter {
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

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AiProvider, Priority};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use chrono::Utc;

    async fn handler(
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        assert_eq!(body["max_tokens"], 900);
        assert_eq!(body["model"], "gpt-4o-mini");
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        match auth {
            "Bearer sk-valid" => (
                StatusCode::OK,
                Json(serde_json::json!({"choices": [{"message": {"content":
                    "Claro:\n```json\n{\"prioridad_sugerida\": 5, \"motivo_prioridad\": \"Leve\"}\n```"}}]})),
            ),
            "Bearer sk-blank" => (
                StatusCode::OK,
                Json(serde_json::json!({"choices": [{"message": {"content": null}}]})),
            ),
            _ => (StatusCode::UNAUTHORIZED, Json(serde_json::json!({"error": "bad key"}))),
        }
    }

    async fn spawn_server() -> String {
        let app = Router::new().route("/v1/chat/completions", post(handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn active(key: &str) -> ActiveAiConfig {
        ActiveAiConfig {
            provider: AiProvider::OpenAi,
            model: "gpt-4o-mini".into(),
            api_key: key.into(),
        }
    }

    #[tokio::test]
    async fn bearer_auth_and_fenced_answer() {
        let adapter = OpenAiAdapter::with_base_url(&spawn_server().await);
        let patient = Patient::new_empty(Utc::now());
        let response = adapter
            .generate_priority(&TriageAssessment::default(), &patient, &active("sk-valid"))
            .await
            .unwrap();
        assert_eq!(response.json.suggested_priority, Priority::NON_URGENT);
        assert!(response.raw_text.starts_with("Claro:"));
    }

    #[tokio::test]
    async fn unauthorized_carries_status() {
        let adapter = OpenAiAdapter::with_base_url(&spawn_server().await);
        let patient = Patient::new_empty(Utc::now());
        let err = adapter
            .generate(&TriageAssessment::default(), &patient, &active("sk-other"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "OpenAI error 401");
    }

    #[tokio::test]
    async fn null_content_is_empty_response() {
        let adapter = OpenAiAdapter::with_base_url(&spawn_server().await);
        let patient = Patient::new_empty(Utc::now());
        let err = adapter
            .generate(&TriageAssessment::default(), &patient, &active("sk-blank"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse(_)));
    }
}
