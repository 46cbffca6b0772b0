//! Extraction and validation of the JSON document in a model answer.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{AiPriorityJson, AiPriorityResponse, AiTriageJson, AiTriageResponse};

const PREVIEW_CHARS: usize = 180;
const EMPTY_PREVIEW: &str = "vacía";

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json\s*(.*?)```").expect("static fence pattern"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Carries a whitespace-collapsed preview of the answer.
    #[error("No se encontró JSON en la respuesta: {0}")]
    NoJson(String),

    #[error("JSON inválido en la respuesta: {0}")]
    Json(String),

    #[error("La respuesta no cumple el esquema: {0}")]
    Validation(String),
}

// ═══════════════════════════════════════════
// Extraction
// ═══════════════════════════════════════════

/// Locate the JSON region of a model answer.
///
/// A ```` ```json ```` fence wins; otherwise the first balanced top-level
/// object. Braces inside string literals do not count towards nesting.
pub fn extract_json(text: &str) -> Option<&str> {
    if let Some(body) = JSON_FENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|body| !body.is_empty())
    {
        tracing::debug!("JSON extracted from fenced block");
        return Some(body);
    }

    let found = first_balanced_object(text);
    if found.is_some() {
        tracing::debug!("JSON extracted by brace scan");
    }
    found
}

fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}

fn preview(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        EMPTY_PREVIEW.to_string()
    } else {
        collapsed.chars().take(PREVIEW_CHARS).collect()
    }
}

fn parse_document<T: DeserializeOwned>(text: &str) -> Result<T, ParseError> {
    let region = extract_json(text).ok_or_else(|| ParseError::NoJson(preview(text)))?;
    let value: serde_json::Value =
        serde_json::from_str(region).map_err(|e| ParseError::Json(e.to_string()))?;
    serde_json::from_value(value).map_err(|e| ParseError::Validation(e.to_string()))
}

// ═══════════════════════════════════════════
// Documents
// ═══════════════════════════════════════════

/// Parse a full triage answer.
pub fn parse_ai_response(text: &str) -> Result<AiTriageResponse, ParseError> {
    let mut json: AiTriageJson = parse_document(text)?;
    json.key_questions = normalize_questions(&json.key_questions);
    Ok(AiTriageResponse {
        json,
        raw_text: text.to_string(),
    })
}

/// Parse a priority-only answer.
pub fn parse_ai_priority(text: &str) -> Result<AiPriorityResponse, ParseError> {
    let json: AiPriorityJson = parse_document(text)?;
    Ok(AiPriorityResponse {
        json,
        raw_text: text.to_string(),
    })
}

fn is_trailing_noise(c: char) -> bool {
    c.is_whitespace() || matches!(c, '?' | '¿' | '.' | ',' | ';' | ':' | '!' | '¡')
}

/// Rewrap each question as `¿<core>?`, dropping empty ones.
pub fn normalize_questions(questions: &[String]) -> Vec<String> {
    questions
        .iter()
        .filter_map(|q| {
            let core = q
                .trim()
                .trim_start_matches(|c: char| c == '¿' || c == '?' || c.is_whitespace())
                .trim_end_matches(is_trailing_noise);
            (!core.is_empty()).then(|| format!("¿{core}?"))
        })
        .collect()
}
