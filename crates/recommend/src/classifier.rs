//! Vibe classification
//!
//! Turns a free-text mood description into genre labels using Gemini's `generateContent`
//! endpoint with a JSON-array response schema.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::genre::genre_list;

/// Errors that can occur while classifying a vibe
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("API key not configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Response parse error: {0}")]
    ParseError(String),

    #[error("Response contained no text")]
    EmptyResponse,
}

/// Anything that can map free text to genre labels.
///
/// Returned labels are raw: validating them against the genre set is the caller's job.
#[async_trait]
pub trait VibeClassifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_configured(&self) -> bool;

    async fn classify(&self, text: &str) -> Result<Vec<String>, ClassifierError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash-preview-09-2025".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Instruction sent with every request, constraining output to the genre vocabulary.
pub fn system_prompt() -> String {
    format!(
        "You are a professional mood and media analyst. The user will describe how they feel \
         or what kind of vibe they want. Analyze their message and output one or more genres \
         from this list: {}. If multiple genres fit, return several (e.g. [\"Action\",\"Drama\"]). \
         Return the result as a JSON array of strings.",
        genre_list()
    )
}

/// Gemini-backed classifier
pub struct GeminiClassifier {
    client: Client,
    settings: GeminiSettings,
    api_key: Option<String>,
}

impl GeminiClassifier {
    pub fn new(settings: GeminiSettings, api_key: Option<String>) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ClassifierError::RequestFailed(e.without_url().to_string()))?;

        let api_key = api_key.filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("[GEMINI] No API key configured; vibe analysis is disabled");
        }

        Ok(Self {
            client,
            settings,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    fn build_payload(text: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "systemInstruction": { "parts": [{ "text": system_prompt() }] },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "type": "ARRAY", "items": { "type": "STRING" } }
            }
        })
    }
}

#[async_trait]
impl VibeClassifier for GeminiClassifier {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn classify(&self, text: &str) -> Result<Vec<String>, ClassifierError> {
        let api_key = self.api_key.as_deref().ok_or(ClassifierError::MissingApiKey)?;

        tracing::debug!(model = %self.settings.model, "[GEMINI] Classifying vibe");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&Self::build_payload(text))
            .send()
            .await
            .map_err(|e| {
                // reqwest errors embed the request URL, which carries the key
                let e = e.without_url();
                tracing::warn!("[GEMINI] Request failed: {}", e);
                ClassifierError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message: String = body.chars().take(200).collect();
            tracing::warn!("[GEMINI] API returned {}: {}", status, message);
            return Err(ClassifierError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClassifierError::RequestFailed(e.without_url().to_string()))?;

        parse_response(&body).inspect_err(|e| tracing::warn!("[GEMINI] {}", e))
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Extract the genre array from a raw `generateContent` response body.
fn parse_response(body: &str) -> Result<Vec<String>, ClassifierError> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ClassifierError::ParseError(e.to_string()))?;

    let text = parsed
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.trim())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ClassifierError::EmptyResponse);
    }

    serde_json::from_str::<Vec<String>>(text).map_err(|e| {
        ClassifierError::ParseError(format!("expected a JSON array of strings: {}", e))
    })
}
