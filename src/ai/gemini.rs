use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument, trace, warn};

use crate::ai::config::AiConfig;
use crate::ai::gateway::{GatewayError, ModelGateway, PromptPart};

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

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
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

/// Gemini `generateContent` client.
///
/// Holds one `reqwest::Client` for the whole process; calls are stateless, so
/// a single instance is shared by every chat.
pub struct GeminiGateway {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    thinking_budget: u32,
}

impl GeminiGateway {
    pub fn new(api_key: impl Into<String>, base_url: Option<&str>, thinking_budget: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or(GEMINI_API_URL)
                .trim_end_matches('/')
                .to_string(),
            thinking_budget,
        }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            config.api_url.as_deref(),
            config.thinking_budget,
        )
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

pub fn build_generate_body(parts: &[PromptPart], thinking_budget: u32) -> Value {
    let parts: Vec<Value> = parts
        .iter()
        .map(|part| match part {
            PromptPart::Text(text) => json!({ "text": text }),
            PromptPart::Image { data, media_type } => json!({
                "inlineData": {
                    "mimeType": media_type,
                    "data": base64::engine::general_purpose::STANDARD.encode(data),
                }
            }),
        })
        .collect();

    json!({
        "contents": [ { "role": "user", "parts": parts } ],
        "generationConfig": {
            "thinkingConfig": { "thinkingBudget": thinking_budget }
        }
    })
}

/// Join the visible text parts of the first candidate.
pub fn parse_generate_text(raw: &str) -> Result<String, GatewayError> {
    let resp: GenerateResponse = serde_json::from_str(raw)?;
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|p| !p.thought)
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GatewayError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    #[instrument(level = "trace", skip(self, parts), fields(parts = parts.len()))]
    async fn call(&self, parts: &[PromptPart], model: &str) -> Result<String, GatewayError> {
        let url = self.endpoint(model);
        let body = build_generate_body(parts, self.thinking_budget);
        debug!(url = %url, model, "sending generateContent request");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, model, "Gemini API error");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = resp.text().await?;
        let snippet: String = raw.chars().take(200).collect();
        debug!(snippet = %snippet, "generateContent response body");
        trace!(raw = %raw, "generateContent response");
        parse_generate_text(&raw)
    }
}
