//! Google Gateway Implementation (API Key-based)
//!
//! Structured extraction through Gemini's `generateContent` endpoint with a
//! `responseSchema`.

use crate::core::llm::error::{LLMError, Result};
use crate::core::llm::gateway::StructuredGateway;
use crate::core::llm::types::{
    ChatMessage, MessagePart, MessageRole, ModelTier, StructuredRequest, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_FAST_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_PRECISE_MODEL: &str = "gemini-2.5-flash";

/// Google gateway (API key-based)
pub struct GoogleGateway {
    api_key: String,
    base_url: String,
    fast_model: String,
    precise_model: String,
    client: Client,
}

impl GoogleGateway {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let api_key = api_key.trim().to_string();
        if !Self::is_valid_api_key_format(&api_key) {
            return Err(LLMError::NotConfigured(
                "google: missing or malformed API key".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LLMError::HttpError)?;

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            fast_model: DEFAULT_FAST_MODEL.to_string(),
            precise_model: DEFAULT_PRECISE_MODEL.to_string(),
            client,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_models(mut self, fast: impl Into<String>, precise: impl Into<String>) -> Self {
        self.fast_model = fast.into();
        self.precise_model = precise.into();
        self
    }

    /// Google API keys start with "AIza". Pure format check, no network.
    pub fn is_valid_api_key_format(key: &str) -> bool {
        let trimmed = key.trim();
        !trimmed.is_empty() && trimmed.starts_with("AIza")
    }

    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast_model,
            ModelTier::Precise => &self.precise_model,
        }
    }

    /// Gemini rejects blank text parts, so they are dropped here.
    fn build_parts(message: &ChatMessage) -> Vec<Value> {
        message
            .parts
            .iter()
            .filter_map(|part| match part {
                MessagePart::Text { text } if text.trim().is_empty() => None,
                MessagePart::Text { text } => Some(json!({ "text": text })),
                MessagePart::Image { mime_type, data } => Some(json!({
                    "inlineData": { "mimeType": mime_type, "data": data }
                })),
            })
            .collect()
    }

    fn build_contents(request: &StructuredRequest) -> Vec<Value> {
        request
            .messages
            .iter()
            .filter(|msg| msg.role == MessageRole::User)
            .map(Self::build_parts)
            .filter(|parts| !parts.is_empty())
            .map(|parts| {
                json!({
                    "role": "user",
                    "parts": parts
                })
            })
            .collect()
    }

    /// Build the `generateContent` body for a request.
    pub fn build_body(request: &StructuredRequest) -> Value {
        let mut body = json!({ "contents": Self::build_contents(request) });

        if let Some(system) = request.system_text() {
            body["systemInstruction"] = json!({
                "parts": [{ "text": system }]
            });
        }

        let mut gen_config = serde_json::Map::new();
        gen_config.insert("responseMimeType".to_string(), json!("application/json"));
        gen_config.insert("responseSchema".to_string(), request.schema.to_json());
        if let Some(temp) = request.temperature {
            gen_config.insert("temperature".to_string(), json!(temp));
        }
        body["generationConfig"] = Value::Object(gen_config);

        body
    }

    /// Pull the JSON document out of a `generateContent` response.
    pub fn parse_response(json: &Value) -> Result<(Value, Option<TokenUsage>)> {
        let candidate = json["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .ok_or_else(|| LLMError::InvalidResponse("No candidates in response".to_string()))?;

        let text = candidate["content"]["parts"]
            .as_array()
            .and_then(|parts| parts.first())
            .and_then(|p| p["text"].as_str())
            .ok_or_else(|| {
                let reason = candidate["finishReason"].as_str().unwrap_or("unknown");
                LLMError::InvalidResponse(format!("Missing content (finish reason: {reason})"))
            })?;

        let value: Value = serde_json::from_str(text)?;

        let usage = json["usageMetadata"].as_object().map(|u| {
            let count = |key: &str| {
                u.get(key)
                    .and_then(Value::as_u64)
                    .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
                    .unwrap_or(0)
            };
            TokenUsage::new(count("promptTokenCount"), count("candidatesTokenCount"))
        });

        Ok((value, usage))
    }
}

#[async_trait]
impl StructuredGateway for GoogleGateway {
    async fn invoke(&self, request: StructuredRequest) -> Result<Value> {
        let model = self.model_for(request.tier);
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let body = Self::build_body(&request);

        log::debug!(
            "google: generateContent model={} tier={} temperature={:?}",
            model,
            request.tier,
            request.temperature
        );

        let start = std::time::Instant::now();
        let resp = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(LLMError::from_reqwest)?;

        let status = resp.status();
        let latency = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(LLMError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let raw = resp.text().await.map_err(LLMError::from_reqwest)?;
        let json: Value = serde_json::from_str(&raw)?;
        let (value, usage) = Self::parse_response(&json)?;

        if let Some(usage) = usage {
            log::debug!(
                "google: {} answered in {}ms ({} tokens)",
                model,
                latency,
                usage.total()
            );
        }

        Ok(value)
    }
}
