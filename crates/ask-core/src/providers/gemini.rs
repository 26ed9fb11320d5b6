//! Gemini API key provider (Generative Language API).

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{Value, json};

use super::AnswerProvider;
use super::shared::{
    ProviderError, ProviderResult, USER_AGENT, classify_reqwest_error, resolve_api_key,
    resolve_base_url,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_output_tokens: Option<u32>,
}

impl GeminiConfig {
    /// Creates a new config from environment.
    ///
    /// Authentication resolution order:
    /// 1. `config_api_key` parameter (from config file)
    /// 2. `GEMINI_API_KEY` environment variable
    ///
    /// Environment variables:
    /// - `GEMINI_API_KEY` (fallback if not in config)
    /// - `GEMINI_BASE_URL` (optional, wins over config)
    ///
    /// # Errors
    /// Returns an error if no API key is available or the base URL is invalid.
    pub fn from_env(
        model: String,
        max_output_tokens: Option<u32>,
        config_base_url: Option<&str>,
        config_api_key: Option<&str>,
    ) -> Result<Self> {
        let api_key = resolve_api_key(config_api_key, "GEMINI_API_KEY", "gemini")?;
        let base_url = resolve_base_url(
            config_base_url,
            "GEMINI_BASE_URL",
            DEFAULT_BASE_URL,
            "Gemini",
        )?;

        Ok(Self {
            api_key,
            base_url,
            model,
            max_output_tokens,
        })
    }
}

/// Gemini client.
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Sends a single-turn `generateContent` request and returns the answer text.
    ///
    /// # Errors
    /// Returns a [`ProviderError`] on transport failure, non-2xx status,
    /// blocked prompts, or a response without text.
    pub async fn generate_content(&self, prompt: &str) -> ProviderResult<String> {
        let request = build_generate_request(prompt, self.config.max_output_tokens);
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let response = self
            .http
            .post(url)
            .headers(build_headers(&self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        if !status.is_success() {
            return Err(ProviderError::http_status(status.as_u16(), &body));
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            ProviderError::parse(format!("Failed to parse Gemini response JSON: {e}"))
                .with_details(body.clone())
        })?;
        parse_generate_response(&value)
    }
}

#[async_trait]
impl AnswerProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        self.generate_content(prompt).await
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

fn build_generate_request(prompt: &str, max_output_tokens: Option<u32>) -> Value {
    let mut request = json!({
        "contents": [{
            "role": "user",
            "parts": [{
                "text": prompt
            }]
        }]
    });

    if let Some(max) = max_output_tokens {
        request["generationConfig"] = json!({ "maxOutputTokens": max });
    }

    request
}

/// Extracts answer text from a `generateContent` response.
///
/// Concatenates every text part of the first candidate, skipping thought
/// summaries.
fn parse_generate_response(value: &Value) -> ProviderResult<String> {
    if let Some(reason) = value
        .get("promptFeedback")
        .and_then(|feedback| feedback.get("blockReason"))
        .and_then(Value::as_str)
    {
        return Err(ProviderError::api_error(
            "prompt_blocked",
            &format!("Prompt was blocked ({reason})"),
        ));
    }

    let candidate = value
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .ok_or_else(|| {
            ProviderError::parse("Gemini response has no candidates").with_details(value.to_string())
        })?;

    let text: String = candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter(|part| !part.get("thought").and_then(Value::as_bool).unwrap_or(false))
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let finish_reason = candidate
            .get("finishReason")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        return Err(ProviderError::parse(format!(
            "Gemini response has no text (finishReason: {finish_reason})"
        ))
        .with_details(value.to_string()));
    }

    Ok(text)
}

fn build_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-goog-api-key",
        HeaderValue::from_str(api_key).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    headers.insert("accept", HeaderValue::from_static("application/json"));
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    headers.insert("user-agent", HeaderValue::from_static(USER_AGENT));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderErrorKind;

    #[test]
    fn parse_generate_response_joins_text_parts() {
        let value = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "thinking about sums", "thought": true },
                        { "text": "2 + 2 " },
                        { "text": "= 4" }
                    ]
                },
                "finishReason": "STOP"
            }]
        });

        assert_eq!(parse_generate_response(&value).unwrap(), "2 + 2 = 4");
    }

    #[test]
    fn parse_generate_response_without_text_is_parse_error() {
        let value = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [] },
                "finishReason": "MAX_TOKENS"
            }]
        });

        let err = parse_generate_response(&value).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Parse);
        assert!(err.message.contains("MAX_TOKENS"));
    }

    #[test]
    fn parse_generate_response_blocked_prompt_is_api_error() {
        let value = json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        });

        let err = parse_generate_response(&value).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::ApiError);
        assert!(err.message.contains("SAFETY"));
    }

    #[test]
    fn build_generate_request_sets_output_limit_when_present() {
        let request = build_generate_request("What is 2+2?", Some(256));

        assert_eq!(request["contents"][0]["role"], json!("user"));
        assert_eq!(
            request["contents"][0]["parts"][0]["text"],
            json!("What is 2+2?")
        );
        assert_eq!(request["generationConfig"]["maxOutputTokens"], json!(256));

        let request = build_generate_request("hi", None);
        assert!(request.get("generationConfig").is_none());
    }
}
