//! Google Gemini client.

use super::{LlmHttpConfig, LlmProvider, build_http_client, transport_error};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

const OPERATION: &str = "gemini_request";

/// Google Gemini LLM client using the `generateContent` REST API.
pub struct GeminiClient {
    /// API key.
    api_key: Option<String>,
    /// API endpoint.
    endpoint: String,
    /// Model to use.
    model: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "gemini-1.5-flash";

    const TEMPERATURE: f32 = 0.3;
    const TOP_P: f32 = 0.95;
    const TOP_K: u32 = 40;
    const MAX_OUTPUT_TOKENS: u32 = 2048;

    /// Creates a new Gemini client.
    ///
    /// Reads `GEMINI_API_KEY`, falling back to `GOOGLE_API_KEY`.
    #[must_use]
    pub fn new() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .ok();
        Self {
            api_key,
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            client: build_http_client(LlmHttpConfig::default()),
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets HTTP client timeouts.
    #[must_use]
    pub fn with_http_config(mut self, config: LlmHttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::OracleUnavailable("GEMINI_API_KEY not set".to_string()))
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn build_request(system: Option<&str>, user: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: system.map(Content::system),
            contents: vec![Content::user(user)],
            generation_config: GenerationConfig {
                temperature: Self::TEMPERATURE,
                top_p: Self::TOP_P,
                top_k: Self::TOP_K,
                max_output_tokens: Self::MAX_OUTPUT_TOKENS,
            },
        }
    }

    /// Makes a request to the Gemini API.
    fn request(&self, request: &GenerateContentRequest) -> Result<String> {
        let api_key = self.api_key()?;

        tracing::debug!(provider = "gemini", model = %self.model, "Making LLM request");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .map_err(|e| {
                tracing::error!(
                    provider = "gemini",
                    model = %self.model,
                    error = %e,
                    is_timeout = e.is_timeout(),
                    is_connect = e.is_connect(),
                    "LLM request failed"
                );
                transport_error(OPERATION, &e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            tracing::error!(
                provider = "gemini",
                model = %self.model,
                status = %status,
                body = %body,
                "LLM API returned error status"
            );
            return Err(Error::OracleUnavailable(format!(
                "API returned status: {status} - {body}"
            )));
        }

        let response: GenerateContentResponse = response.json().map_err(|e| {
            tracing::error!(provider = "gemini", error = %e, "Failed to decode LLM response");
            Error::OracleMalformed(format!("gemini response: {e}"))
        })?;

        response.into_text()
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        self.request(&Self::build_request(None, prompt))
    }

    fn complete_with_system(&self, system: &str, user: &str) -> Result<String> {
        self.request(&Self::build_request(Some(system), user))
    }
}

/// Request body for `generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }

    fn user(text: &str) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

/// Response body from `generateContent`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(Error::OracleUnavailable(format!("prompt blocked: {reason}")));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::OracleMalformed("no candidates in gemini response".to_string()))?;

        let text: String = candidate
            .content
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
            return Err(Error::OracleMalformed(format!(
                "empty gemini response (finish reason: {reason})"
            )));
        }

        Ok(text)
    }
}
