//! LLM client abstraction.
//!
//! The semantic oracle is an external reasoning capability. This module only
//! knows how to send a prompt to one and get text back; interpreting that text
//! is the job of [`crate::services::SemanticOracle`].

mod gemini;
mod openai;
mod resilience;
pub mod system_prompt;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use resilience::{LlmResilienceConfig, ResilientLlmProvider};
pub use system_prompt::{BASE_SYSTEM_PROMPT, OperationMode, build_system_prompt};

use crate::config::{OracleConfig, OracleProvider};
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// Trait for LLM providers.
///
/// Implementations are blocking; callers on an async runtime move calls onto
/// the blocking pool.
pub trait LlmProvider: Send + Sync {
    /// The provider name.
    fn name(&self) -> &'static str;

    /// Generates a completion for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails.
    fn complete(&self, prompt: &str) -> Result<String>;

    /// Generates a completion with a system prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails.
    ///
    /// Default implementation concatenates system and user prompts.
    /// Providers should override this to use native system prompt support.
    fn complete_with_system(&self, system: &str, user: &str) -> Result<String> {
        let combined = format!("{system}\n\n---\n\n{user}");
        self.complete(&combined)
    }
}

impl<P: LlmProvider + ?Sized> LlmProvider for Arc<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt)
    }

    fn complete_with_system(&self, system: &str, user: &str) -> Result<String> {
        (**self).complete_with_system(system, user)
    }
}

/// HTTP client configuration for LLM providers.
#[derive(Debug, Clone, Copy)]
pub struct LlmHttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for LlmHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl LlmHttpConfig {
    /// Loads HTTP configuration from oracle settings.
    #[must_use]
    pub const fn from_config(config: &OracleConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            connect_timeout_ms: config.connect_timeout_ms,
        }
    }
}

/// Builds a blocking HTTP client for LLM requests with configured timeouts.
#[must_use]
pub fn build_http_client(config: LlmHttpConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder();
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build LLM HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}

/// Builds the configured oracle provider, wrapped with bounded retries.
///
/// Returns `None` when the oracle is disabled.
#[must_use]
pub fn build_provider(config: &OracleConfig) -> Option<Arc<dyn LlmProvider>> {
    if !config.enabled {
        return None;
    }

    let http = LlmHttpConfig::from_config(config);
    let resilience = LlmResilienceConfig::from_config(config);

    let provider: Arc<dyn LlmProvider> = match config.provider {
        OracleProvider::Gemini => {
            let mut client = GeminiClient::new().with_http_config(http);
            if let Some(ref api_key) = config.api_key {
                client = client.with_api_key(api_key);
            }
            if let Some(ref model) = config.model {
                client = client.with_model(model);
            }
            if let Some(ref base_url) = config.base_url {
                client = client.with_endpoint(base_url);
            }
            Arc::new(ResilientLlmProvider::new(client, resilience))
        },
        OracleProvider::OpenAi => {
            let mut client = OpenAiClient::new().with_http_config(http);
            if let Some(ref api_key) = config.api_key {
                client = client.with_api_key(api_key);
            }
            if let Some(ref model) = config.model {
                client = client.with_model(model);
            }
            if let Some(ref base_url) = config.base_url {
                client = client.with_endpoint(base_url);
            }
            Arc::new(ResilientLlmProvider::new(client, resilience))
        },
    };

    tracing::debug!(provider = provider.name(), "Semantic oracle provider configured");
    Some(provider)
}

/// Maps a transport error to the crate error type.
pub(crate) fn transport_error(operation: &str, err: &reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout {
            operation: operation.to_string(),
        }
    } else {
        let kind = if err.is_connect() {
            "connect"
        } else if err.is_request() {
            "request"
        } else {
            "unknown"
        };
        Error::OracleUnavailable(format!("{operation}: {kind} error: {err}"))
    }
}

/// Extracts JSON from LLM response, handling markdown code blocks.
pub(crate) fn extract_json_from_response(response: &str) -> &str {
    let trimmed = response.trim();

    // Handle ```json ... ``` blocks
    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    // Handle ``` ... ``` blocks (without json marker)
    if let Some(start) = trimmed.find("```") {
        let content_start = start + 3;
        let after_marker = &trimmed[content_start..];
        let json_start = after_marker
            .find('{')
            .map_or(content_start, |pos| content_start + pos);
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    // Handle raw JSON (find first { to last })
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return &trimmed[start..=end];
        }
    }

    trimmed
}
