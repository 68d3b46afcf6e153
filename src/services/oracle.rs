//! Semantic oracle adapter.
//!
//! Wraps an [`LlmProvider`] with the request/response contract the pipelines
//! rely on: a prompt, system instructions and a response format go in; a
//! parsed JSON object or a typed error comes out. Providers are blocking, so
//! each call runs on the blocking pool under a deadline and never stalls other
//! requests on the runtime.

use crate::config::OracleConfig;
use crate::llm::system_prompt::{
    OperationMode, build_system_prompt, claims_prompt, concept_enhancement_prompt,
    prior_art_prompt,
};
use crate::llm::{LlmProvider, build_provider, extract_json_from_response};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::instrument;

/// Expected shape of an oracle reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// A single JSON object.
    #[default]
    Json,
    /// Free text, returned as a JSON string.
    Text,
}

/// One request to the semantic oracle.
#[derive(Debug, Clone)]
pub struct OracleRequest {
    /// Task prompt including the user-supplied text.
    pub prompt: String,
    /// System instructions framing the task.
    pub system_instructions: String,
    /// Expected reply format.
    pub response_format: ResponseFormat,
}

impl OracleRequest {
    /// Builds a JSON request for an operation mode.
    #[must_use]
    pub fn json(mode: OperationMode, prompt: String) -> Self {
        Self {
            prompt,
            system_instructions: build_system_prompt(mode, None),
            response_format: ResponseFormat::Json,
        }
    }
}

/// Recategorization suggestions for extracted concepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConceptSuggestions {
    /// Terms judged novel.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub differentiating_terms: Vec<String>,
    /// Terms judged ordinary domain vocabulary.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub common_domain_terms: Vec<String>,
    /// Terms judged methodological.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub methodological_terms: Vec<String>,
    /// Concepts the extractors missed.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub additional_concepts: Vec<String>,
}

/// Raw prior-art comparison reply. Missing fields are filled by the scorer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PriorArtReply {
    /// Comparable prior works.
    #[serde(default, deserialize_with = "lenient_items")]
    pub prior_art_matches: Vec<PriorArtReplyMatch>,
    /// Novel elements.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub novel_aspects: Vec<String>,
    /// Overlapping elements.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub overlapping_aspects: Vec<String>,
    /// Aggregate risk score.
    #[serde(default, deserialize_with = "lenient_score")]
    pub overall_risk_score: Option<f64>,
    /// Confidence label.
    #[serde(default, deserialize_with = "lenient_string")]
    pub confidence: Option<String>,
    /// Assessment summary.
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    /// Next steps.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub recommendations: Vec<String>,
}

/// One raw prior-art match.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PriorArtReplyMatch {
    /// Title of the prior work.
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    /// Kind of source.
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: Option<String>,
    /// Similarity score.
    #[serde(default, deserialize_with = "lenient_score")]
    pub similarity_score: Option<f64>,
    /// Overlap description.
    #[serde(default, deserialize_with = "lenient_string")]
    pub overlap_description: Option<String>,
    /// Shared concepts.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub overlapping_concepts: Vec<String>,
    /// Differentiating aspects.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub differentiating_aspects: Vec<String>,
    /// Quoted evidence.
    #[serde(default, deserialize_with = "lenient_string")]
    pub evidence: Option<String>,
}

/// Raw claim analysis reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClaimsReply {
    /// Per-claim analysis.
    #[serde(default, deserialize_with = "lenient_items")]
    pub claims_analysis: Vec<ClaimReply>,
    /// Summary of the claim set.
    #[serde(default, deserialize_with = "lenient_string")]
    pub overall_assessment: Option<String>,
    /// Strongest claim number.
    #[serde(default, deserialize_with = "lenient_claim_number")]
    pub strongest_claim: Option<u32>,
    /// Weakest claim number.
    #[serde(default, deserialize_with = "lenient_claim_number")]
    pub weakest_claim: Option<u32>,
}

/// One raw claim analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClaimReply {
    /// Claim number.
    #[serde(default, deserialize_with = "lenient_claim_number")]
    pub claim_number: Option<u32>,
    /// Risk label.
    #[serde(default, deserialize_with = "lenient_string")]
    pub risk_level: Option<String>,
    /// Similar prior claims.
    #[serde(default, deserialize_with = "lenient_string")]
    pub similar_prior_art: Option<String>,
    /// Unique elements.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub differentiating_elements: Vec<String>,
    /// Suggested improvement.
    #[serde(default, deserialize_with = "lenient_string")]
    pub recommendation: Option<String>,
}

/// Prompt inputs for a prior-art comparison.
#[derive(Debug, Clone, Copy)]
pub struct PriorArtQuery<'a> {
    /// Description of the user's work ("patent claim", "research idea").
    pub work_label: &'a str,
    /// Description of the prior-art corpus.
    pub prior_art_label: &'a str,
    /// Default source label for matches.
    pub source_label: &'a str,
    /// Title of the user's work.
    pub title: &'a str,
    /// Bounded excerpt of the user's text.
    pub excerpt: &'a str,
    /// Bounded concept hints.
    pub concept_hints: &'a [String],
}

/// Semantic oracle adapter.
///
/// Cloning is cheap; the provider is shared and holds no per-request state.
#[derive(Clone)]
pub struct SemanticOracle {
    llm: Arc<dyn LlmProvider>,
    request_timeout: Option<Duration>,
}

impl SemanticOracle {
    /// Default deadline for one oracle call.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

    /// Creates an oracle backed by the given provider.
    #[must_use]
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            llm,
            request_timeout: Some(Self::DEFAULT_REQUEST_TIMEOUT),
        }
    }

    /// Builds the configured oracle, or `None` when it is disabled.
    #[must_use]
    pub fn from_config(config: &OracleConfig) -> Option<Self> {
        build_provider(config).map(|llm| {
            Self::new(llm).with_request_timeout(Duration::from_millis(config.request_timeout_ms))
        })
    }

    /// Sets the per-call deadline. Zero disables it.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = if timeout.is_zero() {
            None
        } else {
            Some(timeout)
        };
        self
    }

    /// Returns the provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.llm.name()
    }

    /// Sends a request and returns the parsed reply.
    ///
    /// JSON replies must be an object; text replies come back as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] when the deadline elapses,
    /// [`Error::OracleUnavailable`] when the provider fails, and
    /// [`Error::OracleMalformed`] when the reply cannot be parsed.
    pub async fn request(&self, request: OracleRequest) -> Result<Value> {
        let OracleRequest {
            prompt,
            system_instructions,
            response_format,
        } = request;

        let llm = Arc::clone(&self.llm);
        let started = Instant::now();
        let call =
            tokio::task::spawn_blocking(move || llm.complete_with_system(&system_instructions, &prompt));

        let joined = match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                tracing::warn!(
                    provider = self.provider_name(),
                    timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    "Oracle request timed out"
                );
                Error::Timeout {
                    operation: "oracle_request".to_string(),
                }
            })?,
            None => call.await,
        };

        let raw = joined
            .map_err(|e| Error::OracleUnavailable(format!("oracle task failed: {e}")))??;

        tracing::debug!(
            provider = self.provider_name(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            response_len = raw.len(),
            "Oracle replied"
        );

        parse_reply(&raw, response_format)
    }

    /// Sends a JSON request and deserializes the reply.
    async fn request_typed<T: DeserializeOwned>(&self, request: OracleRequest) -> Result<T> {
        let value = self.request(request).await?;
        serde_json::from_value(value)
            .map_err(|e| Error::OracleMalformed(format!("unexpected reply shape: {e}")))
    }

    /// Asks the oracle to recategorize candidate terms.
    ///
    /// # Errors
    ///
    /// Returns an error if the oracle fails or replies with malformed output.
    #[instrument(skip_all, fields(provider = self.provider_name(), terms = terms.len()))]
    pub async fn enhance_concepts(
        &self,
        terms: &[&str],
        excerpt: &str,
        domain_hint: Option<&str>,
    ) -> Result<ConceptSuggestions> {
        let prompt = concept_enhancement_prompt(terms, excerpt, domain_hint);
        self.request_typed(OracleRequest::json(OperationMode::ConceptEnhancement, prompt))
            .await
    }

    /// Asks the oracle for comparable prior art and an aggregate risk score.
    ///
    /// # Errors
    ///
    /// Returns an error if the oracle fails or replies with malformed output.
    #[instrument(skip_all, fields(provider = self.provider_name()))]
    pub async fn compare_prior_art(&self, query: PriorArtQuery<'_>) -> Result<PriorArtReply> {
        let prompt = prior_art_prompt(
            query.work_label,
            query.prior_art_label,
            query.source_label,
            query.title,
            query.excerpt,
            query.concept_hints,
        );
        self.request_typed(OracleRequest::json(OperationMode::PriorArtComparison, prompt))
            .await
    }

    /// Asks the oracle to analyze numbered claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the oracle fails or replies with malformed output.
    #[instrument(skip_all, fields(provider = self.provider_name(), claims = claims.len()))]
    pub async fn analyze_claims(&self, title: &str, claims: &[String]) -> Result<ClaimsReply> {
        let prompt = claims_prompt(title, claims);
        self.request_typed(OracleRequest::json(OperationMode::ClaimAnalysis, prompt))
            .await
    }
}

impl std::fmt::Debug for SemanticOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticOracle")
            .field("provider", &self.llm.name())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn parse_reply(raw: &str, format: ResponseFormat) -> Result<Value> {
    match format {
        ResponseFormat::Text => Ok(Value::String(raw.trim().to_string())),
        ResponseFormat::Json => {
            let json = extract_json_from_response(raw);
            let value: Value = serde_json::from_str(json)
                .map_err(|e| Error::OracleMalformed(format!("JSON parsing failed: {e}")))?;
            if value.is_object() {
                Ok(value)
            } else {
                Err(Error::OracleMalformed(
                    "expected a JSON object at the top level".to_string(),
                ))
            }
        },
    }
}

/// Accepts a string list, a single string, or null; non-string items are dropped.
fn lenient_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => vec![s],
        _ => Vec::new(),
    })
}

/// Accepts a string; anything else becomes `None`.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Accepts a number or a numeric string.
fn lenient_score<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

/// Accepts a positive integer or its string form.
fn lenient_claim_number<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
    .filter(|v| *v > 0))
}

/// Accepts a list of objects; items that do not fit `T` are dropped.
fn lenient_items<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
