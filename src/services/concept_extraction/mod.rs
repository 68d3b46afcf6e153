//! Concept extraction pipeline.
//!
//! Separates ordinary domain vocabulary from terms that may indicate a novel
//! contribution. Three independent extractors run over the same input, their
//! candidates are merged, optionally recategorized by the semantic oracle, then
//! weighted and ranked.
//!
//! ```text
//! text ─┬─ tokenizer (keywords) ─┐
//!       ├─ patterns (technical) ─┼─ merger ─ oracle (best effort) ─ weighter ─ result
//!       └─ phrases (n-grams) ────┘
//! ```
//!
//! The oracle stage never fails extraction: any oracle error leaves the merged
//! candidates unchanged and is reported as [`OracleOutcome::Degraded`].
//!
//! # Example
//!
//! ```rust,ignore
//! use inventix::services::ConceptExtractorService;
//!
//! let service = ConceptExtractorService::without_oracle();
//! let result = service.extract_concepts("The method operates at 10GHz.", None).await;
//! assert!(result.success);
//! ```

mod merger;
mod patterns;
mod phrases;
mod tokenizer;
mod weighter;

pub use merger::{apply_suggestions, merge_concepts};
pub use patterns::{TECHNICAL_PATTERNS, TechnicalPattern, extract_technical_terms};
pub use phrases::{PhraseLimits, extract_phrases};
pub use tokenizer::{
    METHODOLOGICAL_KEYWORDS, STOPWORDS, extract_keywords, is_methodological, is_stopword,
    keywords, tokenize,
};
pub use weighter::{category_boost, find_context, length_bonus, rank_concepts, weight};

use super::oracle::SemanticOracle;
use super::truncate_chars;
use crate::config::{ExtractionLimits, InventixConfig};
use crate::observability::current_request_id;
use crate::models::{
    Concept, ConceptCategory, ExtractionResult, FailureKind, OracleOutcome, PipelineError,
};
use std::collections::BTreeMap;
use tracing::instrument;

/// Message reported for blank input.
pub const EMPTY_INPUT_MESSAGE: &str = "No text provided for concept extraction";

/// Service running the concept extraction pipeline.
///
/// Holds no per-request state; one instance can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ConceptExtractorService {
    /// Semantic oracle, absent when disabled.
    oracle: Option<SemanticOracle>,
    /// Pipeline bounds.
    limits: ExtractionLimits,
}

impl ConceptExtractorService {
    /// Creates an extractor that consults the given oracle.
    #[must_use]
    pub fn new(oracle: SemanticOracle) -> Self {
        Self {
            oracle: Some(oracle),
            limits: ExtractionLimits::default(),
        }
    }

    /// Creates an extractor that never consults an oracle.
    #[must_use]
    pub fn without_oracle() -> Self {
        Self::default()
    }

    /// Creates an extractor from configuration.
    ///
    /// The oracle is built only when enabled.
    #[must_use]
    pub fn from_config(config: &InventixConfig) -> Self {
        Self {
            oracle: SemanticOracle::from_config(&config.oracle),
            limits: config.extraction,
        }
    }

    /// Sets the pipeline bounds.
    #[must_use]
    pub const fn with_limits(mut self, limits: ExtractionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Returns the pipeline bounds.
    #[must_use]
    pub const fn limits(&self) -> &ExtractionLimits {
        &self.limits
    }

    /// Returns true if an oracle is configured.
    #[must_use]
    pub const fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Extracts and ranks concepts, consulting the oracle when configured.
    ///
    /// Never fails at the type level: blank input and internal faults come
    /// back as a result with `success == false`.
    pub async fn extract_concepts(&self, text: &str, domain_hint: Option<&str>) -> ExtractionResult {
        self.extract_concepts_with(text, domain_hint, true).await
    }

    /// Extracts and ranks concepts; `use_oracle == false` skips the oracle stage.
    #[instrument(
        name = "inventix.extract_concepts",
        skip(self, text),
        fields(text_len = text.len(), oracle = tracing::field::Empty)
    )]
    pub async fn extract_concepts_with(
        &self,
        text: &str,
        domain_hint: Option<&str>,
        use_oracle: bool,
    ) -> ExtractionResult {
        if text.trim().is_empty() {
            return ExtractionResult::failed(PipelineError::new(
                FailureKind::InputEmpty,
                EMPTY_INPUT_MESSAGE,
            ));
        }

        let mut concepts = self.candidates(text);
        let mut warnings = Vec::new();

        let oracle_outcome = match self.oracle.as_ref().filter(|_| use_oracle) {
            Some(oracle) => {
                self.enhance(oracle, &mut concepts, text, domain_hint, &mut warnings)
                    .await
            },
            None => OracleOutcome::Skipped,
        };
        tracing::Span::current().record("oracle", tracing::field::debug(oracle_outcome));

        let ranked = rank_concepts(
            concepts,
            text,
            self.limits.max_concepts,
            self.limits.context_chars,
        );

        let result = self.assemble(ranked, oracle_outcome, warnings);
        tracing::debug!(
            concepts = result.concepts.len(),
            differentiating = result.differentiating_terms.len(),
            common = result.common_terms.len(),
            "Concept extraction complete"
        );
        result
    }

    /// Runs the three deterministic extractors and merges their candidates.
    #[must_use]
    pub fn candidates(&self, text: &str) -> Vec<Concept> {
        let lowercased = text.to_lowercase();

        let keywords = extract_keywords(&lowercased, self.limits.max_keyword_candidates);
        let technical = extract_technical_terms(text);
        let phrases = extract_phrases(
            &lowercased,
            PhraseLimits {
                max_bigrams: self.limits.max_bigrams,
                max_trigrams: self.limits.max_trigrams,
                min_occurrences: self.limits.min_phrase_occurrences,
            },
        );

        tracing::trace!(
            keywords = keywords.len(),
            technical = technical.len(),
            phrases = phrases.len(),
            "Deterministic candidates"
        );

        merge_concepts([keywords, technical, phrases])
    }

    /// Applies oracle suggestions in place; any oracle error degrades.
    async fn enhance(
        &self,
        oracle: &SemanticOracle,
        concepts: &mut Vec<Concept>,
        text: &str,
        domain_hint: Option<&str>,
        warnings: &mut Vec<String>,
    ) -> OracleOutcome {
        let mut by_frequency: Vec<&Concept> = concepts.iter().collect();
        by_frequency.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        let terms: Vec<&str> = by_frequency
            .into_iter()
            .take(self.limits.oracle_candidate_count)
            .map(|c| c.term.as_str())
            .collect();
        let excerpt = truncate_chars(text, self.limits.oracle_excerpt_chars);

        match oracle.enhance_concepts(&terms, excerpt, domain_hint).await {
            Ok(suggestions) => {
                let changed = apply_suggestions(
                    concepts,
                    &suggestions.differentiating_terms,
                    &suggestions.methodological_terms,
                    &suggestions.additional_concepts,
                    self.limits.max_oracle_term_chars,
                );
                tracing::debug!(changed, "Applied oracle suggestions");
                OracleOutcome::Ok
            },
            Err(e) => {
                let kind = FailureKind::from(&e);
                let request_id = current_request_id();
                if kind.is_oracle() {
                    tracing::warn!(
                        error = %e,
                        failure_kind = kind.as_str(),
                        request_id = request_id.as_deref().unwrap_or("-"),
                        "Oracle enhancement failed, keeping deterministic concepts"
                    );
                } else {
                    tracing::error!(
                        error = %e,
                        failure_kind = kind.as_str(),
                        request_id = request_id.as_deref().unwrap_or("-"),
                        "Oracle stage faulted, keeping deterministic concepts"
                    );
                }
                warnings.push(format!("{kind}: {e}"));
                OracleOutcome::Degraded
            },
        }
    }

    fn assemble(
        &self,
        concepts: Vec<Concept>,
        oracle: OracleOutcome,
        warnings: Vec<String>,
    ) -> ExtractionResult {
        let project = |category: ConceptCategory| -> Vec<String> {
            concepts
                .iter()
                .filter(|c| c.category == category)
                .take(self.limits.max_term_list)
                .map(|c| c.term.clone())
                .collect()
        };
        let differentiating_terms = project(ConceptCategory::Differentiating);
        let common_terms = project(ConceptCategory::CommonDomain);

        let mut summary = BTreeMap::new();
        for concept in &concepts {
            *summary.entry(concept.category).or_insert(0) += 1;
        }

        ExtractionResult {
            success: true,
            concepts,
            differentiating_terms,
            common_terms,
            summary,
            oracle,
            warnings,
            error: None,
        }
    }
}

/// Extracts concepts with the deterministic pipeline only.
#[must_use]
pub fn extract_deterministic(text: &str, limits: &ExtractionLimits) -> Vec<Concept> {
    let service = ConceptExtractorService::without_oracle().with_limits(*limits);
    rank_concepts(
        service.candidates(text),
        text,
        limits.max_concepts,
        limits.context_chars,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmProvider;
    use crate::{Error, Result};
    use std::sync::{Arc, Mutex};

    const SCENARIO: &str = "The method uses a novel algorithm. The algorithm improves method efficiency. The method operates at 10GHz.";

    struct StubProvider {
        reply: std::result::Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubProvider {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn down() -> Arc<Self> {
            Arc::new(Self {
                reply: Err("connection refused".to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    impl LlmProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(Error::OracleUnavailable)
        }
    }

    fn service_with(stub: &Arc<StubProvider>) -> ConceptExtractorService {
        let provider: Arc<dyn LlmProvider> = stub.clone();
        ConceptExtractorService::new(SemanticOracle::new(provider))
    }

    #[tokio::test]
    async fn test_blank_input_fails() {
        let service = ConceptExtractorService::without_oracle();
        for text in ["", "   \n\t"] {
            let result = service.extract_concepts(text, None).await;
            assert!(!result.success);
            assert!(result.concepts.is_empty());
            let error = result.error.unwrap();
            assert_eq!(error.kind, FailureKind::InputEmpty);
            assert!(error.message.starts_with("No text provided"));
        }
    }

    #[tokio::test]
    async fn test_without_oracle_skips_stage() {
        let result = ConceptExtractorService::without_oracle()
            .extract_concepts(SCENARIO, Some("patent"))
            .await;
        assert!(result.success);
        assert_eq!(result.oracle, OracleOutcome::Skipped);
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_oracle_suggestions_applied() {
        let stub = StubProvider::ok(
            r#"{"differentiating_terms": ["efficiency"],
                "methodological_terms": ["operates"],
                "additional_concepts": ["frequency scaling", "Method"]}"#,
        );
        let result = service_with(&stub).extract_concepts(SCENARIO, None).await;

        assert!(result.success);
        assert_eq!(result.oracle, OracleOutcome::Ok);
        assert_eq!(
            result.concept("efficiency").unwrap().category,
            ConceptCategory::Differentiating
        );
        assert_eq!(
            result.concept("operates").unwrap().category,
            ConceptCategory::Methodological
        );
        let added = result.concept("frequency scaling").unwrap();
        assert_eq!(added.frequency, 1);
        assert_eq!(added.category, ConceptCategory::Differentiating);
        assert_eq!(
            result.concepts.iter().filter(|c| c.key() == "method").count(),
            1
        );
        assert!(result.differentiating_terms.contains(&"efficiency".to_string()));
    }

    #[tokio::test]
    async fn test_oversized_oracle_concept_keeps_extraction_alive() {
        let huge = "k".repeat(60_000);
        let stub = StubProvider::ok(&format!(
            r#"{{"additional_concepts": ["{huge}", "beam steering"]}}"#
        ));
        let result = service_with(&stub).extract_concepts(SCENARIO, None).await;

        assert!(result.success);
        assert_eq!(result.oracle, OracleOutcome::Ok);
        assert!(result.error.is_none());
        assert!(result.concept(&huge).is_none());
        assert!(result.concept("beam steering").is_some());
        assert!(result.concepts.iter().all(|c| c.term.chars().count() <= 100));
    }

    #[tokio::test]
    async fn test_oversized_term_within_raised_cap_gets_no_context() {
        let huge = "k".repeat(60_000);
        let stub = StubProvider::ok(&format!(r#"{{"additional_concepts": ["{huge}"]}}"#));
        let limits = ExtractionLimits {
            max_oracle_term_chars: usize::MAX,
            ..ExtractionLimits::default()
        };
        let result = service_with(&stub)
            .with_limits(limits)
            .extract_concepts(SCENARIO, None)
            .await;

        assert!(result.success);
        assert_eq!(result.oracle, OracleOutcome::Ok);
        assert!(result.concept(&huge).unwrap().context.is_none());
    }

    #[tokio::test]
    async fn test_oracle_prompt_contents() {
        let stub = StubProvider::ok("{}");
        let _ = service_with(&stub).extract_concepts(SCENARIO, Some("patent")).await;

        let prompts = stub.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("patent claim"));
        assert!(prompts[0].contains("method, algorithm"));
    }

    #[tokio::test]
    async fn test_oracle_failure_degrades() {
        let baseline = ConceptExtractorService::without_oracle()
            .extract_concepts(SCENARIO, None)
            .await;
        let stub = StubProvider::down();
        let result = service_with(&stub).extract_concepts(SCENARIO, None).await;

        assert!(result.success);
        assert_eq!(result.oracle, OracleOutcome::Degraded);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("ORACLE_UNAVAILABLE"));
        assert_eq!(result.concepts, baseline.concepts);
        assert_eq!(result.differentiating_terms, baseline.differentiating_terms);
        assert_eq!(result.common_terms, baseline.common_terms);
    }

    #[tokio::test]
    async fn test_malformed_oracle_reply_degrades() {
        let stub = StubProvider::ok("Sorry, I can't produce JSON today.");
        let result = service_with(&stub).extract_concepts(SCENARIO, None).await;
        assert!(result.success);
        assert_eq!(result.oracle, OracleOutcome::Degraded);
        assert!(result.warnings[0].starts_with("ORACLE_MALFORMED"));
    }

    #[tokio::test]
    async fn test_use_oracle_false_skips_configured_oracle() {
        let stub = StubProvider::ok("{}");
        let result = service_with(&stub)
            .extract_concepts_with(SCENARIO, None, false)
            .await;
        assert_eq!(result.oracle, OracleOutcome::Skipped);
        assert!(stub.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summary_and_projections() {
        let result = ConceptExtractorService::without_oracle()
            .extract_concepts(SCENARIO, None)
            .await;

        let total: usize = result.summary.values().sum();
        assert_eq!(total, result.concepts.len());
        assert_eq!(result.summary.get(&ConceptCategory::Methodological), Some(&2));
        assert_eq!(result.summary.get(&ConceptCategory::Technical), Some(&1));
        assert!(result.differentiating_terms.is_empty());
        assert_eq!(
            result.common_terms.len(),
            result.summary[&ConceptCategory::CommonDomain]
        );
    }

    #[test]
    fn test_extract_deterministic() {
        let concepts = extract_deterministic(SCENARIO, &ExtractionLimits::default());
        assert_eq!(concepts[0].term, "method");
        assert!((concepts[0].weight - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_candidates_merge_precedence() {
        let service = ConceptExtractorService::without_oracle();
        let concepts = service.candidates("Method and method. The METHOD.");
        let method: Vec<_> = concepts.iter().filter(|c| c.key() == "method").collect();
        assert_eq!(method.len(), 1);
        assert_eq!(method[0].category, ConceptCategory::Methodological);
        assert_eq!(method[0].frequency, 3);
    }
}
