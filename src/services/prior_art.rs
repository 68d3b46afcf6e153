//! Prior-art novelty scoring.
//!
//! Unlike extraction, scoring treats any oracle failure as a hard failure: a
//! risk verdict without a basis is never presented as a real classification.
//! Failures come back as [`NoveltyAssessment::fallback`] with actionable
//! recommendations.

use super::bucketing::bucket;
use super::oracle::{ClaimsReply, PriorArtQuery, PriorArtReply, SemanticOracle};
use super::truncate_chars;
use crate::config::{ExtractionLimits, InventixConfig};
use crate::models::{
    ClaimAnalysis, ClaimComparison, Confidence, FALLBACK_RISK_SCORE, FailureKind,
    NoveltyAssessment, PipelineError, PriorArtMatch, ProjectType, SimilarityLevel,
};
use crate::Error;
use crate::observability::current_request_id;
use tracing::instrument;

/// Title used when the oracle names no prior work.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Summary used when the oracle supplies none.
pub const DEFAULT_SUMMARY: &str = "Analysis complete.";

/// Evidence basis used when no match carries evidence.
pub const DEFAULT_EVIDENCE_BASIS: &str = "Based on semantic analysis";

/// Scores the novelty risk of a document against oracle-sourced prior art.
#[derive(Debug, Clone, Default)]
pub struct NoveltyScorer {
    oracle: Option<SemanticOracle>,
    limits: ExtractionLimits,
}

impl NoveltyScorer {
    /// Creates a scorer backed by the given oracle.
    #[must_use]
    pub fn new(oracle: SemanticOracle) -> Self {
        Self {
            oracle: Some(oracle),
            limits: ExtractionLimits::default(),
        }
    }

    /// Creates a scorer with no oracle. Every comparison returns the fallback.
    #[must_use]
    pub fn without_oracle() -> Self {
        Self::default()
    }

    /// Creates a scorer from configuration.
    #[must_use]
    pub fn from_config(config: &InventixConfig) -> Self {
        Self {
            oracle: SemanticOracle::from_config(&config.oracle),
            limits: config.extraction,
        }
    }

    /// Sets the prompt bounds.
    #[must_use]
    pub const fn with_limits(mut self, limits: ExtractionLimits) -> Self {
        self.limits = limits;
        self
    }

    fn oracle(&self) -> Result<&SemanticOracle, Error> {
        self.oracle
            .as_ref()
            .ok_or_else(|| Error::OracleUnavailable("no semantic oracle configured".to_string()))
    }

    /// Compares `text` against prior art and classifies the novelty risk.
    ///
    /// `extracted_concepts`, typically the differentiating terms from
    /// extraction, are passed to the oracle as hints.
    #[instrument(
        name = "inventix.compare_with_prior_art",
        skip(self, text, extracted_concepts),
        fields(text_len = text.len(), project_type = %project_type)
    )]
    pub async fn compare_with_prior_art(
        &self,
        text: &str,
        title: &str,
        project_type: ProjectType,
        extracted_concepts: Option<&[String]>,
    ) -> NoveltyAssessment {
        if text.trim().is_empty() {
            return NoveltyAssessment::fallback(PipelineError::new(
                FailureKind::InputEmpty,
                "No text provided for comparison",
            ));
        }

        let hints: Vec<String> = extracted_concepts
            .unwrap_or_default()
            .iter()
            .take(self.limits.comparison_concept_hint)
            .cloned()
            .collect();
        let query = PriorArtQuery {
            work_label: project_type.work_label(),
            prior_art_label: project_type.prior_art_label(),
            source_label: project_type.as_str(),
            title,
            excerpt: truncate_chars(text, self.limits.comparison_excerpt_chars),
            concept_hints: &hints,
        };

        let reply = match self.oracle() {
            Ok(oracle) => oracle.compare_prior_art(query).await,
            Err(e) => Err(e),
        };

        match reply {
            Ok(reply) => {
                let assessment = assess(reply, project_type);
                tracing::info!(
                    risk = %assessment.risk,
                    risk_score = assessment.risk_score,
                    matches = assessment.prior_art_matches.len(),
                    "Novelty assessment complete"
                );
                assessment
            },
            Err(e) => {
                let kind = log_failure(&e, "Prior art comparison failed, returning fallback assessment");
                NoveltyAssessment::fallback(PipelineError::new(
                    kind,
                    format!("Prior art analysis could not be completed: {e}"),
                ))
            },
        }
    }

    /// Analyzes each claim of a claim set for prior-art risk.
    ///
    /// Blank claims are dropped before numbering. Oracle failure is a hard
    /// failure. Risk levels the oracle reports in an unknown vocabulary are
    /// left absent.
    #[instrument(
        name = "inventix.compare_claims",
        skip(self, claims),
        fields(claims = claims.len())
    )]
    pub async fn compare_claims(&self, claims: &[String], title: &str) -> ClaimComparison {
        let claims: Vec<String> = claims
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if claims.is_empty() {
            return ClaimComparison::failed(PipelineError::new(
                FailureKind::InputEmpty,
                "No claims provided",
            ));
        }

        let reply = match self.oracle() {
            Ok(oracle) => oracle.analyze_claims(title, &claims).await,
            Err(e) => Err(e),
        };

        match reply {
            Ok(reply) => claim_comparison(reply, claims.len()),
            Err(e) => {
                let kind = log_failure(&e, "Claim analysis failed");
                ClaimComparison::failed(PipelineError::new(
                    kind,
                    format!("Claim analysis could not be completed: {e}"),
                ))
            },
        }
    }
}

/// Builds a successful assessment from an oracle reply, filling defaults.
#[must_use]
pub fn assess(reply: PriorArtReply, project_type: ProjectType) -> NoveltyAssessment {
    let prior_art_matches: Vec<PriorArtMatch> = reply
        .prior_art_matches
        .into_iter()
        .map(|m| {
            let similarity_score = clamp_score(m.similarity_score);
            PriorArtMatch {
                title: non_blank(m.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
                source: non_blank(m.source).unwrap_or_else(|| project_type.as_str().to_string()),
                similarity_score,
                similarity: bucket(similarity_score).into(),
                overlap_description: m.overlap_description.unwrap_or_default(),
                overlapping_concepts: m.overlapping_concepts,
                differentiating_aspects: m.differentiating_aspects,
                evidence: m.evidence.unwrap_or_default(),
            }
        })
        .collect();

    let risk_score = clamp_score(reply.overall_risk_score);
    let evidence_basis = evidence_basis(&prior_art_matches);

    NoveltyAssessment {
        success: true,
        risk: bucket(risk_score).into(),
        risk_score,
        confidence: reply
            .confidence
            .as_deref()
            .and_then(Confidence::parse)
            .unwrap_or_default(),
        prior_art_matches,
        novel_aspects: reply.novel_aspects,
        overlapping_aspects: reply.overlapping_aspects,
        recommendations: reply.recommendations,
        summary: non_blank(reply.summary).unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        evidence_basis,
        error: None,
    }
}

/// Joins the non-empty evidence of each match with "; ".
#[must_use]
pub fn evidence_basis(matches: &[PriorArtMatch]) -> String {
    let items: Vec<&str> = matches
        .iter()
        .map(|m| m.evidence.trim())
        .filter(|e| !e.is_empty())
        .collect();
    if items.is_empty() {
        DEFAULT_EVIDENCE_BASIS.to_string()
    } else {
        items.join("; ")
    }
}

fn claim_comparison(reply: ClaimsReply, claim_count: usize) -> ClaimComparison {
    let in_range = |n: u32| usize::try_from(n).is_ok_and(|n| n >= 1 && n <= claim_count);

    let claims_analysis = reply
        .claims_analysis
        .into_iter()
        .enumerate()
        .map(|(i, claim)| ClaimAnalysis {
            claim_number: claim
                .claim_number
                .unwrap_or_else(|| u32::try_from(i + 1).unwrap_or(u32::MAX)),
            risk_level: claim.risk_level.as_deref().and_then(SimilarityLevel::parse),
            similar_prior_art: claim.similar_prior_art.unwrap_or_default(),
            differentiating_elements: claim.differentiating_elements,
            recommendation: claim.recommendation.unwrap_or_default(),
        })
        .collect();

    ClaimComparison {
        success: true,
        claims_analysis,
        overall_assessment: reply.overall_assessment.unwrap_or_default(),
        strongest_claim: reply.strongest_claim.filter(|n| in_range(*n)),
        weakest_claim: reply.weakest_claim.filter(|n| in_range(*n)),
        error: None,
    }
}

/// Logs a scoring failure with the request ID and returns its kind.
///
/// Oracle failures are expected in operation; anything else is a fault.
fn log_failure(e: &Error, message: &str) -> FailureKind {
    let kind = FailureKind::from(e);
    let request_id = current_request_id();
    let request_id = request_id.as_deref().unwrap_or("-");
    if kind.is_oracle() {
        tracing::warn!(error = %e, failure_kind = kind.as_str(), request_id, "{message}");
    } else {
        tracing::error!(error = %e, failure_kind = kind.as_str(), request_id, "{message}");
    }
    kind
}

fn clamp_score(score: Option<f64>) -> f64 {
    score.unwrap_or(FALLBACK_RISK_SCORE).clamp(0.0, 1.0)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmProvider;
    use crate::models::NoveltyRisk;
    use std::sync::{Arc, Mutex};
    use test_case::test_case;

    struct StubProvider {
        reply: std::result::Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl LlmProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn complete(&self, prompt: &str) -> crate::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(Error::OracleUnavailable)
        }
    }

    fn scorer(reply: std::result::Result<&str, &str>) -> (NoveltyScorer, Arc<StubProvider>) {
        let stub = Arc::new(StubProvider {
            reply: reply.map(str::to_string).map_err(str::to_string),
            prompts: Mutex::new(Vec::new()),
        });
        let provider: Arc<dyn LlmProvider> = stub.clone();
        (NoveltyScorer::new(SemanticOracle::new(provider)), stub)
    }

    fn reply_with_risk(score: f64) -> PriorArtReply {
        PriorArtReply {
            overall_risk_score: Some(score),
            ..PriorArtReply::default()
        }
    }

    #[test_case(0.65 => NoveltyRisk::Red ; "red")]
    #[test_case(0.45 => NoveltyRisk::Yellow ; "yellow")]
    #[test_case(0.20 => NoveltyRisk::Green ; "green")]
    #[test_case(0.6 => NoveltyRisk::Red ; "red boundary")]
    #[test_case(0.3 => NoveltyRisk::Yellow ; "yellow boundary")]
    fn test_assess_risk(score: f64) -> NoveltyRisk {
        assess(reply_with_risk(score), ProjectType::Research).risk
    }

    #[test]
    fn test_assess_defaults() {
        let reply: PriorArtReply =
            serde_json::from_str(r#"{"prior_art_matches": [{}]}"#).unwrap();
        let assessment = assess(reply, ProjectType::Patent);

        assert!(assessment.success);
        assert!((assessment.risk_score - 0.5).abs() < f64::EPSILON);
        assert_eq!(assessment.risk, NoveltyRisk::Yellow);
        assert_eq!(assessment.confidence, Confidence::Medium);
        assert_eq!(assessment.summary, DEFAULT_SUMMARY);
        assert_eq!(assessment.evidence_basis, DEFAULT_EVIDENCE_BASIS);

        let m = &assessment.prior_art_matches[0];
        assert_eq!(m.title, UNKNOWN_TITLE);
        assert_eq!(m.source, "patent");
        assert_eq!(m.similarity, SimilarityLevel::Medium);
    }

    #[test]
    fn test_assess_clamps_scores() {
        let reply: PriorArtReply = serde_json::from_str(
            r#"{"prior_art_matches": [{"similarity_score": 1.7}], "overall_risk_score": -0.2}"#,
        )
        .unwrap();
        let assessment = assess(reply, ProjectType::Research);
        assert!((assessment.risk_score - 0.0).abs() < f64::EPSILON);
        assert_eq!(assessment.risk, NoveltyRisk::Green);
        assert!((assessment.prior_art_matches[0].similarity_score - 1.0).abs() < f64::EPSILON);
        assert_eq!(assessment.prior_art_matches[0].similarity, SimilarityLevel::High);
    }

    #[test]
    fn test_evidence_basis_joined() {
        let reply: PriorArtReply = serde_json::from_str(
            r#"{"prior_art_matches": [
                {"evidence": "uses phased arrays"},
                {"evidence": "  "},
                {"evidence": "adaptive nulling"}
            ]}"#,
        )
        .unwrap();
        let assessment = assess(reply, ProjectType::Research);
        assert_eq!(
            assessment.evidence_basis,
            "uses phased arrays; adaptive nulling"
        );
    }

    #[tokio::test]
    async fn test_compare_success() {
        let (scorer, stub) = scorer(Ok(r#"{
            "prior_art_matches": [
                {"title": "Phased array sonar", "source": "patent", "similarity_score": 0.72,
                 "overlap_description": "Same array layout", "overlapping_concepts": ["array"],
                 "differentiating_aspects": ["nulling"], "evidence": "a linear array"}
            ],
            "novel_aspects": ["adaptive nulling"],
            "overlapping_aspects": ["linear array"],
            "overall_risk_score": 0.45,
            "confidence": "high",
            "summary": "Partial overlap.",
            "recommendations": ["Narrow claim 1"]
        }"#));

        let concepts = vec!["nulling".to_string(); 40];
        let assessment = scorer
            .compare_with_prior_art(
                "A sonar with adaptive nulling.",
                "Sonar",
                ProjectType::Patent,
                Some(&concepts),
            )
            .await;

        assert!(assessment.success);
        assert_eq!(assessment.risk, NoveltyRisk::Yellow);
        assert_eq!(assessment.confidence, Confidence::High);
        assert_eq!(assessment.prior_art_matches[0].similarity, SimilarityLevel::High);
        assert_eq!(assessment.evidence_basis, "a linear array");
        assert_eq!(assessment.recommendations, vec!["Narrow claim 1"]);

        let prompts = stub.prompts.lock().unwrap();
        assert!(prompts[0].contains("patent claim"));
        assert!(prompts[0].contains("existing patents"));
        assert_eq!(prompts[0].matches("nulling").count() - 1, 15);
    }

    #[tokio::test]
    async fn test_compare_oracle_down_falls_back() {
        let (scorer, _) = scorer(Err("connection refused"));
        let assessment = scorer
            .compare_with_prior_art("A sonar.", "Sonar", ProjectType::Research, None)
            .await;

        assert!(!assessment.success);
        assert_eq!(assessment.risk, NoveltyRisk::Unknown);
        assert!((assessment.risk_score - 0.5).abs() < f64::EPSILON);
        assert_eq!(assessment.confidence, Confidence::Low);
        assert_eq!(assessment.recommendations.len(), 2);
        assert_eq!(
            assessment.error.unwrap().kind,
            FailureKind::OracleUnavailable
        );
    }

    #[tokio::test]
    async fn test_compare_malformed_falls_back() {
        let (scorer, _) = scorer(Ok("no json here"));
        let assessment = scorer
            .compare_with_prior_art("A sonar.", "Sonar", ProjectType::Research, None)
            .await;
        assert!(!assessment.success);
        assert_eq!(assessment.error.unwrap().kind, FailureKind::OracleMalformed);
    }

    #[tokio::test]
    async fn test_compare_blank_input() {
        let (scorer, stub) = scorer(Ok("{}"));
        let assessment = scorer
            .compare_with_prior_art("  ", "Sonar", ProjectType::Research, None)
            .await;
        assert!(!assessment.success);
        assert_eq!(assessment.risk, NoveltyRisk::Unknown);
        assert_eq!(assessment.error.unwrap().kind, FailureKind::InputEmpty);
        assert!(stub.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_compare_without_oracle() {
        let assessment = NoveltyScorer::without_oracle()
            .compare_with_prior_art("A sonar.", "Sonar", ProjectType::Research, None)
            .await;
        assert!(!assessment.success);
        assert_eq!(
            assessment.error.unwrap().kind,
            FailureKind::OracleUnavailable
        );
    }

    #[tokio::test]
    async fn test_compare_claims() {
        let (scorer, stub) = scorer(Ok(r#"{
            "claims_analysis": [
                {"claim_number": 1, "risk_level": "high", "similar_prior_art": "US 1",
                 "differentiating_elements": [], "recommendation": "Narrow"},
                {"risk_level": "catastrophic"}
            ],
            "overall_assessment": "Mixed",
            "strongest_claim": 2,
            "weakest_claim": 9
        }"#));
        let claims = vec!["A device.".to_string(), "The device of claim 1.".to_string()];
        let comparison = scorer.compare_claims(&claims, "Sonar").await;

        assert!(comparison.success);
        assert_eq!(comparison.claims_analysis.len(), 2);
        assert_eq!(comparison.claims_analysis[0].risk_level, Some(SimilarityLevel::High));
        assert_eq!(comparison.claims_analysis[1].claim_number, 2);
        assert_eq!(comparison.claims_analysis[1].risk_level, None);
        assert_eq!(comparison.strongest_claim, Some(2));
        assert_eq!(comparison.weakest_claim, None);
        assert!(stub.prompts.lock().unwrap()[0].contains("Claim 2: The device of claim 1."));
    }

    #[tokio::test]
    async fn test_compare_claims_skips_blank_entries() {
        let (scorer, stub) = scorer(Ok(r#"{"claims_analysis": [], "strongest_claim": 2}"#));
        let claims = vec![
            "A device.".to_string(),
            "   ".to_string(),
            String::new(),
            " The device of claim 1. ".to_string(),
        ];
        let comparison = scorer.compare_claims(&claims, "Sonar").await;

        assert!(comparison.success);
        assert_eq!(comparison.strongest_claim, Some(2));
        let prompts = stub.prompts.lock().unwrap();
        assert!(prompts[0].contains("Claim 1: A device.\nClaim 2: The device of claim 1."));
        assert!(!prompts[0].contains("Claim 3"));
    }

    #[tokio::test]
    async fn test_compare_claims_all_blank() {
        let (scorer, stub) = scorer(Ok("{}"));
        let comparison = scorer
            .compare_claims(&[" ".to_string(), "\n".to_string()], "Sonar")
            .await;
        assert!(!comparison.success);
        assert_eq!(comparison.error.unwrap().kind, FailureKind::InputEmpty);
        assert!(stub.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_compare_claims_empty() {
        let (scorer, _) = scorer(Ok("{}"));
        let comparison = scorer.compare_claims(&[], "Sonar").await;
        assert!(!comparison.success);
        assert_eq!(comparison.error.unwrap().kind, FailureKind::InputEmpty);
    }

    #[tokio::test]
    async fn test_compare_claims_oracle_failure_is_hard() {
        let (scorer, _) = scorer(Err("boom"));
        let comparison = scorer
            .compare_claims(&["A device.".to_string()], "Sonar")
            .await;
        assert!(!comparison.success);
        assert!(comparison.claims_analysis.is_empty());
        assert!(
            comparison
                .error
                .unwrap()
                .message
                .starts_with("Claim analysis could not be completed")
        );
    }
}
