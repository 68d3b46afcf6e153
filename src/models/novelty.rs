//! Prior-art comparison and novelty risk models.

use super::failure::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk score reported when no classification could be made.
pub const FALLBACK_RISK_SCORE: f64 = 0.5;

/// Recommendations attached to every failed assessment.
pub const FALLBACK_RECOMMENDATIONS: &[&str] = &[
    "Retry the analysis with more detailed input",
    "Consider a manual prior art search",
];

/// Degree of similarity between the user's work and one prior-art item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityLevel {
    /// Score below 0.3.
    Low,
    /// Score in `[0.3, 0.6)`.
    Medium,
    /// Score of 0.6 or more.
    High,
}

impl SimilarityLevel {
    /// Returns the level as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a level from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "moderate" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for SimilarityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traffic-light novelty risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoveltyRisk {
    /// Low overlap, higher differentiation.
    Green,
    /// Partial overlap, moderate differentiation.
    Yellow,
    /// Strong overlap, crowded prior art.
    Red,
    /// No basis for a classification.
    Unknown,
}

impl NoveltyRisk {
    /// Returns the risk as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NoveltyRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence the oracle reports for its assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Weak basis.
    Low,
    /// Reasonable basis.
    #[default]
    Medium,
    /// Strong basis.
    High,
}

impl Confidence {
    /// Returns the confidence as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a confidence from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "moderate" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work being assessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// A patent claim or application.
    Patent,
    /// A research idea or paper.
    #[default]
    Research,
}

impl ProjectType {
    /// Returns the project type as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Patent => "patent",
            Self::Research => "research",
        }
    }

    /// Parses a project type. Anything other than "patent" is research.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("patent") {
            Self::Patent
        } else {
            Self::Research
        }
    }

    /// How the user's work is described to the oracle.
    #[must_use]
    pub const fn work_label(&self) -> &'static str {
        match self {
            Self::Patent => "patent claim",
            Self::Research => "research idea",
        }
    }

    /// How the body of prior art is described to the oracle.
    #[must_use]
    pub const fn prior_art_label(&self) -> &'static str {
        match self {
            Self::Patent => "existing patents",
            Self::Research => "published research",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One oracle-sourced comparable prior work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorArtMatch {
    /// Title of the prior work.
    pub title: String,
    /// Kind of source ("patent", "research", ...).
    pub source: String,
    /// Similarity in `[0.0, 1.0]`.
    pub similarity_score: f64,
    /// Bucket of `similarity_score`.
    pub similarity: SimilarityLevel,
    /// Short description of the overlap.
    pub overlap_description: String,
    /// Concepts shared with the prior work.
    pub overlapping_concepts: Vec<String>,
    /// Aspects that set the user's work apart.
    pub differentiating_aspects: Vec<String>,
    /// Quote or claim showing the overlap.
    pub evidence: String,
}

/// Aggregate novelty risk verdict.
///
/// `risk == Unknown` exactly when `success == false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoveltyAssessment {
    /// Whether a classification could be made.
    pub success: bool,
    /// Traffic-light risk.
    pub risk: NoveltyRisk,
    /// Aggregate risk score in `[0.0, 1.0]`, higher is riskier.
    pub risk_score: f64,
    /// Oracle confidence.
    pub confidence: Confidence,
    /// Comparable prior works.
    pub prior_art_matches: Vec<PriorArtMatch>,
    /// Elements judged novel.
    pub novel_aspects: Vec<String>,
    /// Elements judged overlapping.
    pub overlapping_aspects: Vec<String>,
    /// Next steps for the user.
    pub recommendations: Vec<String>,
    /// Short summary of the assessment.
    pub summary: String,
    /// Semicolon-joined evidence trail.
    pub evidence_basis: String,
    /// Set when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<PipelineError>,
}

impl NoveltyAssessment {
    /// Builds the complete fallback assessment returned on any failure.
    #[must_use]
    pub fn fallback(error: PipelineError) -> Self {
        Self {
            success: false,
            risk: NoveltyRisk::Unknown,
            risk_score: FALLBACK_RISK_SCORE,
            confidence: Confidence::Low,
            prior_art_matches: Vec::new(),
            novel_aspects: Vec::new(),
            overlapping_aspects: Vec::new(),
            recommendations: FALLBACK_RECOMMENDATIONS
                .iter()
                .map(|r| (*r).to_string())
                .collect(),
            summary: "Prior art comparison could not be completed.".to_string(),
            evidence_basis: "Insufficient data".to_string(),
            error: Some(error),
        }
    }

    /// Returns the error message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}

/// Oracle assessment of a single claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimAnalysis {
    /// 1-based claim number.
    pub claim_number: u32,
    /// Risk level, absent when the oracle gave none we recognize.
    pub risk_level: Option<SimilarityLevel>,
    /// Description of similar existing claims.
    pub similar_prior_art: String,
    /// What makes the claim unique.
    pub differentiating_elements: Vec<String>,
    /// How to strengthen the claim.
    pub recommendation: String,
}

/// Clause-level comparison of a claim set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClaimComparison {
    /// Whether the comparison completed.
    pub success: bool,
    /// Per-claim analysis.
    pub claims_analysis: Vec<ClaimAnalysis>,
    /// Summary of the claim set.
    pub overall_assessment: String,
    /// Claim number judged strongest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strongest_claim: Option<u32>,
    /// Claim number judged weakest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weakest_claim: Option<u32>,
    /// Set when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<PipelineError>,
}

impl ClaimComparison {
    /// Builds a failed claim comparison.
    #[must_use]
    pub fn failed(error: PipelineError) -> Self {
        Self {
            success: false,
            error: Some(error),
            ..Self::default()
        }
    }
}
