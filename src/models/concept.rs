//! Concept extraction models.

use super::failure::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Category of an extracted concept.
///
/// Closed set: the weighting table in the ranker matches on it exhaustively.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ConceptCategory {
    /// Ordinary vocabulary expected in any document of the domain.
    #[default]
    CommonDomain,
    /// Term more likely to indicate a novel contribution.
    Differentiating,
    /// Method, process or approach vocabulary.
    Methodological,
    /// Units, measurements and acronyms.
    Technical,
}

impl ConceptCategory {
    /// Returns all category variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CommonDomain,
            Self::Differentiating,
            Self::Methodological,
            Self::Technical,
        ]
    }

    /// Returns the category as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CommonDomain => "common_domain",
            Self::Differentiating => "differentiating",
            Self::Methodological => "methodological",
            Self::Technical => "technical",
        }
    }

    /// Parses a category from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "common_domain" | "common" => Some(Self::CommonDomain),
            "differentiating" | "novel" => Some(Self::Differentiating),
            "methodological" | "method" => Some(Self::Methodological),
            "technical" | "tech" => Some(Self::Technical),
            _ => None,
        }
    }
}

impl fmt::Display for ConceptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConceptCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown concept category: {s}"))
    }
}

/// Which extractor produced a concept.
///
/// Merge precedence follows declaration order. Not serialized to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConceptSource {
    /// Single-word keyword extraction.
    #[default]
    Deterministic,
    /// Technical regex patterns.
    Pattern,
    /// Bigram/trigram mining.
    Phrase,
    /// Added by the semantic oracle.
    Oracle,
}

impl ConceptSource {
    /// Returns the source as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deterministic => "deterministic",
            Self::Pattern => "pattern",
            Self::Phrase => "phrase",
            Self::Oracle => "oracle",
        }
    }
}

/// A candidate term or phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// Term as it appeared (case preserved for display).
    pub term: String,
    /// Assigned category.
    pub category: ConceptCategory,
    /// Number of occurrences, at least 1.
    pub frequency: u32,
    /// Relevance weight in `[0.0, 1.0]`.
    pub weight: f64,
    /// First sentence containing the term, truncated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Provenance, used for merge tie-breaks and diagnostics.
    #[serde(skip)]
    pub source: ConceptSource,
}

impl Concept {
    /// Creates an unweighted candidate concept.
    #[must_use]
    pub fn candidate(
        term: impl Into<String>,
        category: ConceptCategory,
        frequency: u32,
        source: ConceptSource,
    ) -> Self {
        Self {
            term: term.into(),
            category,
            frequency: frequency.max(1),
            weight: 0.0,
            context: None,
            source,
        }
    }

    /// Returns the case-insensitive dedup key.
    #[must_use]
    pub fn key(&self) -> String {
        self.term.to_lowercase()
    }

    /// Number of whitespace-separated words in the term.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.term.split_whitespace().count().max(1)
    }
}

/// How the semantic oracle stage ended for one extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OracleOutcome {
    /// Suggestions were received and applied.
    Ok,
    /// The oracle failed; the deterministic result was kept unchanged.
    Degraded,
    /// The oracle stage was not run.
    #[default]
    Skipped,
}

/// Outcome of one concept extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExtractionResult {
    /// Whether extraction succeeded.
    pub success: bool,
    /// Ranked concepts, weight descending.
    pub concepts: Vec<Concept>,
    /// Differentiating terms, weight descending.
    pub differentiating_terms: Vec<String>,
    /// Common domain terms, weight descending.
    pub common_terms: Vec<String>,
    /// Number of concepts per category.
    pub summary: BTreeMap<ConceptCategory, usize>,
    /// How the oracle stage ended.
    pub oracle: OracleOutcome,
    /// Non-fatal issues encountered during the run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Set when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<PipelineError>,
}

impl ExtractionResult {
    /// Builds a failed result; every list field is empty.
    #[must_use]
    pub fn failed(error: PipelineError) -> Self {
        Self {
            success: false,
            error: Some(error),
            ..Self::default()
        }
    }

    /// Returns the error message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    /// Looks up a concept by case-insensitive term.
    #[must_use]
    pub fn concept(&self, term: &str) -> Option<&Concept> {
        let key = term.to_lowercase();
        self.concepts.iter().find(|c| c.key() == key)
    }
}
