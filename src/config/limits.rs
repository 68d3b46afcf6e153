//! Extraction and comparison bounds.
//!
//! Every cap used by the pipelines lives here so the numbers are single-sourced.

use serde::Deserialize;

/// Maximum number of concepts returned.
pub const DEFAULT_MAX_CONCEPTS: usize = 50;
/// Maximum length of the differentiating/common term lists.
pub const DEFAULT_MAX_TERM_LIST: usize = 20;
/// Most frequent single-word candidates kept before merging.
pub const DEFAULT_MAX_KEYWORD_CANDIDATES: usize = 100;
/// Most frequent bigrams considered.
pub const DEFAULT_MAX_BIGRAMS: usize = 30;
/// Most frequent trigrams considered.
pub const DEFAULT_MAX_TRIGRAMS: usize = 20;
/// Minimum occurrences for a phrase to be kept.
pub const DEFAULT_MIN_PHRASE_OCCURRENCES: u32 = 2;
/// Candidates sent to the oracle for recategorization.
pub const DEFAULT_ORACLE_CANDIDATE_COUNT: usize = 30;
/// Characters of input text sent with the recategorization request.
pub const DEFAULT_ORACLE_EXCERPT_CHARS: usize = 1_000;
/// Longest concept, in characters, the oracle may add.
pub const DEFAULT_MAX_ORACLE_TERM_CHARS: usize = 100;
/// Maximum characters of a concept's context sentence.
pub const DEFAULT_CONTEXT_CHARS: usize = 200;
/// Characters of input text sent with a prior-art comparison.
pub const DEFAULT_COMPARISON_EXCERPT_CHARS: usize = 2_500;
/// Concept hints sent with a prior-art comparison.
pub const DEFAULT_COMPARISON_CONCEPT_HINT: usize = 15;

/// Bounds applied by the extraction and comparison pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractionLimits {
    /// Maximum number of ranked concepts.
    pub max_concepts: usize,
    /// Maximum length of `differentiating_terms` and `common_terms`.
    pub max_term_list: usize,
    /// Single-word candidates kept, most frequent first.
    pub max_keyword_candidates: usize,
    /// Bigrams considered, most frequent first.
    pub max_bigrams: usize,
    /// Trigrams considered, most frequent first.
    pub max_trigrams: usize,
    /// Minimum occurrences for a phrase.
    pub min_phrase_occurrences: u32,
    /// Candidates sent to the oracle.
    pub oracle_candidate_count: usize,
    /// Excerpt length for recategorization.
    pub oracle_excerpt_chars: usize,
    /// Longest additional concept accepted from the oracle.
    pub max_oracle_term_chars: usize,
    /// Context sentence length.
    pub context_chars: usize,
    /// Excerpt length for prior-art comparison.
    pub comparison_excerpt_chars: usize,
    /// Concept hints for prior-art comparison.
    pub comparison_concept_hint: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_concepts: DEFAULT_MAX_CONCEPTS,
            max_term_list: DEFAULT_MAX_TERM_LIST,
            max_keyword_candidates: DEFAULT_MAX_KEYWORD_CANDIDATES,
            max_bigrams: DEFAULT_MAX_BIGRAMS,
            max_trigrams: DEFAULT_MAX_TRIGRAMS,
            min_phrase_occurrences: DEFAULT_MIN_PHRASE_OCCURRENCES,
            oracle_candidate_count: DEFAULT_ORACLE_CANDIDATE_COUNT,
            oracle_excerpt_chars: DEFAULT_ORACLE_EXCERPT_CHARS,
            max_oracle_term_chars: DEFAULT_MAX_ORACLE_TERM_CHARS,
            context_chars: DEFAULT_CONTEXT_CHARS,
            comparison_excerpt_chars: DEFAULT_COMPARISON_EXCERPT_CHARS,
            comparison_concept_hint: DEFAULT_COMPARISON_CONCEPT_HINT,
        }
    }
}
