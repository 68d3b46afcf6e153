//! Business logic services.
//!
//! Services orchestrate the deterministic extractors and the semantic oracle
//! and fold every failure into a result object.

pub mod bucketing;
pub mod concept_extraction;
pub mod oracle;
pub mod prior_art;

pub use bucketing::{HIGH_THRESHOLD, MEDIUM_THRESHOLD, ScoreBand, bucket};
pub use concept_extraction::ConceptExtractorService;
pub use oracle::{OracleRequest, PriorArtQuery, ResponseFormat, SemanticOracle};
pub use prior_art::NoveltyScorer;

/// Returns the longest prefix of `text` holding at most `max_chars` characters.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(idx, _)| &text[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
    }
}
