//! Property-based tests for extraction and bucketing invariants.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Ranked concepts are bounded, weighted in `[0, 1]` and sorted
//! - Extraction is deterministic
//! - Terms are unique case-insensitively
//! - Bucketing is monotonic and total

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use inventix::services::ScoreBand;
use inventix::services::concept_extraction::{extract_deterministic, weight};
use inventix::{
    ConceptCategory, ConceptExtractorService, ExtractionLimits, NoveltyRisk, SimilarityLevel,
    bucket,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn vocabulary() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "the", "method", "sonar", "array", "adaptive", "nulling", "of", "a", "10GHz", "5mm",
            "95%", "FPGA", "signal", "to", "noise", "ratio", "model", "beam", "steering", ".",
            "LIDAR-X", "efficiency", "and",
        ]),
        0..120,
    )
    .prop_map(|words| words.join(" "))
}

fn band_rank(band: ScoreBand) -> u8 {
    match band {
        ScoreBand::Low => 0,
        ScoreBand::Medium => 1,
        ScoreBand::High => 2,
    }
}

proptest! {
    /// Property: ranked output respects the configured bounds.
    #[test]
    fn prop_ranked_concepts_bounded(text in vocabulary()) {
        let concepts = extract_deterministic(&text, &ExtractionLimits::default());

        prop_assert!(concepts.len() <= 50);
        for concept in &concepts {
            prop_assert!((0.0..=1.0).contains(&concept.weight));
            prop_assert!(concept.frequency >= 1);
            if let Some(context) = &concept.context {
                prop_assert!(context.chars().count() <= 200);
            }
        }
        prop_assert!(concepts.windows(2).all(|w| w[0].weight >= w[1].weight));
    }

    /// Property: no two concepts share a lowercase term.
    #[test]
    fn prop_terms_unique(text in vocabulary()) {
        let concepts = extract_deterministic(&text, &ExtractionLimits::default());
        let keys: HashSet<String> = concepts.iter().map(|c| c.term.to_lowercase()).collect();
        prop_assert_eq!(keys.len(), concepts.len());
    }

    /// Property: identical input yields identical results without an oracle.
    #[test]
    fn prop_extraction_deterministic(text in "[a-zA-Z0-9 .%-]{0,300}") {
        let service = ConceptExtractorService::without_oracle();
        let first = tokio_test::block_on(service.extract_concepts(&text, None));
        let second = tokio_test::block_on(service.extract_concepts(&text, None));
        prop_assert_eq!(first.success, !text.trim().is_empty());
        prop_assert_eq!(first, second);
    }

    /// Property: term lists are bounded projections of the concepts.
    #[test]
    fn prop_term_lists_are_projections(text in vocabulary()) {
        let service = ConceptExtractorService::without_oracle();
        let result = tokio_test::block_on(service.extract_concepts(&text, None));

        prop_assert!(result.differentiating_terms.len() <= 20);
        prop_assert!(result.common_terms.len() <= 20);
        for term in &result.common_terms {
            let concept = result.concept(term).unwrap();
            prop_assert_eq!(concept.category, ConceptCategory::CommonDomain);
        }
        let total: usize = result.summary.values().sum();
        prop_assert_eq!(total, result.concepts.len());
    }

    /// Property: bucketing is monotonic in the score.
    #[test]
    fn prop_bucket_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(band_rank(bucket(lo)) <= band_rank(bucket(hi)));
    }

    /// Property: similarity and risk buckets always agree.
    #[test]
    fn prop_similarity_and_risk_agree(score in 0.0f64..=1.0) {
        let similarity: SimilarityLevel = bucket(score).into();
        let risk: NoveltyRisk = bucket(score).into();
        let expected = match similarity {
            SimilarityLevel::Low => NoveltyRisk::Green,
            SimilarityLevel::Medium => NoveltyRisk::Yellow,
            SimilarityLevel::High => NoveltyRisk::Red,
        };
        prop_assert_eq!(risk, expected);
    }

    /// Property: weights stay within `[0, 1]` for any frequency and length.
    #[test]
    fn prop_weight_in_range(
        frequency in 1u32..1000,
        extra in 0u32..1000,
        words in 1usize..12,
        category in prop::sample::select(ConceptCategory::all().to_vec()),
    ) {
        let w = weight(frequency, frequency + extra, category, words);
        prop_assert!((0.0..=1.0).contains(&w));
    }
}
