//! Bigram and trigram mining.

use super::tokenizer::{is_stopword, tokenize, top_by_count};
use crate::models::{Concept, ConceptCategory, ConceptSource};

/// Bounds for phrase mining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseLimits {
    /// Most frequent bigrams considered.
    pub max_bigrams: usize,
    /// Most frequent trigrams considered.
    pub max_trigrams: usize,
    /// Minimum occurrences for a phrase to be kept.
    pub min_occurrences: u32,
}

/// Mines repeated phrases from already-lowercased text.
///
/// Bigrams need two non-stopwords; trigrams need non-stopword ends and may
/// carry a stopword in the middle ("signal to noise"). The most frequent
/// bigrams and trigrams are taken first, then anything below
/// `min_occurrences` is dropped. Bigrams precede trigrams in the output.
#[must_use]
pub fn extract_phrases(lowercased: &str, limits: PhraseLimits) -> Vec<Concept> {
    let words: Vec<&str> = tokenize(lowercased).filter(|w| w.len() >= 2).collect();

    let bigrams = words
        .windows(2)
        .filter(|w| !is_stopword(w[0]) && !is_stopword(w[1]))
        .map(|w| w.join(" "));

    let trigrams: Vec<String> = words
        .windows(3)
        .filter(|w| !is_stopword(w[0]) && !is_stopword(w[2]))
        .map(|w| w.join(" "))
        .collect();

    top_by_count(bigrams, limits.max_bigrams)
        .into_iter()
        .chain(top_by_count(trigrams, limits.max_trigrams))
        .filter(|(_, count)| *count >= limits.min_occurrences)
        .map(|(phrase, count)| {
            Concept::candidate(phrase, ConceptCategory::CommonDomain, count, ConceptSource::Phrase)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: PhraseLimits = PhraseLimits {
        max_bigrams: 30,
        max_trigrams: 20,
        min_occurrences: 2,
    };

    fn terms(text: &str, limits: PhraseLimits) -> Vec<(String, u32)> {
        extract_phrases(text, limits)
            .into_iter()
            .map(|c| (c.term, c.frequency))
            .collect()
    }

    #[test]
    fn test_single_occurrence_excluded() {
        let found = terms(
            "the method uses a novel algorithm. the algorithm improves method efficiency.",
            LIMITS,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_repeated_bigram_kept() {
        let found = terms(
            "neural network layers feed a neural network output. another neural network.",
            LIMITS,
        );
        assert_eq!(found, vec![("neural network".to_string(), 3)]);
    }

    #[test]
    fn test_trigram_allows_inner_stopword() {
        let found = terms(
            "signal to noise ratio matters; signal to noise is measured",
            LIMITS,
        );
        assert!(found.contains(&("signal to noise".to_string(), 2)));
        assert!(!found.iter().any(|(t, _)| t == "signal to"));
    }

    #[test]
    fn test_bigrams_precede_trigrams() {
        let found = terms(
            "deep sensor array fusion and deep sensor array fusion",
            LIMITS,
        );
        let kinds: Vec<usize> = found.iter().map(|(t, _)| t.split(' ').count()).collect();
        let first_trigram = kinds.iter().position(|&n| n == 3).unwrap();
        assert!(kinds[..first_trigram].iter().all(|&n| n == 2));
        assert!(kinds[first_trigram..].iter().all(|&n| n == 3));
    }

    #[test]
    fn test_caps_apply_before_threshold() {
        let limits = PhraseLimits {
            max_bigrams: 1,
            max_trigrams: 0,
            min_occurrences: 2,
        };
        let found = terms("alpha beta alpha beta gamma delta gamma delta", limits);
        assert_eq!(found, vec![("alpha beta".to_string(), 2)]);
    }

    #[test]
    fn test_phrase_source_and_category() {
        let concepts = extract_phrases("beam steering and beam steering", LIMITS);
        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].category, ConceptCategory::CommonDomain);
        assert_eq!(concepts[0].source, ConceptSource::Phrase);
    }
}
