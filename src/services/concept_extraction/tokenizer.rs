//! Word tokenization, stopword filtering and keyword counting.
// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use crate::models::{Concept, ConceptCategory, ConceptSource};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Function words never treated as concepts.
pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "shall", "can", "need",
    "this", "that", "these", "those", "it", "its", "they", "them", "their", "we", "us", "our",
    "you", "your", "he", "she", "him", "her", "his", "which", "what", "who", "whom", "whose",
    "when", "where", "why", "how", "all", "each", "every", "both", "few", "more", "most",
    "other", "some", "such", "no", "not", "only", "same", "so", "than", "too", "very", "just",
    "also", "now", "here", "there", "then", "once", "if", "any", "about", "into", "through",
    "during", "before", "after", "above", "below", "up", "down", "out", "off", "over", "under",
    "again", "further", "however", "therefore", "thus", "hence",
];

/// Vocabulary describing methods, processes and approaches.
pub const METHODOLOGICAL_KEYWORDS: &[&str] = &[
    "method",
    "approach",
    "technique",
    "algorithm",
    "process",
    "procedure",
    "framework",
    "model",
    "system",
    "architecture",
    "design",
    "implementation",
    "analysis",
    "synthesis",
    "optimization",
    "evaluation",
    "validation",
    "training",
    "testing",
    "inference",
    "preprocessing",
    "postprocessing",
    "extraction",
    "classification",
    "detection",
    "recognition",
    "generation",
    "learning",
    "regression",
    "clustering",
    "segmentation",
    "transformation",
];

/// Keywords must be longer than this many characters.
pub const MIN_KEYWORD_CHARS: usize = 2;

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

static METHODOLOGICAL_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| METHODOLOGICAL_KEYWORDS.iter().copied().collect());

/// Identifier-like words: a letter, then letters, digits or inner hyphens.
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[a-z][a-z0-9-]*[a-z0-9]\b|\b[a-z]\b").expect("static regex: word token")
});

/// Returns true if the word is a stopword. Expects lowercase input.
#[must_use]
pub fn is_stopword(word: &str) -> bool {
    STOPWORD_SET.contains(word)
}

/// Returns true if the word belongs to the methodological vocabulary.
#[must_use]
pub fn is_methodological(word: &str) -> bool {
    METHODOLOGICAL_SET.contains(word)
}

/// Lazily yields word tokens from already-lowercased text.
pub fn tokenize(lowercased: &str) -> impl Iterator<Item = &str> + '_ {
    WORD_PATTERN.find_iter(lowercased).map(|m| m.as_str())
}

/// Lazily yields keyword candidates: tokens that are not stopwords and are
/// longer than [`MIN_KEYWORD_CHARS`].
pub fn keywords(lowercased: &str) -> impl Iterator<Item = &str> + '_ {
    tokenize(lowercased).filter(|w| w.len() > MIN_KEYWORD_CHARS && !is_stopword(w))
}

/// Counts keyword candidates and returns the `limit` most frequent as concepts.
///
/// Ties keep first-occurrence order. Methodological vocabulary is categorized
/// as such; every other word starts as common domain vocabulary.
#[must_use]
pub fn extract_keywords(lowercased: &str, limit: usize) -> Vec<Concept> {
    top_by_count(keywords(lowercased), limit)
        .into_iter()
        .map(|(word, count)| {
            let category = if is_methodological(word) {
                ConceptCategory::Methodological
            } else {
                ConceptCategory::CommonDomain
            };
            Concept::candidate(word, category, count, ConceptSource::Deterministic)
        })
        .collect()
}

/// Counts items and returns the `limit` most frequent, ties in first-seen order.
pub(super) fn top_by_count<T, I>(items: I, limit: usize) -> Vec<(T, u32)>
where
    T: std::hash::Hash + Eq + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut tallies: Vec<(T, u32)> = Vec::new();

    for item in items {
        if let Some(&slot) = counts.get(&item) {
            tallies[slot].1 = tallies[slot].1.saturating_add(1);
        } else {
            counts.insert(item.clone(), tallies.len());
            tallies.push((item, 1));
        }
    }

    // Stable sort keeps first-occurrence order among equal counts.
    tallies.sort_by(|a, b| b.1.cmp(&a.1));
    tallies.truncate(limit);
    tallies
}
