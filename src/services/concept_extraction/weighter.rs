//! Concept weighting, context lookup and ranking.

use crate::models::{Concept, ConceptCategory};
use crate::{Error, Result};
use regex::RegexBuilder;

/// Multiplier applied per category before clamping.
#[must_use]
pub const fn category_boost(category: ConceptCategory) -> f64 {
    match category {
        ConceptCategory::Differentiating => 1.5,
        ConceptCategory::Technical => 1.3,
        ConceptCategory::Methodological => 1.2,
        ConceptCategory::CommonDomain => 1.0,
    }
}

/// Bonus for multi-word terms: 1.0 for one word, +0.1 per extra word.
#[must_use]
pub fn length_bonus(word_count: usize) -> f64 {
    let extra = u32::try_from(word_count.saturating_sub(1)).unwrap_or(u32::MAX);
    0.1f64.mul_add(f64::from(extra), 1.0)
}

/// Computes a weight in `[0.0, 1.0]`, rounded to three decimals.
#[must_use]
pub fn weight(frequency: u32, max_frequency: u32, category: ConceptCategory, word_count: usize) -> f64 {
    let normalized = f64::from(frequency) / f64::from(max_frequency.max(1));
    let raw = normalized * category_boost(category) * length_bonus(word_count);
    round3(raw.clamp(0.0, 1.0))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Weights, ranks and truncates concepts, then fills in their context.
///
/// Sorting is stable, so equal weights keep merge order. A term whose
/// context pattern cannot be built gets no context.
#[must_use]
pub fn rank_concepts(
    mut concepts: Vec<Concept>,
    text: &str,
    max_concepts: usize,
    context_chars: usize,
) -> Vec<Concept> {
    let max_frequency = concepts.iter().map(|c| c.frequency).max().unwrap_or(1);

    for concept in &mut concepts {
        concept.weight = weight(
            concept.frequency,
            max_frequency,
            concept.category,
            concept.word_count(),
        );
    }

    concepts.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    concepts.truncate(max_concepts);

    for concept in &mut concepts {
        concept.context = match find_context(text, &concept.term, context_chars) {
            Ok(context) => context,
            Err(e) => {
                tracing::debug!(
                    term_len = concept.term.len(),
                    source = concept.source.as_str(),
                    error = %e,
                    "Skipping context lookup"
                );
                None
            },
        };
    }

    concepts
}

/// Finds the first sentence (text up to a period) containing `term`,
/// case-insensitively, truncated to `max_chars` characters.
///
/// Word boundaries are required only at term edges that are word characters,
/// so terms like "95%" still match.
///
/// # Errors
///
/// Returns an error if the search pattern cannot be compiled.
pub fn find_context(text: &str, term: &str, max_chars: usize) -> Result<Option<String>> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let leading = if term.chars().next().is_some_and(is_word) {
        r"\b"
    } else {
        ""
    };
    let trailing = if term.chars().next_back().is_some_and(is_word) {
        r"\b"
    } else {
        ""
    };
    let pattern = format!(
        r"[^.]*{leading}{}{trailing}[^.]*\.",
        regex::escape(term)
    );

    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::OperationFailed {
            operation: "build_context_pattern".to_string(),
            cause: e.to_string(),
        })?;

    Ok(re
        .find(text)
        .map(|m| m.as_str().trim().chars().take(max_chars).collect()))
}
