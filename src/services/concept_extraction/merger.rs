//! Cross-extractor deduplication.

use crate::models::{Concept, ConceptCategory, ConceptSource};
use std::collections::HashSet;

/// Merges candidate lists in precedence order.
///
/// The dedup key is the lowercased term. The first occurrence keeps its
/// category and frequency; later duplicates are dropped without summing.
#[must_use]
pub fn merge_concepts<I>(sources: I) -> Vec<Concept>
where
    I: IntoIterator<Item = Vec<Concept>>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for concept in sources.into_iter().flatten() {
        if seen.insert(concept.key()) {
            merged.push(concept);
        }
    }

    merged
}

/// Applies oracle suggestions to a merged list in place.
///
/// Differentiating takes precedence over methodological when a term is named
/// in both lists. Additional concepts not already present are appended as
/// differentiating with frequency 1; those longer than `max_term_chars`
/// characters are dropped. Returns the number of concepts changed or added.
pub fn apply_suggestions(
    concepts: &mut Vec<Concept>,
    differentiating: &[String],
    methodological: &[String],
    additional: &[String],
    max_term_chars: usize,
) -> usize {
    let lower = |terms: &[String]| -> HashSet<String> {
        terms.iter().map(|t| t.trim().to_lowercase()).collect()
    };
    let differentiating = lower(differentiating);
    let methodological = lower(methodological);

    let mut changed = 0;
    for concept in concepts.iter_mut() {
        let key = concept.key();
        let category = if differentiating.contains(&key) {
            ConceptCategory::Differentiating
        } else if methodological.contains(&key) {
            ConceptCategory::Methodological
        } else {
            continue;
        };
        if concept.category != category {
            concept.category = category;
            changed += 1;
        }
    }

    let mut present: HashSet<String> = concepts.iter().map(Concept::key).collect();
    for term in additional.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if term.chars().count() > max_term_chars {
            tracing::debug!(term_len = term.len(), "Dropping oversized oracle concept");
            continue;
        }
        if present.insert(term.to_lowercase()) {
            concepts.push(Concept::candidate(
                term,
                ConceptCategory::Differentiating,
                1,
                ConceptSource::Oracle,
            ));
            changed += 1;
        }
    }

    changed
}
