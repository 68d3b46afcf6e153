//! Technical term patterns: units, measurements and acronyms.
// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use crate::models::{Concept, ConceptCategory, ConceptSource};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// A named technical pattern.
#[derive(Debug)]
pub struct TechnicalPattern {
    /// Short label for logs and tests.
    pub name: &'static str,
    /// Compiled pattern.
    pub pattern: Regex,
}

/// Technical patterns, applied in order over the original-case text.
///
/// Unit patterns ignore case; acronyms are matched case-sensitively.
pub static TECHNICAL_PATTERNS: LazyLock<Vec<TechnicalPattern>> = LazyLock::new(|| {
    vec![
        TechnicalPattern {
            name: "frequency",
            pattern: Regex::new(r"(?i)\b\d+(?:\.\d+)?(?:Hz|MHz|GHz|kHz)\b")
                .expect("static regex: frequency units"),
        },
        TechnicalPattern {
            name: "electrical",
            pattern: Regex::new(r"(?i)\b\d+(?:\.\d+)?(?:V|mV|kV|A|mA|W|kW|MW)\b")
                .expect("static regex: electrical units"),
        },
        TechnicalPattern {
            name: "length",
            pattern: Regex::new(r"(?i)\b\d+(?:\.\d+)?(?:m|cm|mm|km|nm|μm)\b")
                .expect("static regex: length units"),
        },
        TechnicalPattern {
            name: "temperature",
            pattern: Regex::new(r"(?i)\b\d+(?:\.\d+)?(?:°C|°F|K)\b")
                .expect("static regex: temperature units"),
        },
        TechnicalPattern {
            name: "percentage",
            pattern: Regex::new(r"\b\d+(?:\.\d+)?%").expect("static regex: percentage"),
        },
        TechnicalPattern {
            name: "acronym",
            pattern: Regex::new(r"\b[A-Z]{2,}(?:-[A-Z]+)*\b").expect("static regex: acronym"),
        },
    ]
});

/// Extracts technical terms from original-case text.
///
/// Each distinct match becomes one technical concept, in first-match order
/// across the pattern table. Frequency is the number of literal occurrences of
/// the exact matched string.
#[must_use]
pub fn extract_technical_terms(text: &str) -> Vec<Concept> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut concepts = Vec::new();

    for technical in TECHNICAL_PATTERNS.iter() {
        for m in technical.pattern.find_iter(text) {
            let term = m.as_str();
            if !seen.insert(term) {
                continue;
            }
            let occurrences = u32::try_from(text.matches(term).count()).unwrap_or(u32::MAX);
            tracing::trace!(pattern = technical.name, term, occurrences, "Technical term");
            concepts.push(Concept::candidate(
                term,
                ConceptCategory::Technical,
                occurrences,
                ConceptSource::Pattern,
            ));
        }
    }

    concepts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(text: &str) -> Vec<String> {
        extract_technical_terms(text)
            .into_iter()
            .map(|c| c.term)
            .collect()
    }

    #[test]
    fn test_frequency_units_case_insensitive() {
        assert_eq!(terms("Runs at 10GHz and 2.4ghz."), vec!["10GHz", "2.4ghz"]);
    }

    #[test]
    fn test_units_and_percentages() {
        let found = terms("A 5V rail, 12mm gap, 300K bath and 95% yield.");
        assert_eq!(found, vec!["5V", "12mm", "300K", "95%"]);
    }

    #[test]
    fn test_acronyms_case_sensitive() {
        assert_eq!(terms("SONAR and LIDAR-X beat sonar."), vec!["SONAR", "LIDAR-X"]);
        assert!(terms("only lowercase words here").is_empty());
    }

    #[test]
    fn test_frequency_is_literal_count() {
        let concepts = extract_technical_terms("The CPU talks to the CPU. A GPU helps the CPU.");
        let cpu = concepts.iter().find(|c| c.term == "CPU").unwrap();
        assert_eq!(cpu.frequency, 3);
        assert_eq!(cpu.category, ConceptCategory::Technical);
        assert_eq!(cpu.source, ConceptSource::Pattern);
        assert_eq!(concepts.len(), 2);
    }

    #[test]
    fn test_distinct_matches_only() {
        let concepts = extract_technical_terms("5V then 5V again");
        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].frequency, 2);
    }

    #[test]
    fn test_embedded_units_not_matched() {
        // No word boundary before the digits.
        assert!(terms("model X10GHz").is_empty());
    }
}
