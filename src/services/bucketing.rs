//! Score bucketing shared by prior-art similarity and aggregate novelty risk.

use crate::models::{NoveltyRisk, SimilarityLevel};

/// Lower bound of the high band.
pub const HIGH_THRESHOLD: f64 = 0.6;

/// Lower bound of the medium band.
pub const MEDIUM_THRESHOLD: f64 = 0.3;

/// Three-band classification of a score in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScoreBand {
    /// Below [`MEDIUM_THRESHOLD`].
    Low,
    /// In `[MEDIUM_THRESHOLD, HIGH_THRESHOLD)`.
    Medium,
    /// At or above [`HIGH_THRESHOLD`].
    High,
}

/// Classifies a score. NaN falls into the low band.
#[must_use]
pub fn bucket(score: f64) -> ScoreBand {
    if score >= HIGH_THRESHOLD {
        ScoreBand::High
    } else if score >= MEDIUM_THRESHOLD {
        ScoreBand::Medium
    } else {
        ScoreBand::Low
    }
}

impl From<ScoreBand> for SimilarityLevel {
    fn from(band: ScoreBand) -> Self {
        match band {
            ScoreBand::Low => Self::Low,
            ScoreBand::Medium => Self::Medium,
            ScoreBand::High => Self::High,
        }
    }
}

impl From<ScoreBand> for NoveltyRisk {
    fn from(band: ScoreBand) -> Self {
        match band {
            ScoreBand::Low => Self::Green,
            ScoreBand::Medium => Self::Yellow,
            ScoreBand::High => Self::Red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0 => ScoreBand::Low ; "zero")]
    #[test_case(0.29 => ScoreBand::Low ; "just below medium")]
    #[test_case(0.3 => ScoreBand::Medium ; "medium boundary")]
    #[test_case(0.45 => ScoreBand::Medium ; "mid medium")]
    #[test_case(0.5999 => ScoreBand::Medium ; "just below high")]
    #[test_case(0.6 => ScoreBand::High ; "high boundary")]
    #[test_case(1.0 => ScoreBand::High ; "one")]
    fn test_bucket(score: f64) -> ScoreBand {
        bucket(score)
    }

    #[test]
    fn test_bucket_nan_is_low() {
        assert_eq!(bucket(f64::NAN), ScoreBand::Low);
    }

    #[test_case(0.1 => NoveltyRisk::Green ; "green")]
    #[test_case(0.45 => NoveltyRisk::Yellow ; "yellow")]
    #[test_case(0.75 => NoveltyRisk::Red ; "red")]
    fn test_risk_mapping(score: f64) -> NoveltyRisk {
        bucket(score).into()
    }

    #[test_case(0.2 => SimilarityLevel::Low ; "low")]
    #[test_case(0.3 => SimilarityLevel::Medium ; "medium")]
    #[test_case(0.6 => SimilarityLevel::High ; "high")]
    fn test_similarity_mapping(score: f64) -> SimilarityLevel {
        bucket(score).into()
    }
}
