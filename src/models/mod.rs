//! Data models for inventix.
//!
//! Result objects handed to callers plus the closed enums they are built from.
//! All result objects are created fresh per request and never mutated after
//! they are returned.

mod concept;
mod failure;
mod novelty;

pub use concept::{Concept, ConceptCategory, ConceptSource, ExtractionResult, OracleOutcome};
pub use failure::{FailureKind, PipelineError};
pub use novelty::{
    ClaimAnalysis, ClaimComparison, Confidence, FALLBACK_RECOMMENDATIONS, FALLBACK_RISK_SCORE,
    NoveltyAssessment, NoveltyRisk, PriorArtMatch, ProjectType, SimilarityLevel,
};
