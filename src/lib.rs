//! # Inventix
//!
//! Evidence-locked concept extraction and prior-art novelty risk scoring.
//!
//! Inventix ingests free-form technical text (an idea, a claim, a paper
//! draft) and separates ordinary domain vocabulary from terms that may
//! indicate a novel contribution. The extracted signal then feeds a
//! bounded, explainable traffic-light risk classification against prior art.
//!
//! ## Features
//!
//! - Deterministic tokenization, technical pattern matching and phrase mining
//! - Frequency weighting with category boosts and a stable ranking
//! - Best-effort semantic oracle enhancement that degrades gracefully
//! - Green/yellow/red novelty risk with a fully traceable evidence trail
//!
//! ## Example
//!
//! ```rust,ignore
//! use inventix::{ConceptExtractorService, NoveltyScorer, ProjectType};
//!
//! let extractor = ConceptExtractorService::without_oracle();
//! let concepts = extractor.extract_concepts(text, Some("patent")).await;
//!
//! let scorer = NoveltyScorer::new(oracle);
//! let assessment = scorer
//!     .compare_with_prior_art(text, "Adaptive beamformer", ProjectType::Patent, Some(&concepts.differentiating_terms))
//!     .await;
//! println!("risk: {}", assessment.risk);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod llm;
pub mod models;
pub mod observability;
pub mod services;

// Re-exports for convenience
pub use config::{ExtractionLimits, InventixConfig, OracleConfig};
pub use llm::LlmProvider;
pub use models::{
    ClaimAnalysis, ClaimComparison, Concept, ConceptCategory, ConceptSource, Confidence,
    ExtractionResult, FailureKind, NoveltyAssessment, NoveltyRisk, OracleOutcome, PipelineError,
    PriorArtMatch, ProjectType, SimilarityLevel,
};
pub use services::{ConceptExtractorService, NoveltyScorer, SemanticOracle, bucket};

/// Error type for inventix operations.
///
/// Internal plumbing uses this type with `?`. The public pipeline operations
/// never return it directly: every failure is folded into a result object
/// carrying a [`PipelineError`].
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Blank text, empty claim list, unreadable CLI input |
/// | `OperationFailed` | Config I/O, regex construction, HTTP status errors |
/// | `Timeout` | An oracle call exceeded its deadline |
/// | `OracleUnavailable` | No oracle configured, transport failure, `success=false` |
/// | `OracleMalformed` | Oracle answered but the payload was not the expected JSON |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// An operation exceeded its deadline.
    #[error("operation '{operation}' timed out")]
    Timeout {
        /// The operation that timed out.
        operation: String,
    },

    /// The semantic oracle could not be reached or reported failure.
    #[error("semantic oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// The semantic oracle answered with an unusable payload.
    #[error("semantic oracle returned malformed output: {0}")]
    OracleMalformed(String),
}

/// Result type alias for inventix operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::OperationFailed {
            operation: "test".to_string(),
            cause: "failed".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'test' failed: failed");

        let err = Error::Timeout {
            operation: "oracle_request".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'oracle_request' timed out");

        let err = Error::OracleMalformed("expected object".to_string());
        assert_eq!(
            err.to_string(),
            "semantic oracle returned malformed output: expected object"
        );
    }
}
