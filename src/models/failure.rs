//! Structured failure information carried by result objects.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure taxonomy shared by every pipeline.
///
/// | Kind | Extraction | Scoring |
/// |------|------------|---------|
/// | `InputEmpty` | fatal | fatal |
/// | `OracleUnavailable` | soft (degrades) | hard (fallback object) |
/// | `OracleMalformed` | soft (degrades) | hard (fallback object) |
/// | `InternalError` | fatal | fatal |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Blank or whitespace-only input.
    InputEmpty,
    /// The oracle could not be reached, timed out or reported failure.
    OracleUnavailable,
    /// The oracle answered with output that could not be parsed.
    OracleMalformed,
    /// Unexpected fault during deterministic processing.
    InternalError,
}

impl FailureKind {
    /// Returns the failure kind as its wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InputEmpty => "INPUT_EMPTY",
            Self::OracleUnavailable => "ORACLE_UNAVAILABLE",
            Self::OracleMalformed => "ORACLE_MALFORMED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether this failure originates from the oracle.
    #[must_use]
    pub const fn is_oracle(&self) -> bool {
        matches!(self, Self::OracleUnavailable | Self::OracleMalformed)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&Error> for FailureKind {
    fn from(err: &Error) -> Self {
        match err {
            Error::InvalidInput(_) => Self::InputEmpty,
            Error::Timeout { .. } | Error::OracleUnavailable(_) => Self::OracleUnavailable,
            Error::OracleMalformed(_) => Self::OracleMalformed,
            Error::OperationFailed { .. } => Self::InternalError,
        }
    }
}

/// A typed, human-readable failure attached to a result object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineError {
    /// Failure classification.
    pub kind: FailureKind,
    /// Message suitable for showing to a user.
    pub message: String,
}

impl PipelineError {
    /// Creates a new pipeline error.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
