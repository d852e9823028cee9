//! Error taxonomy for intake turns.
//!
//! Every variant is recoverable within the turn that produced it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::IntakeStage;

/// Collaborator call that failed during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownstreamStep {
    CategoryDetection,
    FeatureInference,
    Generation,
    ListingSave,
    Settlement,
}

impl fmt::Display for DownstreamStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DownstreamStep::CategoryDetection => "category detection",
            DownstreamStep::FeatureInference => "feature inference",
            DownstreamStep::Generation => "listing generation",
            DownstreamStep::ListingSave => "listing save",
            DownstreamStep::Settlement => "settlement",
        };
        write!(f, "{}", name)
    }
}

/// Intake errors, reported to the operator in the same turn.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Ambiguous input: {reason}")]
    Ambiguous { reason: String },

    #[error("Unrecognized input")]
    Unrecognized,

    #[error("Expected {expected} values, got {got}")]
    WrongArity { expected: usize, got: usize },

    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: IntakeStage, to: IntakeStage },

    #[error("Session expired")]
    SessionExpired,

    #[error("{step} failed: {reason}")]
    DownstreamFailure { step: DownstreamStep, reason: String },

    #[error("Record incomplete: missing {0}")]
    IncompleteRecord(&'static str),
}

impl IntakeError {
    pub fn ambiguous(reason: impl Into<String>) -> Self {
        IntakeError::Ambiguous {
            reason: reason.into(),
        }
    }

    pub fn downstream(step: DownstreamStep, reason: impl Into<String>) -> Self {
        IntakeError::DownstreamFailure {
            step,
            reason: reason.into(),
        }
    }

    /// True for failures caused by what the operator typed.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            IntakeError::Ambiguous { .. }
                | IntakeError::Unrecognized
                | IntakeError::WrongArity { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_arity_mentions_both_counts() {
        let err = IntakeError::WrongArity {
            expected: 4,
            got: 3,
        };
        assert_eq!(err.to_string(), "Expected 4 values, got 3");
    }

    #[test]
    fn downstream_failure_names_the_step() {
        let err = IntakeError::downstream(DownstreamStep::CategoryDetection, "timeout");
        assert_eq!(err.to_string(), "category detection failed: timeout");
        assert!(!err.is_input_error());
    }

    #[test]
    fn parse_failures_are_input_errors() {
        assert!(IntakeError::Unrecognized.is_input_error());
        assert!(IntakeError::ambiguous("x").is_input_error());
        assert!(!IntakeError::SessionExpired.is_input_error());
    }
}
