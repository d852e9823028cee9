//! Checked stage transitions.

use super::ValidationError;

/// A stage enum with a fixed edge set.
///
/// `transition_to` is the only way a session changes stage, so an edge
/// missing from `can_transition_to` is rejected before any field is written.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Every stage reachable in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Staying put is always allowed.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if *self == target || self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "stage",
                format!("no edge from {:?} to {:?}", self, target),
            ))
        }
    }

    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
