//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the listing intake domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{ConversationKey, CycleId, ImageRef, MAX_KEY_LENGTH};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
