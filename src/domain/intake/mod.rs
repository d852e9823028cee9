//! Conversational intake: session aggregate, stage machine, field extractor
//! and the pure transition function that ties them together.

mod errors;
pub mod extractor;
mod message;
mod prompts;
mod session;
mod stage;
mod transition;

pub use errors::{DownstreamStep, IntakeError};
pub use extractor::{
    Command, ConfirmationReply, Extraction, ExtractionFailure, FieldExtractor, Grammar, Payload,
    PriceIdLine,
};
pub use message::{EventKind, InboundEvent, OutboundReply, TurnInput, MAX_REPLY_CHARS};
pub use prompts::Prompt;
pub use session::ConversationSession;
pub use stage::IntakeStage;
pub use transition::{
    interpret, stage_prompt, transition, IntakeEvent, Interpretation, Outcome, SessionPatch,
    Transition,
};
