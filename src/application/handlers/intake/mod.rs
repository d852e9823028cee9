//! Intake command handlers.

mod handle_inbound_event;
mod prune_sessions;

pub use handle_inbound_event::{HandleEventError, HandleInboundEventHandler};
pub use prune_sessions::PruneSessionsHandler;
