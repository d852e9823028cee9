//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionStore` - conversation sessions and per-identity turn order
//! - `VisionAnalyzer` - category detection and feature inference from images
//! - `ListingGenerator` - listing copy and price suggestion
//! - `RecordSink` - listing and sale persistence, read back for reports

mod collaborator;
mod listing_generator;
mod record_sink;
mod session_store;
mod vision_analyzer;

pub use collaborator::CollaboratorError;
pub use listing_generator::ListingGenerator;
pub use record_sink::RecordSink;
pub use session_store::{SessionLookup, SessionOrigin, SessionStore, SessionStoreError, TurnGuard};
pub use vision_analyzer::VisionAnalyzer;
