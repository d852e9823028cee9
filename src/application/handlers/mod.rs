//! Application handlers.
//!
//! Command handlers that orchestrate domain operations, and the report query.

pub mod intake;
pub mod report;

pub use intake::{HandleEventError, HandleInboundEventHandler, PruneSessionsHandler};
pub use report::GenerateReportHandler;
