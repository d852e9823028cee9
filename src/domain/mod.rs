//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, errors, state machine)
//! - `listing` - Listing vocabulary (categories, measurements, features, pricing, records)
//! - `intake` - Conversation sessions, field extraction and stage transitions
//! - `report` - Weekly and monthly sales reports

pub mod foundation;
pub mod intake;
pub mod listing;
pub mod report;
