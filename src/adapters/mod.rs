//! Adapters - Implementations of ports.
//!
//! - `session` - in-memory session store with per-identity turn locks
//! - `vision` - HTTP and mock vision analyzers
//! - `generation` - template listing generator
//! - `records` - in-memory record sink
//! - `http` - axum router for inbound events

pub mod generation;
pub mod http;
pub mod records;
pub mod session;
pub mod vision;
