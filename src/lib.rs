//! Listing Intake - Conversational product listing intake
//!
//! Turns a chat conversation (product photos plus short text replies) into a
//! complete listing record: purchase price and management id, garment
//! measurements, confirmed product features and a pricing strategy, then
//! hands the record to generation and persistence collaborators.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
