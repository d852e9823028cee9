//! HTTP adapter for intake endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, InboundEventRequest, InboundEventResponse};
pub use handlers::{health, IntakeHandlers};
pub use routes::intake_routes;
