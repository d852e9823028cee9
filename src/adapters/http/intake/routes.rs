//! HTTP routes for intake endpoints.

use axum::{routing::post, Router};

use super::handlers::{post_event, IntakeHandlers};

/// Creates the intake router, mounted under `/api/intake`.
pub fn intake_routes(handlers: IntakeHandlers) -> Router {
    Router::new()
        .route("/events", post(post_event))
        .with_state(handlers)
}
