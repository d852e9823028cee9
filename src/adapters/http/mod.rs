//! HTTP adapters - REST API implementations.

pub mod intake;
pub mod report;

use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use intake::{intake_routes, IntakeHandlers};
pub use report::{report_routes, ReportHandlers};

/// Full application router with health check, tracing and request timeout.
pub fn app_router(
    intake_handlers: IntakeHandlers,
    report_handlers: ReportHandlers,
    request_timeout: Duration,
) -> Router {
    Router::new()
        .route("/health", get(intake::health))
        .nest("/api/intake", intake_routes(intake_handlers))
        .nest("/api/report", report_routes(report_handlers))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
}
