//! HTTP routes for report endpoints.

use axum::{routing::post, Router};

use super::handlers::{post_monthly, post_weekly, ReportHandlers};

/// Creates the report router, mounted under `/api/report`.
pub fn report_routes(handlers: ReportHandlers) -> Router {
    Router::new()
        .route("/weekly", post(post_weekly))
        .route("/monthly", post(post_monthly))
        .with_state(handlers)
}
