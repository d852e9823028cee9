//! HTTP handlers for report endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::intake::ErrorResponse;
use crate::application::GenerateReportHandler;
use crate::domain::report::ReportKind;
use crate::ports::CollaboratorError;

use super::dto::ReportResponse;

#[derive(Clone)]
pub struct ReportHandlers {
    report_handler: Arc<GenerateReportHandler>,
}

impl ReportHandlers {
    pub fn new(report_handler: Arc<GenerateReportHandler>) -> Self {
        Self { report_handler }
    }
}

/// POST /api/report/weekly - Report on last Monday to Sunday
pub async fn post_weekly(State(handlers): State<ReportHandlers>) -> Response {
    generate(&handlers, ReportKind::Weekly).await
}

/// POST /api/report/monthly - Report on last calendar month
pub async fn post_monthly(State(handlers): State<ReportHandlers>) -> Response {
    generate(&handlers, ReportKind::Monthly).await
}

async fn generate(handlers: &ReportHandlers, kind: ReportKind) -> Response {
    match handlers.report_handler.handle(kind).await {
        Ok(report) => (StatusCode::OK, Json(ReportResponse::from(&report))).into_response(),
        Err(e) => report_error(e),
    }
}

fn report_error(error: CollaboratorError) -> Response {
    tracing::error!(error = %error, "report generation failed");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse::unavailable("sales records unavailable")),
    )
        .into_response()
}
