//! GenerateReportHandler - Query handler for weekly and monthly sales reports.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::Timestamp;
use crate::domain::report::{ReportGenerator, ReportKind, SalesReport};
use crate::ports::{CollaboratorError, RecordSink};

/// Reads every stored listing and aggregates the last complete period.
pub struct GenerateReportHandler {
    records: Arc<dyn RecordSink>,
    generator: ReportGenerator,
}

impl GenerateReportHandler {
    pub fn new(records: Arc<dyn RecordSink>, generator: ReportGenerator) -> Self {
        Self { records, generator }
    }

    pub async fn handle(&self, kind: ReportKind) -> Result<SalesReport, CollaboratorError> {
        self.handle_at(kind, Timestamp::now()).await
    }

    /// Builds the report as if requested at `now`.
    pub async fn handle_at(
        &self,
        kind: ReportKind,
        now: Timestamp,
    ) -> Result<SalesReport, CollaboratorError> {
        let records = self.records.sales_records().await.map_err(|error| {
            warn!(kind = %kind, error = %error, "sales records unavailable");
            error
        })?;

        let report = self.generator.generate(kind, &records, now);
        info!(
            kind = %kind,
            sheet = %report.sheet_name,
            sales = report.summary.sales_count,
            net_profit = report.summary.net_profit,
            "report generated"
        );
        Ok(report)
    }
}
