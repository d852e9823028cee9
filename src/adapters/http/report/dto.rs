//! HTTP DTOs for report endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::report::SalesReport;

/// Headline figures plus the rendered sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub sheet_name: String,
    /// `YYYY-MM-DD ~ YYYY-MM-DD`
    pub period: String,
    pub sales_count: u64,
    pub net_profit: i64,
    pub notification: String,
    pub rows: Vec<Vec<String>>,
}

impl From<&SalesReport> for ReportResponse {
    fn from(report: &SalesReport) -> Self {
        Self {
            sheet_name: report.sheet_name.clone(),
            period: report.period.to_string(),
            sales_count: report.summary.sales_count,
            net_profit: report.summary.net_profit,
            notification: report.notification(),
            rows: report.rows(),
        }
    }
}
