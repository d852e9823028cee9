//! Weekly and monthly sales reports over recorded listings.

mod generator;
mod period;
mod summary;

pub use generator::{Comparison, PreviousPeriod, ReportGenerator, SalesReport};
pub use period::{ReportKind, ReportPeriod};
pub use summary::{CategoryBreakdown, InventoryStatus, Sale, SalesRecord, SalesSummary};
