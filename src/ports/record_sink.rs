//! Record Sink Port - durable storage owned by a downstream collaborator.

use async_trait::async_trait;

use super::CollaboratorError;
use crate::domain::foundation::Timestamp;
use crate::domain::listing::{GeneratedListing, ListingRecord, Settlement, SettlementOutcome};
use crate::domain::report::SalesRecord;

/// Port for persisting finished listings and recording their sale.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Stores a finished listing, registered at `saved_at`.
    async fn save_listing(
        &self,
        record: &ListingRecord,
        listing: &GeneratedListing,
        saved_at: Timestamp,
    ) -> Result<(), CollaboratorError>;

    /// Records a sale against a stored listing.
    ///
    /// # Errors
    ///
    /// `NotFound` if no listing carries the settlement's management id.
    async fn record_settlement(
        &self,
        settlement: &Settlement,
        settled_at: Timestamp,
    ) -> Result<SettlementOutcome, CollaboratorError>;

    /// Every stored listing with its sale, if any, for reporting.
    async fn sales_records(&self) -> Result<Vec<SalesRecord>, CollaboratorError>;
}
