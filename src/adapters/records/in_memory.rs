//! In-Memory Record Sink Adapter
//!
//! Keeps saved listings keyed by management id and records settlements
//! against them. Useful for tests and local runs without a spreadsheet or
//! database behind the intake.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::domain::listing::{
    GeneratedListing, ListingRecord, PricingPolicy, Settlement, SettlementOutcome,
};
use crate::domain::report::{Sale, SalesRecord};
use crate::ports::{CollaboratorError, RecordSink};

/// Listing row as held by the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredListing {
    pub record: ListingRecord,
    pub listing: GeneratedListing,
    pub saved_at: Timestamp,
    pub sale: Option<Sale>,
}

impl StoredListing {
    fn to_sales_record(&self) -> SalesRecord {
        SalesRecord {
            management_id: self.record.management_id.clone(),
            category: self.record.category,
            purchase_price: self.record.purchase_price,
            registered_at: self.saved_at,
            sale: self.sale.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryRecordSink {
    listings: Arc<RwLock<HashMap<String, StoredListing>>>,
    policy: PricingPolicy,
    save_failures: Arc<Mutex<VecDeque<CollaboratorError>>>,
    settlement_failures: Arc<Mutex<VecDeque<CollaboratorError>>>,
}

impl Default for InMemoryRecordSink {
    fn default() -> Self {
        Self::new(PricingPolicy::default())
    }
}

impl InMemoryRecordSink {
    pub fn new(policy: PricingPolicy) -> Self {
        Self {
            listings: Arc::new(RwLock::new(HashMap::new())),
            policy,
            save_failures: Arc::new(Mutex::new(VecDeque::new())),
            settlement_failures: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Makes the next `save_listing` call fail with `error`.
    pub fn fail_next_save(&self, error: CollaboratorError) {
        self.save_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(error);
    }

    /// Makes the next `record_settlement` call fail with `error`.
    pub fn fail_next_settlement(&self, error: CollaboratorError) {
        self.settlement_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(error);
    }

    pub async fn get(&self, management_id: &str) -> Option<StoredListing> {
        self.listings.read().await.get(management_id).cloned()
    }

    pub async fn listing_count(&self) -> usize {
        self.listings.read().await.len()
    }
}

#[async_trait]
impl RecordSink for InMemoryRecordSink {
    async fn save_listing(
        &self,
        record: &ListingRecord,
        listing: &GeneratedListing,
        saved_at: Timestamp,
    ) -> Result<(), CollaboratorError> {
        let injected = self
            .save_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(error) = injected {
            return Err(error);
        }

        self.listings.write().await.insert(
            record.management_id.clone(),
            StoredListing {
                record: record.clone(),
                listing: listing.clone(),
                saved_at,
                sale: None,
            },
        );
        Ok(())
    }

    async fn record_settlement(
        &self,
        settlement: &Settlement,
        settled_at: Timestamp,
    ) -> Result<SettlementOutcome, CollaboratorError> {
        let injected = self
            .settlement_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(error) = injected {
            return Err(error);
        }

        let mut listings = self.listings.write().await;
        let stored = listings.get_mut(&settlement.management_id).ok_or_else(|| {
            CollaboratorError::not_found(format!("management id {}", settlement.management_id))
        })?;

        let outcome = settlement.settle(stored.record.purchase_price, &self.policy);
        stored.sale = Some(Sale {
            sold_at: settled_at,
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }

    async fn sales_records(&self) -> Result<Vec<SalesRecord>, CollaboratorError> {
        let listings = self.listings.read().await;
        let mut records: Vec<SalesRecord> =
            listings.values().map(StoredListing::to_sales_record).collect();
        records.sort_by_key(|record| record.registered_at);
        Ok(records)
    }
}
