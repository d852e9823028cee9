//! Listing Generator Port - title, description and price suggestion.

use async_trait::async_trait;

use super::CollaboratorError;
use crate::domain::listing::{GeneratedListing, ListingRecord};

/// Port for turning a confirmed record into listing copy and prices.
#[async_trait]
pub trait ListingGenerator: Send + Sync {
    async fn generate(&self, record: &ListingRecord) -> Result<GeneratedListing, CollaboratorError>;
}
