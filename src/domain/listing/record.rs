//! Flat records handed to downstream collaborators.

use serde::{Deserialize, Serialize};

use super::{
    Category, EraTag, Measurements, PriceSuggestion, PricingPolicy, PricingStrategy,
    ProductFeatures,
};
use crate::domain::foundation::{ConversationKey, CycleId, ImageRef};

/// Fully merged intake cycle, ready for generation and persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub cycle_id: CycleId,
    pub conversation: ConversationKey,
    pub management_id: String,
    pub purchase_price: u32,
    pub era: Option<EraTag>,
    pub category: Category,
    pub measurements: Measurements,
    pub features: ProductFeatures,
    pub strategy: PricingStrategy,
    pub image_refs: Vec<ImageRef>,
}

/// Generated title, description and price ladder for a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedListing {
    pub title: String,
    pub description: String,
    pub hashtags: Vec<String>,
    pub price: PriceSuggestion,
}

/// Sale reported by the operator for a previously listed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub management_id: String,
    pub sale_price: u32,
    pub shipping_cost: u32,
}

impl Settlement {
    /// Computes commission and profit against the recorded purchase price.
    pub fn settle(&self, purchase_price: u32, policy: &PricingPolicy) -> SettlementOutcome {
        let commission = policy.commission(self.sale_price);
        let profit = i64::from(self.sale_price)
            - i64::from(purchase_price)
            - i64::from(self.shipping_cost)
            - i64::from(commission);

        SettlementOutcome {
            management_id: self.management_id.clone(),
            sale_price: self.sale_price,
            shipping_cost: self.shipping_cost,
            commission,
            profit,
        }
    }
}

/// Settlement as recorded downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOutcome {
    pub management_id: String,
    pub sale_price: u32,
    pub shipping_cost: u32,
    pub commission: u32,
    /// Negative when the sale lost money.
    pub profit: i64,
}
