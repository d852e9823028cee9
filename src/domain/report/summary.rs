//! Per-period aggregates over recorded listings.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::listing::{Category, SettlementOutcome};

/// One stored listing as the report sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub management_id: String,
    pub category: Category,
    pub purchase_price: u32,
    pub registered_at: Timestamp,
    pub sale: Option<Sale>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub sold_at: Timestamp,
    pub outcome: SettlementOutcome,
}

/// Revenue and profit over the sales in a period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub sales_count: u64,
    pub total_sales: u64,
    pub total_purchase: u64,
    pub total_shipping: u64,
    pub total_commission: u64,
    pub net_profit: i64,
    /// Rounded toward negative infinity; zero without sales.
    pub avg_profit_per_item: i64,
}

impl SalesSummary {
    pub fn add(&mut self, record: &SalesRecord, outcome: &SettlementOutcome) {
        self.sales_count += 1;
        self.total_sales += u64::from(outcome.sale_price);
        self.total_purchase += u64::from(record.purchase_price);
        self.total_shipping += u64::from(outcome.shipping_cost);
        self.total_commission += u64::from(outcome.commission);
        self.net_profit += outcome.profit;
        self.avg_profit_per_item = match i64::try_from(self.sales_count) {
            Ok(count) => self.net_profit.div_euclid(count),
            Err(_) => 0,
        };
    }
}

/// Stock movement across a period.
///
/// `start_inventory + new_registrations - sold_count == end_inventory`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryStatus {
    pub start_inventory: u64,
    pub new_registrations: u64,
    pub sold_count: u64,
    pub end_inventory: u64,
    /// Purchase price summed over the end inventory.
    pub inventory_value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub sales_count: u64,
    pub sales_amount: u64,
    pub profit: i64,
    /// Profit as a percentage of sales; zero when nothing was sold.
    pub profit_rate: f64,
}

impl CategoryBreakdown {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            sales_count: 0,
            sales_amount: 0,
            profit: 0,
            profit_rate: 0.0,
        }
    }

    pub fn add(&mut self, outcome: &SettlementOutcome) {
        self.sales_count += 1;
        self.sales_amount += u64::from(outcome.sale_price);
        self.profit += outcome.profit;
        if self.sales_amount > 0 {
            self.profit_rate = self.profit as f64 / self.sales_amount as f64 * 100.0;
        }
    }
}
