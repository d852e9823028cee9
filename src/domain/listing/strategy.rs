//! Pricing strategies the operator picks from when confirming a listing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of pricing/listing strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingStrategy {
    /// Maximise margin, accept a slower sale.
    HighProfit,
    Balanced,
    /// Price to move quickly.
    QuickSale,
}

impl PricingStrategy {
    pub const ALL: [PricingStrategy; 3] = [
        PricingStrategy::HighProfit,
        PricingStrategy::Balanced,
        PricingStrategy::QuickSale,
    ];

    /// Single-letter token the operator types.
    pub fn token(&self) -> &'static str {
        match self {
            PricingStrategy::HighProfit => "A",
            PricingStrategy::Balanced => "B",
            PricingStrategy::QuickSale => "C",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PricingStrategy::HighProfit => "高利益重視",
            PricingStrategy::Balanced => "バランス",
            PricingStrategy::QuickSale => "回転重視",
        }
    }
}

impl fmt::Display for PricingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}
