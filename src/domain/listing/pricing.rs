//! Price floor and strategy-driven price suggestions.

use serde::{Deserialize, Serialize};

use super::PricingStrategy;

/// Marketplace economics used for every price computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    pub shipping_cost: u32,
    pub minimum_profit: u32,
    /// Marketplace commission, whole percent in `0..100`.
    pub fee_rate_percent: u32,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            shipping_cost: 500,
            minimum_profit: 200,
            fee_rate_percent: 10,
        }
    }
}

impl PricingPolicy {
    /// Lowest sale price that still clears shipping, commission and the profit floor.
    ///
    /// `(purchase + shipping + profit) / (1 - fee)`, rounded up to the next 10 yen.
    pub fn minimum_price(&self, purchase_price: u32) -> u32 {
        let cost = u64::from(purchase_price)
            + u64::from(self.shipping_cost)
            + u64::from(self.minimum_profit);
        let keep = u64::from(100 - self.fee_rate_percent.min(99));
        let raw = (cost * 100).div_ceil(keep);
        clamp_u32(round_up_to_ten(raw))
    }

    /// Commission charged on a sale, rounded down.
    pub fn commission(&self, sale_price: u32) -> u32 {
        clamp_u32(u64::from(sale_price) * u64::from(self.fee_rate_percent) / 100)
    }

    /// Price ladder for a strategy, anchored on the minimum price.
    pub fn suggest(&self, purchase_price: u32, strategy: PricingStrategy) -> PriceSuggestion {
        let minimum_price = self.minimum_price(purchase_price);
        // (start, expected, lowest) as percent of the floor
        let (start, expected, lowest) = match strategy {
            PricingStrategy::HighProfit => (180, 150, 130),
            PricingStrategy::Balanced => (150, 130, 110),
            PricingStrategy::QuickSale => (120, 110, 100),
        };
        let scale = |percent: u64| {
            clamp_u32(round_up_to_ten(
                (u64::from(minimum_price) * percent).div_ceil(100),
            ))
        };

        PriceSuggestion {
            minimum_price,
            start_price: scale(start),
            expected_price: scale(expected),
            lowest_acceptable: scale(lowest).max(minimum_price),
            strategy,
        }
    }
}

fn round_up_to_ten(value: u64) -> u64 {
    value.div_ceil(10) * 10
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Suggested prices for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSuggestion {
    pub minimum_price: u32,
    pub start_price: u32,
    pub expected_price: u32,
    pub lowest_acceptable: u32,
    pub strategy: PricingStrategy,
}
