//! Pricing configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::listing::PricingPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Flat shipping cost assumed for the price floor, in yen
    #[serde(default = "default_shipping_cost")]
    pub shipping_cost: u32,

    /// Profit the floor must still leave, in yen
    #[serde(default = "default_minimum_profit")]
    pub minimum_profit: u32,

    /// Marketplace fee, in percent of the sale price
    #[serde(default = "default_fee_rate")]
    pub fee_rate_percent: u32,
}

impl PricingConfig {
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy {
            shipping_cost: self.shipping_cost,
            minimum_profit: self.minimum_profit,
            fee_rate_percent: self.fee_rate_percent,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fee_rate_percent >= 100 {
            return Err(ValidationError::InvalidFeeRate);
        }
        Ok(())
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            shipping_cost: default_shipping_cost(),
            minimum_profit: default_minimum_profit(),
            fee_rate_percent: default_fee_rate(),
        }
    }
}

fn default_shipping_cost() -> u32 {
    500
}

fn default_minimum_profit() -> u32 {
    200
}

fn default_fee_rate() -> u32 {
    10
}
