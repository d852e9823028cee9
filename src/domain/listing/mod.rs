//! Listing vocabulary: categories, measurements, features, pricing and the
//! records handed to downstream collaborators.

mod category;
mod era;
mod features;
mod measurements;
mod pricing;
mod record;
mod strategy;

pub use category::{Category, MeasurementField};
pub use era::EraTag;
pub use features::{
    FeatureCorrection, FeatureField, FeatureHints, Gender, ProductFeatures, DEFAULT_CONDITION,
    UNKNOWN,
};
pub use measurements::{ArityMismatch, Measurements};
pub use pricing::{PriceSuggestion, PricingPolicy};
pub use record::{GeneratedListing, ListingRecord, Settlement, SettlementOutcome};
pub use strategy::PricingStrategy;
