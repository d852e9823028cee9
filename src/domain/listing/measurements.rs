//! Garment measurements keyed by field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::{Category, MeasurementField};

/// The supplied value count does not match what the category requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{category} expects {expected} measurements, got {got}")]
pub struct ArityMismatch {
    pub category: Category,
    pub expected: usize,
    pub got: usize,
}

/// Measurements in centimetres, one entry per field of a category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Measurements(BTreeMap<MeasurementField, u32>);

impl Measurements {
    /// Builds measurements from values given in the category's field order.
    pub fn for_category(category: Category, values: &[u32]) -> Result<Self, ArityMismatch> {
        let fields = category.measurement_fields();
        if values.len() != fields.len() {
            return Err(ArityMismatch {
                category,
                expected: fields.len(),
                got: values.len(),
            });
        }
        Ok(Self(fields.iter().copied().zip(values.iter().copied()).collect()))
    }

    /// Value recorded for a field, if any.
    pub fn get(&self, field: MeasurementField) -> Option<u32> {
        self.0.get(&field).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when exactly the category's fields are present.
    pub fn matches_category(&self, category: Category) -> bool {
        let fields = category.measurement_fields();
        self.0.len() == fields.len() && fields.iter().all(|f| self.0.contains_key(f))
    }

    /// Entries in canonical field order.
    pub fn iter(&self) -> impl Iterator<Item = (MeasurementField, u32)> + '_ {
        self.0.iter().map(|(field, value)| (*field, *value))
    }

    /// Values in canonical field order.
    pub fn values(&self) -> Vec<u32> {
        self.0.values().copied().collect()
    }
}
