//! Garment categories and the measurement schema each one dictates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of garment categories.
///
/// Collaborators that speak in free-form labels must translate through
/// [`Category::from_label`] at their own boundary; nothing past that point
/// carries the raw string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Tops,
    Pants,
    Setup,
}

const TOPS_FIELDS: [MeasurementField; 4] = [
    MeasurementField::Length,
    MeasurementField::Width,
    MeasurementField::Shoulder,
    MeasurementField::Sleeve,
];

const PANTS_FIELDS: [MeasurementField; 4] = [
    MeasurementField::Waist,
    MeasurementField::Inseam,
    MeasurementField::HemWidth,
    MeasurementField::Rise,
];

const SETUP_FIELDS: [MeasurementField; 8] = [
    MeasurementField::Length,
    MeasurementField::Width,
    MeasurementField::Shoulder,
    MeasurementField::Sleeve,
    MeasurementField::Waist,
    MeasurementField::Inseam,
    MeasurementField::HemWidth,
    MeasurementField::Rise,
];

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 3] = [Category::Tops, Category::Pants, Category::Setup];

    /// Ordered measurement fields the operator must supply.
    pub fn measurement_fields(&self) -> &'static [MeasurementField] {
        match self {
            Category::Tops => &TOPS_FIELDS,
            Category::Pants => &PANTS_FIELDS,
            Category::Setup => &SETUP_FIELDS,
        }
    }

    /// Number of measurements expected on one line.
    pub fn arity(&self) -> usize {
        self.measurement_fields().len()
    }

    /// Operator-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Tops => "トップス",
            Category::Pants => "パンツ",
            Category::Setup => "セットアップ",
        }
    }

    /// Translates a collaborator label into the closed variant.
    ///
    /// Accepts the Japanese operator labels and the English variant names,
    /// case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        match label {
            "トップス" => return Some(Category::Tops),
            "パンツ" => return Some(Category::Pants),
            "セットアップ" => return Some(Category::Setup),
            _ => {}
        }
        match label.to_ascii_lowercase().as_str() {
            "tops" | "top" => Some(Category::Tops),
            "pants" | "bottoms" => Some(Category::Pants),
            "setup" | "set_up" | "set-up" => Some(Category::Setup),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Named garment measurement, in centimetres.
///
/// Declaration order is the canonical order used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
    Length,
    Width,
    Shoulder,
    Sleeve,
    Waist,
    Inseam,
    HemWidth,
    Rise,
}

impl MeasurementField {
    /// Operator-facing label, also accepted as a legacy input marker.
    pub fn label(&self) -> &'static str {
        match self {
            MeasurementField::Length => "着丈",
            MeasurementField::Width => "身幅",
            MeasurementField::Shoulder => "肩幅",
            MeasurementField::Sleeve => "袖丈",
            MeasurementField::Waist => "ウエスト",
            MeasurementField::Inseam => "股下",
            MeasurementField::HemWidth => "裾幅",
            MeasurementField::Rise => "股上",
        }
    }
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
