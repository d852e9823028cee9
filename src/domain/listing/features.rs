//! Product features inferred from images and corrected by the operator.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Category, EraTag};

/// Placeholder for features the vision collaborator could not determine.
pub const UNKNOWN: &str = "UNKNOWN";

/// Default condition line used when nothing else is known.
pub const DEFAULT_CONDITION: &str = "目立った傷や汚れなし";

/// Feature set presented to the operator for confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFeatures {
    pub brand: String,
    pub category: Category,
    pub item_type: String,
    pub gender: String,
    pub size: String,
    pub color: String,
    pub design: Option<String>,
    pub material: Option<String>,
    pub era: Option<String>,
    pub condition: String,
    /// Collaborator confidence in `[0.0, 1.0]`.
    pub confidence: f32,
}

impl ProductFeatures {
    /// Unknown features for a category.
    pub fn unknown(category: Category) -> Self {
        Self {
            brand: UNKNOWN.to_string(),
            category,
            item_type: UNKNOWN.to_string(),
            gender: UNKNOWN.to_string(),
            size: UNKNOWN.to_string(),
            color: UNKNOWN.to_string(),
            design: None,
            material: None,
            era: None,
            condition: DEFAULT_CONDITION.to_string(),
            confidence: 0.0,
        }
    }

    /// Overrides inferred values with what the operator typed explicitly.
    pub fn apply_hints(&mut self, hints: &FeatureHints, era: Option<&EraTag>) {
        if let Some(gender) = hints.gender {
            self.gender = gender.label().to_string();
        }
        if let Some(size) = &hints.size {
            self.size = size.clone();
        }
        if let Some(era) = era {
            self.era = Some(era.to_string());
        }
    }

    /// Applies one field-level correction.
    pub fn apply_correction(&mut self, correction: &FeatureCorrection) {
        match correction {
            FeatureCorrection::Set(field, value) => {
                let value = value.clone();
                match field {
                    FeatureField::Brand => self.brand = value,
                    // Category is fixed once measurements exist; the extractor never emits it.
                    FeatureField::Category => {}
                    FeatureField::ItemType => self.item_type = value,
                    FeatureField::Gender => self.gender = value,
                    FeatureField::Size => self.size = value,
                    FeatureField::Color => self.color = value,
                    FeatureField::Design => self.design = Some(value),
                    FeatureField::Era => self.era = Some(value),
                }
            }
            FeatureCorrection::Clear(field) => match field {
                FeatureField::Design => self.design = None,
                FeatureField::Era => self.era = None,
                FeatureField::Brand => self.brand = UNKNOWN.to_string(),
                FeatureField::ItemType => self.item_type = UNKNOWN.to_string(),
                FeatureField::Gender => self.gender = UNKNOWN.to_string(),
                FeatureField::Size => self.size = UNKNOWN.to_string(),
                FeatureField::Color => self.color = UNKNOWN.to_string(),
                FeatureField::Category => {}
            },
        }
    }

    /// Display value of a numbered field; `None` for unset optional fields.
    pub fn value_of(&self, field: FeatureField) -> Option<&str> {
        match field {
            FeatureField::Brand => Some(&self.brand),
            FeatureField::Category => Some(self.category.label()),
            FeatureField::ItemType => Some(&self.item_type),
            FeatureField::Gender => Some(&self.gender),
            FeatureField::Size => Some(&self.size),
            FeatureField::Color => Some(&self.color),
            FeatureField::Design => self.design.as_deref(),
            FeatureField::Era => self.era.as_deref(),
        }
    }
}

/// Numbered feature fields as shown in the confirmation summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureField {
    Brand,
    Category,
    ItemType,
    Gender,
    Size,
    Color,
    Design,
    Era,
}

impl FeatureField {
    pub const ALL: [FeatureField; 8] = [
        FeatureField::Brand,
        FeatureField::Category,
        FeatureField::ItemType,
        FeatureField::Gender,
        FeatureField::Size,
        FeatureField::Color,
        FeatureField::Design,
        FeatureField::Era,
    ];

    /// Summary line number (1-based).
    pub fn number(&self) -> u8 {
        match self {
            FeatureField::Brand => 1,
            FeatureField::Category => 2,
            FeatureField::ItemType => 3,
            FeatureField::Gender => 4,
            FeatureField::Size => 5,
            FeatureField::Color => 6,
            FeatureField::Design => 7,
            FeatureField::Era => 8,
        }
    }

    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|f| u32::from(f.number()) == number)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeatureField::Brand => "ブランド",
            FeatureField::Category => "カテゴリ",
            FeatureField::ItemType => "アイテム",
            FeatureField::Gender => "性別",
            FeatureField::Size => "サイズ",
            FeatureField::Color => "色",
            FeatureField::Design => "デザイン",
            FeatureField::Era => "年代",
        }
    }

    /// Optional fields can be cleared rather than overwritten.
    pub fn is_optional(&self) -> bool {
        matches!(self, FeatureField::Design | FeatureField::Era)
    }
}

/// Operator correction to one feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCorrection {
    Set(FeatureField, String),
    Clear(FeatureField),
}

/// Target audience tag typed alongside price and id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Mens,
    Ladies,
    Unisex,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Mens => "メンズ",
            Gender::Ladies => "レディース",
            Gender::Unisex => "ユニセックス",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Tags the operator typed that take precedence over inferred features.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureHints {
    pub gender: Option<Gender>,
    pub size: Option<String>,
}

impl FeatureHints {
    pub fn is_empty(&self) -> bool {
        self.gender.is_none() && self.size.is_none()
    }
}
