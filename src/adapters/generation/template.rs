//! Template-based listing generator adapter.
//!
//! Builds the title, description and hashtags from confirmed features and
//! measurements, and prices the listing with [`PricingPolicy`]. No external
//! service is involved, so generation only fails on an unusable record.

use async_trait::async_trait;

use crate::domain::listing::{
    GeneratedListing, ListingRecord, PricingPolicy, ProductFeatures, UNKNOWN,
};
use crate::ports::{CollaboratorError, ListingGenerator};

/// Marketplace title limit, in characters.
pub const MAX_TITLE_CHARS: usize = 40;

const SECONDHAND_TAG: &str = "#古着";

#[derive(Debug, Clone, Default)]
pub struct TemplateListingGenerator {
    policy: PricingPolicy,
}

impl TemplateListingGenerator {
    pub fn new(policy: PricingPolicy) -> Self {
        Self { policy }
    }

    fn title(&self, record: &ListingRecord) -> String {
        let features = &record.features;
        let era = record
            .era
            .as_ref()
            .map(|e| e.as_str())
            .or(features.era.as_deref());
        let parts: Vec<&str> = [
            known(&features.brand),
            era,
            known(&features.gender),
            known(&features.color),
            known(&features.item_type),
            features.design.as_deref(),
            known(&features.size),
        ]
        .into_iter()
        .flatten()
        .collect();

        let title = if parts.is_empty() {
            record.category.label().to_string()
        } else {
            parts.join(" ")
        };
        truncate_chars(&title, MAX_TITLE_CHARS)
    }

    fn hashtags(&self, record: &ListingRecord) -> Vec<String> {
        let features = &record.features;
        let mut tags: Vec<String> = [
            known(&features.brand),
            known(&features.item_type),
            record.era.as_ref().map(|e| e.as_str()),
            Some(record.category.label()),
        ]
        .into_iter()
        .flatten()
        .map(|word| format!("#{}", word.replace(char::is_whitespace, "")))
        .collect();
        tags.push(SECONDHAND_TAG.to_string());
        tags.dedup();
        tags
    }

    fn description(&self, record: &ListingRecord, hashtags: &[String]) -> String {
        let features = &record.features;
        let mut lines = vec![headline(features), String::new(), blurb(features)];

        lines.push(String::new());
        lines.push("【サイズ】".to_string());
        if let Some(size) = known(&features.size) {
            lines.push(format!("表記サイズ：{}", size));
        }
        for (field, value) in record.measurements.iter() {
            lines.push(format!("{}：{}cm", field.label(), value));
        }

        lines.push(String::new());
        lines.push("【状態】".to_string());
        lines.push(features.condition.clone());
        if let Some(material) = &features.material {
            lines.push(String::new());
            lines.push(format!("【素材】{}", material));
        }

        lines.push(String::new());
        lines.push(hashtags.join(" "));
        lines.push(String::new());
        lines.push(format!("管理番号：{}", record.management_id));
        lines.join("\n")
    }
}

fn known(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && value != UNKNOWN).then_some(value)
}

/// "adidasのネイビー パーカー", dropping whatever is unknown.
fn headline(features: &ProductFeatures) -> String {
    let item = known(&features.item_type).unwrap_or("アイテム");
    match (known(&features.brand), known(&features.color)) {
        (Some(brand), Some(color)) => format!("{}の{} {}", brand, color, item),
        (Some(brand), None) => format!("{}の{}", brand, item),
        (None, Some(color)) => format!("{} {}", color, item),
        (None, None) => item.to_string(),
    }
}

fn blurb(features: &ProductFeatures) -> String {
    match &features.design {
        Some(design) => format!("{}がポイントのアイテムです。", design),
        None => "シンプルで使いやすいアイテムです。".to_string(),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect::<String>().trim_end().to_string()
}

#[async_trait]
impl ListingGenerator for TemplateListingGenerator {
    async fn generate(
        &self,
        record: &ListingRecord,
    ) -> Result<GeneratedListing, CollaboratorError> {
        if record.purchase_price == 0 {
            return Err(CollaboratorError::invalid_response(
                "purchase price must be positive",
            ));
        }
        let hashtags = self.hashtags(record);
        Ok(GeneratedListing {
            title: self.title(record),
            description: self.description(record, &hashtags),
            price: self.policy.suggest(record.purchase_price, record.strategy),
            hashtags,
        })
    }
}
