//! Operator-facing reply texts.

use super::{DownstreamStep, IntakeError};
use crate::domain::listing::{
    Category, FeatureField, GeneratedListing, PricingStrategy, ProductFeatures, SettlementOutcome,
    UNKNOWN,
};

const PRICE_ID_EXAMPLE: &str = "例: 「880 222」または「880 222 90s」";
const SALE_INFO_EXAMPLE: &str = "例: 「215 3000 700」";

/// Reply to render for a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    Welcome,
    AskPriceId {
        image_count: usize,
    },
    AskMeasurements {
        category: Category,
        image_count: usize,
    },
    ConfirmFeatures {
        features: ProductFeatures,
        image_count: usize,
    },
    GenerationInProgress,
    ListingReady {
        management_id: String,
        listing: GeneratedListing,
    },
    AskSaleInfo,
    Settled(SettlementOutcome),
    ResetDone,
    ImagesClosed,
    /// Error line followed by the prompt to retry with.
    Failure {
        error: IntakeError,
        retry: Box<Prompt>,
    },
}

impl Prompt {
    pub fn failure(error: IntakeError, retry: Prompt) -> Self {
        Prompt::Failure {
            error,
            retry: Box::new(retry),
        }
    }

    /// Renders the reply text.
    pub fn render(&self) -> String {
        match self {
            Prompt::Welcome => format!(
                "商品画像を送信してから「仕入れ価格 管理番号」を送信してください。\n{}",
                PRICE_ID_EXAMPLE
            ),
            Prompt::AskPriceId { image_count } => format!(
                "画像 {}枚を受け付けました。\n「仕入れ価格 管理番号」を送信してください。\n{}",
                image_count, PRICE_ID_EXAMPLE
            ),
            Prompt::AskMeasurements {
                category,
                image_count,
            } => format!(
                "画像 {}枚、カテゴリ「{}」で受け付けました。\n\n{}",
                image_count,
                category.label(),
                measurement_instructions(*category)
            ),
            Prompt::ConfirmFeatures {
                features,
                image_count,
            } => feature_summary(features, *image_count),
            Prompt::GenerationInProgress => {
                "現在、商品情報を生成中です。完了までお待ちください。".to_string()
            }
            Prompt::ListingReady {
                management_id,
                listing,
            } => listing_summary(management_id, listing),
            Prompt::AskSaleInfo => format!(
                "売却情報を入力してください。\n「管理番号 販売価格 送料」\n{}",
                SALE_INFO_EXAMPLE
            ),
            Prompt::Settled(outcome) => format!(
                "売却を記録しました。\n\n管理番号: {}\n販売価格: {}円\n送料: {}円\n手数料: {}円\n利益: {}円",
                outcome.management_id,
                yen(i64::from(outcome.sale_price)),
                yen(i64::from(outcome.shipping_cost)),
                yen(i64::from(outcome.commission)),
                yen(outcome.profit)
            ),
            Prompt::ResetDone => format!(
                "セッションをリセットしました。\n商品画像と「仕入れ価格 管理番号」を送信してください。\n{}",
                PRICE_ID_EXAMPLE
            ),
            Prompt::ImagesClosed => {
                "現在、入力待ち状態です。\n新しい商品を登録する場合は「リセット」と送信してください。"
                    .to_string()
            }
            Prompt::Failure { error, retry } => {
                format!("{}\n\n{}", error_line(error), retry.render())
            }
        }
    }
}

fn measurement_instructions(category: Category) -> String {
    let order: Vec<&str> = category
        .measurement_fields()
        .iter()
        .map(|f| f.label())
        .collect();
    let example = match category {
        Category::Tops => "60 50 42 20",
        Category::Pants => "80 75 20 30",
        Category::Setup => "70 55 45 60 80 75 20 30",
    };
    format!(
        "実寸を{}個、{}の順で入力してください。\n例: 「{}」",
        category.arity(),
        order.join(" "),
        example
    )
}

fn feature_summary(features: &ProductFeatures, image_count: usize) -> String {
    let mut lines = vec![
        format!("画像 {}枚を解析しました。", image_count),
        String::new(),
        "【商品特徴（AI推定）】".to_string(),
    ];
    for field in FeatureField::ALL {
        let value = match (field, features.value_of(field)) {
            (_, Some(value)) => value,
            (FeatureField::Design, None) => "特になし",
            (FeatureField::Era, None) => continue,
            (_, None) => UNKNOWN,
        };
        lines.push(format!("{}. {}：{}", field.number(), field.label(), value));
    }
    lines.extend([
        String::new(),
        "修正がある場合は番号と内容を送信".to_string(),
        "例：「1 adidas」「3 パーカー」".to_string(),
        String::new(),
        "修正完了後、戦略を選択してください：".to_string(),
    ]);
    lines.extend(
        PricingStrategy::ALL
            .iter()
            .map(|s| format!("{}. {}", s.token(), s.label())),
    );
    lines.push(String::new());
    lines.push("修正なしの場合は「A」「B」「C」のみ送信".to_string());
    lines.join("\n")
}

fn listing_summary(management_id: &str, listing: &GeneratedListing) -> String {
    let price = &listing.price;
    let mut text = format!(
        "【生成完了】管理番号 {}\n\n■ 商品名\n{}\n\n■ 価格提案\n・スタート価格：{}円\n・想定販売価格：{}円\n・値下げ許容：{}円\n・最低価格：{}円\n\n戦略：{}",
        management_id,
        listing.title,
        yen(i64::from(price.start_price)),
        yen(i64::from(price.expected_price)),
        yen(i64::from(price.lowest_acceptable)),
        yen(i64::from(price.minimum_price)),
        price.strategy.label(),
    );
    text.push_str("\n\n■ 商品説明\n");
    text.push_str(&listing.description);
    text
}

fn error_line(error: &IntakeError) -> String {
    match error {
        IntakeError::Ambiguous { reason } => format!("入力を確定できませんでした：{}", reason),
        IntakeError::Unrecognized => "入力を認識できませんでした。".to_string(),
        IntakeError::WrongArity { expected, got } => format!(
            "数値の個数が正しくありません（{}個必要ですが{}個でした）。",
            expected, got
        ),
        IntakeError::InvalidTransition { .. } => "現在の状態ではその操作はできません。".to_string(),
        IntakeError::SessionExpired => {
            "前回の入力から時間が経過したため、セッションをやり直しました。".to_string()
        }
        IntakeError::DownstreamFailure { step, reason } => format!(
            "{}に失敗しました（{}）。\n入力内容は保持されています。同じ内容で再送信してください。",
            step_label(*step),
            reason
        ),
        IntakeError::IncompleteRecord(field) => {
            format!("必要な情報が不足しています（{}）。", field)
        }
    }
}

fn step_label(step: DownstreamStep) -> &'static str {
    match step {
        DownstreamStep::CategoryDetection => "カテゴリ判定",
        DownstreamStep::FeatureInference => "商品特徴の解析",
        DownstreamStep::Generation => "商品情報の生成",
        DownstreamStep::ListingSave => "商品データの保存",
        DownstreamStep::Settlement => "売却の記録",
    }
}

/// Formats yen with thousands separators.
fn yen(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{PriceSuggestion, PricingPolicy};

    #[test]
    fn yen_groups_thousands() {
        assert_eq!(yen(0), "0");
        assert_eq!(yen(880), "880");
        assert_eq!(yen(3000), "3,000");
        assert_eq!(yen(1234567), "1,234,567");
        assert_eq!(yen(-1200), "-1,200");
    }

    #[test]
    fn measurement_prompt_names_count_and_order() {
        let text = Prompt::AskMeasurements {
            category: Category::Pants,
            image_count: 3,
        }
        .render();
        assert!(text.contains("画像 3枚"));
        assert!(text.contains("4個"));
        assert!(text.contains("ウエスト 股下 裾幅 股上"));
    }

    #[test]
    fn summary_lists_numbered_fields_and_strategies() {
        let mut features = ProductFeatures::unknown(Category::Tops);
        features.brand = "adidas".to_string();
        let text = Prompt::ConfirmFeatures {
            features,
            image_count: 2,
        }
        .render();
        assert!(text.contains("1. ブランド：adidas"));
        assert!(text.contains("2. カテゴリ：トップス"));
        assert!(text.contains("7. デザイン：特になし"));
        assert!(!text.contains("8. 年代"));
        assert!(text.contains("B. バランス"));
    }

    #[test]
    fn failure_restates_the_retry_prompt() {
        let text = Prompt::failure(
            IntakeError::WrongArity {
                expected: 4,
                got: 3,
            },
            Prompt::AskMeasurements {
                category: Category::Tops,
                image_count: 1,
            },
        )
        .render();
        assert!(text.starts_with("数値の個数が正しくありません（4個必要ですが3個でした）。"));
        assert!(text.contains("着丈 身幅 肩幅 袖丈"));
    }

    #[test]
    fn settled_shows_commission_and_profit() {
        let outcome = crate::domain::listing::Settlement {
            management_id: "215".to_string(),
            sale_price: 3000,
            shipping_cost: 700,
        }
        .settle(880, &PricingPolicy::default());
        let text = Prompt::Settled(outcome).render();
        assert!(text.contains("手数料: 300円"));
        assert!(text.contains("利益: 1,120円"));
    }

    #[test]
    fn listing_ready_includes_prices_and_description() {
        let listing = GeneratedListing {
            title: "adidas トラックジャケット".to_string(),
            description: "説明".to_string(),
            hashtags: vec![],
            price: PriceSuggestion {
                minimum_price: 1760,
                start_price: 2640,
                expected_price: 2290,
                lowest_acceptable: 1940,
                strategy: PricingStrategy::Balanced,
            },
        };
        let text = Prompt::ListingReady {
            management_id: "222".to_string(),
            listing,
        }
        .render();
        assert!(text.contains("最低価格：1,760円"));
        assert!(text.contains("戦略：バランス"));
        assert!(text.ends_with("説明"));
    }
}
