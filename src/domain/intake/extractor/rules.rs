//! Declarative rule table for the field extractor.
//!
//! Every accepted phrasing lives here as data. Grammars only consult the
//! compiled form, so adding a synonym never touches parsing code.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::listing::{Gender, MeasurementField, PricingStrategy};

/// Versioned set of tokens and markers the extractor recognizes.
#[derive(Debug)]
pub struct RuleTable {
    pub version: u32,
    /// Field separators in addition to whitespace.
    pub separators: &'static [char],
    /// Suffixes stripped from numeric tokens.
    pub unit_suffixes: &'static [&'static str],
    /// Longest first; alternation is leftmost-first.
    pub price_markers: &'static [&'static str],
    pub id_markers: &'static [&'static str],
    pub gender_tags: &'static [(Gender, &'static [&'static str])],
    pub size_tags: &'static [&'static str],
    /// Size tags that all mean one-size.
    pub free_size_tags: &'static [&'static str],
    pub reset_tokens: &'static [&'static str],
    pub settle_tokens: &'static [&'static str],
    /// Exact tokens (ASCII) or contained keywords (Japanese) per strategy.
    pub strategy_tokens: &'static [(PricingStrategy, &'static [&'static str])],
    /// Values that clear an optional feature.
    pub clear_tokens: &'static [&'static str],
    pub measurement_labels: &'static [(MeasurementField, &'static str)],
}

/// Canonical label for every free-size tag.
pub const FREE_SIZE: &str = "フリー";

pub const RULES_V1: RuleTable = RuleTable {
    version: 1,
    separators: &[',', '、', '。', '/', ';', '・', '|'],
    unit_suffixes: &["円", "yen", "cm"],
    price_markers: &[
        "仕入れ価格",
        "仕入価格",
        "購入価格",
        "仕入れ",
        "購入価",
        "仕入",
        "購入",
        "原価",
        "purchase",
        "price",
        "cost",
    ],
    id_markers: &["商品管理番号", "管理番号", "管理No.", "管理No", "ID"],
    gender_tags: &[
        (Gender::Mens, &["メンズ", "男性", "MEN"]),
        (Gender::Ladies, &["レディース", "女性", "WOMEN", "LADIES"]),
        (Gender::Unisex, &["ユニセックス", "男女兼用", "UNISEX"]),
    ],
    size_tags: &["XXS", "XS", "S", "M", "L", "XL", "XXL", "2XL", "3XL"],
    free_size_tags: &["フリーサイズ", "フリー", "FREE", "F"],
    reset_tokens: &["リセット", "reset", "キャンセル", "cancel"],
    settle_tokens: &["売却", "売れた", "販売完了", "settle", "sold"],
    strategy_tokens: &[
        (PricingStrategy::HighProfit, &["A", "1", "高利益"]),
        (PricingStrategy::Balanced, &["B", "2", "バランス"]),
        (PricingStrategy::QuickSale, &["C", "3", "回転"]),
    ],
    clear_tokens: &["なし", "特になし", "無し", "none"],
    measurement_labels: &[
        (MeasurementField::Length, "着丈"),
        (MeasurementField::Width, "身幅"),
        (MeasurementField::Shoulder, "肩幅"),
        (MeasurementField::Sleeve, "袖丈"),
        (MeasurementField::Waist, "ウエスト"),
        (MeasurementField::Inseam, "股下"),
        (MeasurementField::HemWidth, "裾幅"),
        (MeasurementField::Rise, "股上"),
    ],
};

/// Regexes derived from [`RULES_V1`].
pub struct CompiledRules {
    pub table: &'static RuleTable,
    pub price: Regex,
    pub id: Regex,
    pub gender: Vec<(Gender, Regex)>,
    pub era: Regex,
    pub correction: Regex,
    pub measurement: Vec<(MeasurementField, Regex)>,
    pub any_measurement_label: Regex,
}

pub static RULES: Lazy<CompiledRules> = Lazy::new(|| CompiledRules::compile(&RULES_V1));

impl CompiledRules {
    fn compile(table: &'static RuleTable) -> Self {
        let gender = table
            .gender_tags
            .iter()
            .map(|(gender, tags)| {
                (
                    *gender,
                    pattern(&format!("(?i)(?:{})", alternation(tags, true))),
                )
            })
            .collect();
        let measurement = table
            .measurement_labels
            .iter()
            .map(|(field, label)| {
                (
                    *field,
                    pattern(&format!(r"{}[:\s]*(\d+)", regex::escape(label))),
                )
            })
            .collect();
        let labels: Vec<&str> = table.measurement_labels.iter().map(|(_, l)| *l).collect();

        Self {
            table,
            price: marker_pattern(table.price_markers, r"\d[\d,]*"),
            id: marker_pattern(table.id_markers, r"\d+"),
            gender,
            era: pattern(r"(?i)^(?:(\d{2})s|(\d{2}|\d{4})年代)$"),
            correction: pattern(r"^(\d+)(?:\s*[.:)]\s*|\s+)(.+)$"),
            measurement,
            any_measurement_label: pattern(&alternation(&labels, false)),
        }
    }

    /// Strategy named by a whole line, if any.
    pub fn strategy(&self, line: &str) -> Option<PricingStrategy> {
        let line = line.trim();
        self.table.strategy_tokens.iter().find_map(|(strategy, tokens)| {
            tokens
                .iter()
                .any(|token| {
                    if token.is_ascii() {
                        line.eq_ignore_ascii_case(token)
                    } else {
                        line.contains(token)
                    }
                })
                .then_some(*strategy)
        })
    }

    pub fn is_reset(&self, text: &str) -> bool {
        matches_exactly(text, self.table.reset_tokens)
    }

    pub fn is_settle(&self, text: &str) -> bool {
        matches_exactly(text, self.table.settle_tokens)
    }

    pub fn is_clear(&self, value: &str) -> bool {
        matches_exactly(value, self.table.clear_tokens)
    }

    /// Canonical size for a token, if it is a size tag.
    pub fn size(&self, token: &str) -> Option<String> {
        if self
            .table
            .free_size_tags
            .iter()
            .any(|tag| token.eq_ignore_ascii_case(tag))
        {
            return Some(FREE_SIZE.to_string());
        }
        self.table
            .size_tags
            .iter()
            .find(|tag| token.eq_ignore_ascii_case(tag))
            .map(|tag| tag.to_string())
    }

    /// Digits of a numeric token once one unit suffix is stripped.
    pub fn digits<'t>(&self, token: &'t str) -> Option<&'t str> {
        let digits = self
            .table
            .unit_suffixes
            .iter()
            .find_map(|suffix| strip_suffix_ignore_case(token, suffix))
            .unwrap_or(token);
        (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
    }

    /// Numeric token as an unsigned integer; `None` on overflow.
    pub fn integer(&self, token: &str) -> Option<u32> {
        self.digits(token)?.parse().ok()
    }

    /// A whole token naming the price or id field (`管理番号`, `ID:`).
    pub fn is_marker(&self, token: &str) -> bool {
        let token = token.trim_end_matches(':');
        self.table
            .price_markers
            .iter()
            .chain(self.table.id_markers)
            .any(|marker| token.eq_ignore_ascii_case(marker))
    }

    /// A bare unit written apart from its number (`60 cm`).
    pub fn is_unit(&self, token: &str) -> bool {
        matches_exactly(token, self.table.unit_suffixes)
    }
}

fn strip_suffix_ignore_case<'a>(token: &'a str, suffix: &str) -> Option<&'a str> {
    let split = token.len().checked_sub(suffix.len())?;
    if !token.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = token.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

fn matches_exactly(text: &str, tokens: &[&str]) -> bool {
    let text = text.trim();
    tokens.iter().any(|token| text.eq_ignore_ascii_case(token))
}

/// `marker [:space]* value`; the value may follow an ASCII marker directly.
fn marker_pattern(markers: &[&str], value: &str) -> Regex {
    pattern(&format!(
        r"(?i)(?:{})[:\s]*({})",
        alternation(markers, false),
        value
    ))
}

/// ASCII tokens get a leading word boundary, and a trailing one when `closed`.
fn alternation(tokens: &[&str], closed: bool) -> String {
    tokens
        .iter()
        .map(|token| {
            let escaped = regex::escape(token);
            if token.is_ascii() && closed {
                format!(r"\b{}\b", escaped)
            } else if token.is_ascii() {
                format!(r"\b{}", escaped)
            } else {
                escaped
            }
        })
        .collect::<Vec<_>>()
        .join("|")
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("rule table patterns are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_version_one() {
        assert_eq!(RULES.table.version, 1);
    }

    mod markers {
        use super::*;

        #[test]
        fn price_markers_accept_colon_and_space() {
            for text in ["仕入れ:880", "仕入れ 880", "原価880", "cost: 880", "Price 880"] {
                let caps = RULES.price.captures(text).unwrap();
                assert_eq!(&caps[1], "880", "{}", text);
            }
        }

        #[test]
        fn longest_price_marker_wins() {
            let caps = RULES.price.captures("仕入れ価格：880").unwrap();
            assert_eq!(&caps[1], "880");
        }

        #[test]
        fn id_markers_match_legacy_forms() {
            for text in ["商品管理番号:215", "管理No.215", "ID 215", "ID215", "管理番号215"] {
                let caps = RULES.id.captures(text).unwrap();
                assert_eq!(&caps[1], "215", "{}", text);
            }
        }

        #[test]
        fn ascii_markers_need_word_boundary() {
            assert!(RULES.id.captures("VOID123").is_none());
            assert!(RULES.price.captures("pricey 880").is_none());
        }
    }

    mod tokens {
        use super::*;

        #[test]
        fn integer_strips_units() {
            assert_eq!(RULES.integer("880円"), Some(880));
            assert_eq!(RULES.integer("66cm"), Some(66));
            assert_eq!(RULES.integer("66CM"), Some(66));
            assert_eq!(RULES.integer("円"), None);
            assert_eq!(RULES.integer("-5"), None);
            assert_eq!(RULES.integer("99999999999"), None);
            assert_eq!(RULES.digits("0222"), Some("0222"));
            assert!(RULES.is_unit("cm"));
        }

        #[test]
        fn size_tags_normalize_free_size() {
            assert_eq!(RULES.size("free").as_deref(), Some(FREE_SIZE));
            assert_eq!(RULES.size("フリーサイズ").as_deref(), Some(FREE_SIZE));
            assert_eq!(RULES.size("xl").as_deref(), Some("XL"));
            assert_eq!(RULES.size("XXXL"), None);
        }

        #[test]
        fn strategy_accepts_letters_digits_and_keywords() {
            assert_eq!(RULES.strategy("b"), Some(PricingStrategy::Balanced));
            assert_eq!(RULES.strategy("3"), Some(PricingStrategy::QuickSale));
            assert_eq!(RULES.strategy("高利益重視"), Some(PricingStrategy::HighProfit));
            assert_eq!(RULES.strategy("D"), None);
        }

        #[test]
        fn commands_match_whole_message_only() {
            assert!(RULES.is_reset(" リセット "));
            assert!(RULES.is_reset("Cancel"));
            assert!(!RULES.is_reset("リセットして"));
            assert!(RULES.is_settle("売れた"));
            assert!(RULES.is_settle("SOLD"));
        }

        #[test]
        fn era_token_forms() {
            assert!(RULES.era.is_match("90s"));
            assert!(RULES.era.is_match("90年代"));
            assert!(RULES.era.is_match("2000年代"));
            assert!(!RULES.era.is_match("880"));
            assert!(!RULES.era.is_match("190s"));
        }
    }
}
