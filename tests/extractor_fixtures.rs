//! Format fixture corpus for the field extractor.
//!
//! Every rule-table change must keep these passing:
//! 1. Half-width and full-width variants read identically
//! 2. Every price marker synonym works with every separator, in either order
//! 3. Measurement lines of the wrong length never partially succeed

use proptest::prelude::*;

use listing_intake::domain::intake::{
    Extraction, ExtractionFailure, FieldExtractor, Grammar, Payload, PriceIdLine,
};
use listing_intake::domain::listing::Category;

// =============================================================================
// Helpers
// =============================================================================

fn extract(text: &str, grammar: Grammar) -> Extraction {
    FieldExtractor.extract(text, grammar)
}

fn price_id(text: &str) -> PriceIdLine {
    match extract(text, Grammar::PriceId) {
        Extraction::Success(Payload::PriceId(line)) => line,
        other => panic!("expected price/id for {:?}, got {:?}", text, other),
    }
}

/// ASCII digits and spaces to their full-width forms.
fn to_full_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0'..='9' => char::from_u32(0xFF10 + (c as u32 - '0' as u32)).unwrap(),
            ' ' => '\u{3000}',
            ':' => '：',
            other => other,
        })
        .collect()
}

const PRICE_MARKERS: [&str; 11] = [
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
];

const SEPARATORS: [&str; 4] = [":", "：", " ", "\u{3000}"];

// =============================================================================
// Fixed corpus
// =============================================================================

#[test]
fn positional_fixtures() {
    let cases: &[(&str, u32, &str, Option<&str>)] = &[
        ("880 222", 880, "222", None),
        ("８８０ ２２２", 880, "222", None),
        ("880　222", 880, "222", None),
        ("８８０　２２２　９０ｓ", 880, "222", Some("90s")),
        ("880 222 90s", 880, "222", Some("90s")),
        ("880 222 90S", 880, "222", Some("90s")),
        ("880 222 2000年代", 880, "222", Some("2000年代")),
        ("880円 222", 880, "222", None),
        ("1,200 215", 1200, "215", None),
        ("1，200 215", 1200, "215", None),
        ("880、222", 880, "222", None),
        ("880,222", 880, "222", None),
        ("８８０，２２２", 880, "222", None),
        ("880,222 90s", 880, "222", Some("90s")),
        ("  880   222  ", 880, "222", None),
    ];

    for (text, price, id, era) in cases {
        let line = price_id(text);
        assert_eq!(line.price, *price, "price for {:?}", text);
        assert_eq!(line.management_id, *id, "id for {:?}", text);
        assert_eq!(
            line.era.as_ref().map(|e| e.as_str()),
            *era,
            "era for {:?}",
            text
        );
    }
}

#[test]
fn keyword_fixtures_match_positional_price() {
    let positional = price_id("880 222");

    for marker in PRICE_MARKERS {
        for sep in SEPARATORS {
            let text = format!("{}{}880\n管理番号{}222", marker, sep, sep);
            let line = price_id(&text);
            assert_eq!(line.price, positional.price, "price for {:?}", text);
            assert_eq!(
                line.management_id, positional.management_id,
                "id for {:?}",
                text
            );
        }
    }
}

#[test]
fn id_first_keyword_fixtures_keep_fields_apart() {
    const ID_MARKERS: [&str; 4] = ["商品管理番号", "管理番号", "管理No.", "ID"];

    for id_marker in ID_MARKERS {
        for sep in SEPARATORS {
            for joiner in [sep, "\n"] {
                let text = format!("{}{}215{}仕入れ{}880", id_marker, sep, joiner, sep);
                let line = price_id(&text);
                assert_eq!(line.price, 880, "price for {:?}", text);
                assert_eq!(line.management_id, "215", "id for {:?}", text);
            }
        }
    }
}

#[test]
fn measurement_fixtures() {
    let cases: &[(&str, Category, Vec<u32>)] = &[
        ("60 50 42 20", Category::Tops, vec![60, 50, 42, 20]),
        ("６０　５０　４２　２０", Category::Tops, vec![60, 50, 42, 20]),
        ("60,50,42,20", Category::Tops, vec![60, 50, 42, 20]),
        ("100,110,120,130", Category::Tops, vec![100, 110, 120, 130]),
        ("１００，１１０，１２０，１３０", Category::Tops, vec![100, 110, 120, 130]),
        ("60,50,42,100", Category::Tops, vec![60, 50, 42, 100]),
        ("60cm 50cm 42cm 20cm", Category::Tops, vec![60, 50, 42, 20]),
        ("80 75 20 30", Category::Pants, vec![80, 75, 20, 30]),
        (
            "70 55 45 60 80 75 20 30",
            Category::Setup,
            vec![70, 55, 45, 60, 80, 75, 20, 30],
        ),
        (
            "着丈60 身幅50 肩幅42 袖丈20",
            Category::Tops,
            vec![60, 50, 42, 20],
        ),
    ];

    for (text, category, expected) in cases {
        match extract(text, Grammar::Measurements(*category)) {
            Extraction::Success(Payload::Measurements(m)) => {
                assert_eq!(&m.values(), expected, "values for {:?}", text)
            }
            other => panic!("expected measurements for {:?}, got {:?}", text, other),
        }
    }
}

#[test]
fn settlement_fixtures() {
    for text in ["215 3000 700", "２１５　３０００　７００", "215 3,000 700", "215 3000円 700円"] {
        match extract(text, Grammar::Settlement) {
            Extraction::Success(Payload::Settlement(s)) => {
                assert_eq!(s.management_id, "215", "id for {:?}", text);
                assert_eq!(s.sale_price, 3000, "sale for {:?}", text);
                assert_eq!(s.shipping_cost, 700, "shipping for {:?}", text);
            }
            other => panic!("expected settlement for {:?}, got {:?}", text, other),
        }
    }
}

#[test]
fn command_fixtures() {
    use listing_intake::domain::intake::Command;

    for text in ["リセット", "ＲＥＳＥＴ", "reset", " キャンセル "] {
        assert_eq!(FieldExtractor.command(text), Some(Command::Reset), "{:?}", text);
    }
    for text in ["売却", "sold", "売れた"] {
        assert_eq!(FieldExtractor.command(text), Some(Command::Settle), "{:?}", text);
    }
    assert_eq!(FieldExtractor.command("リセットして"), None);
}

#[test]
fn rule_table_is_versioned() {
    assert_eq!(FieldExtractor.rules_version(), 1);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn positional_pair_round_trips(price in 1u32..1_000_000, id in 1u32..100_000) {
        let line = price_id(&format!("{} {}", price, id));
        prop_assert_eq!(line.price, price);
        prop_assert_eq!(line.management_id, id.to_string());
        prop_assert!(line.era.is_none());
    }

    #[test]
    fn comma_reads_like_space(price in 1u32..1_000_000, id in 1u32..100_000) {
        prop_assert_eq!(
            extract(&format!("{},{}", price, id), Grammar::PriceId),
            extract(&format!("{} {}", price, id), Grammar::PriceId)
        );
    }

    #[test]
    fn era_suffix_leaves_pair_unchanged(price in 1u32..1_000_000, id in 1u32..100_000) {
        let line = price_id(&format!("{} {} 90s", price, id));
        prop_assert_eq!(line.price, price);
        prop_assert_eq!(line.management_id, id.to_string());
        prop_assert_eq!(line.era.map(|e| e.as_str().to_string()), Some("90s".to_string()));
    }

    #[test]
    fn width_does_not_change_extraction(
        price in 1u32..1_000_000,
        id in 1u32..100_000,
        values in proptest::collection::vec(1u32..300, 4),
    ) {
        let pair = format!("{} {}", price, id);
        prop_assert_eq!(
            extract(&pair, Grammar::PriceId),
            extract(&to_full_width(&pair), Grammar::PriceId)
        );

        let line = values.iter().map(u32::to_string).collect::<Vec<_>>().join(" ");
        prop_assert_eq!(
            extract(&line, Grammar::Measurements(Category::Tops)),
            extract(&to_full_width(&line), Grammar::Measurements(Category::Tops))
        );
    }

    #[test]
    fn wrong_arity_never_partially_succeeds(
        values in proptest::collection::vec(1u32..300, 1..12),
        category in prop_oneof![
            Just(Category::Tops),
            Just(Category::Pants),
            Just(Category::Setup),
        ],
    ) {
        prop_assume!(values.len() != category.arity());
        let line = values.iter().map(u32::to_string).collect::<Vec<_>>().join(" ");

        prop_assert_eq!(
            extract(&line, Grammar::Measurements(category)),
            Extraction::Failure(ExtractionFailure::WrongArity {
                expected: category.arity(),
                got: values.len(),
            })
        );
    }
}
