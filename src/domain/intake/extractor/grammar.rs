//! One parsing function per grammar. Input is already normalized.

use super::normalize::{strip_thousands_commas, tokenize};
use super::rules::RULES;
use super::{ConfirmationReply, Extraction, ExtractionFailure, Payload, PriceIdLine};
use crate::domain::listing::{
    Category, EraTag, FeatureCorrection, FeatureField, FeatureHints, Measurements, Settlement,
};

/// Tokens with bare unit words dropped.
fn tokens(text: &str) -> Vec<&str> {
    tokenize(text, RULES.table.separators)
        .filter(|t| !RULES.is_unit(t))
        .collect()
}

/// `<price> <id> [era] [tags]`, or the legacy keyword form.
pub(super) fn price_id(text: &str) -> Extraction {
    let mut numbers: Vec<(u32, &str)> = Vec::new();
    let mut era = None;
    let mut size = None;
    let mut after_marker = false;

    for token in tokens(text) {
        // A number right after a marker belongs to that marker, not to the
        // positional pair.
        let keyed = std::mem::replace(&mut after_marker, RULES.is_marker(token));
        if let Some(caps) = RULES.era.captures(token) {
            if era.is_none() {
                era = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .and_then(|m| EraTag::from_decade_digits(m.as_str()));
            }
            continue;
        }
        if let (Some(digits), Some(value)) = (RULES.digits(token), RULES.integer(token)) {
            if !keyed {
                numbers.push((value, digits));
            }
            continue;
        }
        if size.is_none() {
            size = RULES.size(token);
        }
    }

    let hints = FeatureHints {
        gender: RULES
            .gender
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(gender, _)| *gender),
        size,
    };

    if let [(price, _), (_, id)] = numbers.as_slice() {
        return Extraction::Success(Payload::PriceId(PriceIdLine {
            price: *price,
            management_id: id.to_string(),
            era,
            hints,
        }));
    }

    let price = RULES
        .price
        .captures(text)
        .and_then(|caps| keyed_amount(&caps[1]));
    let id = RULES.id.captures(text).map(|caps| caps[1].to_string());

    match (price, id) {
        (Some(price), Some(management_id)) => Extraction::Success(Payload::PriceId(PriceIdLine {
            price,
            management_id,
            era,
            hints,
        })),
        (Some(_), None) => ExtractionFailure::ambiguous("管理番号が見つかりません").into(),
        (None, Some(_)) => ExtractionFailure::ambiguous("仕入れ価格が見つかりません").into(),
        (None, None) if numbers.is_empty() => ExtractionFailure::Unrecognized.into(),
        (None, None) => ExtractionFailure::WrongArity {
            expected: 2,
            got: numbers.len(),
        }
        .into(),
    }
}

/// Amount after a price marker; `1,200` is one amount, `880,222` stops at the comma.
fn keyed_amount(raw: &str) -> Option<u32> {
    strip_thousands_commas(raw).split(',').next()?.parse().ok()
}

/// Positional measurements in category order, or the labeled legacy form.
pub(super) fn measurements(text: &str, category: Category) -> Extraction {
    let tokens = tokens(text);
    if tokens.is_empty() {
        return ExtractionFailure::Unrecognized.into();
    }

    let values: Vec<Option<u32>> = tokens.iter().map(|t| RULES.integer(t)).collect();
    if values.iter().all(Option::is_some) {
        let values: Vec<u32> = values.into_iter().flatten().collect();
        return match Measurements::for_category(category, &values) {
            Ok(m) => Extraction::Success(Payload::Measurements(m)),
            Err(mismatch) => ExtractionFailure::WrongArity {
                expected: mismatch.expected,
                got: mismatch.got,
            }
            .into(),
        };
    }

    if RULES.any_measurement_label.is_match(text) {
        let labeled: Vec<u32> = category
            .measurement_fields()
            .iter()
            .filter_map(|field| {
                RULES
                    .measurement
                    .iter()
                    .find(|(f, _)| f == field)
                    .and_then(|(_, re)| re.captures(text))
                    .and_then(|caps| caps[1].parse().ok())
            })
            .collect();
        return match Measurements::for_category(category, &labeled) {
            Ok(m) => Extraction::Success(Payload::Measurements(m)),
            Err(mismatch) => ExtractionFailure::WrongArity {
                expected: mismatch.expected,
                got: mismatch.got,
            }
            .into(),
        };
    }

    if values.iter().any(Option::is_some) {
        return ExtractionFailure::ambiguous("数値以外の文字が含まれています").into();
    }
    ExtractionFailure::Unrecognized.into()
}

/// `<id> <sale price> <shipping>`.
pub(super) fn settlement(text: &str) -> Extraction {
    let tokens = tokens(text);
    let digits: Vec<Option<&str>> = tokens.iter().map(|t| RULES.digits(t)).collect();
    let values: Vec<Option<u32>> = tokens.iter().map(|t| RULES.integer(t)).collect();

    if tokens.is_empty() || digits.iter().all(Option::is_none) {
        return ExtractionFailure::Unrecognized.into();
    }
    if values.iter().any(Option::is_none) {
        return ExtractionFailure::ambiguous("数値以外の文字が含まれています").into();
    }

    match (digits.as_slice(), values.as_slice()) {
        ([Some(id), _, _], [_, Some(sale_price), Some(shipping_cost)]) => {
            Extraction::Success(Payload::Settlement(Settlement {
                management_id: id.to_string(),
                sale_price: *sale_price,
                shipping_cost: *shipping_cost,
            }))
        }
        _ => ExtractionFailure::WrongArity {
            expected: 3,
            got: values.len(),
        }
        .into(),
    }
}

/// Numbered corrections and/or a strategy, one item per line.
pub(super) fn confirmation(text: &str) -> Extraction {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return ExtractionFailure::Unrecognized.into();
    }

    let mut corrections = Vec::new();
    let mut strategy = None;

    for line in lines {
        if let Some(caps) = RULES.correction.captures(line) {
            let field = caps[1].parse().ok().and_then(FeatureField::from_number);
            match field {
                Some(FeatureField::Category) => {
                    return ExtractionFailure::ambiguous(
                        "カテゴリは変更できません。変更する場合は「リセット」してやり直してください",
                    )
                    .into();
                }
                Some(field) => {
                    let value = caps[2].trim();
                    corrections.push(if field.is_optional() && RULES.is_clear(value) {
                        FeatureCorrection::Clear(field)
                    } else {
                        FeatureCorrection::Set(field, value.to_string())
                    });
                    continue;
                }
                None => {}
            }
        }

        match RULES.strategy(line) {
            Some(chosen) if strategy.is_some_and(|s| s != chosen) => {
                return ExtractionFailure::ambiguous("戦略が複数指定されています").into();
            }
            Some(chosen) => strategy = Some(chosen),
            None => return ExtractionFailure::Unrecognized.into(),
        }
    }

    Extraction::Success(Payload::Confirmation(ConfirmationReply {
        corrections,
        strategy,
    }))
}
