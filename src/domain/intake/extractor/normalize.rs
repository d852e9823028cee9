//! Character-level normalization applied before any grammar runs.

/// Folds full-width ASCII (U+FF01..=U+FF5E) to half-width and the
/// ideographic space to a plain space. Line breaks are preserved.
pub fn fold_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{3000}' => ' ',
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Removes `,` used as a thousands separator (`3,000` -> `3000`).
///
/// A comma only counts as grouping when it sits between a run of 1-3 digits
/// and exactly three digits that end the number.
pub fn strip_thousands_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;

    for (i, &c) in chars.iter().enumerate() {
        if c == ',' && (1..=3).contains(&run) && is_group_of_three(&chars[i + 1..]) {
            run = 0;
            continue;
        }
        if c.is_ascii_digit() {
            run += 1;
        } else {
            run = 0;
        }
        out.push(c);
    }
    out
}

fn is_group_of_three(rest: &[char]) -> bool {
    rest.len() >= 3
        && rest[..3].iter().all(|c| c.is_ascii_digit())
        && rest.get(3).map_or(true, |c| !c.is_ascii_digit())
}

/// Splits normalized text into tokens on whitespace and the given separators.
pub fn tokenize<'a>(text: &'a str, separators: &'a [char]) -> impl Iterator<Item = &'a str> + 'a {
    text.split(move |c: char| c.is_whitespace() || separators.contains(&c))
        .filter(|t| !t.is_empty())
}

/// Normalization every grammar sees. Commas stay separators here; thousands
/// grouping is only tried as a second reading.
pub fn normalize(text: &str) -> String {
    fold_width(text)
}

/// The text read with grouping commas removed, when it has any.
pub fn grouped_reading(text: &str) -> Option<String> {
    let grouped = strip_thousands_commas(text);
    (grouped != text).then_some(grouped)
}
