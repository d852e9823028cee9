//! Era tag attached to vintage items.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized era tag: `90s` for two-digit decades, `2000年代` for four-digit ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EraTag(String);

impl EraTag {
    /// Builds a tag from the decade digits, choosing the form by digit count.
    ///
    /// Returns `None` unless `digits` is two or four ASCII digits.
    pub fn from_decade_digits(digits: &str) -> Option<Self> {
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match digits.len() {
            2 => Some(Self(format!("{}s", digits))),
            4 => Some(Self(format!("{}年代", digits))),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EraTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
