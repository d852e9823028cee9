//! UTC instant used for session activity and expiry.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Out-of-range values clamp to the Unix epoch.
    pub fn from_unix_secs(secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        Self(Utc.timestamp_opt(secs, 0).single().unwrap_or_default())
    }

    pub fn as_unix_secs(&self) -> u64 {
        u64::try_from(self.0.timestamp()).unwrap_or(0)
    }

    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    pub fn plus(&self, duration: Duration) -> Self {
        Self(self.0 + duration)
    }

    pub fn plus_secs(&self, secs: u64) -> Self {
        self.plus(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)))
    }

    /// Wall-clock time at `offset`.
    pub fn at_offset(&self, offset: FixedOffset) -> DateTime<FixedOffset> {
        self.0.with_timezone(&offset)
    }

    /// Calendar date at `offset`.
    pub fn date_at(&self, offset: FixedOffset) -> NaiveDate {
        self.at_offset(offset).date_naive()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
