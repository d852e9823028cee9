//! Sales report configuration

use chrono::{FixedOffset, NaiveDate};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::report::ReportGenerator;

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Hours east of UTC that report periods are cut in
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// First day counted in cumulative totals, `YYYY-MM-DD`
    #[serde(default)]
    pub cumulative_since: Option<NaiveDate>,
}

impl ReportConfig {
    pub fn offset(&self) -> Result<FixedOffset, ValidationError> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or(ValidationError::InvalidUtcOffset)
    }

    pub fn generator(&self) -> Result<ReportGenerator, ValidationError> {
        Ok(ReportGenerator::new(self.offset()?).with_cumulative_since(self.cumulative_since))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.offset().map(|_| ())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            cumulative_since: None,
        }
    }
}

fn default_utc_offset_hours() -> i32 {
    9
}
