//! Calendar periods a report covers.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Weekly,
    Monthly,
}

impl ReportKind {
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Weekly => "週次報告書",
            ReportKind::Monthly => "月次報告書",
        }
    }

    /// Label for the period before the reported one.
    pub fn previous_label(&self) -> &'static str {
        match self {
            ReportKind::Weekly => "前週",
            ReportKind::Monthly => "前月",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Weekly => write!(f, "weekly"),
            ReportKind::Monthly => write!(f, "monthly"),
        }
    }
}

/// Inclusive range of local calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub kind: ReportKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    /// The last complete period before `today`.
    ///
    /// Weeks run Monday to Sunday; months run from the first to the last day.
    pub fn preceding(kind: ReportKind, today: NaiveDate) -> Self {
        match kind {
            ReportKind::Weekly => {
                let back = u64::from(today.weekday().num_days_from_monday()) + 7;
                let start = today - Days::new(back);
                Self {
                    kind,
                    start,
                    end: start + Days::new(6),
                }
            }
            ReportKind::Monthly => {
                let end = today - Days::new(u64::from(today.day()));
                Self {
                    kind,
                    start: end - Days::new(u64::from(end.day0())),
                    end,
                }
            }
        }
    }

    /// The period of the same kind immediately before this one.
    pub fn previous(&self) -> Self {
        match self.kind {
            ReportKind::Weekly => Self {
                kind: self.kind,
                start: self.start - Days::new(7),
                end: self.end - Days::new(7),
            },
            ReportKind::Monthly => Self::preceding(self.kind, self.start),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Sheet name the report is filed under, e.g. `週次_12月第3週`.
    pub fn label(&self) -> String {
        match self.kind {
            ReportKind::Weekly => format!(
                "週次_{}月第{}週",
                self.start.month(),
                week_of_month(self.start)
            ),
            ReportKind::Monthly => {
                format!("月次_{}年{}月", self.start.year(), self.start.month())
            }
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ~ {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// 1-based week of the month; a partial week before the first Monday is week 1.
fn week_of_month(date: NaiveDate) -> u32 {
    let first = date - Days::new(u64::from(date.day0()));
    let lead = first.weekday().num_days_from_monday();
    (date.day0() + lead) / 7 + 1
}
