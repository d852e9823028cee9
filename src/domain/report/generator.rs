//! Builds sales reports from stored listings.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{
    CategoryBreakdown, InventoryStatus, ReportKind, ReportPeriod, SalesRecord, SalesSummary,
};
use crate::domain::foundation::Timestamp;
use crate::domain::listing::{Category, SettlementOutcome};

/// Report for the last complete week or month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub period: ReportPeriod,
    pub sheet_name: String,
    pub generated_at: DateTime<FixedOffset>,
    pub summary: SalesSummary,
    pub inventory: InventoryStatus,
    pub categories: Vec<CategoryBreakdown>,
    pub comparison: Comparison,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    /// `None` when the previous period had no sales.
    pub previous: Option<PreviousPeriod>,
    pub cumulative_since: Option<NaiveDate>,
    pub cumulative_sales: u64,
    pub cumulative_profit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousPeriod {
    pub sales_count: u64,
    pub net_profit: i64,
    pub sales_count_diff: i64,
    pub profit_diff: i64,
}

/// Aggregates listings by local calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportGenerator {
    offset: FixedOffset,
    cumulative_since: Option<NaiveDate>,
}

impl ReportGenerator {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            cumulative_since: None,
        }
    }

    /// Counts cumulative totals from `date` instead of the first sale.
    pub fn with_cumulative_since(mut self, date: Option<NaiveDate>) -> Self {
        self.cumulative_since = date;
        self
    }

    pub fn generate(
        &self,
        kind: ReportKind,
        records: &[SalesRecord],
        now: Timestamp,
    ) -> SalesReport {
        let generated_at = now.at_offset(self.offset);
        let period = ReportPeriod::preceding(kind, generated_at.date_naive());
        let previous_period = period.previous();

        let summary = self.summarize(records, |date| period.contains(date));
        let previous = self.summarize(records, |date| previous_period.contains(date));
        let cumulative = self.summarize(records, |date| {
            date <= period.end && self.cumulative_since.map_or(true, |since| since <= date)
        });

        let comparison = Comparison {
            previous: (previous.sales_count > 0).then(|| PreviousPeriod {
                sales_count_diff: signed(summary.sales_count) - signed(previous.sales_count),
                profit_diff: summary.net_profit - previous.net_profit,
                sales_count: previous.sales_count,
                net_profit: previous.net_profit,
            }),
            cumulative_since: self.cumulative_since,
            cumulative_sales: cumulative.sales_count,
            cumulative_profit: cumulative.net_profit,
        };

        SalesReport {
            sheet_name: period.label(),
            generated_at,
            inventory: self.inventory(records, &period),
            categories: self.categories(records, &period),
            summary,
            comparison,
            period,
        }
    }

    fn sold_on<'a>(
        &self,
        record: &'a SalesRecord,
    ) -> Option<(NaiveDate, &'a SettlementOutcome)> {
        record
            .sale
            .as_ref()
            .map(|sale| (sale.sold_at.date_at(self.offset), &sale.outcome))
    }

    fn summarize(
        &self,
        records: &[SalesRecord],
        within: impl Fn(NaiveDate) -> bool,
    ) -> SalesSummary {
        let mut summary = SalesSummary::default();
        for record in records {
            if let Some((date, outcome)) = self.sold_on(record) {
                if within(date) {
                    summary.add(record, outcome);
                }
            }
        }
        summary
    }

    fn inventory(&self, records: &[SalesRecord], period: &ReportPeriod) -> InventoryStatus {
        let mut inventory = InventoryStatus::default();
        for record in records {
            let registered = record.registered_at.date_at(self.offset);
            let sold = self.sold_on(record).map(|(date, _)| date);

            if period.contains(registered) {
                inventory.new_registrations += 1;
            }
            if sold.is_some_and(|date| period.contains(date)) {
                inventory.sold_count += 1;
            }
            if registered < period.start && sold.map_or(true, |date| date >= period.start) {
                inventory.start_inventory += 1;
            }
            if registered <= period.end && sold.map_or(true, |date| date > period.end) {
                inventory.end_inventory += 1;
                inventory.inventory_value += u64::from(record.purchase_price);
            }
        }
        inventory
    }

    fn categories(
        &self,
        records: &[SalesRecord],
        period: &ReportPeriod,
    ) -> Vec<CategoryBreakdown> {
        Category::ALL
            .iter()
            .filter_map(|category| {
                let mut breakdown = CategoryBreakdown::new(*category);
                for record in records.iter().filter(|r| r.category == *category) {
                    if let Some((date, outcome)) = self.sold_on(record) {
                        if period.contains(date) {
                            breakdown.add(outcome);
                        }
                    }
                }
                (breakdown.sales_count > 0).then_some(breakdown)
            })
            .collect()
    }
}

fn signed(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

impl SalesReport {
    pub fn kind(&self) -> ReportKind {
        self.period.kind
    }

    /// Sheet rows, one `Vec` per row; blank rows separate the sections.
    pub fn rows(&self) -> Vec<Vec<String>> {
        let s = &self.summary;
        let inv = &self.inventory;
        let mut rows: Vec<Vec<String>> = vec![
            vec![format!(
                "【{}】{} 〜 {}",
                self.kind().title(),
                self.period.start.format("%Y/%m/%d"),
                self.period.end.format("%Y/%m/%d")
            )],
            vec![format!("作成日時: {}", self.generated_at.format("%Y/%m/%d %H:%M"))],
            vec![],
            vec!["■ 売上・利益サマリー".into()],
            row(["項目", "金額"]),
            row(["売上件数", &count(s.sales_count)]),
            row(["総売上高", &yen(signed(s.total_sales))]),
            row(["総仕入高", &yen(signed(s.total_purchase))]),
            row(["総送料", &yen(signed(s.total_shipping))]),
            row(["総手数料", &yen(signed(s.total_commission))]),
            row(["純利益", &yen(s.net_profit)]),
            row(["平均利益/件", &yen(s.avg_profit_per_item)]),
            vec![],
            vec!["■ 在庫状況".into()],
            row(["項目", "数量"]),
            row(["期初在庫数", &count(inv.start_inventory)]),
            row(["新規登録数", &count(inv.new_registrations)]),
            row(["売却数", &count(inv.sold_count)]),
            row(["期末在庫数", &count(inv.end_inventory)]),
            row(["在庫金額", &yen(signed(inv.inventory_value))]),
            vec![],
            vec!["■ カテゴリ別分析".into()],
            row(["カテゴリ", "売上件数", "売上金額", "利益", "利益率"]),
        ];

        for c in &self.categories {
            rows.push(row([
                c.category.label(),
                &count(c.sales_count),
                &yen(signed(c.sales_amount)),
                &yen(c.profit),
                &format!("{:.1}%", c.profit_rate),
            ]));
        }
        if self.categories.is_empty() {
            rows.push(row(["（データなし）", "", "", "", ""]));
        }
        rows.push(vec![]);

        rows.push(vec!["■ 比較データ".into()]);
        let label = self.kind().previous_label();
        match &self.comparison.previous {
            Some(prev) => {
                rows.push(row(["項目", "今期", label, "差分"]));
                rows.push(row([
                    "売上件数",
                    &count(s.sales_count),
                    &count(prev.sales_count),
                    &format!("{}{}件", plus(prev.sales_count_diff), prev.sales_count_diff),
                ]));
                rows.push(row([
                    "純利益",
                    &yen(s.net_profit),
                    &yen(prev.net_profit),
                    &format!("{}{}", plus(prev.profit_diff), yen(prev.profit_diff)),
                ]));
            }
            None => rows.push(row([&format!("{}比", label), "-（前期データなし）"])),
        }
        rows.push(vec![]);

        let heading = match self.comparison.cumulative_since {
            Some(since) => format!("■ 累計（{}年{}月〜）", since.year(), since.month()),
            None => "■ 累計".to_string(),
        };
        rows.push(vec![heading]);
        rows.push(row(["累計売上件数", &count(self.comparison.cumulative_sales)]));
        rows.push(row(["累計純利益", &yen(self.comparison.cumulative_profit)]));
        rows
    }

    /// Short operator notification that the report was filed.
    pub fn notification(&self) -> String {
        let subject = match self.kind() {
            ReportKind::Weekly => format!(
                "【週次報告】\n{}〜{}",
                self.period.start.format("%m/%d"),
                self.period.end.format("%m/%d")
            ),
            ReportKind::Monthly => format!(
                "【月次報告】\n{}年{}月",
                self.period.start.year(),
                self.period.start.month()
            ),
        };
        format!("{}の報告書を作成しました。\nスプレッドシートをご確認ください。", subject)
    }
}

fn row<const N: usize>(cells: [&str; N]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn count(n: u64) -> String {
    format!("{}件", n)
}

fn plus(n: i64) -> &'static str {
    if n >= 0 {
        "+"
    } else {
        ""
    }
}

/// Yen amount with thousands separators, e.g. `¥-1,234`.
fn yen(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("¥{}{}", sign, grouped)
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
