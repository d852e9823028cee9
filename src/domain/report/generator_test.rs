use super::*;
use crate::domain::report::Sale;
use chrono::TimeZone;

fn tokyo() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

/// Tokyo wall-clock time.
fn local(year: i32, month: u32, day: u32, hour: u32) -> Timestamp {
    let local = tokyo()
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .unwrap();
    Timestamp::from_unix_secs(local.timestamp() as u64)
}

fn at(month: u32, day: u32, hour: u32) -> Timestamp {
    local(2025, month, day, hour)
}

fn listed(
    id: &str,
    category: Category,
    purchase_price: u32,
    registered_at: Timestamp,
) -> SalesRecord {
    SalesRecord {
        management_id: id.to_string(),
        category,
        purchase_price,
        registered_at,
        sale: None,
    }
}

fn sold(mut record: SalesRecord, sold_at: Timestamp, price: u32, shipping: u32) -> SalesRecord {
    let commission = price / 10;
    record.sale = Some(Sale {
        sold_at,
        outcome: SettlementOutcome {
            management_id: record.management_id.clone(),
            sale_price: price,
            shipping_cost: shipping,
            commission,
            profit: i64::from(price)
                - i64::from(record.purchase_price)
                - i64::from(shipping)
                - i64::from(commission),
        },
    });
    record
}

/// Reported week is 2025-12-08..=2025-12-14 when run on the 17th.
fn records() -> Vec<SalesRecord> {
    vec![
        sold(listed("A", Category::Tops, 880, at(11, 20, 12)), at(12, 10, 12), 3000, 700),
        sold(listed("B", Category::Pants, 500, at(12, 2, 12)), at(12, 3, 12), 2000, 500),
        listed("C", Category::Tops, 1000, at(12, 9, 12)),
        // Still the 14th in UTC, already the 15th in Tokyo.
        sold(listed("D", Category::Tops, 700, at(12, 5, 12)), at(12, 15, 1), 2500, 500),
        sold(listed("E", Category::Setup, 2000, at(12, 11, 12)), at(12, 14, 23), 5000, 1000),
    ]
}

fn weekly() -> SalesReport {
    ReportGenerator::new(tokyo()).generate(ReportKind::Weekly, &records(), at(12, 17, 10))
}

#[test]
fn weekly_summary_counts_sales_in_local_week() {
    let report = weekly();

    assert_eq!(report.sheet_name, "週次_12月第2週");
    assert_eq!(report.summary.sales_count, 2);
    assert_eq!(report.summary.total_sales, 8000);
    assert_eq!(report.summary.total_purchase, 2880);
    assert_eq!(report.summary.total_shipping, 1700);
    assert_eq!(report.summary.total_commission, 800);
    assert_eq!(report.summary.net_profit, 1120 + 1500);
    assert_eq!(report.summary.avg_profit_per_item, 1310);
}

#[test]
fn inventory_moves_balance() {
    let inv = weekly().inventory;

    assert_eq!(inv.start_inventory, 2);
    assert_eq!(inv.new_registrations, 2);
    assert_eq!(inv.sold_count, 2);
    assert_eq!(inv.end_inventory, 2);
    assert_eq!(inv.inventory_value, 1000 + 700);
    assert_eq!(
        inv.start_inventory + inv.new_registrations - inv.sold_count,
        inv.end_inventory
    );
}

#[test]
fn categories_without_sales_are_left_out() {
    let categories = weekly().categories;

    let listed: Vec<Category> = categories.iter().map(|c| c.category).collect();
    assert_eq!(listed, vec![Category::Tops, Category::Setup]);
    assert_eq!(categories[1].profit, 1500);
    assert!((categories[1].profit_rate - 30.0).abs() < 1e-9);
}

#[test]
fn comparison_against_previous_week() {
    let comparison = weekly().comparison;

    assert_eq!(
        comparison.previous,
        Some(PreviousPeriod {
            sales_count: 1,
            net_profit: 800,
            sales_count_diff: 1,
            profit_diff: 2620 - 800,
        })
    );
    assert_eq!(comparison.cumulative_sales, 3);
    assert_eq!(comparison.cumulative_profit, 1120 + 800 + 1500);
}

#[test]
fn cumulative_totals_start_at_configured_date() {
    let since = NaiveDate::from_ymd_opt(2025, 12, 5).unwrap();
    let report = ReportGenerator::new(tokyo())
        .with_cumulative_since(Some(since))
        .generate(ReportKind::Weekly, &records(), at(12, 17, 10));

    assert_eq!(report.comparison.cumulative_sales, 2);
    assert_eq!(report.comparison.cumulative_profit, 2620);
}

#[test]
fn monthly_without_previous_sales_has_no_comparison() {
    let report = ReportGenerator::new(tokyo()).generate(
        ReportKind::Monthly,
        &records(),
        local(2026, 1, 5, 9),
    );

    assert_eq!(report.sheet_name, "月次_2025年12月");
    assert_eq!(report.summary.sales_count, 4);
    assert_eq!(report.comparison.previous, None);
    assert!(report
        .rows()
        .contains(&row(["前月比", "-（前期データなし）"])));
}

#[test]
fn empty_book_reports_zeroes() {
    let report = ReportGenerator::new(tokyo()).generate(ReportKind::Weekly, &[], at(12, 17, 10));

    assert_eq!(report.summary, SalesSummary::default());
    assert_eq!(report.inventory, InventoryStatus::default());
    assert!(report.rows().contains(&row(["（データなし）", "", "", "", ""])));
}

#[test]
fn rows_render_sections_in_order() {
    let rows = weekly().rows();

    assert_eq!(rows[0], row(["【週次報告書】2025/12/08 〜 2025/12/14"]));
    assert_eq!(rows[1], row(["作成日時: 2025/12/17 10:00"]));
    assert!(rows.contains(&row(["純利益", "¥2,620"])));
    assert!(rows.contains(&row(["トップス", "1件", "¥3,000", "¥1,120", "37.3%"])));
    assert!(rows.contains(&row(["純利益", "¥2,620", "¥800", "+¥1,820"])));
    assert_eq!(rows.last(), Some(&row(["累計純利益", "¥3,420"])));
}

#[test]
fn yen_groups_thousands() {
    assert_eq!(yen(0), "¥0");
    assert_eq!(yen(999), "¥999");
    assert_eq!(yen(1_234_567), "¥1,234,567");
    assert_eq!(yen(-1_234), "¥-1,234");
}

#[test]
fn notification_names_the_period() {
    assert_eq!(
        weekly().notification(),
        "【週次報告】\n12/08〜12/14の報告書を作成しました。\nスプレッドシートをご確認ください。"
    );
}
