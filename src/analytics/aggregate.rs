//! Client-side aggregation of raw transactions into dashboard numbers.
//!
//! This mirrors what the analytics API computes server-side, so the offline
//! (sample or imported-CSV) path produces payloads of the same shape. Where
//! the dataset cannot support a figure (per-item cost, booking outcomes), the
//! substitute is stated in `calculation_note` or the report footer rather than
//! silently guessed.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{
    CategoryProfit, CategorySlice, DiscountImpact, DiscountLine, FinancialSummary, ItemKind,
    KpiSet, MarginPoint, SalesPoint, TransactionRecord,
};

/// Net sales summed per calendar day, ascending.
///
/// Days with no transactions are absent; callers that need a dense series
/// zero-fill on their side (the forecast generator does).
pub fn daily_sales(records: &[TransactionRecord]) -> Vec<SalesPoint> {
    let mut by_day: std::collections::BTreeMap<NaiveDate, f64> = std::collections::BTreeMap::new();
    for r in records {
        *by_day.entry(r.transaction_time.date()).or_insert(0.0) += r.net_price;
    }
    by_day
        .into_iter()
        .map(|(date, sales)| SalesPoint { date, sales })
        .collect()
}

/// Compute the KPI payload from raw transactions.
///
/// Each imported row is one transaction (the upstream importer creates one
/// transaction header per line item), so the average transaction value is
/// total over row count. New-customer and booking-conversion figures need
/// tables the transaction CSV does not carry; they are reported as zero with
/// the note explaining why.
pub fn compute_kpis(records: &[TransactionRecord]) -> KpiSet {
    let total_net_sales: f64 = records.iter().map(|r| r.net_price).sum();
    let avg_transaction_value = if records.is_empty() {
        0.0
    } else {
        total_net_sales / records.len() as f64
    };

    let (top_service, top_service_value) = top_item(records, ItemKind::Service);
    let (top_product, top_product_value) = top_item(records, ItemKind::Product);

    KpiSet {
        total_net_sales: round2(total_net_sales),
        avg_transaction_value: round2(avg_transaction_value),
        new_customers_qtd: 0,
        booking_conversion_rate: 0.0,
        top_selling_service: top_service,
        top_selling_service_value: round2(top_service_value),
        top_selling_product: top_product,
        top_selling_product_value: round2(top_product_value),
        calculation_note: Some(
            "Computed client-side from transaction rows; new-customer and booking \
             figures require customer/booking data not present in this dataset."
                .to_string(),
        ),
    }
}

/// Net sales by item kind. Both kinds are always present, zero-filled, so the
/// chart legend is stable across filters.
pub fn sales_by_category(records: &[TransactionRecord]) -> Vec<CategorySlice> {
    let mut totals: HashMap<ItemKind, f64> = HashMap::new();
    for r in records {
        *totals.entry(r.item_type).or_insert(0.0) += r.net_price;
    }
    [ItemKind::Product, ItemKind::Service]
        .into_iter()
        .map(|kind| CategorySlice {
            name: kind.display_name().to_string(),
            value: round2(totals.get(&kind).copied().unwrap_or(0.0)),
        })
        .collect()
}

/// Profit by item kind, applying the fixed per-kind cost ratios.
pub fn profit_by_category(records: &[TransactionRecord]) -> Vec<CategoryProfit> {
    let mut profit: HashMap<ItemKind, f64> = HashMap::new();
    for r in records {
        *profit.entry(r.item_type).or_insert(0.0) += r.net_price * (1.0 - r.item_type.cost_ratio());
    }
    let mut out: Vec<CategoryProfit> = [ItemKind::Product, ItemKind::Service]
        .into_iter()
        .map(|kind| CategoryProfit {
            name: kind.display_name().to_string(),
            profit: round2(profit.get(&kind).copied().unwrap_or(0.0)),
        })
        .collect();
    out.sort_by(|a, b| {
        b.profit
            .partial_cmp(&a.profit)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out
}

/// Default scenario baseline: revenue is total net sales, cost via the
/// per-kind ratios, margin through the usual guard.
pub fn baseline_summary(records: &[TransactionRecord]) -> FinancialSummary {
    let revenue: f64 = records.iter().map(|r| r.net_price).sum();
    let cost: f64 = records
        .iter()
        .map(|r| r.net_price * r.item_type.cost_ratio())
        .sum();
    FinancialSummary::from_revenue_cost(revenue, cost)
}

/// Daily profit margin series, ascending by date.
///
/// Profit uses the per-kind cost ratios; the margin carries the usual guard,
/// so a day with non-positive sales reports a margin of exactly 0.
pub fn margin_trend(records: &[TransactionRecord]) -> Vec<MarginPoint> {
    let mut by_day: std::collections::BTreeMap<NaiveDate, (f64, f64)> =
        std::collections::BTreeMap::new();
    for r in records {
        let entry = by_day.entry(r.transaction_time.date()).or_insert((0.0, 0.0));
        entry.0 += r.net_price;
        entry.1 += r.net_price * (1.0 - r.item_type.cost_ratio());
    }
    by_day
        .into_iter()
        .map(|(date, (sales, profit))| MarginPoint {
            date,
            sales: round2(sales),
            profit: round2(profit),
            margin_pct: if sales > 0.0 {
                round2(100.0 * profit / sales)
            } else {
                0.0
            },
        })
        .collect()
}

/// Discount breakdown per item, largest total first.
///
/// Only lines with a positive discount contribute. The profit impact of a
/// discount is the discounted amount itself: every dollar taken off the gross
/// comes straight out of profit under the fixed cost ratios.
pub fn discount_impact(records: &[TransactionRecord]) -> DiscountImpact {
    let mut by_item: HashMap<&str, (f64, u64)> = HashMap::new();
    let mut discounted_rows = 0u64;
    for r in records.iter().filter(|r| r.discount_amount > 0.0) {
        let entry = by_item.entry(r.item_identifier.as_str()).or_insert((0.0, 0));
        entry.0 += r.discount_amount;
        entry.1 += 1;
        discounted_rows += 1;
    }

    let mut lines: Vec<DiscountLine> = by_item
        .into_iter()
        .map(|(name, (total, count))| DiscountLine {
            name: name.to_string(),
            total_amount: round2(total),
            usage_count: count,
            profit_impact: round2(total),
        })
        .collect();
    lines.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    let total_amount = round2(lines.iter().map(|l| l.total_amount).sum());
    let discounted_share_pct = if records.is_empty() {
        0.0
    } else {
        round2(100.0 * discounted_rows as f64 / records.len() as f64)
    };
    DiscountImpact {
        lines,
        total_amount,
        total_usage: discounted_rows,
        discounted_share_pct,
    }
}

fn top_item(records: &[TransactionRecord], kind: ItemKind) -> (String, f64) {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for r in records.iter().filter(|r| r.item_type == kind) {
        *totals.entry(r.item_identifier.as_str()).or_insert(0.0) += r.net_price;
    }
    totals
        .into_iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(name, v)| (name.to_string(), v))
        .unwrap_or_else(|| ("N/A".to_string(), 0.0))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn record(time: &str, kind: ItemKind, item: &str, net_price: f64) -> TransactionRecord {
        TransactionRecord {
            transaction_time: NaiveDateTime::parse_from_str(time, "%Y-%m-%d %H:%M:%S").unwrap(),
            location_name: "Napa".to_string(),
            item_type: kind,
            item_identifier: item.to_string(),
            quantity: 1,
            net_price,
            discount_amount: 0.0,
            customer_id: None,
        }
    }

    fn discounted(
        time: &str,
        kind: ItemKind,
        item: &str,
        net_price: f64,
        discount_amount: f64,
    ) -> TransactionRecord {
        TransactionRecord {
            discount_amount,
            ..record(time, kind, item, net_price)
        }
    }

    fn sample_records() -> Vec<TransactionRecord> {
        vec![
            record("2024-01-01 10:00:00", ItemKind::Service, "Facial", 200.0),
            record("2024-01-01 14:30:00", ItemKind::Service, "Facial", 200.0),
            record("2024-01-02 09:15:00", ItemKind::Service, "Massage", 150.0),
            record("2024-01-02 16:00:00", ItemKind::Product, "SKU-1", 50.0),
        ]
    }

    #[test]
    fn daily_sales_sums_per_day_ascending() {
        let daily = daily_sales(&sample_records());
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(daily[0].sales, 400.0);
        assert_eq!(daily[1].sales, 200.0);
    }

    #[test]
    fn kpis_totals_and_top_items() {
        let kpis = compute_kpis(&sample_records());
        assert_eq!(kpis.total_net_sales, 600.0);
        assert_eq!(kpis.avg_transaction_value, 150.0);
        assert_eq!(kpis.top_selling_service, "Facial");
        assert_eq!(kpis.top_selling_service_value, 400.0);
        assert_eq!(kpis.top_selling_product, "SKU-1");
        assert!(kpis.calculation_note.is_some());
    }

    #[test]
    fn kpis_empty_dataset() {
        let kpis = compute_kpis(&[]);
        assert_eq!(kpis.total_net_sales, 0.0);
        assert_eq!(kpis.avg_transaction_value, 0.0);
        assert_eq!(kpis.top_selling_service, "N/A");
    }

    #[test]
    fn categories_are_zero_filled() {
        let services_only = vec![record("2024-01-01 10:00:00", ItemKind::Service, "X", 100.0)];
        let slices = sales_by_category(&services_only);
        assert_eq!(slices.len(), 2);
        let products = slices.iter().find(|s| s.name == "Products").unwrap();
        assert_eq!(products.value, 0.0);
    }

    #[test]
    fn baseline_applies_cost_ratios() {
        let records = vec![
            record("2024-01-01 10:00:00", ItemKind::Service, "X", 100.0),
            record("2024-01-01 11:00:00", ItemKind::Product, "Y", 100.0),
        ];
        let baseline = baseline_summary(&records);
        assert_eq!(baseline.revenue, 200.0);
        assert!((baseline.cost - 95.0).abs() < 1e-9); // 40 + 55
        assert!((baseline.profit - 105.0).abs() < 1e-9);
    }

    #[test]
    fn margin_trend_per_day_with_guard() {
        let trend = margin_trend(&sample_records());
        assert_eq!(trend.len(), 2);
        // Day 1: two services at 200 each; profit 400 * 0.60 = 240.
        assert_eq!(trend[0].sales, 400.0);
        assert_eq!(trend[0].profit, 240.0);
        assert_eq!(trend[0].margin_pct, 60.0);
        // Day 2: service 150 (profit 90) + product 50 (profit 22.5).
        assert_eq!(trend[1].sales, 200.0);
        assert!((trend[1].margin_pct - 56.25).abs() < 1e-9);

        assert!(margin_trend(&[]).is_empty());
    }

    #[test]
    fn discount_impact_groups_and_sorts_by_total() {
        let records = vec![
            discounted("2024-01-01 10:00:00", ItemKind::Service, "Facial", 180.0, 20.0),
            discounted("2024-01-02 10:00:00", ItemKind::Service, "Facial", 190.0, 10.0),
            discounted("2024-01-02 11:00:00", ItemKind::Product, "SKU-1", 45.0, 5.0),
            record("2024-01-03 10:00:00", ItemKind::Service, "Massage", 150.0),
        ];
        let impact = discount_impact(&records);
        assert_eq!(impact.lines.len(), 2);
        assert_eq!(impact.lines[0].name, "Facial");
        assert_eq!(impact.lines[0].total_amount, 30.0);
        assert_eq!(impact.lines[0].usage_count, 2);
        assert_eq!(impact.lines[0].profit_impact, 30.0);
        assert_eq!(impact.total_amount, 35.0);
        assert_eq!(impact.total_usage, 3);
        assert_eq!(impact.discounted_share_pct, 75.0);
    }

    #[test]
    fn discount_impact_empty_dataset() {
        let impact = discount_impact(&[]);
        assert!(impact.lines.is_empty());
        assert_eq!(impact.total_amount, 0.0);
        assert_eq!(impact.discounted_share_pct, 0.0);
    }

    #[test]
    fn profit_sorted_descending() {
        let profits = profit_by_category(&sample_records());
        assert!(profits[0].profit >= profits[1].profit);
        // Services: 550 * 0.60 = 330; Products: 50 * 0.45 = 22.5.
        assert_eq!(profits[0].name, "Services");
        assert!((profits[0].profit - 330.0).abs() < 1e-9);
    }
}
