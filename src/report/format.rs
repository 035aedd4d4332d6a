//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the merge/scenario/aggregation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::data::api::ForecastPanel;
use crate::domain::{
    CategoryProfit, CategorySlice, DashboardFilters, DataSource, DiscountImpact, KpiSet,
    MarginPoint, MergedPoint, ScenarioAdjustment, ScenarioOutcome,
};
use crate::io::ingest::{CsvValidation, IngestOutcome};

/// Row errors shown in full before the report switches to a count.
const MAX_SHOWN_ERRORS: usize = 20;

/// Per-item discount rows shown before the list switches to a count.
const MAX_SHOWN_DISCOUNTS: usize = 10;

/// Format the KPI block with the run's source and filters up top.
pub fn format_kpis(kpis: &KpiSet, source: DataSource, filters: &DashboardFilters) -> String {
    let mut out = String::new();

    out.push_str("=== pulse - Sales Dashboard ===\n");
    out.push_str(&format!("Source: {}\n", source.display_name()));
    out.push_str(&format!("Filters: {}\n", filters.describe()));
    out.push('\n');

    out.push_str(&format!("Total net sales      {:>14.2}\n", kpis.total_net_sales));
    out.push_str(&format!("Avg transaction      {:>14.2}\n", kpis.avg_transaction_value));
    out.push_str(&format!("New customers (QTD)  {:>14}\n", kpis.new_customers_qtd));
    out.push_str(&format!(
        "Booking conversion   {:>13.1}%\n",
        kpis.booking_conversion_rate
    ));
    out.push_str(&format!(
        "Top service          {:>14.2}  {}\n",
        kpis.top_selling_service_value,
        truncate(&kpis.top_selling_service, 28)
    ));
    out.push_str(&format!(
        "Top product          {:>14.2}  {}\n",
        kpis.top_selling_product_value,
        truncate(&kpis.top_selling_product, 28)
    ));

    if let Some(note) = &kpis.calculation_note {
        out.push_str(&format!("\nNote: {note}\n"));
    }

    out
}

/// Format the sales and profit category breakdowns side by side.
pub fn format_categories(sales: &[CategorySlice], profit: &[CategoryProfit]) -> String {
    let mut out = String::new();

    out.push_str("Sales by category:\n");
    out.push_str(&format!("{:<12} {:>12}\n", "category", "net sales"));
    out.push_str(&format!("{:-<12} {:-<12}\n", "", ""));
    for slice in sales {
        out.push_str(&format!(
            "{:<12} {:>12.2}\n",
            truncate(&slice.name, 12),
            slice.value
        ));
    }

    out.push_str("\nProfit by category:\n");
    out.push_str(&format!("{:<12} {:>12}\n", "category", "profit"));
    out.push_str(&format!("{:-<12} {:-<12}\n", "", ""));
    for slice in profit {
        out.push_str(&format!(
            "{:<12} {:>12.2}\n",
            truncate(&slice.name, 12),
            slice.profit
        ));
    }

    out
}

/// Summarize the merged series: span, point counts per side, any rows the
/// merge skipped.
pub fn format_merge_summary(panel: &ForecastPanel) -> String {
    let mut out = String::new();

    let historical = panel.points.iter().filter(|p| p.sales.is_some()).count();
    let forecast = panel.points.iter().filter(|p| p.mean.is_some()).count();

    out.push_str("Series:\n");
    match (panel.points.first(), panel.points.last()) {
        (Some(first), Some(last)) => {
            out.push_str(&format!(
                "- {} points ({historical} historical, {forecast} forecast) from {} to {}\n",
                panel.points.len(),
                first.date,
                last.date
            ));
        }
        _ => out.push_str("- empty\n"),
    }

    if !panel.warnings.is_empty() {
        out.push_str(&format!("- {} row(s) skipped:\n", panel.warnings.len()));
        for w in &panel.warnings {
            out.push_str(&format!("  {w}\n"));
        }
    }
    if let Some(note) = &panel.note {
        out.push_str(&format!("- note: {note}\n"));
    }

    out
}

/// Format a scenario projection as a baseline / projected / delta table.
pub fn format_scenario(outcome: &ScenarioOutcome, adjustment: ScenarioAdjustment) -> String {
    let mut out = String::new();

    out.push_str("=== pulse - Scenario Projection ===\n");
    out.push_str(&format!(
        "Adjustments: price {:+.1}% | volume {:+.1}% | cost {:+.1}%\n\n",
        adjustment.price_pct, adjustment.volume_pct, adjustment.cost_pct
    ));

    out.push_str(&format!(
        "{:<12} {:>14} {:>14} {:>14}\n",
        "", "baseline", "projected", "delta"
    ));
    out.push_str(&format!(
        "{:-<12} {:-<14} {:-<14} {:-<14}\n",
        "", "", "", ""
    ));

    let rows = [
        ("revenue", outcome.baseline.revenue, outcome.projected.revenue, outcome.delta.revenue),
        ("cost", outcome.baseline.cost, outcome.projected.cost, outcome.delta.cost),
        ("profit", outcome.baseline.profit, outcome.projected.profit, outcome.delta.profit),
    ];
    for (label, baseline, projected, delta) in rows {
        out.push_str(&format!(
            "{label:<12} {baseline:>14.2} {projected:>14.2} {delta:>+14.2}\n"
        ));
    }
    out.push_str(&format!(
        "{:<12} {:>13.1}% {:>13.1}% {:>+13.1}pp\n",
        "margin",
        outcome.baseline.margin_pct,
        outcome.projected.margin_pct,
        outcome.delta.margin_pct
    ));

    out
}

/// Format the margin-over-time summary: average margin plus the best and
/// worst days with their dates.
pub fn format_margin_trend(trend: &[MarginPoint]) -> String {
    let mut out = String::new();
    out.push_str("Margin trend:\n");

    if trend.is_empty() {
        out.push_str("- no data\n");
        return out;
    }

    let avg = trend.iter().map(|p| p.margin_pct).sum::<f64>() / trend.len() as f64;
    let cmp = |a: &&MarginPoint, b: &&MarginPoint| {
        a.margin_pct
            .partial_cmp(&b.margin_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    };
    // Non-empty, so the extrema exist.
    if let (Some(highest), Some(lowest)) =
        (trend.iter().max_by(cmp), trend.iter().min_by(cmp))
    {
        out.push_str(&format!(
            "- average margin {avg:.1}% over {} day(s)\n",
            trend.len()
        ));
        out.push_str(&format!(
            "- highest {:.1}% on {} (profit {:.2})\n",
            highest.margin_pct, highest.date, highest.profit
        ));
        out.push_str(&format!(
            "- lowest  {:.1}% on {} (profit {:.2})\n",
            lowest.margin_pct, lowest.date, lowest.profit
        ));
    }
    out
}

/// Format the discount breakdown: overall totals, then per-item rows capped
/// at [`MAX_SHOWN_DISCOUNTS`].
pub fn format_discount_impact(impact: &DiscountImpact) -> String {
    let mut out = String::new();
    out.push_str("Discount impact:\n");

    if impact.lines.is_empty() {
        out.push_str("- no discounted transactions\n");
        return out;
    }

    out.push_str(&format!(
        "- {:.2} discounted across {} transaction(s) ({:.1}% of all rows)\n",
        impact.total_amount, impact.total_usage, impact.discounted_share_pct
    ));
    out.push_str(&format!(
        "{:<28} {:>12} {:>8} {:>14}\n",
        "item", "discounted", "uses", "profit impact"
    ));
    out.push_str(&format!(
        "{:-<28} {:-<12} {:-<8} {:-<14}\n",
        "", "", "", ""
    ));
    for line in impact.lines.iter().take(MAX_SHOWN_DISCOUNTS) {
        out.push_str(&format!(
            "{:<28} {:>12.2} {:>8} {:>14.2}\n",
            truncate(&line.name, 28),
            line.total_amount,
            line.usage_count,
            -line.profit_impact
        ));
    }
    if impact.lines.len() > MAX_SHOWN_DISCOUNTS {
        out.push_str(&format!(
            "... and {} more item(s)\n",
            impact.lines.len() - MAX_SHOWN_DISCOUNTS
        ));
    }
    out
}

/// Format the header-only validation result.
pub fn format_validation(validation: &CsvValidation) -> String {
    let mut out = String::new();
    if validation.is_valid() {
        out.push_str("Header OK: all required columns present.\n");
    } else {
        out.push_str("Header invalid. Missing required column(s):\n");
        for col in &validation.missing {
            out.push_str(&format!("- {col}\n"));
        }
    }
    out.push_str(&format!("Found: {}\n", validation.found.join(", ")));
    out
}

/// Format a full ingest report. Row errors are capped at
/// [`MAX_SHOWN_ERRORS`]; the remainder is summarized as a count.
pub fn format_ingest_report(outcome: &IngestOutcome) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Read {} row(s): {} valid, {} with errors.\n",
        outcome.rows_read,
        outcome.records.len(),
        outcome.errors.len()
    ));

    if outcome.errors.is_empty() {
        return out;
    }

    out.push_str("\nErrors:\n");
    for err in outcome.errors.iter().take(MAX_SHOWN_ERRORS) {
        out.push_str(&format!("- {err}\n"));
    }
    if outcome.errors.len() > MAX_SHOWN_ERRORS {
        out.push_str(&format!(
            "- ... and {} more\n",
            outcome.errors.len() - MAX_SHOWN_ERRORS
        ));
    }
    out.push_str("\nNothing was imported (imports are all-or-nothing).\n");

    out
}

/// Render the merged series as a compact table, one row per date.
pub fn format_series_table(points: &[MergedPoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:>12} {:>12} {:>12} {:>12}\n",
        "date", "sales", "mean", "ci_lower", "ci_upper"
    ));
    out.push_str(&format!(
        "{:-<12} {:-<12} {:-<12} {:-<12} {:-<12}\n",
        "", "", "", "", ""
    ));
    for p in points {
        out.push_str(&format!(
            "{:<12} {:>12} {:>12} {:>12} {:>12}\n",
            p.date.to_string(),
            fmt_opt(p.sales),
            fmt_opt(p.mean),
            fmt_opt(p.lower),
            fmt_opt(p.upper),
        ));
    }
    out
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
