//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - deserialized straight off the analytics API's JSON payloads
//! - used in-memory by the merge/scenario/aggregation code
//! - written back out to snapshots and CSV exports

use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One historical sales observation as the API sends it (`/api/v1/sales/over_time`
/// and the `historical` half of `/api/v1/sales/forecast`).
///
/// The date stays a `String` at this layer; parsing happens in the merge so a
/// single corrupt row can be skipped with a warning instead of failing the fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRow {
    pub date: String,
    pub sales: f64,
}

/// One forecast step as the API sends it.
///
/// The upstream model emits extra columns (`mean_se` and friends); we only keep
/// the mean and its 95% confidence interval. Each value is nullable: the model
/// occasionally emits a step with no mean, and such a step is carried through
/// as-is rather than coerced to 0 or rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRow {
    pub date: String,
    pub mean: Option<f64>,
    #[serde(rename = "mean_ci_lower")]
    pub lower: Option<f64>,
    #[serde(rename = "mean_ci_upper")]
    pub upper: Option<f64>,
}

/// A historical observation after date parsing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub date: NaiveDate,
    pub sales: f64,
}

/// A forecast step after date parsing. The value fields keep the wire's
/// nullability; only the date must be present and valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub mean: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// One row of the combined historical + forecast series.
///
/// Exactly one row exists per distinct date; a side that has no data for that
/// date stays `None`. Rendering layers decide how to show the gap — the merge
/// never fabricates values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedPoint {
    pub date: NaiveDate,
    pub sales: Option<f64>,
    pub mean: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// The `/api/v1/kpis` payload, field names matching the wire exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiSet {
    pub total_net_sales: f64,
    pub avg_transaction_value: f64,
    pub new_customers_qtd: u64,
    pub booking_conversion_rate: f64,
    pub top_selling_service: String,
    pub top_selling_service_value: f64,
    pub top_selling_product: String,
    pub top_selling_product_value: f64,
    pub calculation_note: Option<String>,
}

/// One slice of the sales-by-category breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySlice {
    pub name: String,
    pub value: f64,
}

/// One slice of the profit-by-category breakdown (the API keys this `profit`,
/// not `value`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryProfit {
    pub name: String,
    pub profit: f64,
}

/// A business location with its lifetime sales total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesLocation {
    pub location_id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub total_sales: f64,
}

/// A customer map pin.
///
/// The API returns these as bare `[longitude, latitude]` pairs (the shape its
/// hexagon-layer renderer wants), so we parse them from two-element arrays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomerPin {
    pub lon: f64,
    pub lat: f64,
}

impl CustomerPin {
    pub fn from_pairs(pairs: &[[f64; 2]]) -> Vec<Self> {
        pairs
            .iter()
            .map(|&[lon, lat]| CustomerPin { lon, lat })
            .collect()
    }
}

/// Whether a transaction line is a service or a retail product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Service,
    Product,
}

impl ItemKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ItemKind::Service => "Services",
            ItemKind::Product => "Products",
        }
    }

    /// Assumed cost as a fraction of net price, used where the dataset carries
    /// no per-item cost (offline aggregation). Stated in report footers.
    pub fn cost_ratio(self) -> f64 {
        match self {
            ItemKind::Service => 0.40,
            ItemKind::Product => 0.55,
        }
    }
}

/// One imported transaction row (one line item; the upstream importer treats
/// each CSV row as its own transaction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_time: NaiveDateTime,
    pub location_name: String,
    pub item_type: ItemKind,
    pub item_identifier: String,
    pub quantity: u32,
    pub net_price: f64,
    /// Amount taken off the gross price. Zero for undiscounted lines; the
    /// import treats the column as optional.
    #[serde(default)]
    pub discount_amount: f64,
    #[serde(default)]
    pub customer_id: Option<String>,
}

/// One day of the margin-over-time series derived from imported transactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginPoint {
    pub date: NaiveDate,
    pub sales: f64,
    pub profit: f64,
    /// Derived with the same guard as [`FinancialSummary`]: zero when the
    /// day's sales are not positive.
    pub margin_pct: f64,
}

/// Aggregate discount effect for one item, plus the overall totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountLine {
    pub name: String,
    pub total_amount: f64,
    pub usage_count: u64,
    /// Profit forgone by discounting, i.e. the discounted amount itself.
    pub profit_impact: f64,
}

/// Discount breakdown across the whole dataset, ordered by total amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscountImpact {
    pub lines: Vec<DiscountLine>,
    pub total_amount: f64,
    pub total_usage: u64,
    pub discounted_share_pct: f64,
}

/// Query filters shared by every dashboard endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardFilters {
    pub location_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DashboardFilters {
    /// Render as query parameters (only the set fields).
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(id) = self.location_id {
            out.push(("location_id", id.to_string()));
        }
        if let Some(d) = self.start_date {
            out.push(("start_date", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(d) = self.end_date {
            out.push(("end_date", d.format("%Y-%m-%d").to_string()));
        }
        out
    }

    pub fn describe(&self) -> String {
        format!(
            "location={} start={} end={}",
            self.location_id
                .map(|v| v.to_string())
                .unwrap_or_else(|| "all".to_string()),
            self.start_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.end_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
        )
    }
}

/// Where the dashboard data came from. Synthetic data stays labeled at rest
/// (snapshots) and on screen (TUI header, report banner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Api,
    Sample,
}

impl DataSource {
    pub fn display_name(self) -> &'static str {
        match self {
            DataSource::Api => "api",
            DataSource::Sample => "sample",
        }
    }
}

/// Per-panel fetch lifecycle.
///
/// Every dashboard panel owns one of these so a single failed endpoint never
/// blanks the others; rendering matches on it exhaustively and shows the
/// `Failed` text verbatim.
#[derive(Debug, Clone, Default)]
pub enum FetchState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            FetchState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchState::Failed(_))
    }
}

/// An immutable revenue/cost/profit/margin summary.
///
/// `profit` and `margin_pct` are always derived through
/// [`FinancialSummary::from_revenue_cost`], which applies the margin guard:
/// non-positive revenue reports a margin of exactly 0 rather than NaN/inf.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub margin_pct: f64,
}

impl FinancialSummary {
    pub fn from_revenue_cost(revenue: f64, cost: f64) -> Self {
        let profit = revenue - cost;
        let margin_pct = if revenue > 0.0 {
            100.0 * profit / revenue
        } else {
            0.0
        };
        Self {
            revenue,
            cost,
            profit,
            margin_pct,
        }
    }
}

/// What-if adjustment percentages, each clamped into [-50, 50].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenarioAdjustment {
    pub price_pct: f64,
    pub volume_pct: f64,
    pub cost_pct: f64,
}

impl ScenarioAdjustment {
    pub const MIN_PCT: f64 = -50.0;
    pub const MAX_PCT: f64 = 50.0;

    /// Build an adjustment with every component clamped into range.
    ///
    /// Out-of-range input is an expected slider boundary condition, not a
    /// caller bug, so it is clamped silently rather than rejected.
    pub fn clamped(price_pct: f64, volume_pct: f64, cost_pct: f64) -> Self {
        let clamp = |v: f64| {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(Self::MIN_PCT, Self::MAX_PCT)
            }
        };
        Self {
            price_pct: clamp(price_pct),
            volume_pct: clamp(volume_pct),
            cost_pct: clamp(cost_pct),
        }
    }
}

/// Result of projecting a scenario: the untouched baseline, the projected
/// summary, and their field-wise difference (margin delta in percentage points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub baseline: FinancialSummary,
    pub projected: FinancialSummary,
    pub delta: FinancialSummary,
}
