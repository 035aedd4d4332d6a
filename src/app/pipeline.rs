//! Shared dashboard pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch (API) or generate (sample) -> aggregate -> forecast -> merge
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::analytics;
use crate::cli::DashArgs;
use crate::data::api::{ApiClient, ApiConfig, DashboardData, ForecastPanel};
use crate::data::sample::{self, SAMPLE_FORECAST_NOTE, SampleConfig};
use crate::domain::{
    DashboardFilters, DataSource, FetchState, FinancialSummary, KpiSet, SalesRow,
    TransactionRecord,
};
use crate::error::AppError;
use crate::series;

/// Assumed blended cost ratio when only KPI revenue is available (API mode
/// carries no cost figures). Stated in the baseline note.
pub const API_COST_RATIO: f64 = 0.45;

/// Everything needed to collect one dashboard refresh.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub sample: bool,
    pub sample_days: usize,
    pub sample_seed: u64,
    pub forecast_days: usize,
    pub filters: DashboardFilters,
}

impl DashboardOptions {
    pub fn from_dash_args(args: &DashArgs) -> Self {
        Self {
            sample: args.sample,
            sample_days: args.history,
            sample_seed: args.seed,
            forecast_days: args.days,
            filters: DashboardFilters {
                location_id: args.location,
                start_date: args.from,
                end_date: args.to,
            },
        }
    }
}

/// One collected dashboard refresh plus the scenario baseline derived from it.
#[derive(Debug, Clone)]
pub struct DashboardBundle {
    pub source: DataSource,
    pub data: DashboardData,
    pub baseline: FinancialSummary,
    pub baseline_note: Option<String>,
}

/// Collect the dashboard from the configured source.
pub fn collect_dashboard(opts: &DashboardOptions) -> Result<DashboardBundle, AppError> {
    if opts.sample {
        collect_sample(opts)
    } else {
        collect_api(opts)
    }
}

fn collect_sample(opts: &DashboardOptions) -> Result<DashboardBundle, AppError> {
    let config = SampleConfig {
        days: opts.sample_days,
        seed: opts.sample_seed,
        ..SampleConfig::default()
    };
    let records = sample::generate_sample(&config)?;
    let filtered = apply_filters(&records, &opts.filters);

    let mut data = dashboard_from_records(&filtered, opts.forecast_days, Some(SAMPLE_FORECAST_NOTE));
    // Location totals stay lifetime figures, so they come from the unfiltered set.
    data.locations = FetchState::Ready(sample::sample_locations(&records));
    data.pins = FetchState::Ready(sample::sample_customer_pins(&config, 250));

    let baseline = analytics::baseline_summary(&filtered);
    Ok(DashboardBundle {
        source: DataSource::Sample,
        data,
        baseline,
        baseline_note: Some(
            "Baseline cost uses fixed cost ratios (services 40%, products 55%).".to_string(),
        ),
    })
}

fn collect_api(opts: &DashboardOptions) -> Result<DashboardBundle, AppError> {
    let config = ApiConfig::from_env()?;
    let client = ApiClient::new(&config)?;
    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        client.login(username, password)?;
    }

    let data = client.fetch_dashboard(&opts.filters, opts.forecast_days);
    let (baseline, baseline_note) = baseline_from_kpis(&data.kpis);

    Ok(DashboardBundle {
        source: DataSource::Api,
        data,
        baseline,
        baseline_note,
    })
}

/// Build every derivable panel from raw transactions.
///
/// Used by sample mode and by `pulse import`; map panels are left `Idle` since
/// transaction rows carry no coordinates.
pub fn dashboard_from_records(
    records: &[TransactionRecord],
    forecast_days: usize,
    note: Option<&str>,
) -> DashboardData {
    let daily = analytics::daily_sales(records);
    let forecast = sample::illustrative_forecast(&daily, forecast_days);
    let merged = series::merge(&daily, &forecast);

    let daily_rows: Vec<SalesRow> = daily
        .iter()
        .map(|p| SalesRow {
            date: p.date.to_string(),
            sales: p.sales,
        })
        .collect();

    DashboardData {
        kpis: FetchState::Ready(analytics::compute_kpis(records)),
        daily: FetchState::Ready(daily_rows),
        categories: FetchState::Ready(analytics::sales_by_category(records)),
        profit: FetchState::Ready(analytics::profit_by_category(records)),
        forecast: FetchState::Ready(ForecastPanel {
            points: merged,
            warnings: Vec::new(),
            note: note.map(str::to_string),
        }),
        pins: FetchState::Idle,
        locations: FetchState::Idle,
        margins: FetchState::Ready(analytics::margin_trend(records)),
        discounts: FetchState::Ready(analytics::discount_impact(records)),
    }
}

/// Derive a scenario baseline from the KPI payload.
///
/// The API reports revenue but no cost, so cost is estimated with
/// [`API_COST_RATIO`] and the substitution is stated in the note.
pub fn baseline_from_kpis(kpis: &FetchState<KpiSet>) -> (FinancialSummary, Option<String>) {
    match kpis.ready() {
        Some(k) => {
            let revenue = k.total_net_sales;
            let baseline = FinancialSummary::from_revenue_cost(revenue, revenue * API_COST_RATIO);
            (
                baseline,
                Some(format!(
                    "Baseline cost estimated at {:.0}% of revenue (the API reports no cost data).",
                    API_COST_RATIO * 100.0
                )),
            )
        }
        None => (
            FinancialSummary::from_revenue_cost(0.0, 0.0),
            Some("No KPI data loaded; baseline is zero.".to_string()),
        ),
    }
}

fn apply_filters(records: &[TransactionRecord], filters: &DashboardFilters) -> Vec<TransactionRecord> {
    let location_name = filters.location_id.and_then(sample::sample_location_name);
    records
        .iter()
        .filter(|r| {
            let date = r.transaction_time.date();
            if let Some(start) = filters.start_date {
                if date < start {
                    return false;
                }
            }
            if let Some(end) = filters.end_date {
                if date > end {
                    return false;
                }
            }
            match location_name {
                Some(name) => r.location_name == name,
                None => true,
            }
        })
        .cloned()
        .collect()
}
