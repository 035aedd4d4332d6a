//! Deterministic synthetic salon dataset for offline runs.
//!
//! Sample mode exists so the dashboard, reports, and scenario tooling work
//! without a reachable API. The generator is seeded from the config, so the
//! same settings always produce the same transactions, and everything built
//! on top (KPIs, charts, forecasts) is reproducible.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{
    CustomerPin, ForecastPoint, ItemKind, SalesLocation, SalesPoint, TransactionRecord,
};
use crate::error::AppError;
use crate::math::solve_linear_trend;

/// Shown wherever sample-mode forecasts appear, so synthetic projections are
/// never mistaken for model output.
pub const SAMPLE_FORECAST_NOTE: &str =
    "Illustrative forecast: linear trend plus weekday seasonality fitted to the \
     sample history. Not a statistical model.";

const SERVICES: &[(&str, f64)] = &[
    ("Signature Facial", 185.0),
    ("Deep Tissue Massage", 160.0),
    ("Hot Stone Massage", 195.0),
    ("Classic Manicure", 55.0),
    ("Spa Pedicure", 75.0),
    ("Cut & Style", 95.0),
    ("Color & Highlights", 210.0),
    ("Brow Shaping", 35.0),
];

const PRODUCTS: &[(&str, f64)] = &[
    ("SKU-SERUM-01", 88.0),
    ("SKU-SPF-30", 42.0),
    ("SKU-SHAMPOO-PRO", 34.0),
    ("SKU-LOTION-LAV", 28.0),
    ("SKU-CANDLE-NAPA", 24.0),
    ("SKU-MASK-CLAY", 36.0),
];

/// (id, name, address, latitude, longitude, traffic weight)
const LOCATIONS: &[(i64, &str, &str, f64, f64, f64)] = &[
    (1, "Downtown Napa", "1200 First St, Napa, CA", 38.2975, -122.2869, 0.5),
    (2, "St. Helena", "1310 Main St, St. Helena, CA", 38.5052, -122.4700, 0.3),
    (3, "Sonoma Plaza", "452 First St E, Sonoma, CA", 38.2919, -122.4580, 0.2),
];

/// Settings for the synthetic dataset.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub days: usize,
    pub seed: u64,
    /// Last day of the generated history (inclusive).
    pub end_date: NaiveDate,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            days: 365,
            seed: 7,
            end_date: chrono::Local::now().date_naive(),
        }
    }
}

fn sample_seed(config: &SampleConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.days.hash(&mut hasher);
    config.seed.hash(&mut hasher);
    config.end_date.hash(&mut hasher);
    hasher.finish()
}

/// Generate the transaction history described by `config`.
///
/// Weekly traffic shape (Fridays and Saturdays busy, Sundays quiet), a roughly
/// 70/30 service/product mix, occasional discounts, and a slow upward price
/// drift across the year. One record per line item.
pub fn generate_sample(config: &SampleConfig) -> Result<Vec<TransactionRecord>, AppError> {
    if config.days == 0 {
        return Err(AppError::usage("Sample history must cover at least one day."));
    }
    if config.days > 3650 {
        return Err(AppError::usage("Sample history is capped at 3650 days."));
    }

    let mut rng = StdRng::seed_from_u64(sample_seed(config));
    let noise = Normal::new(0.0, 3.0)
        .map_err(|e| AppError::data(format!("Noise distribution error: {e}")))?;

    let start = config.end_date - Duration::days(config.days as i64 - 1);
    let mut records = Vec::new();

    for day_index in 0..config.days {
        let date = start + Duration::days(day_index as i64);
        // Prices creep up about 6% over the generated span.
        let drift = 1.0 + 0.06 * day_index as f64 / config.days.max(1) as f64;

        let base: f64 = match date.weekday().num_days_from_monday() {
            4 => 23.0, // Friday
            5 => 27.0, // Saturday
            6 => 10.0, // Sunday
            _ => 17.0,
        };
        let count = ((base + noise.sample(&mut rng)).round() as i64).max(4) as usize;

        for _ in 0..count {
            let location = pick_location(&mut rng);
            let time = NaiveTime::from_hms_opt(
                rng.gen_range(9..19),
                rng.gen_range(0..60),
                rng.gen_range(0..60),
            )
            .unwrap_or(NaiveTime::MIN);

            let (item_type, item, list_price, quantity) = if rng.r#gen::<f64>() < 0.7 {
                let (name, price) = SERVICES[rng.gen_range(0..SERVICES.len())];
                (ItemKind::Service, name, price, 1u32)
            } else {
                let (name, price) = PRODUCTS[rng.gen_range(0..PRODUCTS.len())];
                (ItemKind::Product, name, price, rng.gen_range(1..=3))
            };

            // One in five lines carries a 5-15% discount off the gross.
            let gross = list_price * drift * quantity as f64;
            let discount_amount = if rng.r#gen::<f64>() < 0.2 {
                round2(gross * rng.gen_range(0.05..=0.15))
            } else {
                0.0
            };
            let net_price = round2(gross - discount_amount);

            let customer_id = if rng.r#gen::<f64>() < 0.6 {
                Some(format!("CUST-{:04}", rng.gen_range(1..=220)))
            } else {
                None
            };

            records.push(TransactionRecord {
                transaction_time: date.and_time(time),
                location_name: location.1.to_string(),
                item_type,
                item_identifier: item.to_string(),
                quantity,
                net_price,
                discount_amount,
                customer_id,
            });
        }
    }

    Ok(records)
}

/// The sample business's locations, with lifetime totals taken from the
/// generated records.
pub fn sample_locations(records: &[TransactionRecord]) -> Vec<SalesLocation> {
    LOCATIONS
        .iter()
        .map(|&(location_id, name, address, latitude, longitude, _)| {
            let total_sales: f64 = records
                .iter()
                .filter(|r| r.location_name == name)
                .map(|r| r.net_price)
                .sum();
            SalesLocation {
                location_id,
                name: name.to_string(),
                address: Some(address.to_string()),
                latitude,
                longitude,
                total_sales: round2(total_sales),
            }
        })
        .collect()
}

/// Map a sample location id back to its name, for `--location` filtering.
pub fn sample_location_name(id: i64) -> Option<&'static str> {
    LOCATIONS.iter().find(|l| l.0 == id).map(|l| l.1)
}

/// Synthetic customer home coordinates, scattered around the locations.
pub fn sample_customer_pins(config: &SampleConfig, count: usize) -> Vec<CustomerPin> {
    let mut rng = StdRng::seed_from_u64(sample_seed(config) ^ 0x70_69_6e_73);
    let scatter = match Normal::new(0.0, 0.045) {
        Ok(n) => n,
        Err(_) => return Vec::new(),
    };
    (0..count)
        .map(|_| {
            let home = pick_location(&mut rng);
            CustomerPin {
                lon: home.4 + scatter.sample(&mut rng),
                lat: home.3 + scatter.sample(&mut rng),
            }
        })
        .collect()
}

/// Project `days` steps past the end of `history`.
///
/// Fit is a least-squares line over the day index plus per-weekday offsets
/// from the residual means; the band is the residual standard deviation
/// widened with the horizon. Returns an empty vec when the history is too
/// short or degenerate to fit.
pub fn illustrative_forecast(history: &[SalesPoint], days: usize) -> Vec<ForecastPoint> {
    if history.len() < 14 || days == 0 {
        return Vec::new();
    }

    let xs: Vec<f64> = (0..history.len()).map(|i| i as f64).collect();
    let ys: Vec<f64> = history.iter().map(|p| p.sales).collect();
    let Some((intercept, slope)) = solve_linear_trend(&xs, &ys) else {
        return Vec::new();
    };

    // Weekday offsets from the residuals of the linear fit.
    let mut offset_sum = [0.0f64; 7];
    let mut offset_count = [0usize; 7];
    let mut residual_sq = 0.0;
    for (i, p) in history.iter().enumerate() {
        let residual = p.sales - (intercept + slope * i as f64);
        let wd = p.date.weekday().num_days_from_monday() as usize;
        offset_sum[wd] += residual;
        offset_count[wd] += 1;
        residual_sq += residual * residual;
    }
    let offsets: Vec<f64> = (0..7)
        .map(|wd| {
            if offset_count[wd] > 0 {
                offset_sum[wd] / offset_count[wd] as f64
            } else {
                0.0
            }
        })
        .collect();
    let sigma = (residual_sq / history.len() as f64).sqrt();

    let last = history[history.len() - 1].date;
    (1..=days)
        .map(|h| {
            let date = last + Duration::days(h as i64);
            let x = (history.len() - 1 + h) as f64;
            let wd = date.weekday().num_days_from_monday() as usize;
            let mean = (intercept + slope * x + offsets[wd]).max(0.0);
            let half = 1.96 * sigma * (1.0 + h as f64 / 7.0).sqrt();
            ForecastPoint {
                date,
                mean: Some(round2(mean)),
                lower: Some(round2((mean - half).max(0.0))),
                upper: Some(round2(mean + half)),
            }
        })
        .collect()
}

fn pick_location(rng: &mut StdRng) -> &'static (i64, &'static str, &'static str, f64, f64, f64) {
    let roll: f64 = rng.r#gen();
    let mut acc = 0.0;
    for loc in LOCATIONS {
        acc += loc.5;
        if roll < acc {
            return loc;
        }
    }
    &LOCATIONS[0]
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::daily_sales;

    fn config(days: usize, seed: u64) -> SampleConfig {
        SampleConfig {
            days,
            seed,
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        }
    }

    #[test]
    fn same_config_same_output() {
        let a = generate_sample(&config(30, 11)).unwrap();
        let b = generate_sample(&config(30, 11)).unwrap();
        assert_eq!(a.len(), b.len());
        assert_eq!(a[0].net_price, b[0].net_price);
        assert_eq!(a[a.len() - 1].item_identifier, b[b.len() - 1].item_identifier);
    }

    #[test]
    fn different_seed_different_output() {
        let a = generate_sample(&config(30, 1)).unwrap();
        let b = generate_sample(&config(30, 2)).unwrap();
        let same = a.len() == b.len()
            && a.iter().zip(&b).all(|(x, y)| x.net_price == y.net_price);
        assert!(!same);
    }

    #[test]
    fn covers_requested_span() {
        let records = generate_sample(&config(60, 3)).unwrap();
        let daily = daily_sales(&records);
        // Every day has at least four transactions, so the series is dense.
        assert_eq!(daily.len(), 60);
        assert_eq!(daily[59].date, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
    }

    #[test]
    fn zero_days_rejected() {
        let err = generate_sample(&config(0, 3)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn locations_total_matches_records() {
        let records = generate_sample(&config(20, 5)).unwrap();
        let locations = sample_locations(&records);
        assert_eq!(locations.len(), 3);
        let total: f64 = locations.iter().map(|l| l.total_sales).sum();
        let expected: f64 = records.iter().map(|r| r.net_price).sum();
        assert!((total - expected).abs() < 0.05);
    }

    #[test]
    fn forecast_band_widens_and_stays_ordered() {
        let records = generate_sample(&config(90, 9)).unwrap();
        let history = daily_sales(&records);
        let forecast = illustrative_forecast(&history, 14);
        assert_eq!(forecast.len(), 14);

        for step in &forecast {
            let (lower, mean, upper) = (
                step.lower.unwrap(),
                step.mean.unwrap(),
                step.upper.unwrap(),
            );
            assert!(lower <= mean);
            assert!(mean <= upper);
            assert!(lower >= 0.0);
        }
        let first_width = forecast[0].upper.unwrap() - forecast[0].lower.unwrap();
        let last_width = forecast[13].upper.unwrap() - forecast[13].lower.unwrap();
        assert!(last_width > first_width);
        assert_eq!(forecast[0].date, history[89].date + Duration::days(1));
    }

    #[test]
    fn discounts_are_present_and_consistent() {
        let records = generate_sample(&config(60, 4)).unwrap();
        assert!(records.iter().any(|r| r.discount_amount > 0.0));
        for r in &records {
            assert!(r.discount_amount >= 0.0);
            assert!(r.net_price > 0.0);
        }
    }

    #[test]
    fn forecast_needs_history() {
        let short: Vec<SalesPoint> = (0..5)
            .map(|i| SalesPoint {
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Duration::days(i),
                sales: 100.0,
            })
            .collect();
        assert!(illustrative_forecast(&short, 10).is_empty());
    }
}
