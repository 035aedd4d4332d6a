//! Merge the historical sales series with the model forecast.
//!
//! The chart and exports want one row per calendar date carrying both sides,
//! so we union the two series into a date-keyed map and emit it in true date
//! order. The one rule that matters: an observed value is ground truth and a
//! forecast for the same date must never displace it.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{ForecastPoint, ForecastRow, MergedPoint, SalesPoint, SalesRow};

/// Wire date format used by every dashboard endpoint.
const DATE_FMT: &str = "%Y-%m-%d";

/// A skipped wire row: the date text did not parse.
///
/// Warnings travel as values so reports and the TUI can show them; a single
/// corrupt record must not blank out the whole chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeWarning {
    /// Which input series the row came from (`"historical"` or `"forecast"`).
    pub series: &'static str,
    /// Zero-based index of the row within its input slice.
    pub index: usize,
    /// The raw date text as received.
    pub raw_date: String,
}

impl std::fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "skipped {} row {}: unparseable date '{}'",
            self.series, self.index, self.raw_date
        )
    }
}

/// Merged series plus the rows that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub points: Vec<MergedPoint>,
    pub warnings: Vec<MergeWarning>,
}

/// Merge parsed series. Pure and total: no IO, no failure path.
///
/// Rules:
/// - one output row per distinct date, ascending by calendar date
/// - duplicate historical dates: last write wins on `sales`
/// - a forecast point on a date with an observation fills in the forecast
///   fields without touching `sales`
/// - duplicate forecast dates: last write wins on the forecast fields only
/// - a forecast point with a missing mean stays missing; nothing is coerced
pub fn merge(historical: &[SalesPoint], forecast: &[ForecastPoint]) -> Vec<MergedPoint> {
    let mut by_date: BTreeMap<NaiveDate, MergedPoint> = BTreeMap::new();

    for p in historical {
        by_date
            .entry(p.date)
            .and_modify(|row| row.sales = Some(p.sales))
            .or_insert(MergedPoint {
                date: p.date,
                sales: Some(p.sales),
                mean: None,
                lower: None,
                upper: None,
            });
    }

    for f in forecast {
        let row = by_date.entry(f.date).or_insert(MergedPoint {
            date: f.date,
            sales: None,
            mean: None,
            lower: None,
            upper: None,
        });
        row.mean = f.mean;
        row.lower = f.lower;
        row.upper = f.upper;
    }

    by_date.into_values().collect()
}

/// Merge wire rows, parsing dates and skipping malformed ones with a warning.
pub fn merge_rows(historical: &[SalesRow], forecast: &[ForecastRow]) -> MergeOutcome {
    let mut warnings = Vec::new();

    let mut parsed_hist = Vec::with_capacity(historical.len());
    for (index, row) in historical.iter().enumerate() {
        match NaiveDate::parse_from_str(&row.date, DATE_FMT) {
            Ok(date) => parsed_hist.push(SalesPoint {
                date,
                sales: row.sales,
            }),
            Err(_) => warnings.push(MergeWarning {
                series: "historical",
                index,
                raw_date: row.date.clone(),
            }),
        }
    }

    let mut parsed_fcst = Vec::with_capacity(forecast.len());
    for (index, row) in forecast.iter().enumerate() {
        match NaiveDate::parse_from_str(&row.date, DATE_FMT) {
            Ok(date) => parsed_fcst.push(ForecastPoint {
                date,
                mean: row.mean,
                lower: row.lower,
                upper: row.upper,
            }),
            Err(_) => warnings.push(MergeWarning {
                series: "forecast",
                index,
                raw_date: row.date.clone(),
            }),
        }
    }

    MergeOutcome {
        points: merge(&parsed_hist, &parsed_fcst),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn hist(date: NaiveDate, sales: f64) -> SalesPoint {
        SalesPoint { date, sales }
    }

    fn fcst(date: NaiveDate, mean: f64, lower: f64, upper: f64) -> ForecastPoint {
        ForecastPoint {
            date,
            mean: Some(mean),
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    #[test]
    fn both_empty_is_empty() {
        assert!(merge(&[], &[]).is_empty());
    }

    #[test]
    fn disjoint_dates_union_in_order() {
        let historical = vec![hist(d(2024, 1, 1), 100.0)];
        let forecast = vec![fcst(d(2024, 1, 2), 110.0, 90.0, 130.0)];

        let out = merge(&historical, &forecast);
        assert_eq!(out.len(), 2);

        assert_eq!(out[0].date, d(2024, 1, 1));
        assert_eq!(out[0].sales, Some(100.0));
        assert_eq!(out[0].mean, None);
        assert_eq!(out[0].lower, None);
        assert_eq!(out[0].upper, None);

        assert_eq!(out[1].date, d(2024, 1, 2));
        assert_eq!(out[1].sales, None);
        assert_eq!(out[1].mean, Some(110.0));
        assert_eq!(out[1].lower, Some(90.0));
        assert_eq!(out[1].upper, Some(130.0));
    }

    #[test]
    fn overlap_keeps_historical_and_gains_forecast() {
        let historical = vec![hist(d(2024, 3, 15), 250.0)];
        let forecast = vec![fcst(d(2024, 3, 15), 240.0, 200.0, 280.0)];

        let out = merge(&historical, &forecast);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sales, Some(250.0));
        assert_eq!(out[0].mean, Some(240.0));
    }

    #[test]
    fn output_length_is_union_of_distinct_dates() {
        // 3 historical + 3 forecast dates with 1 shared date = 5 rows.
        let historical = vec![
            hist(d(2024, 1, 1), 1.0),
            hist(d(2024, 1, 2), 2.0),
            hist(d(2024, 1, 3), 3.0),
        ];
        let forecast = vec![
            fcst(d(2024, 1, 3), 3.5, 3.0, 4.0),
            fcst(d(2024, 1, 4), 4.0, 3.5, 4.5),
            fcst(d(2024, 1, 5), 5.0, 4.5, 5.5),
        ];
        assert_eq!(merge(&historical, &forecast).len(), 5);
    }

    #[test]
    fn order_independent_for_distinct_dates() {
        let a = vec![
            hist(d(2024, 2, 1), 10.0),
            hist(d(2024, 10, 1), 20.0),
            hist(d(2024, 3, 1), 30.0),
        ];
        let mut b = a.clone();
        b.reverse();

        let f = vec![
            fcst(d(2024, 11, 1), 1.0, 0.0, 2.0),
            fcst(d(2024, 2, 15), 2.0, 1.0, 3.0),
        ];
        let mut g = f.clone();
        g.reverse();

        assert_eq!(merge(&a, &f), merge(&b, &g));
    }

    #[test]
    fn sorts_by_calendar_date_not_string_order() {
        // Lexicographically "2024-10-01" < "2024-02-01" is false, but a naive
        // string sort of unpadded dates would misplace month 10 before month 2.
        let historical = vec![hist(d(2024, 10, 1), 1.0), hist(d(2024, 2, 1), 2.0)];
        let out = merge(&historical, &[]);
        assert_eq!(out[0].date, d(2024, 2, 1));
        assert_eq!(out[1].date, d(2024, 10, 1));
    }

    #[test]
    fn duplicate_historical_dates_last_write_wins() {
        let historical = vec![hist(d(2024, 1, 1), 100.0), hist(d(2024, 1, 1), 150.0)];
        let out = merge(&historical, &[]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sales, Some(150.0));
    }

    #[test]
    fn duplicate_forecast_dates_update_forecast_fields_only() {
        let historical = vec![hist(d(2024, 1, 1), 100.0)];
        let forecast = vec![
            fcst(d(2024, 1, 1), 90.0, 80.0, 100.0),
            fcst(d(2024, 1, 1), 95.0, 85.0, 105.0),
        ];
        let out = merge(&historical, &forecast);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sales, Some(100.0));
        assert_eq!(out[0].mean, Some(95.0));
        assert_eq!(out[0].lower, Some(85.0));
        assert_eq!(out[0].upper, Some(105.0));
    }

    #[test]
    fn null_mean_stays_missing_through_merge() {
        let forecast = vec![ForecastRow {
            date: "2024-01-02".to_string(),
            mean: None,
            lower: Some(90.0),
            upper: Some(130.0),
        }];
        let out = merge_rows(&[], &forecast);
        assert!(out.warnings.is_empty());
        assert_eq!(out.points.len(), 1);
        assert_eq!(out.points[0].mean, None);
        assert_eq!(out.points[0].lower, Some(90.0));
        assert_eq!(out.points[0].upper, Some(130.0));
    }

    #[test]
    fn empty_historical_yields_forecast_only_rows() {
        let forecast = vec![fcst(d(2024, 1, 2), 110.0, 90.0, 130.0)];
        let out = merge(&[], &forecast);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sales, None);
        assert_eq!(out[0].mean, Some(110.0));
    }

    #[test]
    fn merge_rows_skips_malformed_dates_with_warning() {
        let historical = vec![
            SalesRow {
                date: "2024-01-01".to_string(),
                sales: 100.0,
            },
            SalesRow {
                date: "not-a-date".to_string(),
                sales: 200.0,
            },
        ];
        let forecast = vec![ForecastRow {
            date: "2024-13-40".to_string(),
            mean: Some(1.0),
            lower: Some(0.0),
            upper: Some(2.0),
        }];

        let out = merge_rows(&historical, &forecast);
        assert_eq!(out.points.len(), 1);
        assert_eq!(out.points[0].sales, Some(100.0));
        assert_eq!(out.warnings.len(), 2);
        assert_eq!(out.warnings[0].series, "historical");
        assert_eq!(out.warnings[0].index, 1);
        assert_eq!(out.warnings[1].series, "forecast");
        assert_eq!(out.warnings[1].raw_date, "2024-13-40");
    }

    #[test]
    fn merge_rows_concrete_two_row_case() {
        let historical = vec![SalesRow {
            date: "2024-01-01".to_string(),
            sales: 100.0,
        }];
        let forecast = vec![ForecastRow {
            date: "2024-01-02".to_string(),
            mean: Some(110.0),
            lower: Some(100.0),
            upper: Some(120.0),
        }];

        let out = merge_rows(&historical, &forecast);
        assert!(out.warnings.is_empty());
        assert_eq!(
            out.points,
            vec![
                MergedPoint {
                    date: d(2024, 1, 1),
                    sales: Some(100.0),
                    mean: None,
                    lower: None,
                    upper: None,
                },
                MergedPoint {
                    date: d(2024, 1, 2),
                    sales: None,
                    mean: Some(110.0),
                    lower: Some(100.0),
                    upper: Some(120.0),
                },
            ]
        );
    }
}
