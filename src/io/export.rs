//! Export the merged series and scenario grids to CSV.
//!
//! Exports are meant to be easy to consume in spreadsheets or downstream
//! scripts: stable headers, empty cells for gaps, two decimals for money.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{MergedPoint, ScenarioOutcome};
use crate::error::AppError;

/// Write the merged historical + forecast series.
///
/// Gap cells stay empty rather than zero so spreadsheet charts show breaks
/// where the data actually ends.
pub fn write_merged_csv(path: &Path, points: &[MergedPoint]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "date,sales,mean,mean_ci_lower,mean_ci_upper")
        .map_err(|e| AppError::data(format!("Failed to write export CSV header: {e}")))?;

    for p in points {
        writeln!(
            file,
            "{},{},{},{},{}",
            p.date,
            cell(p.sales),
            cell(p.mean),
            cell(p.lower),
            cell(p.upper),
        )
        .map_err(|e| AppError::data(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write a grid of scenario outcomes, one row per adjustment combination.
pub fn write_scenario_csv(
    path: &Path,
    rows: &[(f64, f64, f64, ScenarioOutcome)],
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(
        file,
        "price_pct,volume_pct,cost_pct,revenue,cost,profit,margin_pct,profit_delta"
    )
    .map_err(|e| AppError::data(format!("Failed to write export CSV header: {e}")))?;

    for (price, volume, cost, outcome) in rows {
        writeln!(
            file,
            "{price},{volume},{cost},{:.2},{:.2},{:.2},{:.2},{:.2}",
            outcome.projected.revenue,
            outcome.projected.cost,
            outcome.projected.profit,
            outcome.projected.margin_pct,
            outcome.delta.profit,
        )
        .map_err(|e| AppError::data(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

fn cell(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn merged_csv_leaves_gaps_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");

        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let points = vec![
            MergedPoint {
                date: d(1),
                sales: Some(100.0),
                mean: None,
                lower: None,
                upper: None,
            },
            MergedPoint {
                date: d(2),
                sales: None,
                mean: Some(110.5),
                lower: Some(90.0),
                upper: Some(131.0),
            },
        ];

        write_merged_csv(&path, &points).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,sales,mean,mean_ci_lower,mean_ci_upper");
        assert_eq!(lines[1], "2024-03-01,100.00,,,");
        assert_eq!(lines[2], "2024-03-02,,110.50,90.00,131.00");
    }
}
