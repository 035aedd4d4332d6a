//! Read/write dashboard snapshot JSON files.
//!
//! A snapshot is the portable capture of one dashboard refresh: KPIs, the
//! merged sales/forecast series, the category breakdowns, and the filters it
//! was taken under. Panels that had not loaded when the snapshot was taken are
//! simply absent. The source label travels with the data so synthetic numbers
//! stay marked at rest.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{
    CategoryProfit, CategorySlice, DashboardFilters, DataSource, KpiSet, MergedPoint, SalesRow,
};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub tool: String,
    pub generated_at: NaiveDateTime,
    pub source: DataSource,
    pub filters: DashboardFilters,
    #[serde(default)]
    pub kpis: Option<KpiSet>,
    #[serde(default)]
    pub daily: Vec<SalesRow>,
    #[serde(default)]
    pub merged: Vec<MergedPoint>,
    #[serde(default)]
    pub categories: Vec<CategorySlice>,
    #[serde(default)]
    pub profit: Vec<CategoryProfit>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Write a snapshot JSON file.
pub fn write_snapshot(path: &Path, snapshot: &DashboardSnapshot) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create snapshot '{}': {e}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, snapshot)
        .map_err(|e| AppError::data(format!("Failed to write snapshot JSON: {e}")))?;
    Ok(())
}

/// Read a snapshot JSON file.
pub fn read_snapshot(path: &Path) -> Result<DashboardSnapshot, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!("Failed to open snapshot '{}': {e}", path.display()))
    })?;
    let snapshot: DashboardSnapshot = serde_json::from_reader(file)
        .map_err(|e| AppError::data(format!("Invalid snapshot JSON: {e}")))?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let snapshot = DashboardSnapshot {
            tool: "pulse".to_string(),
            generated_at: date.and_hms_opt(9, 30, 0).unwrap(),
            source: DataSource::Sample,
            filters: DashboardFilters {
                location_id: Some(1),
                start_date: Some(date),
                end_date: None,
            },
            kpis: None,
            daily: vec![SalesRow {
                date: "2024-03-01".to_string(),
                sales: 1234.5,
            }],
            merged: vec![MergedPoint {
                date,
                sales: Some(1234.5),
                mean: None,
                lower: None,
                upper: None,
            }],
            categories: Vec::new(),
            profit: Vec::new(),
            note: Some("sample data".to_string()),
        };

        write_snapshot(&path, &snapshot).unwrap();
        let back = read_snapshot(&path).unwrap();

        assert_eq!(back.tool, "pulse");
        assert_eq!(back.source, DataSource::Sample);
        assert_eq!(back.merged.len(), 1);
        assert_eq!(back.merged[0].sales, Some(1234.5));
        assert!(back.merged[0].mean.is_none());
        assert_eq!(back.note.as_deref(), Some("sample data"));
    }

    #[test]
    fn missing_file_is_usage_error() {
        let err = read_snapshot(Path::new("/nonexistent/snap.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
