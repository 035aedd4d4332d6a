//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - wire rows as the API sends them (`SalesRow`, `ForecastRow`)
//! - parsed series points (`SalesPoint`, `ForecastPoint`, `MergedPoint`)
//! - dashboard payloads (`KpiSet`, category slices, locations, pins)
//! - scenario inputs/outputs (`FinancialSummary`, `ScenarioAdjustment`)
//! - the per-panel fetch lifecycle (`FetchState`)

pub mod types;

pub use types::*;
