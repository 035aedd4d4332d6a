//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the analytics code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pulse", version, about = "Terminal sales dashboard and what-if projector")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard TUI.
    ///
    /// This uses the same data pipeline as `pulse report`, but renders the
    /// panels in a terminal UI using Ratatui.
    Tui(DashArgs),
    /// Print the dashboard (KPIs, categories, merged series) as text.
    Report(ReportArgs),
    /// Project a what-if scenario onto a baseline and print the result.
    Scenario(ScenarioArgs),
    /// Check a transaction CSV's header without importing anything.
    Validate(FileArgs),
    /// Load a transaction CSV and report on it (all-or-nothing).
    Import(ImportArgs),
    /// Display a previously saved dashboard snapshot.
    Snapshot(SnapshotArgs),
}

/// Common options for dashboard-shaped commands.
#[derive(Debug, Parser, Clone)]
pub struct DashArgs {
    /// Use the offline sample dataset instead of the live API.
    #[arg(long)]
    pub sample: bool,

    /// Sample history length in days (sample mode only).
    #[arg(long, default_value_t = 365)]
    pub history: usize,

    /// Sample generator seed (sample mode only).
    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    /// Forecast horizon in days.
    #[arg(short = 'd', long, default_value_t = 30)]
    pub days: usize,

    /// Restrict to one location id.
    #[arg(short = 'l', long)]
    pub location: Option<i64>,

    /// Start date (YYYY-MM-DD, inclusive).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// End date (YYYY-MM-DD, inclusive).
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

/// Options for the text report.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    #[command(flatten)]
    pub dash: DashArgs,

    /// Render an ASCII chart of the merged series (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Save the dashboard as a snapshot JSON.
    #[arg(long, value_name = "JSON")]
    pub snapshot: Option<PathBuf>,

    /// Export the merged series to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,

    /// Write a markdown debug bundle under ./debug/.
    #[arg(long)]
    pub debug_bundle: bool,
}

/// Options for scenario projection.
#[derive(Debug, Parser)]
pub struct ScenarioArgs {
    /// Price adjustment in percent (clamped into [-50, 50]).
    #[arg(short = 'p', long, default_value_t = 0.0)]
    pub price: f64,

    /// Volume adjustment in percent (clamped into [-50, 50]).
    #[arg(short = 'v', long, default_value_t = 0.0)]
    pub volume: f64,

    /// Cost adjustment in percent (clamped into [-50, 50]).
    #[arg(short = 'c', long, default_value_t = 0.0)]
    pub cost: f64,

    /// Baseline revenue. Overrides the sample-derived baseline.
    #[arg(long, requires = "cost_base")]
    pub revenue: Option<f64>,

    /// Baseline cost. Overrides the sample-derived baseline.
    #[arg(long = "cost-base", requires = "revenue")]
    pub cost_base: Option<f64>,

    /// Sample history length in days for the derived baseline.
    #[arg(long, default_value_t = 365)]
    pub history: usize,

    /// Sample generator seed for the derived baseline.
    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    /// Export the projection as a one-row CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

/// A transaction CSV to check.
#[derive(Debug, Parser)]
pub struct FileArgs {
    /// Transaction CSV. When omitted, discovered CSVs are offered in a prompt.
    pub file: Option<PathBuf>,
}

/// Options for `pulse import`.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// Transaction CSV. When omitted, discovered CSVs are offered in a prompt.
    pub file: Option<PathBuf>,

    /// Forecast horizon in days for the imported dataset.
    #[arg(short = 'd', long, default_value_t = 30)]
    pub days: usize,

    /// Save the imported dashboard as a snapshot JSON.
    #[arg(long, value_name = "JSON")]
    pub snapshot: Option<PathBuf>,
}

/// Options for showing a saved snapshot.
#[derive(Debug, Parser)]
pub struct SnapshotArgs {
    /// Snapshot JSON produced by `pulse report --snapshot`.
    pub file: PathBuf,

    /// Render an ASCII chart of the saved series (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}
