//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - collects dashboard data (API or sample)
//! - prints reports/plots or launches the TUI
//! - writes optional exports and snapshots

use clap::Parser;

use crate::cli::{Command, FileArgs, ImportArgs, ReportArgs, ScenarioArgs, SnapshotArgs};
use crate::domain::{DashboardFilters, FinancialSummary, ScenarioAdjustment};
use crate::error::AppError;
use crate::io::snapshot::DashboardSnapshot;

pub mod pipeline;

use pipeline::{DashboardBundle, DashboardOptions};

/// Entry point for the `pulse` binary.
pub fn run() -> Result<(), AppError> {
    // We want `pulse` and `pulse --sample` to behave like `pulse tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => crate::tui::run(args),
        Command::Report(args) => handle_report(args),
        Command::Scenario(args) => handle_scenario(args),
        Command::Validate(args) => handle_validate(args),
        Command::Import(args) => handle_import(args),
        Command::Snapshot(args) => handle_snapshot(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let opts = DashboardOptions::from_dash_args(&args.dash);
    let bundle = pipeline::collect_dashboard(&opts)?;

    print_dashboard(&bundle, &opts.filters);

    if args.plot && !args.no_plot {
        if let Some(panel) = bundle.data.forecast.ready() {
            println!(
                "{}",
                crate::plot::render_merged_chart(&panel.points, args.width, args.height)
            );
        }
    }

    if let Some(path) = &args.export_csv {
        if let Some(panel) = bundle.data.forecast.ready() {
            crate::io::export::write_merged_csv(path, &panel.points)?;
            println!("Wrote merged series to {}", path.display());
        }
    }
    if let Some(path) = &args.snapshot {
        let snapshot = snapshot_from_bundle(&bundle, &opts.filters);
        crate::io::snapshot::write_snapshot(path, &snapshot)?;
        println!("Wrote snapshot to {}", path.display());
    }
    if args.debug_bundle {
        let path = crate::debug::write_debug_bundle(&bundle, &opts)?;
        println!("Wrote debug bundle to {}", path.display());
    }

    Ok(())
}

fn handle_scenario(args: ScenarioArgs) -> Result<(), AppError> {
    // Clamp once up front; the printed header and the export must show the
    // same adjustments the projection actually used.
    let adjustment = ScenarioAdjustment::clamped(args.price, args.volume, args.cost);

    let (baseline, note) = match (args.revenue, args.cost_base) {
        (Some(revenue), Some(cost)) => (FinancialSummary::from_revenue_cost(revenue, cost), None),
        _ => {
            let opts = DashboardOptions {
                sample: true,
                sample_days: args.history,
                sample_seed: args.seed,
                forecast_days: 0,
                filters: DashboardFilters::default(),
            };
            let bundle = pipeline::collect_dashboard(&opts)?;
            (bundle.baseline, bundle.baseline_note)
        }
    };

    let outcome = crate::scenario::project(&baseline, adjustment);
    println!("{}", crate::report::format_scenario(&outcome, adjustment));
    if let Some(note) = note {
        println!("Note: {note}");
    }

    if let Some(path) = &args.export {
        let rows = vec![(
            adjustment.price_pct,
            adjustment.volume_pct,
            adjustment.cost_pct,
            outcome,
        )];
        crate::io::export::write_scenario_csv(path, &rows)?;
        println!("Wrote scenario CSV to {}", path.display());
    }

    Ok(())
}

fn handle_validate(args: FileArgs) -> Result<(), AppError> {
    let path = match args.file {
        Some(path) => crate::cli::picker::validate_csv_path(&path)?,
        None => crate::cli::picker::prompt_for_csv_path()?,
    };

    let validation = crate::io::ingest::validate_csv(&path)?;
    println!("{}", crate::report::format_validation(&validation));

    if validation.is_valid() {
        Ok(())
    } else {
        Err(AppError::data("CSV failed header validation."))
    }
}

fn handle_import(args: ImportArgs) -> Result<(), AppError> {
    let path = match args.file {
        Some(path) => crate::cli::picker::validate_csv_path(&path)?,
        None => crate::cli::picker::prompt_for_csv_path()?,
    };

    let outcome = crate::io::ingest::load_transactions(&path)?;
    println!("{}", crate::report::format_ingest_report(&outcome));

    if !outcome.errors.is_empty() {
        return Err(AppError::data("Import rejected; fix the listed rows and retry."));
    }

    let data = pipeline::dashboard_from_records(&outcome.records, args.days, None);
    let baseline = crate::analytics::baseline_summary(&outcome.records);
    let bundle = DashboardBundle {
        source: crate::domain::DataSource::Sample,
        data,
        baseline,
        baseline_note: None,
    };
    print_dashboard(&bundle, &DashboardFilters::default());

    if let Some(snap_path) = &args.snapshot {
        let snapshot = snapshot_from_bundle(&bundle, &DashboardFilters::default());
        crate::io::snapshot::write_snapshot(snap_path, &snapshot)?;
        println!("Wrote snapshot to {}", snap_path.display());
    }

    Ok(())
}

fn handle_snapshot(args: SnapshotArgs) -> Result<(), AppError> {
    let snapshot = crate::io::snapshot::read_snapshot(&args.file)?;

    println!(
        "Snapshot taken {} (source: {})",
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S"),
        snapshot.source.display_name()
    );
    if let Some(kpis) = &snapshot.kpis {
        println!(
            "{}",
            crate::report::format_kpis(kpis, snapshot.source, &snapshot.filters)
        );
    }
    if !snapshot.categories.is_empty() || !snapshot.profit.is_empty() {
        println!(
            "{}",
            crate::report::format_categories(&snapshot.categories, &snapshot.profit)
        );
    }
    if let Some(note) = &snapshot.note {
        println!("Note: {note}");
    }
    if args.plot && !args.no_plot && !snapshot.merged.is_empty() {
        println!(
            "{}",
            crate::plot::render_merged_chart(&snapshot.merged, args.width, args.height)
        );
    }

    Ok(())
}

fn print_dashboard(bundle: &DashboardBundle, filters: &DashboardFilters) {
    match bundle.data.kpis.ready() {
        Some(kpis) => println!(
            "{}",
            crate::report::format_kpis(kpis, bundle.source, filters)
        ),
        None => print_panel_failure("KPIs", &bundle.data.kpis),
    }

    let categories = bundle.data.categories.ready().cloned().unwrap_or_default();
    let profit = bundle.data.profit.ready().cloned().unwrap_or_default();
    if !categories.is_empty() || !profit.is_empty() {
        println!("{}", crate::report::format_categories(&categories, &profit));
    }
    print_panel_failure("Sales by category", &bundle.data.categories);
    print_panel_failure("Profit by category", &bundle.data.profit);

    if let Some(margins) = bundle.data.margins.ready() {
        println!("{}", crate::report::format_margin_trend(margins));
    }
    print_panel_failure("Margin trend", &bundle.data.margins);
    if let Some(discounts) = bundle.data.discounts.ready() {
        println!("{}", crate::report::format_discount_impact(discounts));
    }
    print_panel_failure("Discount impact", &bundle.data.discounts);

    match bundle.data.forecast.ready() {
        Some(panel) => println!("{}", crate::report::format_merge_summary(panel)),
        None => print_panel_failure("Forecast", &bundle.data.forecast),
    }
}

fn print_panel_failure<T>(label: &str, state: &crate::domain::FetchState<T>) {
    if let crate::domain::FetchState::Failed(message) = state {
        println!("{label} unavailable: {message}\n");
    }
}

fn snapshot_from_bundle(bundle: &DashboardBundle, filters: &DashboardFilters) -> DashboardSnapshot {
    let panel = bundle.data.forecast.ready();
    DashboardSnapshot {
        tool: "pulse".to_string(),
        generated_at: chrono::Local::now().naive_local(),
        source: bundle.source,
        filters: filters.clone(),
        kpis: bundle.data.kpis.ready().cloned(),
        daily: bundle.data.daily.ready().cloned().unwrap_or_default(),
        merged: panel.map(|p| p.points.clone()).unwrap_or_default(),
        categories: bundle.data.categories.ready().cloned().unwrap_or_default(),
        profit: bundle.data.profit.ready().cloned().unwrap_or_default(),
        note: panel.and_then(|p| p.note.clone()),
    }
}

/// Rewrite argv so `pulse` defaults to `pulse tui`.
///
/// Rules:
/// - `pulse`                     -> `pulse tui`
/// - `pulse --sample ...`        -> `pulse tui --sample ...`
/// - `pulse --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "tui" | "report" | "scenario" | "validate" | "import" | "snapshot"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["pulse"])), args(&["pulse", "tui"]));
    }

    #[test]
    fn leading_flag_routes_to_tui() {
        assert_eq!(
            rewrite_args(args(&["pulse", "--sample", "-d", "14"])),
            args(&["pulse", "tui", "--sample", "-d", "14"])
        );
    }

    #[test]
    fn scenario_header_reflects_clamped_adjustments() {
        let adjustment = ScenarioAdjustment::clamped(200.0, 0.0, 0.0);
        let baseline = FinancialSummary::from_revenue_cost(1000.0, 600.0);
        let outcome = crate::scenario::project(&baseline, adjustment);
        let text = crate::report::format_scenario(&outcome, adjustment);
        // +200% is clamped to +50%, and the header must say so.
        assert!(text.contains("price +50.0%"));
        assert!(!text.contains("+200.0%"));
        assert!((outcome.projected.revenue - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["pulse", "report", "--sample"])),
            args(&["pulse", "report", "--sample"])
        );
        assert_eq!(rewrite_args(args(&["pulse", "--help"])), args(&["pulse", "--help"]));
        assert_eq!(rewrite_args(args(&["pulse", "-V"])), args(&["pulse", "-V"]));
    }
}
