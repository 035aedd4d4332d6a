//! Debug bundle writer for inspecting one dashboard refresh.
//!
//! The bundle is a timestamped markdown file under `./debug/`: the run
//! configuration, every panel's data (or its failure), and a scenario sweep
//! over the derived baseline. Useful when a report looks off and the raw
//! payloads are needed side by side.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

use crate::app::pipeline::{DashboardBundle, DashboardOptions};
use crate::domain::{FetchState, ScenarioAdjustment};
use crate::error::AppError;

/// Sweep values (percent) for the scenario grid.
const SWEEP: [f64; 3] = [-20.0, 0.0, 20.0];

pub fn write_debug_bundle(
    bundle: &DashboardBundle,
    opts: &DashboardOptions,
) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir)
        .map_err(|e| AppError::data(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("pulse_debug_{}_{ts}.md", bundle.source.display_name()));

    let mut out = String::new();
    out.push_str("# pulse debug bundle\n");
    out.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!("- source: {}\n", bundle.source.display_name()));
    out.push_str(&format!("- filters: {}\n", opts.filters.describe()));
    out.push_str(&format!("- forecast_days: {}\n", opts.forecast_days));
    if opts.sample {
        out.push_str(&format!(
            "- sample: days={} seed={}\n",
            opts.sample_days, opts.sample_seed
        ));
    }

    out.push_str("\n## KPIs\n");
    match &bundle.data.kpis {
        FetchState::Ready(k) => {
            out.push_str("| metric | value |\n| - | - |\n");
            out.push_str(&format!("| total_net_sales | {:.2} |\n", k.total_net_sales));
            out.push_str(&format!("| avg_transaction_value | {:.2} |\n", k.avg_transaction_value));
            out.push_str(&format!("| new_customers_qtd | {} |\n", k.new_customers_qtd));
            out.push_str(&format!("| booking_conversion_rate | {:.2} |\n", k.booking_conversion_rate));
            out.push_str(&format!(
                "| top_selling_service | {} ({:.2}) |\n",
                k.top_selling_service, k.top_selling_service_value
            ));
            out.push_str(&format!(
                "| top_selling_product | {} ({:.2}) |\n",
                k.top_selling_product, k.top_selling_product_value
            ));
            if let Some(note) = &k.calculation_note {
                out.push_str(&format!("\nNote: {note}\n"));
            }
        }
        other => push_state_line(&mut out, other),
    }

    out.push_str("\n## Categories\n");
    match &bundle.data.categories {
        FetchState::Ready(slices) => {
            out.push_str("| category | net sales |\n| - | - |\n");
            for s in slices {
                out.push_str(&format!("| {} | {:.2} |\n", s.name, s.value));
            }
        }
        other => push_state_line(&mut out, other),
    }
    match &bundle.data.profit {
        FetchState::Ready(slices) => {
            out.push_str("\n| category | profit |\n| - | - |\n");
            for s in slices {
                out.push_str(&format!("| {} | {:.2} |\n", s.name, s.profit));
            }
        }
        other => push_state_line(&mut out, other),
    }

    out.push_str("\n## Merged series\n");
    match &bundle.data.forecast {
        FetchState::Ready(panel) => {
            if let Some(note) = &panel.note {
                out.push_str(&format!("Note: {note}\n\n"));
            }
            if !panel.warnings.is_empty() {
                out.push_str("Skipped rows:\n");
                for w in &panel.warnings {
                    out.push_str(&format!("- {w}\n"));
                }
                out.push('\n');
            }
            out.push_str("```\n");
            out.push_str(&crate::plot::render_merged_chart(&panel.points, 100, 20));
            out.push_str("```\n\n");
            out.push_str("```\n");
            out.push_str(&crate::report::format_series_table(&panel.points));
            out.push_str("```\n");
        }
        other => push_state_line(&mut out, other),
    }

    out.push_str("\n## Scenario sweep\n");
    if let Some(note) = &bundle.baseline_note {
        out.push_str(&format!("Note: {note}\n\n"));
    }
    out.push_str(&format!(
        "Baseline: revenue {:.2}, cost {:.2}, profit {:.2}, margin {:.1}%\n\n",
        bundle.baseline.revenue,
        bundle.baseline.cost,
        bundle.baseline.profit,
        bundle.baseline.margin_pct
    ));
    out.push_str("| price% | cost% | revenue | cost | profit | margin% |\n");
    out.push_str("| - | - | - | - | - | - |\n");
    for price in SWEEP {
        for cost in SWEEP {
            let outcome = crate::scenario::project(
                &bundle.baseline,
                ScenarioAdjustment {
                    price_pct: price,
                    volume_pct: 0.0,
                    cost_pct: cost,
                },
            );
            out.push_str(&format!(
                "| {price:+.0} | {cost:+.0} | {:.2} | {:.2} | {:.2} | {:.1} |\n",
                outcome.projected.revenue,
                outcome.projected.cost,
                outcome.projected.profit,
                outcome.projected.margin_pct
            ));
        }
    }

    let mut file = File::create(&path)
        .map_err(|e| AppError::data(format!("Failed to create debug file: {e}")))?;
    file.write_all(out.as_bytes())
        .map_err(|e| AppError::data(format!("Failed to write debug file: {e}")))?;

    Ok(path)
}

fn push_state_line<T>(out: &mut String, state: &FetchState<T>) {
    match state {
        FetchState::Idle => out.push_str("(not fetched)\n"),
        FetchState::Loading => out.push_str("(still loading)\n"),
        FetchState::Failed(message) => out.push_str(&format!("FAILED: {message}\n")),
        FetchState::Ready(_) => {}
    }
}
