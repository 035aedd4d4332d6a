//! What-if scenario projection.
//!
//! Projects percentage adjustments onto a baseline financial summary. The
//! three levers are independent by construction: price scales only revenue,
//! cost scales only cost, volume scales both (multiplicatively, since selling
//! more units moves revenue and cost together).

use crate::domain::{FinancialSummary, ScenarioAdjustment, ScenarioOutcome};

/// Project a scenario onto a baseline.
///
/// Pure: no clock, no randomness, no IO, no failure path. The adjustment is
/// clamped into [-50, 50] per component before use, and the margin guard in
/// [`FinancialSummary::from_revenue_cost`] keeps a zero-revenue projection at
/// exactly 0% margin instead of NaN.
///
/// A negative baseline (a loss-making period) is accepted as-is; sign
/// interpretation is the caller's business.
pub fn project(baseline: &FinancialSummary, adjustment: ScenarioAdjustment) -> ScenarioOutcome {
    let adj = ScenarioAdjustment::clamped(
        adjustment.price_pct,
        adjustment.volume_pct,
        adjustment.cost_pct,
    );

    let volume_factor = 1.0 + adj.volume_pct / 100.0;
    let revenue = baseline.revenue * (1.0 + adj.price_pct / 100.0) * volume_factor;
    let cost = baseline.cost * (1.0 + adj.cost_pct / 100.0) * volume_factor;

    let projected = FinancialSummary::from_revenue_cost(revenue, cost);

    let delta = FinancialSummary {
        revenue: projected.revenue - baseline.revenue,
        cost: projected.cost - baseline.cost,
        profit: projected.profit - baseline.profit,
        // Percentage-point difference, not a recomputed ratio.
        margin_pct: projected.margin_pct - baseline.margin_pct,
    };

    ScenarioOutcome {
        baseline: *baseline,
        projected,
        delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn zero_adjustment_is_identity() {
        let baseline = FinancialSummary::from_revenue_cost(1000.0, 600.0);
        let out = project(&baseline, ScenarioAdjustment::default());

        assert_eq!(out.projected, baseline);
        assert_eq!(out.delta.revenue, 0.0);
        assert_eq!(out.delta.cost, 0.0);
        assert_eq!(out.delta.profit, 0.0);
        assert_eq!(out.delta.margin_pct, 0.0);
    }

    #[test]
    fn price_increase_concrete_numbers() {
        let baseline = FinancialSummary::from_revenue_cost(1000.0, 600.0);
        assert!(approx(baseline.profit, 400.0));
        assert!(approx(baseline.margin_pct, 40.0));

        let out = project(
            &baseline,
            ScenarioAdjustment {
                price_pct: 10.0,
                volume_pct: 0.0,
                cost_pct: 0.0,
            },
        );

        assert!(approx(out.projected.revenue, 1100.0));
        assert!(approx(out.projected.cost, 600.0));
        assert!(approx(out.projected.profit, 500.0));
        assert!((out.projected.margin_pct - 45.4545).abs() < 1e-3);
        assert!(approx(out.delta.profit, 100.0));
    }

    #[test]
    fn volume_scales_revenue_and_cost_symmetrically() {
        let baseline = FinancialSummary::from_revenue_cost(1000.0, 600.0);
        let out = project(
            &baseline,
            ScenarioAdjustment {
                price_pct: 0.0,
                volume_pct: 20.0,
                cost_pct: 0.0,
            },
        );
        assert!(approx(out.projected.revenue, 1200.0));
        assert!(approx(out.projected.cost, 720.0));
        // Margin is unchanged when both sides scale together.
        assert!(approx(out.delta.margin_pct, 0.0));
    }

    #[test]
    fn price_and_volume_compound_multiplicatively() {
        let baseline = FinancialSummary::from_revenue_cost(1000.0, 600.0);
        let out = project(
            &baseline,
            ScenarioAdjustment {
                price_pct: 10.0,
                volume_pct: 10.0,
                cost_pct: 0.0,
            },
        );
        // 1000 * 1.1 * 1.1 = 1210, not 1200.
        assert!(approx(out.projected.revenue, 1210.0));
        // Cost only sees the volume lever.
        assert!(approx(out.projected.cost, 660.0));
    }

    #[test]
    fn margin_guard_on_zero_baseline() {
        let baseline = FinancialSummary::from_revenue_cost(0.0, 0.0);
        let out = project(
            &baseline,
            ScenarioAdjustment {
                price_pct: 37.0,
                volume_pct: -12.0,
                cost_pct: 50.0,
            },
        );
        assert_eq!(out.projected.margin_pct, 0.0);
        assert!(out.projected.margin_pct.is_finite());
        assert!(out.delta.margin_pct.is_finite());
    }

    #[test]
    fn out_of_range_adjustment_behaves_like_clamped() {
        let baseline = FinancialSummary::from_revenue_cost(1000.0, 600.0);
        let wild = project(
            &baseline,
            ScenarioAdjustment {
                price_pct: 200.0,
                volume_pct: -400.0,
                cost_pct: 75.0,
            },
        );
        let clamped = project(
            &baseline,
            ScenarioAdjustment {
                price_pct: 50.0,
                volume_pct: -50.0,
                cost_pct: 50.0,
            },
        );
        assert_eq!(wild, clamped);
    }

    #[test]
    fn negative_baseline_is_accepted() {
        let baseline = FinancialSummary::from_revenue_cost(500.0, 800.0);
        let out = project(
            &baseline,
            ScenarioAdjustment {
                price_pct: 10.0,
                volume_pct: 0.0,
                cost_pct: 0.0,
            },
        );
        assert!(out.projected.profit.is_finite());
        assert!(out.projected.profit > baseline.profit);
    }
}
