//! Linear trend fit for the illustrative sample forecast.
//!
//! We repeatedly fit `y = a + b·x` on a daily sales series. The design matrix
//! is tall (one row per day, two columns), so we solve via SVD rather than QR
//! (nalgebra's `QR::solve` is intended for square systems).

use nalgebra::{DMatrix, DVector};

/// Fit `y = a + b·x` by least squares, returning `(a, b)`.
///
/// Returns `None` on degenerate input (fewer than two points, mismatched
/// lengths, or a system too ill-conditioned to solve) instead of panicking.
pub fn solve_linear_trend(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let n = xs.len();
    let mut design = DMatrix::zeros(n, 2);
    for (i, &x) in xs.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = x;
    }
    let y = DVector::from_row_slice(ys);

    let svd = design.svd(true, true);

    // Try progressively looser tolerances if the strict solve fails; a flat
    // series with identical x values stays unsolvable and returns None.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(&y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some((beta[0], beta[1]));
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_exact_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [2.0, 5.0, 8.0, 11.0];
        let (a, b) = solve_linear_trend(&xs, &ys).unwrap();
        assert!((a - 2.0).abs() < 1e-10);
        assert!((b - 3.0).abs() < 1e-10);
    }

    #[test]
    fn fits_noisy_points_between() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 1.1, 1.9];
        let (a, b) = solve_linear_trend(&xs, &ys).unwrap();
        assert!(a.abs() < 0.2);
        assert!((b - 1.0).abs() < 0.2);
    }

    #[test]
    fn degenerate_input_is_none() {
        assert!(solve_linear_trend(&[], &[]).is_none());
        assert!(solve_linear_trend(&[1.0], &[2.0]).is_none());
        assert!(solve_linear_trend(&[1.0, 2.0], &[2.0]).is_none());
        assert!(solve_linear_trend(&[1.0, f64::NAN], &[2.0, 3.0]).is_none());
    }
}
