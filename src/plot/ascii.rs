//! ASCII chart of the merged sales + forecast series.
//!
//! A fixed character grid, deterministic for a given input, which keeps the
//! golden test honest and makes the output safe to paste into tickets.
//!
//! Glyphs: historical sales `*`, forecast mean `+`, confidence band edges `.`.
//! Series are drawn segment by segment; a date with no value for a side
//! breaks its line, so gaps in the data show as gaps on screen.

use chrono::NaiveDate;

use crate::domain::MergedPoint;

/// Render the merged historical + forecast series.
pub fn render_merged_chart(points: &[MergedPoint], width: usize, height: usize) -> String {
    let Some((first, last)) = date_range(points) else {
        return "Plot: no data\n".to_string();
    };
    // A flat or empty value range still plots; the fallback keeps the math sane.
    let (y_lo, y_hi) = value_range(points).unwrap_or((0.0, 1.0));
    let (y_lo, y_hi) = widen(y_lo, y_hi, 0.05);

    let mut grid = Grid::new(width.max(10), height.max(5));

    // Band first, then mean, then sales, so the denser markers win overlaps.
    for (pick, glyph) in [
        (pick_lower as fn(&MergedPoint) -> Option<f64>, '.'),
        (pick_upper, '.'),
        (pick_mean, '+'),
        (pick_sales, '*'),
    ] {
        trace_series(&mut grid, points, pick, first, last, y_lo, y_hi, glyph);
    }

    let mut out = format!("Plot: {first}..{last} | y=[{y_lo:.2}, {y_hi:.2}]\n");
    grid.render_into(&mut out);
    out
}

fn pick_sales(p: &MergedPoint) -> Option<f64> {
    p.sales
}
fn pick_mean(p: &MergedPoint) -> Option<f64> {
    p.mean
}
fn pick_lower(p: &MergedPoint) -> Option<f64> {
    p.lower
}
fn pick_upper(p: &MergedPoint) -> Option<f64> {
    p.upper
}

fn date_range(points: &[MergedPoint]) -> Option<(NaiveDate, NaiveDate)> {
    let first = points.first()?.date;
    let last = points.last()?.date;
    (last > first).then_some((first, last))
}

fn value_range(points: &[MergedPoint]) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for p in points {
        for v in [p.sales, p.mean, p.lower, p.upper].into_iter().flatten() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    (lo.is_finite() && hi.is_finite() && hi > lo).then_some((lo, hi))
}

fn widen(lo: f64, hi: f64, frac: f64) -> (f64, f64) {
    let margin = ((hi - lo).abs() * frac).max(1e-12);
    (lo - margin, hi + margin)
}

/// Character canvas with row-major storage.
struct Grid {
    cells: Vec<char>,
    width: usize,
    height: usize,
}

impl Grid {
    fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![' '; width * height],
            width,
            height,
        }
    }

    /// Unconditional write, for series anchor points.
    fn mark(&mut self, col: usize, row: usize, glyph: char) {
        self.cells[row * self.width + col] = glyph;
    }

    /// Write only into blank cells, so earlier (higher-priority) marks survive.
    fn mark_soft(&mut self, col: i64, row: i64, glyph: char) {
        if col < 0 || row < 0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return;
        }
        let cell = &mut self.cells[row * self.width + col];
        if *cell == ' ' {
            *cell = glyph;
        }
    }

    fn render_into(&self, out: &mut String) {
        for row in 0..self.height {
            out.extend(self.cells[row * self.width..(row + 1) * self.width].iter());
            out.push('\n');
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn trace_series(
    grid: &mut Grid,
    points: &[MergedPoint],
    pick: fn(&MergedPoint) -> Option<f64>,
    first: NaiveDate,
    last: NaiveDate,
    y_lo: f64,
    y_hi: f64,
    glyph: char,
) {
    // A missing value breaks the line; prev only survives across present ones.
    let mut prev: Option<(usize, usize)> = None;
    for p in points {
        let Some(v) = pick(p) else {
            prev = None;
            continue;
        };
        let col = col_for(p.date, first, last, grid.width);
        let row = row_for(v, y_lo, y_hi, grid.height);
        if let Some((pc, pr)) = prev {
            trace_line(grid, pc, pr, col, row, glyph);
        }
        grid.mark(col, row, glyph);
        prev = Some((col, row));
    }
}

fn col_for(date: NaiveDate, first: NaiveDate, last: NaiveDate, width: usize) -> usize {
    let span = (last - first).num_days().max(1) as f64;
    let t = ((date - first).num_days() as f64 / span).clamp(0.0, 1.0);
    (t * (width - 1) as f64).round() as usize
}

/// Row 0 is the top of the grid, so the mapping is inverted.
fn row_for(v: f64, y_lo: f64, y_hi: f64, height: usize) -> usize {
    let t = ((v - y_lo) / (y_hi - y_lo)).clamp(0.0, 1.0);
    ((1.0 - t) * (height - 1) as f64).round() as usize
}

/// Bresenham segment between two cells, soft-writing every step.
fn trace_line(grid: &mut Grid, c0: usize, r0: usize, c1: usize, r1: usize, glyph: char) {
    let (mut c, mut r) = (c0 as i64, r0 as i64);
    let (c_end, r_end) = (c1 as i64, r1 as i64);

    let dc = (c_end - c).abs();
    let dr = -(r_end - r).abs();
    let step_c = if c < c_end { 1 } else { -1 };
    let step_r = if r < r_end { 1 } else { -1 };
    let mut err = dc + dr;

    loop {
        grid.mark_soft(c, r, glyph);
        if c == c_end && r == r_end {
            return;
        }
        let doubled = 2 * err;
        if doubled >= dr {
            err += dr;
            c += step_c;
        }
        if doubled <= dc {
            err += dc;
            r += step_r;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sales(day: u32, v: f64) -> MergedPoint {
        MergedPoint {
            date: d(day),
            sales: Some(v),
            mean: None,
            lower: None,
            upper: None,
        }
    }

    #[test]
    fn golden_two_point_ramp() {
        let points = vec![sales(1, 100.0), sales(11, 110.0)];
        let txt = render_merged_chart(&points, 11, 5);
        let expected = "Plot: 2024-01-01..2024-01-11 | y=[99.50, 110.50]\n\
                        \x20        **\n\
                        \x20      **  \n\
                        \x20   ***    \n\
                        \x20 **       \n\
                        **         \n";
        assert_eq!(txt, expected);
    }

    #[test]
    fn forecast_markers_present() {
        let mut points: Vec<MergedPoint> = (1..=10).map(|i| sales(i, 100.0 + i as f64)).collect();
        for i in 11..=20 {
            points.push(MergedPoint {
                date: d(i),
                sales: None,
                mean: Some(100.0 + i as f64),
                lower: Some(90.0 + i as f64),
                upper: Some(110.0 + i as f64),
            });
        }
        let txt = render_merged_chart(&points, 40, 12);
        assert!(txt.contains('*'));
        assert!(txt.contains('+'));
        assert!(txt.contains('.'));
        assert_eq!(txt.lines().count(), 13);
    }

    #[test]
    fn empty_series_has_no_grid() {
        assert_eq!(render_merged_chart(&[], 40, 12), "Plot: no data\n");
    }
}
