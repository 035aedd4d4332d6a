//! Plotters-powered forecast chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call (see `chart_series` in the parent module). X values
/// are day offsets from `base_date`; a date with no value for a side ends its
/// segment, so gaps in the data show as gaps on screen.
pub struct ForecastChart<'a> {
    /// Historical sales, split into contiguous segments.
    pub sales: &'a [Vec<(f64, f64)>],
    /// Forecast mean, split into contiguous segments.
    pub mean: &'a [Vec<(f64, f64)>],
    /// Confidence band as (x, lower, upper) triples.
    pub band: &'a [(f64, f64, f64)],
    /// X bounds (days from `base_date`).
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Date at x = 0, used for tick labels.
    pub base_date: NaiveDate,
}

impl Widget for ForecastChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        let base_date = self.base_date;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels. Mesh lines are disabled to reduce clutter in
            // low-resolution terminal rendering.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("date")
                .y_desc("net sales")
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_date(base_date, *v))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // High-contrast palette for terminal readability.
            let band_color = RGBColor(0, 80, 80);
            let sales_color = WHITE;
            let mean_color = RGBColor(0, 255, 255); // cyan

            // 1) Confidence band, as one closed polygon: the upper edge left to
            // right, then the lower edge back. Drawn first so the lines stay
            // visible on top of the fill.
            if self.band.len() >= 2 {
                let mut outline: Vec<(f64, f64)> =
                    self.band.iter().map(|&(x, _, upper)| (x, upper)).collect();
                outline.extend(self.band.iter().rev().map(|&(x, lower, _)| (x, lower)));
                chart.draw_series(std::iter::once(Polygon::new(outline, &band_color)))?;
            }

            // 2) Historical sales, one line per contiguous segment.
            for segment in self.sales {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &sales_color))?;
            }

            // 3) Forecast mean.
            for segment in self.mean {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &mean_color))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn fmt_date(base: NaiveDate, offset: f64) -> String {
    let date = base + Duration::days(offset.round() as i64);
    date.format("%m-%d").to_string()
}
