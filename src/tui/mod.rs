//! Ratatui-based terminal dashboard.
//!
//! Four panels behind tabs: Overview (KPIs + category breakdowns), Forecast
//! (the merged series chart), Scenario (what-if sliders with a live
//! projection), and Map (customer pins and locations). Every panel renders its
//! own fetch state, so a single failed endpoint shows its error in place while
//! the rest of the dashboard stays usable.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap,
        canvas::{Canvas, Points},
    },
};

use crate::app::pipeline::{self, DashboardBundle, DashboardOptions};
use crate::cli::DashArgs;
use crate::domain::{FetchState, MergedPoint, ScenarioAdjustment};
use crate::error::AppError;

mod forecast_chart;

use forecast_chart::ForecastChart;

/// Start the TUI.
pub fn run(args: DashArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(DashboardOptions::from_dash_args(&args));
    app.refresh();
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Overview,
    Forecast,
    Scenario,
    Map,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Overview, Tab::Forecast, Tab::Scenario, Tab::Map];

    fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Forecast => "Forecast",
            Tab::Scenario => "Scenario",
            Tab::Map => "Map",
        }
    }

    fn next(self) -> Tab {
        let idx = Tab::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Tab::ALL[(idx + 1) % Tab::ALL.len()]
    }

    fn prev(self) -> Tab {
        let idx = Tab::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Tab::ALL[(idx + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

struct App {
    opts: DashboardOptions,
    bundle: Option<DashboardBundle>,
    tab: Tab,
    adjustment: ScenarioAdjustment,
    selected_slider: usize,
    status: String,
}

impl App {
    fn new(opts: DashboardOptions) -> Self {
        Self {
            opts,
            bundle: None,
            tab: Tab::Overview,
            adjustment: ScenarioAdjustment::default(),
            selected_slider: 0,
            status: "Fetching dashboard...".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(250))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('s') => {
                self.opts.sample = !self.opts.sample;
                self.refresh();
            }
            KeyCode::Char('d') => self.write_debug_bundle(),
            KeyCode::Char('[') => {
                self.opts.forecast_days = self.opts.forecast_days.saturating_sub(7).max(7);
                self.refresh();
            }
            KeyCode::Char(']') => {
                self.opts.forecast_days = (self.opts.forecast_days + 7).min(120);
                self.refresh();
            }
            KeyCode::Up => {
                if self.selected_slider > 0 {
                    self.selected_slider -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_slider < 2 {
                    self.selected_slider += 1;
                }
            }
            KeyCode::Left => self.adjust_slider(-1.0),
            KeyCode::Right => self.adjust_slider(1.0),
            KeyCode::Char('0') => {
                self.adjustment = ScenarioAdjustment::default();
                self.status = "Scenario reset.".to_string();
            }
            _ => {}
        }
        false
    }

    fn adjust_slider(&mut self, delta: f64) {
        let a = &mut self.adjustment;
        let slot = match self.selected_slider {
            0 => &mut a.price_pct,
            1 => &mut a.volume_pct,
            _ => &mut a.cost_pct,
        };
        *slot = (*slot + delta).clamp(ScenarioAdjustment::MIN_PCT, ScenarioAdjustment::MAX_PCT);
    }

    fn refresh(&mut self) {
        self.status = "Fetching dashboard...".to_string();
        match pipeline::collect_dashboard(&self.opts) {
            Ok(bundle) => {
                self.status = format!(
                    "Loaded ({}, forecast {}d).",
                    bundle.source.display_name(),
                    self.opts.forecast_days
                );
                self.bundle = Some(bundle);
            }
            Err(err) => {
                self.status = format!("Refresh failed: {err}");
            }
        }
    }

    fn write_debug_bundle(&mut self) {
        let Some(bundle) = &self.bundle else {
            self.status = "No dashboard loaded yet.".to_string();
            return;
        };
        match crate::debug::write_debug_bundle(bundle, &self.opts) {
            Ok(path) => self.status = format!("Wrote debug bundle: {}", path.display()),
            Err(err) => self.status = format!("Debug write failed: {err}"),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.tab {
            Tab::Overview => self.draw_overview(frame, chunks[1]),
            Tab::Forecast => self.draw_forecast(frame, chunks[1]),
            Tab::Scenario => self.draw_scenario(frame, chunks[1]),
            Tab::Map => self.draw_map(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("pulse", Style::default().fg(Color::Cyan)),
            Span::raw(" | sales dashboard"),
        ]));

        let source = self
            .bundle
            .as_ref()
            .map(|b| b.source.display_name())
            .unwrap_or("-");
        lines.push(Line::from(Span::styled(
            format!(
                "source: {source} | {} | forecast: {}d",
                self.opts.filters.describe(),
                self.opts.forecast_days
            ),
            Style::default().fg(Color::Gray),
        )));

        let tabs: Vec<String> = Tab::ALL
            .iter()
            .map(|t| {
                if *t == self.tab {
                    format!("[{}]", t.title())
                } else {
                    format!(" {} ", t.title())
                }
            })
            .collect();
        lines.push(Line::from(Span::raw(tabs.join(" "))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_overview(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        self.draw_kpis(frame, chunks[0]);
        self.draw_categories(frame, chunks[1]);
    }

    fn draw_kpis(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("KPIs").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(bundle) = &self.bundle else {
            render_hint(frame, inner, "Press r to fetch.");
            return;
        };

        match &bundle.data.kpis {
            FetchState::Ready(k) => {
                let mut lines = vec![
                    Line::from(format!("Total net sales      {:>12.2}", k.total_net_sales)),
                    Line::from(format!("Avg transaction      {:>12.2}", k.avg_transaction_value)),
                    Line::from(format!("New customers (QTD)  {:>12}", k.new_customers_qtd)),
                    Line::from(format!(
                        "Booking conversion   {:>11.1}%",
                        k.booking_conversion_rate
                    )),
                    Line::from(""),
                    Line::from(format!(
                        "Top service: {} ({:.2})",
                        k.top_selling_service, k.top_selling_service_value
                    )),
                    Line::from(format!(
                        "Top product: {} ({:.2})",
                        k.top_selling_product, k.top_selling_product_value
                    )),
                ];
                if let Some(note) = &k.calculation_note {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        note.clone(),
                        Style::default().fg(Color::Gray),
                    )));
                }
                let p = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
                frame.render_widget(p, inner);
            }
            other => render_state(frame, inner, other),
        }
    }

    fn draw_categories(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Categories").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(bundle) = &self.bundle else {
            render_hint(frame, inner, "Press r to fetch.");
            return;
        };

        let mut lines: Vec<Line> = Vec::new();
        match &bundle.data.categories {
            FetchState::Ready(slices) => {
                let max = slices.iter().map(|s| s.value).fold(0.0, f64::max).max(1.0);
                lines.push(Line::from(Span::styled(
                    "Net sales",
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                for s in slices {
                    let width = ((s.value / max) * 24.0).round() as usize;
                    lines.push(Line::from(vec![
                        Span::raw(format!("{:<10} {:>12.2} ", s.name, s.value)),
                        Span::styled("█".repeat(width), Style::default().fg(Color::Cyan)),
                    ]));
                }
            }
            other => lines.push(state_line(other)),
        }

        lines.push(Line::from(""));
        match &bundle.data.profit {
            FetchState::Ready(slices) => {
                let max = slices.iter().map(|s| s.profit).fold(0.0, f64::max).max(1.0);
                lines.push(Line::from(Span::styled(
                    "Profit",
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                for s in slices {
                    let width = ((s.profit / max) * 24.0).round() as usize;
                    lines.push(Line::from(vec![
                        Span::raw(format!("{:<10} {:>12.2} ", s.name, s.profit)),
                        Span::styled("█".repeat(width), Style::default().fg(Color::Green)),
                    ]));
                }
            }
            other => lines.push(state_line(other)),
        }

        let p = Paragraph::new(Text::from(lines));
        frame.render_widget(p, inner);
    }

    fn draw_forecast(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Sales & Forecast").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(bundle) = &self.bundle else {
            render_hint(frame, inner, "Press r to fetch.");
            return;
        };

        match &bundle.data.forecast {
            FetchState::Ready(panel) => {
                let Some(data) = chart_series(&panel.points) else {
                    render_hint(frame, inner, "Not enough data to chart.");
                    return;
                };

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(1)])
                    .split(inner);

                let widget = ForecastChart {
                    sales: &data.sales,
                    mean: &data.mean,
                    band: &data.band,
                    x_bounds: data.x_bounds,
                    y_bounds: data.y_bounds,
                    base_date: data.base_date,
                };
                frame.render_widget(widget, chunks[0]);

                let mut note = panel.note.clone().unwrap_or_default();
                if !panel.warnings.is_empty() {
                    if !note.is_empty() {
                        note.push_str(" | ");
                    }
                    note.push_str(&format!("{} row(s) skipped", panel.warnings.len()));
                }
                if !note.is_empty() {
                    frame.render_widget(
                        Paragraph::new(note).style(Style::default().fg(Color::Gray)),
                        chunks[1],
                    );
                }
            }
            other => render_state(frame, inner, other),
        }
    }

    fn draw_scenario(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(0)])
            .split(area);

        let items: Vec<ListItem> = [
            ("Price", self.adjustment.price_pct),
            ("Volume", self.adjustment.volume_pct),
            ("Cost", self.adjustment.cost_pct),
        ]
        .iter()
        .map(|(label, value)| ListItem::new(format!("{label:<8} {value:>+6.0}%  {}", slider_bar(*value))))
        .collect();

        let list = List::new(items)
            .block(Block::default().title("Adjustments").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");
        let mut state = ListState::default();
        state.select(Some(self.selected_slider));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        let block = Block::default().title("Projection").borders(Borders::ALL);
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);

        let Some(bundle) = &self.bundle else {
            render_hint(frame, inner, "Press r to fetch a baseline.");
            return;
        };

        let outcome = crate::scenario::project(&bundle.baseline, self.adjustment);
        let mut text = crate::report::format_scenario(&outcome, self.adjustment);
        if let Some(note) = &bundle.baseline_note {
            text.push_str(&format!("\nNote: {note}\n"));
        }
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
    }

    fn draw_map(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Customer Map").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(bundle) = &self.bundle else {
            render_hint(frame, inner, "Press r to fetch.");
            return;
        };

        let pins = match &bundle.data.pins {
            FetchState::Ready(pins) if !pins.is_empty() => pins.clone(),
            FetchState::Ready(_) => {
                render_hint(frame, inner, "No customer coordinates in this dataset.");
                return;
            }
            other => {
                render_state(frame, inner, other);
                return;
            }
        };
        let locations = bundle.data.locations.ready().cloned().unwrap_or_default();

        let (mut lon_min, mut lon_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut lat_min, mut lat_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &pins {
            lon_min = lon_min.min(p.lon);
            lon_max = lon_max.max(p.lon);
            lat_min = lat_min.min(p.lat);
            lat_max = lat_max.max(p.lat);
        }
        let lon_pad = ((lon_max - lon_min).abs() * 0.1).max(0.01);
        let lat_pad = ((lat_max - lat_min).abs() * 0.1).max(0.01);

        let coords: Vec<(f64, f64)> = pins.iter().map(|p| (p.lon, p.lat)).collect();
        let canvas = Canvas::default()
            .marker(symbols::Marker::Braille)
            .x_bounds([lon_min - lon_pad, lon_max + lon_pad])
            .y_bounds([lat_min - lat_pad, lat_max + lat_pad])
            .paint(move |ctx| {
                ctx.draw(&Points {
                    coords: &coords,
                    color: Color::Cyan,
                });
                for loc in &locations {
                    ctx.print(
                        loc.longitude,
                        loc.latitude,
                        Line::from(Span::styled(
                            format!("◆ {}", loc.name),
                            Style::default().fg(Color::Yellow),
                        )),
                    );
                }
            });
        frame.render_widget(canvas, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help =
            "Tab panels  ↑/↓ slider  ←/→ adjust  0 reset  [/] horizon  r refresh  s source  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn render_hint(frame: &mut ratatui::Frame<'_>, area: Rect, text: &str) {
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
        area,
    );
}

/// Render a non-ready fetch state in place; `Failed` text is shown verbatim.
fn render_state<T>(frame: &mut ratatui::Frame<'_>, area: Rect, state: &FetchState<T>) {
    let line = state_line(state);
    frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
}

fn state_line<T>(state: &FetchState<T>) -> Line<'static> {
    match state {
        FetchState::Idle => Line::from(Span::styled(
            "Not fetched yet. Press r.",
            Style::default().fg(Color::Yellow),
        )),
        FetchState::Loading => Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )),
        FetchState::Failed(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        )),
        FetchState::Ready(_) => Line::from(""),
    }
}

fn slider_bar(value: f64) -> String {
    // 21 cells spanning [-50, 50], center marked.
    let pos = (((value + 50.0) / 100.0) * 20.0).round() as usize;
    let mut bar: Vec<char> = "─".repeat(21).chars().collect();
    bar[10] = '┼';
    bar[pos.min(20)] = '●';
    bar.into_iter().collect()
}

/// Prepared chart series: segments per side, the band, and the bounds.
struct ChartData {
    sales: Vec<Vec<(f64, f64)>>,
    mean: Vec<Vec<(f64, f64)>>,
    band: Vec<(f64, f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    base_date: NaiveDate,
}

/// Build chart series from the merged points. X values are day offsets from
/// the first date; a missing value ends its segment.
fn chart_series(points: &[MergedPoint]) -> Option<ChartData> {
    let first = points.first()?.date;
    let last = points.last()?.date;
    if last <= first {
        return None;
    }

    let x = |date: NaiveDate| (date - first).num_days() as f64;

    let mut sales: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut mean: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut band: Vec<(f64, f64, f64)> = Vec::new();
    let mut cur_sales: Vec<(f64, f64)> = Vec::new();
    let mut cur_mean: Vec<(f64, f64)> = Vec::new();

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        for v in [p.sales, p.mean, p.lower, p.upper].into_iter().flatten() {
            y_min = y_min.min(v);
            y_max = y_max.max(v);
        }

        match p.sales {
            Some(v) => cur_sales.push((x(p.date), v)),
            None => flush(&mut sales, &mut cur_sales),
        }
        match p.mean {
            Some(v) => cur_mean.push((x(p.date), v)),
            None => flush(&mut mean, &mut cur_mean),
        }
        if let (Some(lower), Some(upper)) = (p.lower, p.upper) {
            band.push((x(p.date), lower, upper));
        }
    }
    flush(&mut sales, &mut cur_sales);
    flush(&mut mean, &mut cur_mean);

    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        return None;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

    Some(ChartData {
        sales,
        mean,
        band,
        x_bounds: [0.0, x(last)],
        y_bounds: [y_min - pad, y_max + pad],
        base_date: first,
    })
}

fn flush(out: &mut Vec<Vec<(f64, f64)>>, cur: &mut Vec<(f64, f64)>) {
    if !cur.is_empty() {
        out.push(std::mem::take(cur));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn tabs_cycle_in_both_directions() {
        let mut tab = Tab::Overview;
        for _ in 0..Tab::ALL.len() {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Overview);
        assert_eq!(Tab::Overview.prev(), Tab::Map);
    }

    #[test]
    fn chart_series_splits_segments_and_builds_band() {
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
                sales: Some(110.0),
                mean: None,
                lower: None,
                upper: None,
            },
            MergedPoint {
                date: d(3),
                sales: None,
                mean: Some(112.0),
                lower: Some(100.0),
                upper: Some(124.0),
            },
            MergedPoint {
                date: d(4),
                sales: None,
                mean: Some(114.0),
                lower: Some(98.0),
                upper: Some(130.0),
            },
        ];

        let data = chart_series(&points).unwrap();
        assert_eq!(data.sales.len(), 1);
        assert_eq!(data.sales[0].len(), 2);
        assert_eq!(data.mean.len(), 1);
        assert_eq!(data.band.len(), 2);
        assert_eq!(data.x_bounds, [0.0, 3.0]);
        assert_eq!(data.base_date, d(1));
        assert!(data.y_bounds[0] < 98.0);
        assert!(data.y_bounds[1] > 130.0);
    }

    #[test]
    fn chart_series_rejects_degenerate_input() {
        assert!(chart_series(&[]).is_none());
        let single = vec![MergedPoint {
            date: d(1),
            sales: Some(1.0),
            mean: None,
            lower: None,
            upper: None,
        }];
        assert!(chart_series(&single).is_none());
    }

    #[test]
    fn slider_adjustment_clamps() {
        let mut app = App::new(DashboardOptions {
            sample: true,
            sample_days: 30,
            sample_seed: 1,
            forecast_days: 14,
            filters: Default::default(),
        });
        for _ in 0..200 {
            app.adjust_slider(1.0);
        }
        assert_eq!(app.adjustment.price_pct, ScenarioAdjustment::MAX_PCT);
        app.selected_slider = 2;
        for _ in 0..200 {
            app.adjust_slider(-1.0);
        }
        assert_eq!(app.adjustment.cost_pct, ScenarioAdjustment::MIN_PCT);
    }
}
