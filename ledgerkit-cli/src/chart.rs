//! Terminal bar chart of monthly net income.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ledgerkit_core::{BalanceSample, chronological, net_total, round2};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};
use std::fmt::Write as _;
use std::io;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: &'static str,
    pub year: i32,
    /// Rounded to cents
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub title: String,
    /// Oldest month first
    pub bars: Vec<ChartBar>,
    pub total: f64,
}

impl ChartModel {
    pub fn from_samples(samples: &[BalanceSample]) -> Self {
        let bars = chronological(samples.to_vec())
            .into_iter()
            .map(|s| ChartBar {
                label: s.month.abbrev(),
                year: s.month.year,
                value: round2(s.amount),
            })
            .collect();
        Self {
            title: "Net Income".to_string(),
            bars,
            total: net_total(samples),
        }
    }

    pub fn total_label(&self) -> String {
        format!("Net: ${}", self.total)
    }

    /// Plain-text rendering for `--print`.
    pub fn to_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<10} {:>12}", "Month", "Amount ($)");
        for b in &self.bars {
            let _ = writeln!(out, "{:<10} {:>12.2}", format!("{} {}", b.label, b.year), b.value);
        }
        let _ = writeln!(out, "{}", self.total_label());
        out
    }
}

const BAR_GAP: u16 = 1;

/// Horizontal layout of the plot: y-axis column, bar width, and how many
/// staggered rows the value annotations need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
    axis_width: u16,
    bar_width: u16,
    value_rows: u16,
}

impl ChartModel {
    /// Largest bar magnitude; bars are drawn against `0..=axis_max`.
    fn axis_max(&self) -> f64 {
        self.bars.iter().map(|b| b.value.abs()).fold(0.0, f64::max)
    }

    fn axis_labels(&self) -> (String, String) {
        let max = self.axis_max();
        let top = if max > 0.0 { format!("{max}") } else { String::new() };
        (top, "0".to_string())
    }

    fn geometry(&self, width: u16) -> Geometry {
        let (top, bottom) = self.axis_labels();
        let axis_width = top.len().max(bottom.len()) as u16;
        let plot_width = width.saturating_sub(axis_width + 1);

        let n = self.bars.len().max(1) as u16;
        let bar_width = ((plot_width + BAR_GAP) / n).saturating_sub(BAR_GAP).clamp(3, 12);

        let widths: Vec<u16> = self.bars.iter().map(|b| value_text(b).len() as u16).collect();
        let value_rows = (1..=n)
            .find(|&rows| value_offsets(&widths, bar_width, plot_width, rows).is_some())
            .unwrap_or(n);

        Geometry { axis_width, bar_width, value_rows }
    }
}

fn value_text(bar: &ChartBar) -> String {
    format!("{}", bar.value)
}

/// Column offset of every value annotation when bar `i` is annotated on row
/// `i % rows`, centered under its bar. `None` if two annotations on the same
/// row would touch or one does not fit in `plot_width`.
fn value_offsets(widths: &[u16], bar_width: u16, plot_width: u16, rows: u16) -> Option<Vec<u16>> {
    let slot = bar_width + BAR_GAP;
    let mut row_end: Vec<Option<u16>> = vec![None; rows as usize];
    let mut offsets = Vec::with_capacity(widths.len());

    for (i, &w) in widths.iter().enumerate() {
        if w > plot_width {
            return None;
        }
        let center = i as u16 * slot + bar_width / 2;
        let start = center.saturating_sub(w / 2).min(plot_width - w);
        let row = i % rows as usize;
        if let Some(end) = row_end[row] {
            if start <= end {
                return None;
            }
        }
        row_end[row] = Some(start + w);
        offsets.push(start);
    }
    Some(offsets)
}

/// Draw the chart into `area`. Bars are scaled by magnitude; losses are red.
/// Every bar's value is printed below the month labels.
pub fn render(frame: &mut Frame, area: Rect, model: &ChartModel) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(model.title.as_str()).centered())
        .title_bottom(Line::from("Month").centered());
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let geo = model.geometry(inner.width);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(geo.value_rows),
            Constraint::Length(1),
        ])
        .split(inner);

    let y_caption = Paragraph::new(Line::from("Amount ($)")).style(Style::default().fg(Color::Gray));
    frame.render_widget(y_caption, rows[0]);

    let [axis_area, _, bars_area] = columns(rows[1], geo.axis_width);
    render_axis(frame, axis_area, model);

    let bars: Vec<Bar> = model
        .bars
        .iter()
        .map(|b| {
            // values are drawn separately; the built-in one vanishes on narrow bars
            Bar::default()
                .value(cents(b.value))
                .text_value(String::new())
                .label(Line::from(b.label))
                .style(Style::default().fg(bar_color(b)))
        })
        .collect();

    let max = cents(model.axis_max()).max(1);
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(geo.bar_width)
        .bar_gap(BAR_GAP)
        .max(max);
    frame.render_widget(chart, bars_area);

    let [_, _, values_area] = columns(rows[2], geo.axis_width);
    render_values(frame, values_area, model, geo);

    let total = Paragraph::new(Line::from(model.total_label()))
        .alignment(Alignment::Right)
        .style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(total, rows[3]);
}

fn cents(value: f64) -> u64 {
    (value.abs() * 100.0).round() as u64
}

fn bar_color(bar: &ChartBar) -> Color {
    if bar.value < 0.0 { Color::Red } else { Color::Blue }
}

fn columns(area: Rect, axis_width: u16) -> [Rect; 3] {
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(axis_width),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);
    [parts[0], parts[1], parts[2]]
}

/// Scale labels: the top of the range on the first row, `0` level with the
/// bottom of the bars (the row above the month labels).
fn render_axis(frame: &mut Frame, area: Rect, model: &ChartModel) {
    if area.height < 2 {
        return;
    }
    let (top, bottom) = model.axis_labels();
    let mut lines = vec![Line::from(""); area.height as usize];
    lines[0] = Line::from(top);
    lines[area.height as usize - 2] = Line::from(bottom);
    let axis = Paragraph::new(lines)
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(axis, area);
}

fn render_values(frame: &mut Frame, area: Rect, model: &ChartModel, geo: Geometry) {
    let texts: Vec<String> = model.bars.iter().map(value_text).collect();
    let widths: Vec<u16> = texts.iter().map(|t| t.len() as u16).collect();
    let Some(offsets) = value_offsets(&widths, geo.bar_width, area.width, geo.value_rows) else {
        return;
    };

    let buf = frame.buffer_mut();
    for (i, ((bar, text), x)) in model.bars.iter().zip(&texts).zip(offsets).enumerate() {
        let row = (i % geo.value_rows as usize) as u16;
        if row >= area.height {
            continue;
        }
        buf.set_string(
            area.x + x,
            area.y + row,
            text,
            Style::default().fg(bar_color(bar)),
        );
    }
}

/// Show the chart full-screen until a key is pressed. The terminal is
/// restored on every exit path once raw mode is on.
pub fn show(model: &ChartModel) -> Result<()> {
    enable_raw_mode()?;
    run_restoring(|| run_alternate_screen(model), restore_terminal)
}

fn run_alternate_screen(model: &ChartModel) -> Result<()> {
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let res = show_loop(&mut terminal, model);
    terminal.show_cursor()?;
    res
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run `body`, then `restore` whatever happened. The body's error wins.
fn run_restoring<T>(body: impl FnOnce() -> Result<T>, restore: impl FnOnce() -> Result<()>) -> Result<T> {
    let res = body();
    let restored = restore();
    let value = res?;
    restored?;
    Ok(value)
}

fn show_loop<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, model: &ChartModel) -> Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            render(f, area, model);
        })?;

        // resize redraws; any key press closes
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerkit_core::MonthWindowEntry;
    use ratatui::backend::TestBackend;

    fn samples() -> Vec<BalanceSample> {
        // newest first, as the window is collected
        [(3, 25.5), (2, -50.0), (1, 100.0)]
            .into_iter()
            .map(|(m, amount)| BalanceSample {
                month: MonthWindowEntry { month: m, year: 2024 },
                amount,
            })
            .collect()
    }

    fn full_year() -> Vec<BalanceSample> {
        [
            2345.67, -1234.5, 812.0, 1500.25, -300.0, 4100.1, 950.0, 1200.0, -75.5, 2000.0, 3100.0, 640.0,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, amount)| BalanceSample {
            month: MonthWindowEntry { month: i as u32 + 1, year: 2024 },
            amount,
        })
        .collect()
    }

    fn screen_text(model: &ChartModel) -> String {
        screen_text_sized(model, 60, 16)
    }

    fn screen_text_sized(model: &ChartModel, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, area, model);
            })
            .unwrap();
        let buf = terminal.backend().buffer();
        let width = buf.area.width as usize;
        buf.content
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_model_total_and_order() {
        let model = ChartModel::from_samples(&samples());
        assert_eq!(model.total, 75.5);
        assert_eq!(model.total_label(), "Net: $75.5");
        let labels: Vec<&str> = model.bars.iter().map(|b| b.label).collect();
        assert_eq!(labels, ["Jan", "Feb", "Mar"]);
        assert_eq!(model.bars[1].value, -50.0);
    }

    #[test]
    fn test_render_shows_labels_and_total() {
        let text = screen_text(&ChartModel::from_samples(&samples()));
        assert!(text.contains("Net Income"), "{text}");
        assert!(text.contains("Amount ($)"), "{text}");
        assert!(text.contains("Net: $75.5"), "{text}");
        for label in ["Jan", "Feb", "Mar"] {
            assert!(text.contains(label), "missing {label}:\n{text}");
        }
        // the total sits on the last row inside the border, flush right
        let rows: Vec<&str> = text.lines().collect();
        assert!(rows[rows.len() - 2].trim_end_matches('│').ends_with("Net: $75.5"));
    }

    #[test]
    fn test_every_value_shown_on_80_columns() {
        let model = ChartModel::from_samples(&full_year());
        let text = screen_text_sized(&model, 80, 24);
        let rows: Vec<&str> = text.lines().collect();

        // border, caption, 18 plot rows (month labels last), 2 value rows, total, border
        let values = format!("{}\n{}", rows[20], rows[21]);
        for bar in &model.bars {
            let shown = format!("{}", bar.value);
            assert!(values.contains(&shown), "missing {shown}:\n{text}");
        }
        for label in ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"] {
            assert!(rows[19].contains(label), "missing {label}:\n{text}");
        }
        assert!(rows[22].trim_end_matches('│').ends_with("Net: $15038.02"), "{text}");
    }

    #[test]
    fn test_axis_shows_scale() {
        let model = ChartModel::from_samples(&full_year());
        let text = screen_text_sized(&model, 80, 24);
        let rows: Vec<&str> = text.lines().collect();

        assert!(rows[2].starts_with("│4100.1"), "{text}");
        // zero sits level with the bottom of the bars
        assert_eq!(rows[18].chars().nth(6), Some('0'), "{text}");
    }

    #[test]
    fn test_value_offsets_stagger_when_crowded() {
        // 5-wide bars cannot hold 7-character values side by side
        let widths = [7, 7, 7, 7];
        assert_eq!(value_offsets(&widths, 5, 23, 1), None);

        let offsets = value_offsets(&widths, 5, 23, 2).unwrap();
        assert_eq!(offsets, vec![0, 5, 11, 16]);

        let model = ChartModel::from_samples(&full_year());
        assert_eq!(model.geometry(78).value_rows, 2);
        assert_eq!(model.geometry(78).bar_width, 5);
        assert_eq!(ChartModel::from_samples(&samples()).geometry(58).value_rows, 1);
    }

    #[test]
    fn test_restore_runs_after_failed_setup() {
        let mut restored = false;
        let res: Result<()> = run_restoring(
            || anyhow::bail!("no terminal"),
            || {
                restored = true;
                Ok(())
            },
        );
        assert_eq!(res.unwrap_err().to_string(), "no terminal");
        assert!(restored);
    }

    #[test]
    fn test_render_empty_model() {
        let model = ChartModel::from_samples(&[]);
        let text = screen_text(&model);
        assert!(text.contains("Net: $0"));
    }

    #[test]
    fn test_table() {
        let table = ChartModel::from_samples(&samples()).to_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("Jan 2024"));
        assert!(lines[1].ends_with("100.00"));
        assert!(lines[2].ends_with("-50.00"));
        assert_eq!(lines[4], "Net: $75.5");
    }
}
