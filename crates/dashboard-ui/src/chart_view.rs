//! Panel view for the media dashboard TUI.
//!
//! Draws one aggregate view as a chart with its insight text underneath.
//! Pie views become share bars, bar views a horizontal [`BarChart`] and the
//! engagement trend a line [`Chart`].

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    symbols,
    text::{Line, Span, Text},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap,
    },
    Frame,
};

use dashboard_core::formatting;
use dashboard_core::models::{AggregateView, ChartKind, InsightSet};
use dashboard_runtime::data::analysis::ViewPanel;

use crate::components::share_bar::{fit_label, ShareBar};
use crate::themes::Theme;

/// Display columns given to bar labels in horizontal bar charts.
const BAR_LABEL_WIDTH: usize = 16;

/// Rows reserved for the insight paragraph under a chart.
const INSIGHT_HEIGHT: u16 = 9;

// ── Panel ─────────────────────────────────────────────────────────────────────

/// Render `panel` into `area`: chart on top, insights below.
pub fn render_panel(frame: &mut Frame, area: Rect, panel: &ViewPanel, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(INSIGHT_HEIGHT)])
        .split(area);

    let title = format!(" {} ", panel.kind().title());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(title, theme.header));

    match panel.kind().chart() {
        ChartKind::Pie => render_share_chart(frame, chunks[0], &panel.view, block, theme),
        ChartKind::Bar => render_bar_chart(frame, chunks[0], &panel.view, block, theme),
        ChartKind::Line => render_trend_chart(frame, chunks[0], &panel.view, block, theme),
    }

    render_insights(frame, chunks[1], &panel.insights, theme);
}

/// Build the styled insight lines: the intro in bold, the recommendation
/// (always last when there is more than one line) highlighted, everything in
/// between as bullet points.
pub fn insight_lines<'a>(insights: &'a InsightSet, theme: &Theme) -> Vec<Line<'a>> {
    let last = insights.len().saturating_sub(1);
    insights
        .iter()
        .enumerate()
        .map(|(i, text)| {
            if i == 0 {
                Line::from(Span::styled(text.as_str(), theme.bold))
            } else if i == last {
                Line::from(vec![
                    Span::styled("» ", theme.recommendation),
                    Span::styled(text.as_str(), theme.recommendation),
                ])
            } else {
                Line::from(vec![
                    Span::styled("• ", theme.dim),
                    Span::styled(text.as_str(), theme.insight),
                ])
            }
        })
        .collect()
}

fn render_insights(frame: &mut Frame, area: Rect, insights: &InsightSet, theme: &Theme) {
    let paragraph = Paragraph::new(Text::from(insight_lines(insights, theme)))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(" Insights "),
        );
    frame.render_widget(paragraph, area);
}

// ── Charts ────────────────────────────────────────────────────────────────────

fn render_share_chart(
    frame: &mut Frame,
    area: Rect,
    view: &AggregateView,
    block: Block,
    theme: &Theme,
) {
    let total = view.total();
    let mut lines = vec![Line::from("")];
    lines.extend(
        view.rows
            .iter()
            .enumerate()
            .map(|(i, row)| ShareBar::new(&row.label, row.value, total, i, theme).to_line()),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("{}: ", view.kind.value_label()), theme.label),
        Span::styled(formatting::format_engagements(total), theme.value),
    ]));

    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_bar_chart(
    frame: &mut Frame,
    area: Rect,
    view: &AggregateView,
    block: Block,
    theme: &Theme,
) {
    let bars: Vec<Bar> = view
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Bar::default()
                .label(Line::from(fit_label(&row.label, BAR_LABEL_WIDTH)))
                .value(bar_value(row.value))
                .text_value(formatting::format_engagements(row.value))
                .style(theme.series_style(i))
                .value_style(theme.value)
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn render_trend_chart(
    frame: &mut Frame,
    area: Rect,
    view: &AggregateView,
    block: Block,
    theme: &Theme,
) {
    let points: Vec<(f64, f64)> = view
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| (i as f64, row.value))
        .collect();

    let x_max = view.len().saturating_sub(1).max(1) as f64;
    let y_max = view
        .values()
        .into_iter()
        .fold(0.0_f64, f64::max)
        .max(1.0)
        * 1.1;

    let dataset = Dataset::default()
        .name(view.kind.value_label())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.series_style(0))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled(view.kind.dimension_label(), theme.label))
                .style(theme.dim)
                .bounds([0.0, x_max])
                .labels(date_axis_labels(view)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(view.kind.value_label(), theme.label))
                .style(theme.dim)
                .bounds([0.0, y_max])
                .labels(vec![
                    "0".to_string(),
                    formatting::format_engagements(y_max / 2.0),
                    formatting::format_engagements(y_max),
                ]),
        );

    frame.render_widget(chart, area);
}

/// First, middle and last dates of the trend, without repeats.
fn date_axis_labels(view: &AggregateView) -> Vec<String> {
    let labels = view.labels();
    let mut picked: Vec<String> = Vec::new();
    if let (Some(first), Some(last)) = (labels.first(), labels.last()) {
        picked.push(first.to_string());
        if labels.len() > 2 {
            picked.push(labels[labels.len() / 2].to_string());
        }
        if labels.len() > 1 {
            picked.push(last.to_string());
        }
    }
    picked
}

/// Bar heights are whole units; fractional or negative sums are clamped.
fn bar_value(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

// ── Placeholders ──────────────────────────────────────────────────────────────

/// Shown when the upload cleaned to zero rows.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No data to display", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "None of the uploaded rows had a recognizable date.",
            theme.dim,
        )),
        Line::from(Span::styled(
            "Fix the file and press 'r' to upload it again.",
            theme.dim,
        )),
    ];
    render_placeholder(frame, area, text);
}

/// Shown while the first upload is still being processed.
pub fn render_waiting(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Processing upload...", theme.info)),
        Line::from(""),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    render_placeholder(frame, area, text);
}

/// Shown when the upload was rejected.
pub fn render_error(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.error)),
        Line::from(""),
        Line::from(Span::styled(
            "Press 'r' to upload the file again or 'q' to exit.",
            theme.dim,
        )),
    ];
    render_placeholder(frame, area, text);
}

fn render_placeholder(frame: &mut Frame, area: Rect, text: Vec<Line>) {
    let paragraph = Paragraph::new(Text::from(text))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Media Dashboard "),
        );
    frame.render_widget(paragraph, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
