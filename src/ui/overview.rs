//! Overview rendering.
//!
//! Two counter panels above the monthly trend chart.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::chart::TrendChart;
use crate::source::Endpoint;

/// Roughly how many terminal columns one x label needs.
const LABEL_WIDTH: u16 = 10;

/// Render the Overview: counters and trend chart.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(5), Constraint::Min(6)]).split(area);
    let counters =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(chunks[0]);

    let (live, total, live_failed, total_failed) = match app.data {
        Some(ref data) => (
            Some(data.live_visits),
            Some(data.total_visits),
            data.failed(Endpoint::LiveVisits),
            data.failed(Endpoint::Summary),
        ),
        None => (None, None, false, false),
    };

    render_counter(frame, app, counters[0], " Live visits (last day) ", live, live_failed);
    render_counter(frame, app, counters[1], " Total visits ", total, total_failed);

    let series = app.data.as_ref().map(|d| d.monthly.as_slice()).unwrap_or(&[]);
    match TrendChart::from_series(series) {
        Some(chart) => render_chart(frame, app, chunks[1], &chart),
        None => render_placeholder(frame, app, chunks[1]),
    }
}

fn panel<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

fn render_counter(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    value: Option<u64>,
    failed: bool,
) {
    let text = match value {
        Some(v) => Span::styled(
            v.to_string(),
            app.theme.slot_style(failed).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("…", Style::default().add_modifier(Modifier::DIM)),
    };

    let mut lines = vec![Line::from(text)];
    if failed {
        lines.push(Line::from(Span::styled(
            "unavailable",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(panel(app, title));
    frame.render_widget(paragraph, area);
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect, chart: &TrendChart) {
    let max_labels = (area.width / LABEL_WIDTH).max(2) as usize;
    let [y_min, y_max] = chart.y_bounds();

    let dataset = Dataset::default()
        .name("visits")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(app.theme.series))
        .data(&chart.points);

    let widget = Chart::new(vec![dataset])
        .block(panel(app, " Visits, last 12 months "))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds(chart.x_bounds())
                .labels(chart.axis_labels(max_labels)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([y_min, y_max])
                .labels(vec![
                    "0".to_string(),
                    format!("{:.0}", y_max / 2.0),
                    format!("{:.0}", y_max),
                ]),
        );

    frame.render_widget(widget, area);
}

fn render_placeholder(frame: &mut Frame, app: &App, area: Rect) {
    let message = if app.data.is_some() { "No monthly data" } else { "Loading..." };
    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::DIM))
        .block(panel(app, " Visits, last 12 months "));
    frame.render_widget(paragraph, area);
}
