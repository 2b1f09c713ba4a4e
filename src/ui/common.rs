//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::format_count;
use crate::app::{App, View};
use crate::source::Endpoint;

/// Render the header bar with the visit counters.
///
/// Displays: load indicator, live and total visits, report date.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Span::styled(" VISITWATCH ", Style::default().add_modifier(Modifier::BOLD));

    let Some(ref data) = app.data else {
        let status = if app.is_loading() { "| Loading..." } else { "| Not mounted" };
        let line = Line::from(vec![title, Span::raw(status)]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let indicator_style = app.theme.slot_style(!data.failures.is_empty() || app.load_error().is_some());

    let line = Line::from(vec![
        Span::styled(" ● ", indicator_style),
        title,
        Span::raw("│ "),
        Span::styled(
            format_count(data.live_visits),
            app.theme.slot_style(data.failed(Endpoint::LiveVisits)).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" live │ "),
        Span::styled(
            format_count(data.total_visits),
            app.theme.slot_style(data.failed(Endpoint::Summary)).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" total │ "),
        Span::raw(format!("{} cities", data.cities.len())),
        Span::raw(" │ "),
        Span::styled(data.report_date.clone(), Style::default().add_modifier(Modifier::DIM)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Overview "),
        Line::from(" 2:Map "),
        Line::from(" 3:Cities "),
    ];

    let selected = match app.current_view {
        View::Overview => 0,
        View::Map => 1,
        View::Cities => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, time since load, failed slots, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Overview => "Tab:switch r:reload ?:help q:quit",
        View::Map => "+/-:zoom Tab:switch r:reload ?:help q:quit",
        View::Cities => "↑↓:select Enter:popup Tab:switch ?:help q:quit",
    };

    let status = if let Some(err) = app.load_error() {
        format!(" Error: {} | r:retry {}", err, controls)
    } else if let Some(ref data) = app.data {
        let failed = if data.failures.is_empty() {
            String::new()
        } else {
            let labels: Vec<&str> = data.failures.iter().map(|f| f.endpoint.label()).collect();
            format!(" | Unavailable: {}", labels.join(", "))
        };

        format!(
            " {} | Loaded {:.0}s ago{} | {}",
            app.source_description(),
            data.last_updated.elapsed().as_secs_f64(),
            failed,
            controls,
        )
    } else {
        format!(" {} | Loading... | q:quit", app.source_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  1/2/3       Jump to view"),
        Line::from("  ↑/↓ j/k     Select city"),
        Line::from("  PgUp/PgDn   Jump 10 cities"),
        Line::from("  Enter       City popup"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Map",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  +/-       Zoom in/out"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Reload (new mount)"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 24u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
