//! City popup rendering.
//!
//! Displays a small modal with the selected city's details, the terminal
//! counterpart of a map marker popup.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::map::Marker;

/// Minimum width required for the popup to render properly.
const MIN_OVERLAY_WIDTH: u16 = 36;
/// Minimum height required for the popup to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 9;

/// Render the selected city as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(city) = app.selected_city() else {
        return;
    };

    let dim = Style::default().add_modifier(Modifier::DIM);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let position = match Marker::from_city(city) {
        Some(marker) => Line::from(vec![
            Span::styled(" Marker:   ", dim),
            Span::raw(format!("{:.4}, {:.4}", marker.lat, marker.long)),
        ]),
        None => Line::from(Span::styled(" Not on the map (no coordinates)", dim)),
    };

    let lines = vec![
        Line::from(Span::styled(format!(" {} ", city.display_name()), bold)),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Visitors: ", dim),
            Span::styled(city.visitors.to_string(), bold),
        ]),
        Line::from(vec![
            Span::styled(" City:     ", dim),
            Span::raw(if city.city_name.is_empty() { "-" } else { city.city_name.as_str() }),
        ]),
        Line::from(vec![Span::styled(" Location: ", dim), Span::raw(city.location())]),
        position,
    ];

    let block = Block::default()
        .title(" City ")
        .title_bottom(" Esc:close ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let width = 52u16.min(area.width.saturating_sub(4)).max(MIN_OVERLAY_WIDTH);
    let height = (lines.len() as u16 + 2).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}
