//! Cities view rendering.
//!
//! Displays a table of visitor cities in payload order.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::format_count;
use crate::app::App;

/// Render the Cities view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(data) = app.data.as_ref().filter(|d| !d.cities.is_empty()) else {
        let message = if app.data.is_some() { "No city data" } else { "Loading..." };
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block.title(" Cities "));
        frame.render_widget(paragraph, area);
        return;
    };
    let cities = &data.cities;

    let header = Row::new(vec!["City", "Region", "Country", "Visitors", "Location"])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = cities
        .iter()
        .map(|c| {
            let location = if c.has_coordinates() {
                Cell::from(format!("{:.2}, {:.2}", c.lat, c.long))
            } else {
                Cell::from("-").style(Style::default().add_modifier(Modifier::DIM))
            };

            Row::new(vec![
                Cell::from(c.display_name().to_string()),
                Cell::from(c.region_name.clone()),
                Cell::from(c.country_name.clone()),
                Cell::from(format_count(c.visitors)),
                location,
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3), // City
        Constraint::Fill(2), // Region
        Constraint::Fill(2), // Country
        Constraint::Min(9),  // Visitors
        Constraint::Min(16), // Location
    ];

    let selected = app.selected_city_index.min(cities.len() - 1);
    let located = data.mappable_cities().count();
    let title = format!(
        " Cities ({}, {} located) [{}/{}] ",
        cities.len(),
        located,
        selected + 1,
        cities.len()
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block.title(title))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
