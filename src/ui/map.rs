//! Map view rendering.
//!
//! Draws the live [`CanvasMap`](crate::map::CanvasMap) on a ratatui canvas:
//! the world outline as the base layer, then one point and label per marker.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};

use crate::app::App;

/// Render the Map view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(map) = app.map.map() else {
        let message = if app.data.is_some() { "No city data" } else { "Loading..." };
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block.title(" Visitor map "));
        frame.render_widget(paragraph, area);
        return;
    };

    let title = format!(
        " Visitor map ({} located, zoom {}) ",
        map.markers.len(),
        map.view.zoom
    );

    let coastline = app.theme.coastline;
    let marker = app.theme.marker;
    let selected = app.selected_city().map(|c| (c.long, c.lat));

    let canvas = Canvas::default()
        .block(block.title(title))
        .marker(symbols::Marker::Braille)
        .x_bounds(map.view.x_bounds())
        .y_bounds(map.view.y_bounds())
        .paint(|ctx| {
            ctx.draw(&Map {
                color: coastline,
                resolution: MapResolution::High,
            });
            ctx.layer();

            let coords: Vec<(f64, f64)> = map.markers.iter().map(|m| (m.long, m.lat)).collect();
            ctx.draw(&Points {
                coords: &coords,
                color: marker,
            });

            // The selected city gets its full popup; the rest just a count
            for m in &map.markers {
                let label = if selected == Some((m.long, m.lat)) {
                    Span::styled(
                        format!("● {}", m.popup()),
                        Style::default().fg(marker).add_modifier(Modifier::BOLD | Modifier::REVERSED),
                    )
                } else {
                    Span::styled(format!("● {}", m.visitors), Style::default().fg(marker))
                };
                ctx.print(m.long, m.lat, label);
            }
        });

    frame.render_widget(canvas, area);
}
