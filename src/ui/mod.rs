//! Terminal UI rendering using ratatui.
//!
//! Each view is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`overview`]: Visit counters and the monthly trend chart
//! - [`map`]: World map with visitor-city markers
//! - [`cities`]: Table of visitor cities
//! - [`detail`]: Popup overlay for the selected city
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (overview/map/cities::render)        │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod cities;
pub mod common;
pub mod detail;
pub mod map;
pub mod overview;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, View};

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 12;

/// Draw the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5);
        frame.render_widget(paragraph, centered.intersection(area));
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Tabs
        Constraint::Min(8),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_tabs(frame, app, chunks[1]);

    match app.current_view {
        View::Overview => overview::render(frame, app, chunks[2]),
        View::Map => map::render(frame, app, chunks[2]),
        View::Cities => cities::render(frame, app, chunks[2]),
    }

    common::render_status_bar(frame, app, chunks[3]);

    if app.show_city_popup {
        detail::render_overlay(frame, app, area);
    }

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::stub::StubSource;
    use crate::source::{Endpoint, DEFAULT_PREFIX};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use std::time::Duration;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    async fn loaded_app(source: StubSource) -> App {
        let mut app = App::new(Arc::new(source), DEFAULT_PREFIX).with_report_date("2024-02-29");
        app.mount();
        for _ in 0..100 {
            if app.poll_session() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        app
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234), "1.2K");
        assert_eq!(format_count(1_234_567), "1.2M");
    }

    #[tokio::test]
    async fn test_every_view_renders_with_data() {
        let mut app = loaded_app(StubSource::healthy()).await;
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        for view in [View::Overview, View::Map, View::Cities] {
            app.set_view(view);
            terminal.draw(|frame| draw(frame, &app)).unwrap();
        }

        app.open_city_popup();
        app.toggle_help();
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        assert!(screen(&terminal).contains("Keyboard Shortcuts"));
    }

    #[tokio::test]
    async fn test_every_view_renders_when_all_requests_fail() {
        let mut app = loaded_app(StubSource::new()).await;
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        app.set_view(View::Overview);
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        assert!(screen(&terminal).contains("No monthly data"));

        app.set_view(View::Map);
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        assert!(screen(&terminal).contains("No city data"));

        app.set_view(View::Cities);
        terminal.draw(|frame| draw(frame, &app)).unwrap();
    }

    #[tokio::test]
    async fn test_every_view_renders_for_every_failure_combination() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        for mask in 0u8..16 {
            let mut source = StubSource::healthy();
            for (bit, endpoint) in Endpoint::ALL.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    source = source.without(*endpoint);
                }
            }

            let mut app = loaded_app(source).await;
            assert!(app.data.is_some(), "mask {:04b} never settled", mask);

            for view in [View::Overview, View::Map, View::Cities] {
                app.set_view(view);
                terminal.draw(|frame| draw(frame, &app)).unwrap();
            }
            app.open_city_popup();
            terminal.draw(|frame| draw(frame, &app)).unwrap();
        }
    }

    #[tokio::test]
    async fn test_map_shows_popup_for_selected_city() {
        let mut app = loaded_app(StubSource::healthy()).await;
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();

        app.set_view(View::Map);
        app.select_first();
        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let screen = screen(&terminal);
        assert!(screen.contains("Paris, Île-de-France, France: 10 visitors"));
    }

    #[test]
    fn test_renders_before_mount_and_when_tiny() {
        let app = App::new(Arc::new(StubSource::new()), DEFAULT_PREFIX);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let mut tiny = Terminal::new(TestBackend::new(20, 6)).unwrap();
        tiny.draw(|frame| draw(frame, &app)).unwrap();
        assert!(screen(&tiny).contains("Terminal"));
    }
}
