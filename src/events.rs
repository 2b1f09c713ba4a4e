//! Keyboard and mouse input handling.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, View};

/// File written by the export key.
pub const EXPORT_FILE: &str = "visitwatch_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // While the city popup is open, keep browsing cities under it
    if app.show_city_popup {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::PageUp => app.select_prev_n(10),
            KeyCode::PageDown => app.select_next_n(10),
            KeyCode::Home => app.select_first(),
            KeyCode::End => app.select_last(),
            _ => {}
        }
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        KeyCode::Char('1') => app.set_view(View::Overview),
        KeyCode::Char('2') => app.set_view(View::Map),
        KeyCode::Char('3') => app.set_view(View::Cities),

        // Navigation (up/down for cities, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Enter => app.open_city_popup(),

        // Go back (Esc and Backspace)
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Reload is a fresh mount, not a refetch into the same one
        KeyCode::Char('r') => app.remount(),

        // Map zoom
        KeyCode::Char('+') | KeyCode::Char('=') => {
            if app.current_view == View::Map {
                app.zoom_in();
            }
        }
        KeyCode::Char('-') => {
            if app.current_view == View::Map {
                app.zoom_out();
            }
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => {
            if app.current_view == View::Map {
                app.zoom_in();
            } else {
                app.select_prev();
            }
        }
        MouseEventKind::ScrollDown => {
            if app.current_view == View::Map {
                app.zoom_out();
            } else {
                app.select_next();
            }
        }

        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Rows below the table header select a city
            if app.current_view == View::Cities && clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;
                let count = app.data.as_ref().map(|d| d.cities.len()).unwrap_or(0);
                if item_row < count {
                    app.selected_city_index = item_row;
                }
            }

            // Tab clicks (row 1, after header)
            if clicked_row == 1 {
                let col = mouse.column;
                // Approximate tab positions: Overview (0-14), Map (15-24), Cities (25-37)
                if col < 15 {
                    app.set_view(View::Overview);
                } else if col < 25 {
                    app.set_view(View::Map);
                } else if col < 38 {
                    app.set_view(View::Cities);
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => {
            app.go_back();
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::stub::StubSource;
    use crate::source::DEFAULT_PREFIX;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    async fn loaded_app() -> App {
        let mut app = App::new(Arc::new(StubSource::healthy()), DEFAULT_PREFIX)
            .with_report_date("2024-02-29");
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
    fn test_quit_and_view_keys() {
        let mut app = App::new(Arc::new(StubSource::new()), DEFAULT_PREFIX);

        handle_key_event(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.current_view, View::Cities);
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::Overview);
        handle_key_event(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.current_view, View::Cities);
        handle_key_event(&mut app, key(KeyCode::Char('h')));
        assert_eq!(app.current_view, View::Map);

        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = App::new(Arc::new(StubSource::new()), DEFAULT_PREFIX);

        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[tokio::test]
    async fn test_popup_keys() {
        let mut app = loaded_app().await;

        handle_key_event(&mut app, key(KeyCode::Char('3')));
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(app.show_city_popup);

        handle_key_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.selected_city_index, 1);
        assert!(app.show_city_popup);

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(!app.show_city_popup);
        assert_eq!(app.current_view, View::Cities);
    }

    #[tokio::test]
    async fn test_zoom_keys_only_on_map() {
        let mut app = loaded_app().await;
        let zoom = app.map.view().zoom;

        handle_key_event(&mut app, key(KeyCode::Char('+')));
        assert_eq!(app.map.view().zoom, zoom);

        handle_key_event(&mut app, key(KeyCode::Char('2')));
        handle_key_event(&mut app, key(KeyCode::Char('+')));
        assert_eq!(app.map.view().zoom, zoom + 1);
        handle_key_event(&mut app, key(KeyCode::Char('-')));
        assert_eq!(app.map.view().zoom, zoom);
    }

    #[tokio::test]
    async fn test_reload_key_remounts() {
        let mut app = loaded_app().await;
        assert!(app.data.is_some());

        handle_key_event(&mut app, key(KeyCode::Char('r')));
        assert!(app.data.is_none());
        assert!(app.is_loading());
        assert!(!app.map.is_constructed());
    }

    #[tokio::test]
    async fn test_mouse_tabs_and_rows() {
        let mut app = loaded_app().await;

        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 30, 1), 3);
        assert_eq!(app.current_view, View::Cities);

        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 10, 5), 3);
        assert_eq!(app.selected_city_index, 1);

        handle_mouse_event(&mut app, mouse(MouseEventKind::ScrollUp, 10, 5), 3);
        assert_eq!(app.selected_city_index, 0);

        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Right), 10, 5), 3);
        assert_eq!(app.current_view, View::Overview);
    }
}
