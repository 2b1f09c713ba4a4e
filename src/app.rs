//! Application state and navigation logic.

use std::sync::Arc;

use anyhow::Result;

use crate::data::{CityPoint, DashboardData};
use crate::date;
use crate::map::{CanvasMapRenderer, MapLifecycle};
use crate::session::{LoadOutcome, Session};
use crate::source::AnalyticsSource;
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// The city popup is shown as an overlay (controlled by
/// `App::show_city_popup`) rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Visit counters and the monthly trend chart.
    Overview,
    /// World map with one marker per located city.
    Map,
    /// Table of visitor cities.
    Cities,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Map,
            View::Map => View::Cities,
            View::Cities => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Cities,
            View::Map => View::Overview,
            View::Cities => View::Map,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Map => "Map",
            View::Cities => "Cities",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_city_popup: bool,

    // Data source
    source: Arc<dyn AnalyticsSource>,
    proxy_prefix: String,
    report_date_override: Option<String>,
    session: Option<Session>,
    pub data: Option<DashboardData>,

    // Map widget (only live while mounted and cities are known)
    pub map: MapLifecycle<CanvasMapRenderer>,

    // Navigation state
    pub selected_city_index: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, std::time::Instant)>,
}

impl App {
    /// Create a new App reading from the given source.
    ///
    /// Nothing is fetched until [`App::mount`].
    pub fn new(source: Arc<dyn AnalyticsSource>, proxy_prefix: &str) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            show_city_popup: false,
            source,
            proxy_prefix: proxy_prefix.to_string(),
            report_date_override: None,
            session: None,
            data: None,
            map: MapLifecycle::new(CanvasMapRenderer::new()),
            selected_city_index: 0,
            theme: Theme::dark(),
            status_message: None,
        }
    }

    /// Report on a fixed date instead of yesterday.
    pub fn with_report_date(mut self, report_date: impl Into<String>) -> Self {
        self.report_date_override = Some(report_date.into());
        self
    }

    /// Set the color theme (default: dark).
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// The date dated requests are made for.
    pub fn report_date(&self) -> String {
        self.report_date_override.clone().unwrap_or_else(date::yesterday_local)
    }

    /// Mount the view: fire all requests in the background.
    ///
    /// An existing mount is torn down first. Must be called within a tokio
    /// runtime.
    pub fn mount(&mut self) {
        if self.session.is_some() {
            self.unmount();
        }
        let report_date = self.report_date();
        self.session = Some(Session::mount(self.source.clone(), &self.proxy_prefix, &report_date));
    }

    /// Tear down the view: discard pending results, release the map and
    /// drop the loaded data.
    pub fn unmount(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.unmount();
            tracing::info!(date = session.report_date(), "Dashboard unmounted");
        }
        self.map.teardown();
        self.data = None;
        self.show_city_popup = false;
        self.selected_city_index = 0;
    }

    /// Start over with a fresh mount.
    pub fn remount(&mut self) {
        self.unmount();
        self.mount();
        self.set_status_message("Reloading".to_string());
    }

    /// Whether the current mount is still waiting for its requests.
    pub fn is_loading(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_pending)
    }

    pub fn is_mounted(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_mounted)
    }

    /// Apply the load result if it has arrived.
    ///
    /// Returns true when new data was applied.
    pub fn poll_session(&mut self) -> bool {
        let Some(outcome) = self.session.as_mut().and_then(Session::poll) else {
            return false;
        };
        self.apply_outcome(outcome);
        true
    }

    fn apply_outcome(&mut self, outcome: LoadOutcome) {
        // The date the requests were made for, even if the day rolled over since
        let report_date = match self.session {
            Some(ref session) => session.report_date().to_string(),
            None => self.report_date(),
        };
        let data = outcome.into_data(&report_date);

        if data.cities.is_empty() {
            self.map.teardown();
        } else {
            self.map.construct(&data.cities);
        }

        if !data.failures.is_empty() {
            tracing::info!(failed = data.failures.len(), "Dashboard loaded with defaults");
        }
        self.selected_city_index =
            self.selected_city_index.min(data.cities.len().saturating_sub(1));
        self.data = Some(data);
    }

    /// Why the last load produced nothing, if it failed outright.
    pub fn load_error(&self) -> Option<&str> {
        self.data.as_ref()?.load_error.as_deref()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, std::time::Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Switch to the next view (cycles through Overview → Map → Cities).
    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.show_city_popup = false;
    }

    fn city_count(&self) -> usize {
        self.data.as_ref().map(|d| d.cities.len()).unwrap_or(0)
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.city_count().saturating_sub(1);
        self.selected_city_index = (self.selected_city_index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_city_index = self.selected_city_index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_city_index = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        self.selected_city_index = self.city_count().saturating_sub(1);
    }

    /// The city under the cursor.
    pub fn selected_city(&self) -> Option<&CityPoint> {
        self.data.as_ref()?.cities.get(self.selected_city_index)
    }

    /// Open the popup for the selected city.
    pub fn open_city_popup(&mut self) {
        if self.current_view != View::Overview && self.selected_city().is_some() {
            self.show_city_popup = true;
        }
    }

    /// Navigate back: close overlay first, then go to Overview.
    pub fn go_back(&mut self) {
        if self.show_city_popup {
            self.show_city_popup = false;
        } else if self.current_view != View::Overview {
            self.current_view = View::Overview;
        }
    }

    /// Close the city popup if open.
    pub fn close_overlay(&mut self) {
        self.show_city_popup = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn zoom_in(&mut self) {
        self.map.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.map.zoom_out();
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };

        std::fs::write(path, data.to_json()?)?;
        tracing::info!(path = %path.display(), "Exported dashboard state");
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.unmount();
    }
}
