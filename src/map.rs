//! Visitor map lifecycle.
//!
//! The map widget is modelled behind [`MapRenderer`] so its lifecycle can be
//! driven and checked without a terminal. [`MapLifecycle`] is a small state
//! machine:
//!
//! ```text
//!            construct()                 construct()
//!  Absent ───────────────▶ Constructed ─────────────┐
//!    ▲                        │    ▲                │ destroy old,
//!    │       teardown()       │    └────────────────┘ build new
//!    └────────────────────────┘
//! ```
//!
//! Construction is never additive: an existing map is destroyed before the
//! replacement is built, so at most one map is ever live.

use std::fmt::Debug;

use crate::data::CityPoint;

/// Default map centre latitude.
pub const DEFAULT_CENTER_LAT: f64 = 20.0;
/// Default map centre longitude.
pub const DEFAULT_CENTER_LONG: f64 = 0.0;
/// Default zoom (1 shows the whole world).
pub const DEFAULT_ZOOM: u8 = 1;
/// Deepest zoom the terminal map supports.
pub const MAX_ZOOM: u8 = 6;

/// Centre and zoom of a map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center_lat: f64,
    pub center_long: f64,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center_lat: DEFAULT_CENTER_LAT,
            center_long: DEFAULT_CENTER_LONG,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl MapView {
    /// Visible longitude range at this zoom.
    pub fn x_bounds(&self) -> [f64; 2] {
        span_bounds(self.center_long, 360.0, self.zoom, 180.0)
    }

    /// Visible latitude range at this zoom.
    pub fn y_bounds(&self) -> [f64; 2] {
        span_bounds(self.center_lat, 180.0, self.zoom, 90.0)
    }
}

fn span_bounds(center: f64, full: f64, zoom: u8, limit: f64) -> [f64; 2] {
    let half = full / 2f64.powi(i32::from(zoom.max(1)));
    [(center - half).max(-limit), (center + half).min(limit)]
}

/// A city placed on the map, with its popup text.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub lat: f64,
    pub long: f64,
    pub label: String,
    pub visitors: u64,
}

impl Marker {
    /// Marker for a city, or `None` when it has no usable coordinates.
    pub fn from_city(city: &CityPoint) -> Option<Self> {
        city.has_coordinates().then(|| Self {
            lat: city.lat,
            long: city.long,
            label: city.display_name().to_string(),
            visitors: city.visitors,
        })
    }

    /// Popup text shown for this marker.
    pub fn popup(&self) -> String {
        format!("{}: {} visitors", self.label, self.visitors)
    }
}

/// Capability interface of a map widget.
pub trait MapRenderer {
    /// A live map instance.
    type Map: Debug;

    /// Build a map with a base layer at the given view.
    fn create(&mut self, view: MapView) -> Self::Map;

    /// Add one marker.
    fn add_marker(&mut self, map: &mut Self::Map, marker: Marker);

    /// Move or zoom an existing map.
    fn set_view(&mut self, map: &mut Self::Map, view: MapView);

    /// Release a map instance.
    fn destroy(&mut self, map: Self::Map);
}

/// Current lifecycle state.
#[derive(Debug)]
pub enum MapState<M> {
    /// No map exists (initial state and after teardown).
    Absent,
    /// A map exists.
    Constructed(M),
}

/// Owns the one map instance of a dashboard view.
#[derive(Debug)]
pub struct MapLifecycle<R: MapRenderer> {
    renderer: R,
    state: MapState<R::Map>,
    view: MapView,
}

impl<R: MapRenderer> MapLifecycle<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            state: MapState::Absent,
            view: MapView::default(),
        }
    }

    /// Build the map for a set of cities, replacing any existing map.
    ///
    /// Cities without coordinates are skipped. Returns the number of
    /// markers placed.
    pub fn construct(&mut self, cities: &[CityPoint]) -> usize {
        if let MapState::Constructed(old) = std::mem::replace(&mut self.state, MapState::Absent) {
            tracing::debug!("Replacing existing map");
            self.renderer.destroy(old);
        }

        self.view = MapView::default();
        let mut map = self.renderer.create(self.view);

        let mut placed = 0;
        for marker in cities.iter().filter_map(Marker::from_city) {
            self.renderer.add_marker(&mut map, marker);
            placed += 1;
        }

        tracing::debug!(markers = placed, skipped = cities.len() - placed, "Map constructed");
        self.state = MapState::Constructed(map);
        placed
    }

    /// Destroy the map if one exists.
    pub fn teardown(&mut self) {
        if let MapState::Constructed(map) = std::mem::replace(&mut self.state, MapState::Absent) {
            self.renderer.destroy(map);
            tracing::debug!("Map torn down");
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom_to(self.view.zoom.saturating_add(1).min(MAX_ZOOM));
    }

    pub fn zoom_out(&mut self) {
        self.zoom_to(self.view.zoom.saturating_sub(1).max(1));
    }

    fn zoom_to(&mut self, zoom: u8) {
        if let MapState::Constructed(map) = &mut self.state {
            self.view.zoom = zoom;
            self.renderer.set_view(map, self.view);
        }
    }

    pub fn is_constructed(&self) -> bool {
        matches!(self.state, MapState::Constructed(_))
    }

    /// The live map, if any.
    pub fn map(&self) -> Option<&R::Map> {
        match &self.state {
            MapState::Constructed(map) => Some(map),
            MapState::Absent => None,
        }
    }

    pub fn view(&self) -> MapView {
        self.view
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<R: MapRenderer> Drop for MapLifecycle<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// A terminal map: the world outline plus markers, drawn by `ui::map`.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasMap {
    pub view: MapView,
    pub markers: Vec<Marker>,
}

/// [`MapRenderer`] backing the terminal dashboard.
#[derive(Debug, Default)]
pub struct CanvasMapRenderer {
    live: usize,
    created: usize,
}

impl CanvasMapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map instances currently alive.
    pub fn live_maps(&self) -> usize {
        self.live
    }

    /// Map instances ever created.
    pub fn created_maps(&self) -> usize {
        self.created
    }
}

impl MapRenderer for CanvasMapRenderer {
    type Map = CanvasMap;

    fn create(&mut self, view: MapView) -> CanvasMap {
        self.live += 1;
        self.created += 1;
        CanvasMap {
            view,
            markers: Vec::new(),
        }
    }

    fn add_marker(&mut self, map: &mut CanvasMap, marker: Marker) {
        map.markers.push(marker);
    }

    fn set_view(&mut self, map: &mut CanvasMap, view: MapView) {
        map.view = view;
    }

    fn destroy(&mut self, map: CanvasMap) {
        self.live = self.live.saturating_sub(1);
        drop(map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(label: &str, lat: f64, long: f64) -> CityPoint {
        CityPoint {
            label: label.to_string(),
            visitors: 7,
            lat,
            long,
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_absent() {
        let lifecycle = MapLifecycle::new(CanvasMapRenderer::new());
        assert!(!lifecycle.is_constructed());
        assert!(lifecycle.map().is_none());
    }

    #[test]
    fn test_construct_skips_unknown_coordinates() {
        let mut lifecycle = MapLifecycle::new(CanvasMapRenderer::new());
        let placed = lifecycle.construct(&[
            city("Paris", 48.8, 2.3),
            city("Nowhere", 0.0, 0.0),
            city("Equator", 0.0, 30.0),
        ]);

        assert_eq!(placed, 1);
        let map = lifecycle.map().unwrap();
        assert_eq!(map.markers.len(), 1);
        assert_eq!(map.markers[0].popup(), "Paris: 7 visitors");
        assert_eq!(map.view, MapView::default());
    }

    #[test]
    fn test_construct_twice_leaves_one_map() {
        let mut lifecycle = MapLifecycle::new(CanvasMapRenderer::new());
        lifecycle.construct(&[city("Paris", 48.8, 2.3)]);
        lifecycle.construct(&[city("Berlin", 52.5, 13.4), city("Rome", 41.9, 12.5)]);

        assert_eq!(lifecycle.renderer().live_maps(), 1);
        assert_eq!(lifecycle.renderer().created_maps(), 2);
        let labels: Vec<&str> =
            lifecycle.map().unwrap().markers.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Berlin", "Rome"]);
    }

    #[test]
    fn test_teardown_releases_map() {
        let mut lifecycle = MapLifecycle::new(CanvasMapRenderer::new());
        lifecycle.construct(&[city("Paris", 48.8, 2.3)]);
        lifecycle.teardown();

        assert!(!lifecycle.is_constructed());
        assert_eq!(lifecycle.renderer().live_maps(), 0);

        // Idempotent
        lifecycle.teardown();
        assert_eq!(lifecycle.renderer().live_maps(), 0);
    }

    #[test]
    fn test_zoom_only_on_constructed_map() {
        let mut lifecycle = MapLifecycle::new(CanvasMapRenderer::new());
        lifecycle.zoom_in();
        assert_eq!(lifecycle.view().zoom, DEFAULT_ZOOM);

        lifecycle.construct(&[]);
        lifecycle.zoom_in();
        lifecycle.zoom_in();
        assert_eq!(lifecycle.map().unwrap().view.zoom, DEFAULT_ZOOM + 2);

        for _ in 0..10 {
            lifecycle.zoom_out();
        }
        assert_eq!(lifecycle.view().zoom, 1);

        // Reconstruction resets the view
        lifecycle.zoom_in();
        lifecycle.construct(&[]);
        assert_eq!(lifecycle.view(), MapView::default());
    }

    #[test]
    fn test_bounds() {
        let view = MapView {
            center_lat: 0.0,
            center_long: 0.0,
            zoom: 1,
        };
        assert_eq!(view.x_bounds(), [-180.0, 180.0]);
        assert_eq!(view.y_bounds(), [-90.0, 90.0]);

        let zoomed = MapView { zoom: 2, ..view };
        assert_eq!(zoomed.x_bounds(), [-90.0, 90.0]);
        assert_eq!(zoomed.y_bounds(), [-45.0, 45.0]);

        assert_eq!(MapView::default().y_bounds(), [-70.0, 90.0]);
    }
}
