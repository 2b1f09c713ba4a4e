// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # visitwatch
//!
//! A terminal dashboard for website visit analytics served through a
//! same-origin Matomo proxy.
//!
//! On mount the dashboard fires four requests at once (live visits, a
//! summary for the report date, a twelve-month trend and a per-city
//! breakdown), waits for all of them to settle, and renders whatever came
//! back. A failed request falls back to its default value and never takes
//! the others down with it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│ session  │───▶│  fetch  │───▶│  data   │ │
//! │  │ (state) │    │ (mount)  │    │(settle) │    │(merge)  │ │
//! │  └────┬────┘    └──────────┘    └────┬────┘    └─────────┘ │
//! │       │                              │                      │
//! │       ▼                              ▼                      │
//! │  ┌─────────┐                    ┌─────────┐                 │
//! │  │   ui    │◀── map, chart      │ source  │◀── Http | Fixture│
//! │  └─────────┘                    └─────────┘                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Where payloads come from ([`AnalyticsSource`] trait),
//!   the request descriptors, and the HTTP and fixture implementations
//! - **[`fetch`]**: Settle-all aggregation of the four requests
//! - **[`data`]**: Payload normalization and the merged [`DashboardData`]
//! - **[`session`]**: Mount lifecycle; late results after unmount are dropped
//! - **[`map`]**: Map widget lifecycle behind the [`MapRenderer`] trait
//! - **[`chart`]**: Monthly trend chart model
//! - **[`terminal`]**: Terminal setup and a panic hook that leaves contained
//!   background panics alone
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Against a running proxy
//! visitwatch --base-url https://example.org
//!
//! # Offline, from captured payloads
//! visitwatch --fixtures demos/fixtures --date 2024-02-29
//!
//! # Fetch once and write the merged state as JSON
//! visitwatch --base-url https://example.org --export state.json
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use visitwatch::{fetch_all, DashboardData, HttpSource, DEFAULT_PREFIX};
//!
//! # tokio_test::block_on(async {
//! let source = HttpSource::builder().base_url("https://example.org").build().unwrap();
//! let settled = fetch_all(&source, DEFAULT_PREFIX, "2024-02-29").await;
//! let data = DashboardData::merge("2024-02-29", settled);
//! println!("{} visits", data.total_visits);
//! # });
//! ```

pub mod app;
pub mod chart;
pub mod data;
pub mod date;
pub mod error;
pub mod events;
pub mod fetch;
pub mod map;
pub mod navigation;
pub mod session;
pub mod settings;
pub mod source;
pub mod terminal;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use chart::TrendChart;
pub use data::{CityPoint, DashboardData, SeriesPoint, SlotFailure};
pub use error::FetchError;
pub use fetch::{fetch_all, SettledResponses};
pub use map::{CanvasMapRenderer, MapLifecycle, MapRenderer, MapView, Marker};
pub use navigation::NavigationPolicy;
pub use session::{load, LivenessToken, LoadOutcome, Session};
pub use settings::Settings;
pub use source::{
    build_requests, AnalyticsSource, Endpoint, FixtureSource, HttpSource, HttpSourceBuilder,
    RequestDescriptor, DEFAULT_PREFIX,
};
