//! Data models and normalization for dashboard payloads.
//!
//! This module turns raw proxy payloads into the uniform shapes the view
//! renders.
//!
//! ## Submodules
//!
//! - [`model`]: Normalized records ([`SeriesPoint`], [`CityPoint`])
//! - [`normalize`]: Payload-to-record conversions with field fallbacks
//! - [`dashboard`]: The merged, render-ready [`DashboardData`]
//!
//! ## Data Flow
//!
//! ```text
//! raw bodies (JSON / XML)
//!        │
//!        ▼
//! normalize::{visit_count, monthly_series, cities}
//!        │
//!        ▼
//! SettledResponses ──▶ DashboardData::merge()
//! ```

pub mod dashboard;
pub mod model;
pub mod normalize;

pub use dashboard::{DashboardData, SlotFailure};
pub use model::{CityPoint, SeriesPoint};
