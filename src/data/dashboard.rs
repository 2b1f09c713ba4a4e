//! Render-ready dashboard state.

use std::time::Instant;

use serde::Serialize;

use super::model::{CityPoint, SeriesPoint};
use crate::fetch::SettledResponses;
use crate::source::Endpoint;

/// A request slot that failed and was replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotFailure {
    pub endpoint: Endpoint,
    pub message: String,
}

/// Snapshot of everything the dashboard renders.
///
/// Built once per mount from the settled responses. Every field has a
/// usable default, so the view renders whether zero, some, or all requests
/// succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    /// The day the dated requests were made for (`YYYY-MM-DD`).
    pub report_date: String,
    pub live_visits: u64,
    pub total_visits: u64,
    pub monthly: Vec<SeriesPoint>,
    pub cities: Vec<CityPoint>,
    pub failures: Vec<SlotFailure>,
    /// Set when the aggregation step itself failed and nothing was merged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    #[serde(skip)]
    pub last_updated: Instant,
}

impl DashboardData {
    /// All-default state for a report date.
    pub fn empty(report_date: impl Into<String>) -> Self {
        Self {
            report_date: report_date.into(),
            live_visits: 0,
            total_visits: 0,
            monthly: Vec::new(),
            cities: Vec::new(),
            failures: Vec::new(),
            load_error: None,
            last_updated: Instant::now(),
        }
    }

    /// All-default state carrying the reason the load failed.
    pub fn failed_load(report_date: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            load_error: Some(message.into()),
            ..Self::empty(report_date)
        }
    }

    /// Merge settled responses, defaulting each failed slot.
    ///
    /// The result depends only on the four inputs, never on the order in
    /// which they settled.
    pub fn merge(report_date: impl Into<String>, settled: SettledResponses) -> Self {
        let failures = settled.failures();
        Self {
            report_date: report_date.into(),
            live_visits: settled.live_visits.unwrap_or_default(),
            total_visits: settled.total_visits.unwrap_or_default(),
            monthly: settled.monthly.unwrap_or_default(),
            cities: settled.cities.unwrap_or_default(),
            failures,
            load_error: None,
            last_updated: Instant::now(),
        }
    }

    /// Cities that can be placed on the map.
    pub fn mappable_cities(&self) -> impl Iterator<Item = &CityPoint> {
        self.cities.iter().filter(|c| c.has_coordinates())
    }

    /// Whether a given slot failed.
    pub fn failed(&self, endpoint: Endpoint) -> bool {
        self.failures.iter().any(|f| f.endpoint == endpoint)
    }

    /// Export as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    fn failed<T>() -> Result<T, FetchError> {
        Err(FetchError::Timeout)
    }

    fn settled_ok() -> SettledResponses {
        SettledResponses {
            live_visits: Ok(4),
            total_visits: Ok(90),
            monthly: Ok(vec![SeriesPoint::new("2024-01", 5)]),
            cities: Ok(vec![CityPoint {
                label: "Paris".to_string(),
                visitors: 3,
                lat: 48.8,
                long: 2.3,
                ..Default::default()
            }]),
        }
    }

    #[test]
    fn test_merge_all_success() {
        let data = DashboardData::merge("2024-02-29", settled_ok());
        assert_eq!(data.report_date, "2024-02-29");
        assert_eq!(data.live_visits, 4);
        assert_eq!(data.total_visits, 90);
        assert_eq!(data.monthly.len(), 1);
        assert_eq!(data.cities.len(), 1);
        assert!(data.failures.is_empty());
    }

    #[test]
    fn test_merge_every_failure_combination() {
        for mask in 0u8..16 {
            let ok = settled_ok();
            let settled = SettledResponses {
                live_visits: if mask & 1 != 0 { failed() } else { ok.live_visits },
                total_visits: if mask & 2 != 0 { failed() } else { ok.total_visits },
                monthly: if mask & 4 != 0 { failed() } else { ok.monthly },
                cities: if mask & 8 != 0 { failed() } else { ok.cities },
            };

            let data = DashboardData::merge("2024-02-29", settled);

            assert_eq!(data.live_visits, if mask & 1 != 0 { 0 } else { 4 });
            assert_eq!(data.total_visits, if mask & 2 != 0 { 0 } else { 90 });
            assert_eq!(data.monthly.is_empty(), mask & 4 != 0);
            assert_eq!(data.cities.is_empty(), mask & 8 != 0);
            assert_eq!(data.failures.len(), mask.count_ones() as usize);
            assert_eq!(data.failed(Endpoint::Cities), mask & 8 != 0);
        }
    }

    #[test]
    fn test_mappable_cities_skip_zero_coordinates() {
        let mut data = DashboardData::empty("2024-02-29");
        data.cities = vec![
            CityPoint {
                lat: 1.0,
                long: 1.0,
                ..Default::default()
            },
            CityPoint::default(),
        ];
        assert_eq!(data.mappable_cities().count(), 1);
    }

    #[test]
    fn test_export_json_fields() {
        let mut settled = settled_ok();
        settled.cities = failed();
        let data = DashboardData::merge("2024-02-29", settled);

        let value: serde_json::Value = serde_json::from_str(&data.to_json().unwrap()).unwrap();
        assert_eq!(value["live_visits"], 4);
        assert_eq!(value["monthly"][0]["name"], "2024-01");
        assert_eq!(value["failures"][0]["endpoint"], "cities");
        assert!(value.get("last_updated").is_none());
        assert!(value.get("load_error").is_none());
    }

    #[test]
    fn test_failed_load_is_all_defaults() {
        let data = DashboardData::failed_load("2024-02-29", "boom");
        assert_eq!(data.report_date, "2024-02-29");
        assert_eq!(data.total_visits, 0);
        assert!(data.cities.is_empty());
        assert_eq!(data.load_error.as_deref(), Some("boom"));

        let value: serde_json::Value = serde_json::from_str(&data.to_json().unwrap()).unwrap();
        assert_eq!(value["load_error"], "boom");
    }
}
