//! Normalized dashboard records.

use serde::Serialize;

/// One reporting period of the monthly trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    /// Period label as reported by the analytics service (e.g. "2024-03").
    pub name: String,
    /// Visits in that period.
    pub value: u64,
}

impl SeriesPoint {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A visitor city, normalized across payload versions.
///
/// Coordinates default to `0.0` when the payload carries none, which makes a
/// real point on the equator or prime meridian indistinguishable from
/// "unknown". [`CityPoint::has_coordinates`] treats both as unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CityPoint {
    pub label: String,
    pub visitors: u64,
    pub lat: f64,
    pub long: f64,
    pub city_name: String,
    pub region_name: String,
    pub country_name: String,
}

impl CityPoint {
    /// Whether this city can be placed on the map.
    pub fn has_coordinates(&self) -> bool {
        self.lat.is_finite() && self.long.is_finite() && self.lat != 0.0 && self.long != 0.0
    }

    /// Best human-readable name: the label, then the city name.
    pub fn display_name(&self) -> &str {
        if !self.label.is_empty() {
            &self.label
        } else if !self.city_name.is_empty() {
            &self.city_name
        } else {
            "Unknown"
        }
    }

    /// "Region, Country" with empty parts omitted.
    pub fn location(&self) -> String {
        [self.region_name.as_str(), self.country_name.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}
