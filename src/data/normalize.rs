//! Payload normalization.
//!
//! The analytics service has renamed several fields across versions. These
//! functions absorb that so nothing downstream branches on payload shape.
//! All of them are stateless and fail soft: missing or malformed fields
//! become zero or empty values.

use serde_json::Value;

use super::model::{CityPoint, SeriesPoint};
use crate::error::FetchError;

/// Field carrying a visit count in the live and summary payloads.
const VISITS_FIELD: &str = "nb_visits";

/// Element names in the monthly XML report.
const RESULT_TAG: &str = "result";
const DATE_ATTR: &str = "date";

/// Alternative field names for each city attribute, in priority order.
const CITY_LABEL: &[&str] = &["label"];
const CITY_VISITORS: &[&str] = &["sum_daily_nb_uniq_visitors", "nb_visits"];
const CITY_LAT: &[&str] = &["lat", "latitude"];
const CITY_LONG: &[&str] = &["long", "longitude"];

/// Read the visit count from a live or summary payload.
///
/// Accepts a JSON number or a numeric string. Anything else is 0.
pub fn visit_count(payload: &Value) -> u64 {
    first_present(payload, &[VISITS_FIELD])
        .and_then(as_number)
        .map(to_count)
        .unwrap_or(0)
}

/// Parse the monthly XML report into an ordered series.
///
/// Every `result` element becomes one point, in document order. A document
/// that fails to parse yields an empty series.
pub fn monthly_series(xml: &str) -> Vec<SeriesPoint> {
    let doc = match roxmltree::Document::parse(xml) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(error = %e, "Monthly report is not valid XML");
            return Vec::new();
        }
    };

    doc.descendants()
        .filter(|node| node.has_tag_name(RESULT_TAG))
        .map(|node| {
            let name = node.attribute(DATE_ATTR).unwrap_or_default();
            let visits = node
                .descendants()
                .skip(1)
                .find(|child| child.has_tag_name(VISITS_FIELD))
                .and_then(|child| child.text())
                .unwrap_or("0");
            SeriesPoint::new(name, parse_count(visits))
        })
        .collect()
}

/// Normalize the cities payload.
///
/// The payload must be a JSON array; each element is read leniently.
pub fn cities(payload: &Value) -> Result<Vec<CityPoint>, FetchError> {
    let items = payload
        .as_array()
        .ok_or_else(|| FetchError::Parse("cities payload is not an array".to_string()))?;

    Ok(items.iter().map(city).collect())
}

/// Normalize a single city record.
///
/// `label` is not backfilled from `city_name`; only the listed alternative
/// pairs are considered.
pub fn city(item: &Value) -> CityPoint {
    CityPoint {
        label: string_field(item, CITY_LABEL),
        visitors: first_present(item, CITY_VISITORS)
            .and_then(as_number)
            .map(to_count)
            .unwrap_or(0),
        lat: number_field(item, CITY_LAT),
        long: number_field(item, CITY_LONG),
        city_name: string_field(item, &["city_name"]),
        region_name: string_field(item, &["region_name"]),
        country_name: string_field(item, &["country_name"]),
    }
}

/// First of `keys` that exists in `item` with a non-null value.
fn first_present<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|key| item.get(*key)).find(|v| !v.is_null())
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_count(n: f64) -> u64 {
    if n.is_finite() && n > 0.0 {
        n as u64
    } else {
        0
    }
}

fn number_field(item: &Value, keys: &[&str]) -> f64 {
    first_present(item, keys)
        .and_then(as_number)
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

fn string_field(item: &Value, keys: &[&str]) -> String {
    first_present(item, keys)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Leading base-10 digits of `text`, so `"12.5"` reads as 12. No digits is 0.
fn parse_count(text: &str) -> u64 {
    let text = text.trim_start();
    let end = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    text[..end].parse().unwrap_or(0)
}
