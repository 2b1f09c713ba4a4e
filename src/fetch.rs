//! Settle-all aggregation of the four dashboard requests.
//!
//! All requests are issued together and awaited together. A failure in one
//! slot never cancels or invalidates another; each slot carries its own
//! `Result` into the merge step.

use serde_json::Value;

use crate::data::normalize;
use crate::data::{CityPoint, SeriesPoint, SlotFailure};
use crate::error::FetchError;
use crate::source::{build_requests, AnalyticsSource, Endpoint, RequestDescriptor};

/// The four normalized results of one mount, each settled independently.
#[derive(Debug)]
pub struct SettledResponses {
    pub live_visits: Result<u64, FetchError>,
    pub total_visits: Result<u64, FetchError>,
    pub monthly: Result<Vec<SeriesPoint>, FetchError>,
    pub cities: Result<Vec<CityPoint>, FetchError>,
}

impl SettledResponses {
    /// Failed slots, in fetch order.
    pub fn failures(&self) -> Vec<SlotFailure> {
        let slots = [
            (Endpoint::LiveVisits, self.live_visits.as_ref().err()),
            (Endpoint::Summary, self.total_visits.as_ref().err()),
            (Endpoint::MonthlyTrend, self.monthly.as_ref().err()),
            (Endpoint::Cities, self.cities.as_ref().err()),
        ];

        slots
            .into_iter()
            .filter_map(|(endpoint, err)| {
                err.map(|e| SlotFailure {
                    endpoint,
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

/// Fire all four requests concurrently and wait for every one to settle.
pub async fn fetch_all(source: &dyn AnalyticsSource, prefix: &str, date: &str) -> SettledResponses {
    let [live, summary, monthly, cities] = build_requests(prefix, date);

    let (live_visits, total_visits, monthly, cities) = tokio::join!(
        fetch_count(source, &live),
        fetch_count(source, &summary),
        fetch_monthly(source, &monthly),
        fetch_cities(source, &cities),
    );

    let settled = SettledResponses {
        live_visits,
        total_visits,
        monthly,
        cities,
    };

    for failure in settled.failures() {
        tracing::warn!(
            endpoint = failure.endpoint.label(),
            error = %failure.message,
            "Request failed; using default"
        );
    }

    settled
}

async fn fetch_json(
    source: &dyn AnalyticsSource,
    request: &RequestDescriptor,
) -> Result<Value, FetchError> {
    let body = source.fetch(request).await?;
    Ok(serde_json::from_str(&body)?)
}

async fn fetch_count(
    source: &dyn AnalyticsSource,
    request: &RequestDescriptor,
) -> Result<u64, FetchError> {
    let payload = fetch_json(source, request).await?;
    Ok(normalize::visit_count(&payload))
}

async fn fetch_monthly(
    source: &dyn AnalyticsSource,
    request: &RequestDescriptor,
) -> Result<Vec<SeriesPoint>, FetchError> {
    let body = source.fetch(request).await?;
    Ok(normalize::monthly_series(&body))
}

async fn fetch_cities(
    source: &dyn AnalyticsSource,
    request: &RequestDescriptor,
) -> Result<Vec<CityPoint>, FetchError> {
    let payload = fetch_json(source, request).await?;
    normalize::cities(&payload)
}
