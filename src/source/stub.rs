//! In-memory source for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{AnalyticsSource, Endpoint, RequestDescriptor};
use crate::error::FetchError;

/// Serves canned bodies; endpoints without a body fail with a connection error.
#[derive(Debug, Default)]
pub struct StubSource {
    bodies: HashMap<Endpoint, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    finished: AtomicUsize,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source where all four endpoints succeed with realistic payloads.
    pub fn healthy() -> Self {
        Self::new()
            .with(Endpoint::LiveVisits, r#"{"nb_visits": 12}"#)
            .with(Endpoint::Summary, r#"{"nb_visits": "340", "nb_actions": 900}"#)
            .with(
                Endpoint::MonthlyTrend,
                r#"<results>
                    <result date="2024-01"><nb_visits>5</nb_visits></result>
                    <result date="2024-02"><nb_visits>0</nb_visits></result>
                    <result date="2024-03"><nb_visits>12</nb_visits></result>
                </results>"#,
            )
            .with(
                Endpoint::Cities,
                r#"[
                    {"label": "Paris, Île-de-France, France", "nb_visits": 10, "lat": 48.85, "long": 2.35,
                     "city_name": "Paris", "region_name": "Île-de-France", "country_name": "France"},
                    {"label": "Unknown", "nb_visits": 3}
                ]"#,
            )
    }

    pub fn with(mut self, endpoint: Endpoint, body: &str) -> Self {
        self.bodies.insert(endpoint, body.to_string());
        self
    }

    pub fn without(mut self, endpoint: Endpoint) -> Self {
        self.bodies.remove(&endpoint);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests that ran to completion (were not cancelled mid-delay).
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalyticsSource for StubSource {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.finished.fetch_add(1, Ordering::SeqCst);
        self.bodies
            .get(&request.endpoint)
            .cloned()
            .ok_or_else(|| FetchError::Connection("stubbed failure".to_string()))
    }

    fn description(&self) -> &str {
        "stub"
    }
}

/// Panics on every request, standing in for a bug in the aggregation step.
#[derive(Debug)]
pub struct PanickingSource;

#[async_trait]
impl AnalyticsSource for PanickingSource {
    async fn fetch(&self, _request: &RequestDescriptor) -> Result<String, FetchError> {
        panic!("source exploded");
    }

    fn description(&self) -> &str {
        "panicking"
    }
}
