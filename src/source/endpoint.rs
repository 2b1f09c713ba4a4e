//! Proxy endpoints and request descriptors.

use serde::Serialize;

/// Default proxy path prefix.
pub const DEFAULT_PREFIX: &str = "/matomo";

/// One of the four payloads the dashboard consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// Visits for the report date (JSON, `nb_visits`).
    LiveVisits,
    /// Visit summary for the report date (JSON, `nb_visits`).
    Summary,
    /// Visits for the last twelve months (XML).
    MonthlyTrend,
    /// Visitor cities for the report date (JSON array).
    Cities,
}

impl Endpoint {
    /// All endpoints in fetch order.
    pub const ALL: [Endpoint; 4] = [
        Endpoint::LiveVisits,
        Endpoint::Summary,
        Endpoint::MonthlyTrend,
        Endpoint::Cities,
    ];

    /// Path below the proxy prefix.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::LiveVisits => "visits/last1day",
            Endpoint::Summary => "visits/summary",
            Endpoint::MonthlyTrend => "visits/last12months",
            Endpoint::Cities => "cities",
        }
    }

    /// Whether the request is parameterized by the report date.
    pub fn takes_date(&self) -> bool {
        !matches!(self, Endpoint::MonthlyTrend)
    }

    /// Returns the display label for this endpoint.
    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::LiveVisits => "live visits",
            Endpoint::Summary => "summary",
            Endpoint::MonthlyTrend => "monthly trend",
            Endpoint::Cities => "cities",
        }
    }
}

/// A fully-resolved request against the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub endpoint: Endpoint,
    /// Absolute path, e.g. `/matomo/visits/summary`.
    pub path: String,
    /// Report date (`YYYY-MM-DD`) for dated endpoints.
    pub date: Option<String>,
}

impl RequestDescriptor {
    /// Build the descriptor for one endpoint.
    pub fn for_endpoint(prefix: &str, endpoint: Endpoint, date: &str) -> Self {
        let prefix = prefix.trim_end_matches('/');
        Self {
            endpoint,
            path: format!("{}/{}", prefix, endpoint.path()),
            date: endpoint.takes_date().then(|| date.to_string()),
        }
    }

    /// Query parameters to attach to the request.
    pub fn query(&self) -> Vec<(&'static str, &str)> {
        self.date.as_deref().map(|d| ("date", d)).into_iter().collect()
    }

    /// Path plus query string, for logging.
    pub fn target(&self) -> String {
        match &self.date {
            Some(date) => format!("{}?date={}", self.path, date),
            None => self.path.clone(),
        }
    }
}

/// Build the four request descriptors for one mount.
pub fn build_requests(prefix: &str, date: &str) -> [RequestDescriptor; 4] {
    Endpoint::ALL.map(|endpoint| RequestDescriptor::for_endpoint(prefix, endpoint, date))
}
