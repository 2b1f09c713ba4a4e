//! HTTP data source.
//!
//! Talks to the same-origin analytics proxy. Upstream semantics are the
//! proxy's concern; this source only issues GET requests and returns bodies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::{AnalyticsSource, RequestDescriptor};
use crate::error::FetchError;
use crate::navigation::{self, NavigationPolicy};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default proxy origin.
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// A data source that fetches payloads from the proxy over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Url,
    description: String,
}

impl HttpSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> HttpSourceBuilder {
        HttpSourceBuilder::default()
    }

    /// Returns the resolved proxy origin.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, request: &RequestDescriptor) -> Result<Url, FetchError> {
        self.base_url
            .join(&request.path)
            .map_err(|e| FetchError::Http(format!("Invalid request path {}: {}", request.path, e)))
    }
}

#[async_trait]
impl AnalyticsSource for HttpSource {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<String, FetchError> {
        let url = self.url_for(request)?;
        tracing::debug!(endpoint = request.endpoint.label(), %url, "Fetching");

        let response = self.client.get(url).query(&request.query()).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for HttpSource.
#[derive(Debug, Default)]
pub struct HttpSourceBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    navigation_policy: Option<NavigationPolicy>,
}

impl HttpSourceBuilder {
    /// Set the proxy origin (e.g., "https://example.org").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the policy applied to the base URL (default: no redirect).
    pub fn navigation_policy(mut self, policy: NavigationPolicy) -> Self {
        self.navigation_policy = Some(policy);
        self
    }

    /// Build the source.
    pub fn build(self) -> Result<HttpSource, FetchError> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let raw = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw)
            .map_err(|e| FetchError::Http(format!("Invalid base URL {}: {}", raw, e)))?;
        let base_url = navigation::resolve(
            base_url,
            self.navigation_policy.unwrap_or(navigation::no_redirect),
        );

        let client = Client::builder().timeout(timeout).build()?;

        Ok(HttpSource {
            client,
            description: format!("proxy: {}", base_url),
            base_url,
        })
    }
}
