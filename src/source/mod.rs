//! Access to the analytics proxy.
//!
//! This module provides a trait-based abstraction over where dashboard
//! payloads come from: the same-origin proxy over HTTP, or a directory of
//! captured payloads for offline use.

mod endpoint;
mod fixture;
mod http;

#[cfg(test)]
pub(crate) mod stub;

pub use endpoint::{build_requests, Endpoint, RequestDescriptor, DEFAULT_PREFIX};
pub use fixture::FixtureSource;
pub use http::{HttpSource, HttpSourceBuilder};

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::FetchError;

/// Trait for fetching raw dashboard payloads.
///
/// Implementations return the response body as text; decoding is left to
/// the caller so that every source shares the same normalization rules.
///
/// # Example
///
/// ```no_run
/// use visitwatch::{build_requests, AnalyticsSource, HttpSource};
///
/// # tokio_test::block_on(async {
/// let source = HttpSource::builder().base_url("http://localhost:3000").build().unwrap();
/// let [live, ..] = build_requests("/matomo", "2024-02-29");
/// let body = source.fetch(&live).await.unwrap();
/// println!("{}", body);
/// # });
/// ```
#[async_trait]
pub trait AnalyticsSource: Send + Sync + Debug {
    /// Fetch the body for one request.
    async fn fetch(&self, request: &RequestDescriptor) -> Result<String, FetchError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}
