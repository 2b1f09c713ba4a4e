//! Fixture-based data source.
//!
//! Reads captured proxy payloads from a directory, one file per endpoint.
//! Useful for demos and for working offline against a known data set.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{AnalyticsSource, Endpoint, RequestDescriptor};
use crate::error::FetchError;

/// A data source that serves payloads from files.
///
/// The report date is ignored; each endpoint always maps to the same file:
///
/// | Endpoint       | File                |
/// |----------------|---------------------|
/// | live visits    | `live.json`         |
/// | summary        | `summary.json`      |
/// | monthly trend  | `last12months.xml`  |
/// | cities         | `cities.json`       |
#[derive(Debug)]
pub struct FixtureSource {
    dir: PathBuf,
    description: String,
}

impl FixtureSource {
    /// Create a new fixture source for the given directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let description = format!("fixtures: {}", dir.display());
        Self { dir, description }
    }

    /// File backing an endpoint.
    pub fn file_for(&self, endpoint: Endpoint) -> PathBuf {
        let name = match endpoint {
            Endpoint::LiveVisits => "live.json",
            Endpoint::Summary => "summary.json",
            Endpoint::MonthlyTrend => "last12months.xml",
            Endpoint::Cities => "cities.json",
        };
        self.dir.join(name)
    }
}

#[async_trait]
impl AnalyticsSource for FixtureSource {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<String, FetchError> {
        let path = self.file_for(request.endpoint);
        Ok(tokio::fs::read_to_string(&path).await?)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
