//! Layered configuration.
//!
//! Sources, later ones winning: built-in defaults, an optional config file
//! (format from its extension), then `VISITWATCH_*` environment variables.
//! Command-line flags are applied on top by the binary.
//!
//! ```toml
//! base_url = "https://example.org"
//! proxy_prefix = "/matomo"
//! timeout_secs = 10
//! canonical_www = true
//! log_file = "visitwatch.log"
//! log_level = "info"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::navigation::{self, NavigationPolicy};
use crate::source::DEFAULT_PREFIX;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "VISITWATCH";

/// Runtime settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Origin of the analytics proxy.
    pub base_url: String,
    /// Path prefix the proxy serves analytics under.
    pub proxy_prefix: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Rewrite bare hostnames in `base_url` to their `www.` form.
    pub canonical_www: bool,
    /// Where log output goes (the terminal belongs to the UI).
    pub log_file: PathBuf,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Settings {
    /// Load settings from defaults, an optional file, and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("base_url", "http://localhost:3000")?
            .set_default("proxy_prefix", DEFAULT_PREFIX)?
            .set_default("timeout_secs", 10i64)?
            .set_default("canonical_www", false)?
            .set_default("log_file", "visitwatch.log")?
            .set_default("log_level", "info")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// The navigation policy to inject into the HTTP source.
    pub fn navigation_policy(&self) -> NavigationPolicy {
        if self.canonical_www {
            navigation::www_redirect
        } else {
            navigation::no_redirect
        }
    }
}
