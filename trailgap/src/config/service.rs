//! Remote service and cache settings.

use std::path::PathBuf;
use std::time::Duration;

use crate::heatmap::DEFAULT_HEATMAP_URL;
use crate::osm::DEFAULT_OVERPASS_URL;

/// Default on-disk heatmap tile cache.
pub const DEFAULT_CACHE_DIR: &str = "/var/cache/strava";

/// Endpoints, cache location and network behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Heatmap tile server root.
    pub heatmap_url: String,

    /// Overpass API interpreter endpoint.
    pub overpass_url: String,

    /// Heatmap tile cache root.
    pub cache_dir: PathBuf,

    /// HTTP request timeout.
    pub http_timeout: Duration,

    /// Attempts per Overpass query before the run is aborted.
    pub overpass_attempts: u32,

    /// Delay between Overpass attempts.
    pub overpass_retry_delay: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            heatmap_url: DEFAULT_HEATMAP_URL.to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            http_timeout: Duration::from_secs(30),
            overpass_attempts: 10,
            overpass_retry_delay: Duration::from_secs(5),
        }
    }
}

impl ServiceConfig {
    /// Set the cache directory.
    pub fn with_cache_dir(mut self, path: PathBuf) -> Self {
        self.cache_dir = path;
        self
    }

    /// Set the heatmap server root.
    pub fn with_heatmap_url(mut self, url: impl Into<String>) -> Self {
        self.heatmap_url = url.into();
        self
    }

    /// Set the Overpass endpoint.
    pub fn with_overpass_url(mut self, url: impl Into<String>) -> Self {
        self.overpass_url = url.into();
        self
    }

    /// Set the HTTP timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Set the Overpass retry policy.
    pub fn with_overpass_retries(mut self, attempts: u32, delay: Duration) -> Self {
        self.overpass_attempts = attempts;
        self.overpass_retry_delay = delay;
        self
    }
}
