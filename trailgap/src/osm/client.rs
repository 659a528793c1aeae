//! Overpass API client with bounded retries.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use super::feature::Feature;
use super::query::build_query;
use super::response::OverpassResponse;
use crate::coord::GeoBBox;
use crate::provider::HttpClient;

/// Default public Overpass endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Errors from the feature source.
#[derive(Debug, Error)]
pub enum OverpassError {
    /// Every attempt failed; suppression for the tile cannot be trusted.
    #[error("no usable answer from Overpass server after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },

    /// The endpoint URL could not be combined with the query.
    #[error("invalid Overpass URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Supplies mapped features intersecting a geographic bounding box.
pub trait FeatureSource {
    /// Returns every path-like feature in `bbox`.
    ///
    /// An empty vector is a legitimate answer. An error is fatal to the run.
    fn query(&self, bbox: &GeoBBox) -> Result<Vec<Feature>, OverpassError>;
}

/// Overpass API feature source.
///
/// A transport error, a non-JSON body, a body without `osm3s` metadata or a
/// runtime-error remark triggers a retry after a fixed delay. After
/// `max_attempts` such failures the query gives up with
/// [`OverpassError::Exhausted`].
pub struct OverpassClient<C: HttpClient> {
    http_client: C,
    url: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl<C: HttpClient> OverpassClient<C> {
    /// Creates a client with 10 attempts spaced 5 seconds apart.
    pub fn new(http_client: C, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
            max_attempts: 10,
            retry_delay: Duration::from_secs(5),
        }
    }

    /// Sets the number of attempts (at least one is always made).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sets the delay between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn build_url(&self, bbox: &GeoBBox) -> Result<String, OverpassError> {
        reqwest::Url::parse_with_params(&self.url, &[("data", build_query(bbox))])
            .map(String::from)
            .map_err(|e| OverpassError::InvalidUrl {
                url: self.url.clone(),
                reason: e.to_string(),
            })
    }

    /// One attempt: `Ok` with features, or the reason to retry.
    fn attempt(&self, url: &str) -> Result<Vec<Feature>, String> {
        let body = self.http_client.get(url).map_err(|e| e.to_string())?;
        let response = OverpassResponse::parse(&body).map_err(|e| format!("malformed response: {}", e))?;
        if let Some(defect) = response.defect() {
            return Err(defect);
        }
        Ok(response.into_features())
    }
}

impl<C: HttpClient> FeatureSource for OverpassClient<C> {
    fn query(&self, bbox: &GeoBBox) -> Result<Vec<Feature>, OverpassError> {
        let url = self.build_url(bbox)?;
        let mut last = String::new();

        for attempt in 1..=self.max_attempts {
            match self.attempt(&url) {
                Ok(features) => {
                    debug!(attempt, features = features.len(), "Overpass query complete");
                    return Ok(features);
                }
                Err(reason) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        reason = %reason,
                        "Overpass query failed"
                    );
                    last = reason;
                    if attempt < self.max_attempts {
                        std::thread::sleep(self.retry_delay);
                    }
                }
            }
        }

        Err(OverpassError::Exhausted {
            attempts: self.max_attempts,
            last,
        })
    }
}
