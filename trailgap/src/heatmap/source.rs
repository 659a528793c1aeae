//! Cache-backed heatmap tile source.

use tracing::{debug, warn};

use crate::cache::{CacheLookup, TileCache};
use crate::coord::TileCoord;
use crate::provider::{HttpClient, ProviderError};
use crate::raster::Raster;

/// Default heatmap tile server.
pub const DEFAULT_HEATMAP_URL: &str = "https://strava-heatmap.tiles.freemap.sk";

/// Outcome of fetching one heatmap tile.
#[derive(Debug)]
pub enum TileFetch {
    /// The tile exists and decoded to a raster.
    Present(Raster),
    /// The server reports that the tile does not exist (now or previously).
    ConfirmedAbsent,
    /// A transient failure; nothing was cached, a later run may retry.
    Unavailable(ProviderError),
    /// The payload exists but is not a usable image.
    Corrupt(String),
}

/// Supplies heatmap rasters by activity and tile coordinate.
pub trait TileSource {
    fn fetch(&self, activity: &str, tile: TileCoord) -> TileFetch;
}

/// Heatmap tile source backed by an HTTP client and a durable cache.
pub struct HeatmapSource<C: HttpClient, K: TileCache> {
    http_client: C,
    cache: K,
    base_url: String,
}

impl<C: HttpClient, K: TileCache> HeatmapSource<C, K> {
    /// Creates a tile source.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for tile downloads
    /// * `cache` - Durable cache consulted before any download
    /// * `base_url` - Tile server root, without trailing slash
    pub fn new(http_client: C, cache: K, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            cache,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Builds the tile URL for the given coordinates.
    fn build_url(&self, activity: &str, tile: TileCoord) -> String {
        format!(
            "{}/{}/hot/{}/{}/{}.png",
            self.base_url, activity, tile.zoom, tile.x, tile.y
        )
    }

    /// Returns the encoded payload, consulting the cache first.
    fn fetch_bytes(&self, activity: &str, tile: TileCoord) -> Result<Option<Vec<u8>>, ProviderError> {
        match self.cache.get(activity, tile) {
            Ok(CacheLookup::Hit(data)) => return Ok(Some(data)),
            Ok(CacheLookup::Absent) => {
                debug!(%tile, activity, "Empty tile in cache");
                return Ok(None);
            }
            Ok(CacheLookup::Miss) => {}
            Err(e) => warn!(%tile, error = %e, "Tile cache unreadable, downloading"),
        }

        let url = self.build_url(activity, tile);
        debug!(%url, "Downloading heatmap tile");

        match self.http_client.get(&url) {
            Ok(data) if data.is_empty() => {
                // An empty 200 would alias the absence marker; treat as transient.
                Err(ProviderError::HttpError(format!("empty body from {}", url)))
            }
            Ok(data) => {
                if let Err(e) = self.cache.put(activity, tile, &data) {
                    warn!(%tile, error = %e, "Failed to cache heatmap tile");
                }
                Ok(Some(data))
            }
            Err(e) if e.is_not_found() => {
                debug!(%url, "Heatmap tile not found");
                if let Err(e) = self.cache.put_absent(activity, tile) {
                    warn!(%tile, error = %e, "Failed to cache tile absence");
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl<C: HttpClient, K: TileCache> TileSource for HeatmapSource<C, K> {
    fn fetch(&self, activity: &str, tile: TileCoord) -> TileFetch {
        let data = match self.fetch_bytes(activity, tile) {
            Ok(Some(data)) => data,
            Ok(None) => return TileFetch::ConfirmedAbsent,
            Err(e) => {
                warn!(%tile, error = %e, "Heatmap tile unavailable");
                return TileFetch::Unavailable(e);
            }
        };

        match Raster::decode(&data) {
            Ok(raster) => TileFetch::Present(raster),
            Err(e) => {
                warn!(%tile, error = %e, "Invalid heatmap tile");
                TileFetch::Corrupt(e.to_string())
            }
        }
    }
}
