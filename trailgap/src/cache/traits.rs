//! Core trait for the tile cache.

use std::path::PathBuf;

use thiserror::Error;

use crate::coord::TileCoord;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error while reading or writing an entry.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result of looking a tile up in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// Cached tile payload.
    Hit(Vec<u8>),
    /// The server previously reported this tile as not found.
    Absent,
    /// Never fetched.
    Miss,
}

/// Tile cache keyed by activity and tile coordinate.
///
/// Entries are append-only: once a key is stored it is never rewritten by
/// the scanner, so concurrent runs can at worst fetch the same tile twice.
pub trait TileCache: Send + Sync {
    /// Looks up a tile.
    fn get(&self, activity: &str, tile: TileCoord) -> Result<CacheLookup, CacheError>;

    /// Stores a tile payload. An empty payload records a confirmed absence.
    fn put(&self, activity: &str, tile: TileCoord, data: &[u8]) -> Result<(), CacheError>;

    /// Records that the server has no such tile.
    fn put_absent(&self, activity: &str, tile: TileCoord) -> Result<(), CacheError> {
        self.put(activity, tile, &[])
    }
}

pub(crate) fn lookup_from_bytes(data: Vec<u8>) -> CacheLookup {
    if data.is_empty() {
        CacheLookup::Absent
    } else {
        CacheLookup::Hit(data)
    }
}
