//! In-memory tile cache.

use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::{lookup_from_bytes, CacheError, CacheLookup, TileCache};
use crate::coord::TileCoord;

/// Process-local tile cache.
#[derive(Debug, Default)]
pub struct MemoryTileCache {
    entries: Mutex<HashMap<(String, TileCoord), Vec<u8>>>,
}

impl MemoryTileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including absence markers.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TileCache for MemoryTileCache {
    fn get(&self, activity: &str, tile: TileCoord) -> Result<CacheLookup, CacheError> {
        let entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(entries
            .get(&(activity.to_string(), tile))
            .cloned()
            .map(lookup_from_bytes)
            .unwrap_or(CacheLookup::Miss))
    }

    fn put(&self, activity: &str, tile: TileCoord, data: &[u8]) -> Result<(), CacheError> {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert((activity.to_string(), tile), data.to_vec());
        Ok(())
    }
}
