//! Durable tile cache.
//!
//! Heatmap tiles are cached per `(activity, zoom, x, y)`. A zero-length
//! entry records that the server answered "not found", which is distinct
//! from a key that was never fetched.
//!
//! - [`DiskTileCache`]: files under `<root>/<activity>/<zoom>/<x>/<y>.png`
//! - [`MemoryTileCache`]: process-local map, used when caching is disabled
//!   and in tests

mod disk;
mod memory;
mod traits;

pub use disk::DiskTileCache;
pub use memory::MemoryTileCache;
pub use traits::{CacheError, CacheLookup, TileCache};
