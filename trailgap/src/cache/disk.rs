//! On-disk tile cache.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::traits::{lookup_from_bytes, CacheError, CacheLookup, TileCache};
use crate::coord::TileCoord;

/// Tile cache stored as `<root>/<activity>/<zoom>/<x>/<y>.png`.
///
/// A zero-byte file is the confirmed-absent marker. Entries are written to a
/// temporary sibling and renamed into place, so a concurrent reader never
/// sees a partially written tile.
#[derive(Debug, Clone)]
pub struct DiskTileCache {
    root: PathBuf,
}

impl DiskTileCache {
    /// Creates a cache rooted at `root`. Directories are created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry for `tile`.
    pub fn tile_path(&self, activity: &str, tile: TileCoord) -> PathBuf {
        self.root
            .join(activity)
            .join(tile.zoom.to_string())
            .join(tile.x.to_string())
            .join(format!("{}.png", tile.y))
    }
}

impl TileCache for DiskTileCache {
    fn get(&self, activity: &str, tile: TileCoord) -> Result<CacheLookup, CacheError> {
        let path = self.tile_path(activity, tile);
        match fs::read(&path) {
            Ok(data) => {
                debug!(path = %path.display(), bytes = data.len(), "Tile in cache");
                Ok(lookup_from_bytes(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(CacheLookup::Miss),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }

    fn put(&self, activity: &str, tile: TileCoord, data: &[u8]) -> Result<(), CacheError> {
        let path = self.tile_path(activity, tile);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| CacheError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp = path.with_extension(format!("png.{}.tmp", std::process::id()));
        fs::write(&tmp, data).map_err(|source| CacheError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), bytes = data.len(), "Tile cached");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_path_layout() {
        let cache = DiskTileCache::new("/var/cache/strava");
        let path = cache.tile_path("run", TileCoord::new(17940, 11371, 15));
        assert_eq!(path, PathBuf::from("/var/cache/strava/run/15/17940/11371.png"));
    }

    #[test]
    fn test_miss_on_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskTileCache::new(dir.path());

        let lookup = cache.get("run", TileCoord::new(1, 2, 3)).unwrap();
        assert_eq!(lookup, CacheLookup::Miss);
    }

    #[test]
    fn test_put_then_hit() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskTileCache::new(dir.path());
        let tile = TileCoord::new(1, 2, 3);

        cache.put("run", tile, &[0x89, 0x50, 0x4E, 0x47]).unwrap();

        assert_eq!(
            cache.get("run", tile).unwrap(),
            CacheLookup::Hit(vec![0x89, 0x50, 0x4E, 0x47])
        );
        assert!(dir.path().join("run/3/1/2.png").is_file());
    }

    #[test]
    fn test_zero_length_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskTileCache::new(dir.path());
        let tile = TileCoord::new(4, 5, 6);

        cache.put_absent("ride", tile).unwrap();

        assert_eq!(cache.get("ride", tile).unwrap(), CacheLookup::Absent);
        let meta = fs::metadata(cache.tile_path("ride", tile)).unwrap();
        assert_eq!(meta.len(), 0);
    }

    #[test]
    fn test_no_temporary_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskTileCache::new(dir.path());
        cache.put("run", TileCoord::new(1, 2, 3), &[1]).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path().join("run/3/1"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["2.png".to_string()]);
    }
}
