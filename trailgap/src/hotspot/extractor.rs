//! Brightest-first hotspot drain.

use std::fmt;

use tracing::trace;

use super::region::{erase_component, measure_region};
use crate::config::ScanConfig;
use crate::coord::{PixelPoint, TileCoord};
use crate::raster::Raster;

/// A bright connected region reported as a candidate unmapped path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotspot {
    /// Tile the hotspot was found in.
    pub tile: TileCoord,
    /// The brightest pixel of the region.
    pub pixel: PixelPoint,
    /// Measured region size. Measurement stops expanding past `min_size`,
    /// so large regions report only a little over the minimum.
    pub size: usize,
    /// Intensity at `pixel` before erasure.
    pub peak: u8,
}

impl Hotspot {
    /// Stable identifier `zoom/x/y/row/col`.
    ///
    /// Only stable across runs that share zoom, threshold and distance.
    pub fn id(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.tile.zoom, self.tile.x, self.tile.y, self.pixel.row, self.pixel.col
        )
    }
}

impl fmt::Display for Hotspot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (peak {}, size {})", self.id(), self.peak, self.size)
    }
}

/// Iterator draining hotspots from a suppressed raster.
///
/// Created by [`extract_hotspots`]. Each call to `next` runs scan, measure
/// and erase rounds until one region is large enough to report, or the
/// raster holds nothing at or above threshold.
pub struct Hotspots<'a> {
    raster: &'a mut Raster,
    tile: TileCoord,
    threshold: u8,
    min_size: usize,
    discarded: usize,
    done: bool,
}

/// Drains hotspots from `raster`, brightest first.
///
/// The raster is consumed in place: once the iterator is exhausted no pixel
/// at or above the threshold remains.
pub fn extract_hotspots<'a>(
    raster: &'a mut Raster,
    tile: TileCoord,
    config: &ScanConfig,
) -> Hotspots<'a> {
    Hotspots {
        raster,
        tile,
        // A zero threshold would accept the background forever.
        threshold: config.threshold.max(1),
        min_size: config.min_size,
        discarded: 0,
        done: false,
    }
}

impl Hotspots<'_> {
    /// Number of regions measured and erased without being reported.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// One scan-measure-erase round. `None` when the raster is drained.
    fn round(&mut self) -> Option<Option<Hotspot>> {
        let (pixel, peak) = self.raster.brightest()?;
        if peak < self.threshold {
            return None;
        }

        let region = measure_region(self.raster, pixel, self.threshold, self.min_size);

        if region.size > self.min_size {
            let erased = erase_component(self.raster, &region.pixels, peak);
            trace!(row = pixel.row, col = pixel.col, peak, erased, "Component erased");
            Some(Some(Hotspot {
                tile: self.tile,
                pixel,
                size: region.size,
                peak,
            }))
        } else {
            trace!(row = pixel.row, col = pixel.col, peak, size = region.size, "Region too small");
            self.discarded += 1;
            Some(None)
        }
    }
}

impl Iterator for Hotspots<'_> {
    type Item = Hotspot;

    fn next(&mut self) -> Option<Hotspot> {
        while !self.done {
            match self.round() {
                Some(Some(hotspot)) => return Some(hotspot),
                Some(None) => continue,
                None => self.done = true,
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: TileCoord = TileCoord {
        x: 17940,
        y: 11371,
        zoom: 15,
    };

    fn config() -> ScanConfig {
        ScanConfig::default().with_threshold(100).with_min_size(20)
    }

    #[test]
    fn test_hotspot_id() {
        let hotspot = Hotspot {
            tile: TILE,
            pixel: PixelPoint::new(12, 300),
            size: 21,
            peak: 180,
        };
        assert_eq!(hotspot.id(), "15/17940/11371/12/300");
    }

    #[test]
    fn test_single_block_reported_and_erased() {
        let mut raster = Raster::new(64);
        raster.fill_rect(20, 30, 5, 5, 200);

        let hotspots: Vec<Hotspot> = extract_hotspots(&mut raster, TILE, &config()).collect();

        assert_eq!(hotspots.len(), 1);
        let hotspot = hotspots[0];
        assert_eq!(hotspot.peak, 200);
        assert_eq!(hotspot.size, 25);
        assert!((20..25).contains(&hotspot.pixel.row));
        assert!((30..35).contains(&hotspot.pixel.col));
        assert!(raster.is_blank());
    }

    #[test]
    fn test_small_block_consumed_silently() {
        let mut raster = Raster::new(64);
        // 2 x 5 = 10 pixels, slightly brighter so it is scanned first.
        raster.fill_rect(2, 2, 2, 5, 220);
        // 5 x 6 = 30 pixels.
        raster.fill_rect(30, 30, 5, 6, 200);

        let mut drain = extract_hotspots(&mut raster, TILE, &config());
        let hotspots: Vec<Hotspot> = drain.by_ref().collect();
        let discarded = drain.discarded();

        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0].peak, 200);
        assert!((30..35).contains(&hotspots[0].pixel.row));
        assert_eq!(discarded, 1);
        assert!(raster.is_blank());
    }

    #[test]
    fn test_dim_region_below_threshold_survives() {
        let mut raster = Raster::new(32);
        raster.fill_rect(0, 0, 10, 10, 99);

        let count = extract_hotspots(&mut raster, TILE, &config()).count();

        assert_eq!(count, 0);
        assert_eq!(raster.count_at_least(99), 100);
    }

    #[test]
    fn test_peaks_are_non_increasing() {
        let mut raster = Raster::new(64);
        raster.fill_rect(0, 0, 6, 6, 150);
        raster.fill_rect(20, 20, 6, 6, 250);
        raster.fill_rect(40, 40, 6, 6, 200);

        let peaks: Vec<u8> = extract_hotspots(&mut raster, TILE, &config())
            .map(|h| h.peak)
            .collect();

        assert_eq!(peaks, vec![250, 200, 150]);
    }

    #[test]
    fn test_graded_trace_reported_once() {
        let mut raster = Raster::new(64);
        // A 3 px wide trace: bright core, dimmer flanks on both sides.
        raster.fill_rect(9, 0, 1, 64, 150);
        raster.fill_rect(10, 0, 1, 64, 200);
        raster.fill_rect(11, 0, 1, 64, 150);

        let hotspots: Vec<Hotspot> = extract_hotspots(&mut raster, TILE, &config()).collect();

        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0].pixel, PixelPoint::new(10, 0));
        assert_eq!(hotspots[0].peak, 200);
        assert!(raster.is_blank());
    }

    #[test]
    fn test_small_region_leaves_neighbours_alone() {
        let mut raster = Raster::new(32);
        // 4 bright pixels joined by faint haze to a dimmer 30 px block.
        raster.fill_rect(0, 0, 1, 4, 250);
        raster.fill_rect(1, 0, 5, 1, 20);
        raster.fill_rect(6, 0, 5, 6, 180);

        let hotspots: Vec<Hotspot> = extract_hotspots(&mut raster, TILE, &config()).collect();

        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0].peak, 180);
        assert_eq!(hotspots[0].pixel, PixelPoint::new(6, 0));
    }

    #[test]
    fn test_plateau_erased_beyond_measurement() {
        let mut raster = Raster::new(64);
        // One long bright line, far more than min_size + 1 pixels.
        raster.fill_rect(10, 0, 1, 64, 200);

        let hotspots: Vec<Hotspot> = extract_hotspots(&mut raster, TILE, &config()).collect();

        assert_eq!(hotspots.len(), 1);
        assert!(raster.is_blank());
    }

    #[test]
    fn test_zero_threshold_terminates() {
        let mut raster = Raster::new(16);
        raster.fill_rect(0, 0, 5, 5, 30);
        let config = config().with_threshold(0).with_min_size(3);

        let hotspots: Vec<Hotspot> = extract_hotspots(&mut raster, TILE, &config).collect();

        assert_eq!(hotspots.len(), 1);
        assert!(raster.is_blank());
    }

    #[test]
    fn test_blank_raster_yields_nothing() {
        let mut raster = Raster::new(16);
        assert_eq!(extract_hotspots(&mut raster, TILE, &config()).count(), 0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn drain_leaves_nothing_above_threshold(
                pixels in proptest::collection::vec(any::<u8>(), 24 * 24),
                threshold in 1u8..=255,
                min_size in 0usize..30,
            ) {
                let mut raster = Raster::from_pixels(24, pixels).unwrap();
                let config = ScanConfig::default()
                    .with_threshold(threshold)
                    .with_min_size(min_size);

                let hotspots: Vec<Hotspot> =
                    extract_hotspots(&mut raster, TILE, &config).collect();

                prop_assert_eq!(raster.count_at_least(threshold), 0);
                for pair in hotspots.windows(2) {
                    prop_assert!(pair[0].peak >= pair[1].peak);
                }
                for hotspot in &hotspots {
                    prop_assert!(hotspot.size > min_size);
                }
            }
        }
    }
}
