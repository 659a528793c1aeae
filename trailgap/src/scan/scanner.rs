//! Tile scanner.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::stats::ScanStats;
use crate::area::{AreaFilter, TilePlan};
use crate::config::ScanConfig;
use crate::coord::{GeoBBox, TileCoord};
use crate::error::ScanError;
use crate::heatmap::{TileFetch, TileSource};
use crate::hotspot::{extract_hotspots, Hotspot};
use crate::ledger::{Deduplicator, Ledger};
use crate::osm::FeatureSource;
use crate::output::{OutputRecord, RecordSink};
use crate::overlay::suppress;

/// Runs the detection pipeline over tiles.
///
/// Owns its collaborators; the sink can be recovered with
/// [`into_sink`](Self::into_sink) once the run is over.
pub struct TileScanner<T, F, L, S>
where
    T: TileSource,
    F: FeatureSource,
    L: Ledger,
    S: RecordSink,
{
    tiles: T,
    features: F,
    dedup: Deduplicator<L>,
    sink: S,
    config: ScanConfig,
    debug_dir: Option<PathBuf>,
    stats: ScanStats,
}

impl<T, F, L, S> TileScanner<T, F, L, S>
where
    T: TileSource,
    F: FeatureSource,
    L: Ledger,
    S: RecordSink,
{
    pub fn new(tiles: T, features: F, dedup: Deduplicator<L>, sink: S, config: ScanConfig) -> Self {
        Self {
            tiles,
            features,
            dedup,
            sink,
            config,
            debug_dir: None,
            stats: ScanStats::default(),
        }
    }

    /// Writes each tile's suppressed raster to `dir` as
    /// `mask_{zoom}_{x}_{y}.png`.
    pub fn with_debug_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = Some(dir.into());
        self
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Visits every tile of `plan` in order.
    ///
    /// `on_column` is called after each tile column with the number of
    /// columns done and the total.
    pub fn run<P>(&mut self, plan: &TilePlan, mut on_column: P) -> Result<ScanStats, ScanError>
    where
        P: FnMut(usize, usize),
    {
        let area = plan.area_of_interest().map(|a| a as &dyn AreaFilter);
        let columns = plan.columns();
        let total = columns.len();
        info!(columns = total, "Scanning tiles");

        for (done, column) in columns.into_iter().enumerate() {
            for tile in column {
                self.process_tile(tile, area)?;
            }
            on_column(done + 1, total);
        }

        info!("Scan complete: {}", self.stats);
        Ok(self.stats)
    }

    /// Scans one tile.
    ///
    /// Returns an error only for conditions that make the whole run
    /// untrustworthy; a tile that cannot be fetched is logged and skipped.
    pub fn process_tile(
        &mut self,
        tile: TileCoord,
        area: Option<&dyn AreaFilter>,
    ) -> Result<(), ScanError> {
        if let Some(area) = area {
            if !area.contains_tile(&tile) {
                debug!(%tile, "Tile outside area");
                self.stats.tiles_outside_area += 1;
                return Ok(());
            }
        }
        self.stats.tiles_visited += 1;

        let mut raster = match self.tiles.fetch(&self.config.activity, tile) {
            TileFetch::Present(raster) => raster,
            TileFetch::ConfirmedAbsent => {
                self.stats.tiles_absent += 1;
                return Ok(());
            }
            TileFetch::Unavailable(_) => {
                self.stats.tiles_unavailable += 1;
                return Ok(());
            }
            TileFetch::Corrupt(_) => {
                self.stats.tiles_corrupt += 1;
                return Ok(());
            }
        };

        let bbox = tile.merc_bbox();
        let pixel_size = bbox.height() / raster.width() as f64;
        let query_bbox = GeoBBox::from(bbox.expand(self.config.distance));
        let features = self.features.query(&query_bbox)?;
        debug!(%tile, pixel_size, features = features.len(), "Features loaded");

        suppress(
            &mut raster,
            &features,
            &bbox,
            self.config.distance,
            pixel_size,
        );

        if let Some(dir) = &self.debug_dir {
            let path = dir.join(format!("mask_{}_{}_{}.png", tile.zoom, tile.x, tile.y));
            if let Err(e) = raster.save_png(&path) {
                warn!(%tile, error = %e, "Failed to write debug mask");
            }
        }

        let mut drain = extract_hotspots(&mut raster, tile, &self.config);
        let hotspots: Vec<Hotspot> = drain.by_ref().collect();
        debug!(%tile, found = hotspots.len(), discarded = drain.discarded(), "Tile drained");

        for hotspot in hotspots {
            self.report(&hotspot, pixel_size)?;
        }
        Ok(())
    }

    fn report(&mut self, hotspot: &Hotspot, pixel_size: f64) -> Result<(), ScanError> {
        let record = OutputRecord::from_hotspot(hotspot, pixel_size, &self.config);
        self.stats.hotspots_found += 1;
        info!(
            id = %record.id,
            peak = hotspot.peak,
            size = hotspot.size,
            "{}",
            record.osm_url(hotspot.tile.zoom)
        );

        let disposition = self.dedup.classify(&record.id)?;
        if disposition.is_rediscovered() {
            self.stats.hotspots_rediscovered += 1;
        }
        if !disposition.should_emit() {
            debug!(id = %record.id, ?disposition, "Hotspot dismissed in ledger");
            self.stats.hotspots_suppressed += 1;
            return Ok(());
        }

        self.sink.emit(&record)?;
        self.stats.records_emitted += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::ledger::{LedgerEntry, MemoryLedger, TaskStatus};
    use crate::osm::{Feature, OverpassError};
    use crate::provider::ProviderError;
    use crate::raster::Raster;

    const TILE: TileCoord = TileCoord {
        x: 17940,
        y: 11371,
        zoom: 15,
    };

    /// Serves one synthetic tile with a bright 6x6 block; everything else is
    /// absent.
    struct OneTile {
        kind: &'static str,
    }

    impl TileSource for OneTile {
        fn fetch(&self, _activity: &str, tile: TileCoord) -> TileFetch {
            if tile != TILE {
                return TileFetch::ConfirmedAbsent;
            }
            match self.kind {
                "unavailable" => TileFetch::Unavailable(ProviderError::HttpError("down".into())),
                "corrupt" => TileFetch::Corrupt("bad png".into()),
                _ => {
                    let mut raster = Raster::new(64);
                    raster.fill_rect(10, 10, 6, 6, 200);
                    TileFetch::Present(raster)
                }
            }
        }
    }

    #[derive(Default)]
    struct NoFeatures {
        queries: Cell<usize>,
        last: Cell<Option<GeoBBox>>,
    }

    impl FeatureSource for NoFeatures {
        fn query(&self, bbox: &GeoBBox) -> Result<Vec<Feature>, OverpassError> {
            self.queries.set(self.queries.get() + 1);
            self.last.set(Some(*bbox));
            Ok(Vec::new())
        }
    }

    struct FailingFeatures;

    impl FeatureSource for FailingFeatures {
        fn query(&self, _bbox: &GeoBBox) -> Result<Vec<Feature>, OverpassError> {
            Err(OverpassError::Exhausted {
                attempts: 10,
                last: "timeout".into(),
            })
        }
    }

    fn scanner<F: FeatureSource>(
        kind: &'static str,
        features: F,
        ledger: Option<MemoryLedger>,
    ) -> TileScanner<OneTile, F, MemoryLedger, Vec<OutputRecord>> {
        let dedup = match ledger {
            Some(ledger) => Deduplicator::new(ledger),
            None => Deduplicator::disabled(),
        };
        TileScanner::new(
            OneTile { kind },
            features,
            dedup,
            Vec::new(),
            ScanConfig::default(),
        )
    }

    #[test]
    fn test_tile_with_hotspot_emits_record() {
        let mut scanner = scanner("present", NoFeatures::default(), None);
        scanner.process_tile(TILE, None).unwrap();

        let stats = scanner.stats();
        assert_eq!(stats.tiles_visited, 1);
        assert_eq!(stats.hotspots_found, 1);
        assert_eq!(stats.records_emitted, 1);

        let records = scanner.into_sink();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "15/17940/11371/10/10");
        assert_eq!(records[0].properties.maximum, 200);
    }

    #[test]
    fn test_query_box_is_expanded_by_distance() {
        let mut scanner = scanner("present", NoFeatures::default(), None);
        scanner.process_tile(TILE, None).unwrap();

        let tile_box = TILE.geo_bbox();
        let query_box = scanner.features.last.get().unwrap();
        assert!(query_box.north > tile_box.north);
        assert!(query_box.south < tile_box.south);
        assert!(query_box.west < tile_box.west);
        assert!(query_box.east > tile_box.east);
    }

    #[test]
    fn test_skipped_tiles_are_counted_not_errors() {
        let mut unavailable = scanner("unavailable", NoFeatures::default(), None);
        unavailable.process_tile(TILE, None).unwrap();
        assert_eq!(unavailable.stats().tiles_unavailable, 1);
        assert_eq!(unavailable.features.queries.get(), 0);

        let mut corrupt = scanner("corrupt", NoFeatures::default(), None);
        corrupt.process_tile(TILE, None).unwrap();
        assert_eq!(corrupt.stats().tiles_corrupt, 1);
        assert!(corrupt.into_sink().is_empty());

        let mut absent = scanner("present", NoFeatures::default(), None);
        absent.process_tile(TileCoord::new(1, 1, 15), None).unwrap();
        assert_eq!(absent.stats().tiles_absent, 1);
    }

    #[test]
    fn test_feature_source_failure_is_fatal() {
        let mut scanner = scanner("present", FailingFeatures, None);
        assert!(matches!(
            scanner.process_tile(TILE, None),
            Err(ScanError::Overpass(_))
        ));
    }

    #[test]
    fn test_dismissed_hotspot_not_emitted() {
        let ledger = MemoryLedger::new().with_entry(LedgerEntry::new(
            "15/17940/11371/10/10",
            TaskStatus::NotAnIssue,
            "alice",
            "",
        ));
        let mut scanner = scanner("present", NoFeatures::default(), Some(ledger));
        scanner.process_tile(TILE, None).unwrap();

        assert_eq!(scanner.stats().hotspots_suppressed, 1);
        assert!(scanner.into_sink().is_empty());
    }

    #[test]
    fn test_fixed_hotspot_still_emitted() {
        let ledger = MemoryLedger::new().with_entry(LedgerEntry::new(
            "15/17940/11371/10/10",
            TaskStatus::Fixed,
            "bob",
            "https://example.org/task/1",
        ));
        let mut scanner = scanner("present", NoFeatures::default(), Some(ledger));
        scanner.process_tile(TILE, None).unwrap();

        assert_eq!(scanner.stats().hotspots_rediscovered, 1);
        assert_eq!(scanner.into_sink().len(), 1);
    }

    #[test]
    fn test_area_filter_skips_before_fetch() {
        struct Nowhere;
        impl AreaFilter for Nowhere {
            fn intersects_area(&self, _tile: &geo::Polygon<f64>) -> bool {
                false
            }
        }

        let mut scanner = scanner("present", NoFeatures::default(), None);
        scanner.process_tile(TILE, Some(&Nowhere)).unwrap();

        assert_eq!(scanner.stats().tiles_outside_area, 1);
        assert_eq!(scanner.stats().tiles_visited, 0);
        assert_eq!(scanner.features.queries.get(), 0);
    }

    #[test]
    fn test_debug_mask_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut scanner = scanner("present", NoFeatures::default(), None).with_debug_dir(dir.path());
        scanner.process_tile(TILE, None).unwrap();

        let mask = dir.path().join("mask_15_17940_11371.png");
        let bytes = std::fs::read(mask).unwrap();
        let raster = Raster::decode(&bytes).unwrap();
        assert_eq!(raster.width(), 64);
        assert_eq!(raster.count_at_least(200), 36, "dumped before the drain");
    }

    #[test]
    fn test_run_reports_columns() {
        let mut scanner = scanner("present", NoFeatures::default(), None);
        let mut calls = Vec::new();
        let stats = scanner
            .run(&TilePlan::single(TILE), |done, total| calls.push((done, total)))
            .unwrap();

        assert_eq!(calls, vec![(1, 1)]);
        assert_eq!(stats.records_emitted, 1);
    }
}
