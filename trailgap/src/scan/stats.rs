//! Run counters.

use std::fmt;

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Tiles inside the area that were fetched.
    pub tiles_visited: usize,
    /// Tiles of the bounding range skipped by the area test.
    pub tiles_outside_area: usize,
    /// Tiles the heatmap server does not have.
    pub tiles_absent: usize,
    /// Tiles skipped after a transient fetch failure.
    pub tiles_unavailable: usize,
    /// Tiles whose payload was not a usable image.
    pub tiles_corrupt: usize,
    /// Hotspots large enough to report, before triage.
    pub hotspots_found: usize,
    /// Hotspots dropped by the ledger.
    pub hotspots_suppressed: usize,
    /// Hotspots marked fixed in the ledger but detected again.
    pub hotspots_rediscovered: usize,
    pub records_emitted: usize,
}

impl fmt::Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tiles scanned ({} outside area, {} absent, {} unavailable, {} corrupt), \
             {} hotspots ({} suppressed, {} rediscovered), {} records",
            self.tiles_visited,
            self.tiles_outside_area,
            self.tiles_absent,
            self.tiles_unavailable,
            self.tiles_corrupt,
            self.hotspots_found,
            self.hotspots_suppressed,
            self.hotspots_rediscovered,
            self.records_emitted
        )
    }
}
