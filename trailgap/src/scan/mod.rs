//! The per-tile detection pipeline.
//!
//! For each tile: area test, heatmap fetch, feature query around the tile,
//! suppression, hotspot drain, ledger triage and emission.

mod scanner;
mod stats;

pub use scanner::TileScanner;
pub use stats::ScanStats;
