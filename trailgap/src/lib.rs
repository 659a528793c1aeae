//! Trailgap - find heatmap activity that is missing from OpenStreetMap
//!
//! Each heatmap tile is masked with every mapped path around it, widened by
//! a tolerance distance. Bright regions that survive the mask are reported
//! as candidate unmapped paths, one GeoJSON record each, after filtering out
//! candidates reviewers have already dismissed.
//!
//! The pipeline lives in [`scan::TileScanner`]; its collaborators are traits
//! ([`heatmap::TileSource`], [`osm::FeatureSource`], [`ledger::Ledger`],
//! [`output::RecordSink`]) so every stage can be exercised offline.

pub mod area;
pub mod cache;
pub mod config;
pub mod coord;
pub mod error;
pub mod heatmap;
pub mod hotspot;
pub mod ledger;
pub mod logging;
pub mod osm;
pub mod output;
pub mod overlay;
pub mod provider;
pub mod raster;
pub mod scan;

pub use error::ScanError;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
