//! Heatmap tile retrieval.
//!
//! # URL Pattern
//!
//! `{base}/{activity}/hot/{zoom}/{x}/{y}.png`
//!
//! Tiles are grayscale PNGs whose brightness is proportional to GPS
//! activity density. A 404 means "no activity recorded here" and is cached
//! like any other answer.

mod source;

pub use source::{HeatmapSource, TileFetch, TileSource, DEFAULT_HEATMAP_URL};
