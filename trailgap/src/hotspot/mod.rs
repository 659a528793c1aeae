//! Hotspot extraction.
//!
//! After suppression, whatever bright pixels remain in a tile are candidate
//! unmapped paths. [`Hotspots`] drains them brightest-first:
//!
//! 1. find the brightest remaining pixel; stop when it is below threshold
//! 2. measure its 4-connected region at or above threshold, expanding no
//!    further once more than `min_size` pixels are visited, and zero each
//!    visited pixel
//! 3. report the pixel if the measured size exceeds `min_size`
//! 4. after a report, erase the whole component: every connected pixel
//!    within `peak - 1` of the peak
//!
//! Every round zeroes at least the seed pixel, so the loop terminates, and
//! the peak intensity across rounds never increases.

mod extractor;
mod region;

pub use extractor::{extract_hotspots, Hotspot, Hotspots};
pub use region::{erase_component, measure_region, Region};
