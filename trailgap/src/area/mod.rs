//! Area of interest and tile enumeration.
//!
//! An area run visits every tile of the area's bounding box at the scan zoom,
//! column by column, skipping tiles that do not touch the area polygon. The
//! tile set can be split four ways with [`Partition`] so independent
//! processes cover disjoint tiles.

mod geojson;
mod tiles;

pub use geojson::{AreaError, AreaFilter, AreaOfInterest};
pub use tiles::{Partition, TilePlan, TileRange};
