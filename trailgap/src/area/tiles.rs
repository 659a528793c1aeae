//! Tile enumeration.

use super::geojson::{AreaError, AreaOfInterest};
use crate::coord::{to_tile_coords, GeoBBox, TileCoord};

/// A quarter (or all) of a tile range.
///
/// Offsets 0 to 3 select the starting column/row shift `(0,0)`, `(0,1)`,
/// `(1,0)` and `(1,1)` with a stride of 2 on both axes. The four partitions
/// of a range are disjoint and together cover it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    offset_x: u32,
    offset_y: u32,
    stride: u32,
}

impl Partition {
    /// The whole range, stride 1.
    pub fn full() -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            stride: 1,
        }
    }

    /// One of the four stride-2 partitions.
    pub fn from_offset(offset: u8) -> Result<Self, AreaError> {
        let (offset_x, offset_y) = match offset {
            0 => (0, 0),
            1 => (0, 1),
            2 => (1, 0),
            3 => (1, 1),
            other => return Err(AreaError::InvalidOffset(other)),
        };
        Ok(Self {
            offset_x,
            offset_y,
            stride: 2,
        })
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }
}

impl Default for Partition {
    fn default() -> Self {
        Self::full()
    }
}

/// Rectangle of tile indices covering a geographic box at one zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    /// Westmost column.
    pub min_x: u32,
    /// Eastmost column.
    pub max_x: u32,
    /// Northmost row.
    pub min_y: u32,
    /// Southmost row.
    pub max_y: u32,
    pub zoom: u8,
}

impl TileRange {
    /// Tiles touching `bounds` at `zoom`.
    pub fn from_bounds(bounds: &GeoBBox, zoom: u8) -> Self {
        let north_west = to_tile_coords(bounds.north, bounds.west, zoom);
        let south_east = to_tile_coords(bounds.south, bounds.east, zoom);
        Self {
            min_x: north_west.x,
            max_x: south_east.x.max(north_west.x),
            min_y: north_west.y,
            max_y: south_east.y.max(north_west.y),
            zoom,
        }
    }

    /// Total number of tiles in the range.
    pub fn tile_count(&self) -> usize {
        (self.max_x - self.min_x + 1) as usize * (self.max_y - self.min_y + 1) as usize
    }

    /// Tiles of `partition`, grouped by column.
    ///
    /// Columns run west to east; within a column rows run south to north.
    pub fn columns(&self, partition: Partition) -> Vec<Vec<TileCoord>> {
        let step = partition.stride as usize;
        let x_start = self.min_x + partition.offset_x;
        let y_start = self.max_y.checked_sub(partition.offset_y);

        (x_start..=self.max_x)
            .step_by(step)
            .map(|x| match y_start {
                Some(y_start) if y_start >= self.min_y => (self.min_y..=y_start)
                    .rev()
                    .step_by(step)
                    .map(|y| TileCoord::new(x, y, self.zoom))
                    .collect(),
                _ => Vec::new(),
            })
            .collect()
    }
}

/// The tiles a run visits.
#[derive(Debug, Clone)]
pub enum TilePlan {
    /// One explicit tile, no area filtering.
    Single(TileCoord),
    /// Every tile of an area's bounding range in one partition.
    Area {
        area: AreaOfInterest,
        range: TileRange,
        partition: Partition,
    },
}

impl TilePlan {
    pub fn single(tile: TileCoord) -> Self {
        TilePlan::Single(tile)
    }

    pub fn area(area: AreaOfInterest, zoom: u8, partition: Partition) -> Self {
        let range = TileRange::from_bounds(&area.bounds(), zoom);
        TilePlan::Area {
            area,
            range,
            partition,
        }
    }

    /// The area filter, if any.
    pub fn area_of_interest(&self) -> Option<&AreaOfInterest> {
        match self {
            TilePlan::Single(_) => None,
            TilePlan::Area { area, .. } => Some(area),
        }
    }

    /// Tiles to visit, grouped by column, in visiting order.
    pub fn columns(&self) -> Vec<Vec<TileCoord>> {
        match self {
            TilePlan::Single(tile) => vec![vec![*tile]],
            TilePlan::Area {
                range, partition, ..
            } => range.columns(*partition),
        }
    }

    /// Every tile, flattened, in visiting order.
    pub fn tiles(&self) -> Vec<TileCoord> {
        self.columns().into_iter().flatten().collect()
    }
}
