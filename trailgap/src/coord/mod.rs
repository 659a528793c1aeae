//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude),
//! Web Mercator tile indices, pseudo-Mercator meters and pixel positions
//! inside a heatmap tile raster.
//!
//! None of these functions validate their input. Latitudes beyond the
//! Mercator limit or longitudes outside `-180..180` produce defined but
//! meaningless output.

mod types;

pub use types::{GeoBBox, MercBBox, MercPoint, PixelPoint, TileCoord};

use std::f64::consts::PI;

/// Equatorial radius used by the pseudo-Mercator projection, in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Converts geographic coordinates to the index of the tile containing them.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees
/// * `lon` - Longitude in degrees
/// * `zoom` - Zoom level
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> TileCoord {
    let n = 2.0_f64.powi(zoom as i32);

    let x = ((lon + 180.0) / 360.0 * n).floor() as u32;

    let lat_rad = lat.to_radians();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor() as u32;

    TileCoord { x, y, zoom }
}

/// Returns `(lat, lon)` of the north-west corner of tile `(x, y)`.
///
/// This is the exact inverse of the corner mapping; interior points of a
/// tile all map back to the same corner.
#[inline]
pub fn tile_corner(x: u32, y: u32, zoom: u8) -> (f64, f64) {
    let n = 2.0_f64.powi(zoom as i32);

    let lon = x as f64 / n * 360.0 - 180.0;

    let lat_rad = (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan();

    (lat_rad.to_degrees(), lon)
}

/// Returns `(lat, lon)` of the tile's north-west corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> (f64, f64) {
    tile_corner(tile.x, tile.y, tile.zoom)
}

/// Latitude in degrees to pseudo-Mercator northing in meters.
#[inline]
pub fn lat_to_northing(lat: f64) -> f64 {
    (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() * EARTH_RADIUS
}

/// Longitude in degrees to pseudo-Mercator easting in meters.
#[inline]
pub fn lon_to_easting(lon: f64) -> f64 {
    lon.to_radians() * EARTH_RADIUS
}

/// Pseudo-Mercator northing in meters to latitude in degrees.
#[inline]
pub fn northing_to_lat(northing: f64) -> f64 {
    (2.0 * (northing / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees()
}

/// Pseudo-Mercator easting in meters to longitude in degrees.
#[inline]
pub fn easting_to_lon(easting: f64) -> f64 {
    (easting / EARTH_RADIUS).to_degrees()
}

/// Maps a pixel of a tile raster to the Mercator position of its anchor.
///
/// Column scales with easting from the west edge, row scales inversely with
/// northing from the north edge.
#[inline]
pub fn pixel_to_merc(pixel: PixelPoint, bbox: &MercBBox, pixel_size: f64) -> MercPoint {
    MercPoint {
        easting: bbox.west + pixel.col as f64 * pixel_size,
        northing: bbox.north - pixel.row as f64 * pixel_size,
    }
}

/// Maps a Mercator position to the nearest pixel of a tile raster.
#[inline]
pub fn merc_to_pixel(point: MercPoint, bbox: &MercBBox, pixel_size: f64) -> PixelPoint {
    PixelPoint {
        row: ((bbox.north - point.northing) / pixel_size).round() as i64,
        col: ((point.easting - bbox.west) / pixel_size).round() as i64,
    }
}

/// Maps a pixel of a tile raster straight to `(lat, lon)`.
#[inline]
pub fn pixel_to_lat_lon(pixel: PixelPoint, bbox: &MercBBox, pixel_size: f64) -> (f64, f64) {
    pixel_to_merc(pixel, bbox, pixel_size).to_lat_lon()
}
