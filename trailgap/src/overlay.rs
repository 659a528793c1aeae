//! Burning mapped features into a heatmap raster.
//!
//! Every feature is drawn in tile-local pixel space with intensity zero:
//! area features are filled, every feature is stroked with a band as wide as
//! the configured tolerance distance on each side, and every vertex gets a
//! disc of the same diameter. Whatever activity survives lies further than
//! the tolerance from anything already mapped.
//!
//! Drawing goes through a [`tiny_skia::Mask`] without anti-aliasing, so a
//! pixel is either suppressed or untouched. Applying the same overlay twice
//! changes nothing.

use tiny_skia::{FillRule, LineCap, LineJoin, Mask, Path, PathBuilder, Stroke, Transform};
use tracing::debug;

use crate::coord::{merc_to_pixel, MercBBox, MercPoint};
use crate::osm::Feature;
use crate::raster::Raster;

/// Width in pixels of the suppression band for a tolerance of `distance`
/// meters: `round(distance / pixel_size) * 2 + 1`.
pub fn suppression_width(distance: f64, pixel_size: f64) -> u32 {
    ((distance / pixel_size).round().max(0.0) as u32) * 2 + 1
}

/// Zeroes every raster pixel covered by the features' suppression shapes.
///
/// # Arguments
///
/// * `raster` - Heatmap raster of the tile, modified in place
/// * `features` - Mapped features around the tile
/// * `bbox` - Pseudo-Mercator bounds of the tile
/// * `distance` - Tolerance in meters
/// * `pixel_size` - Meters per pixel
pub fn suppress(
    raster: &mut Raster,
    features: &[Feature],
    bbox: &MercBBox,
    distance: f64,
    pixel_size: f64,
) {
    let size = raster.width() as u32;
    let Some(mut mask) = Mask::new(size, size) else {
        return;
    };

    let width = suppression_width(distance, pixel_size) as f32;
    let mut stroke = Stroke::default();
    stroke.width = width;
    stroke.line_cap = LineCap::Butt;
    stroke.line_join = LineJoin::Round;

    for feature in features {
        let points: Vec<(f32, f32)> = feature
            .vertices
            .iter()
            .map(|v| to_canvas(MercPoint::from_lat_lon(v.lat, v.lon), bbox, pixel_size))
            .collect();

        if feature.is_area {
            if let Some(polygon) = polyline(&points, true) {
                mask.fill_path(&polygon, FillRule::EvenOdd, false, Transform::identity());
            }
        }

        if feature.is_linear() {
            if let Some(band) = polyline(&points, false).and_then(|line| line.stroke(&stroke, 1.0)) {
                mask.fill_path(&band, FillRule::Winding, false, Transform::identity());
            }
        }

        for &(x, y) in &points {
            if let Some(disc) = PathBuilder::from_circle(x, y, width / 2.0) {
                mask.fill_path(&disc, FillRule::Winding, false, Transform::identity());
            }
        }
    }

    let mut suppressed = 0usize;
    for (pixel, &covered) in raster.pixels_mut().iter_mut().zip(mask.data()) {
        if covered > 0 && *pixel > 0 {
            *pixel = 0;
            suppressed += 1;
        }
    }
    debug!(features = features.len(), width, suppressed, "Overlay applied");
}

/// Projects a vertex to canvas coordinates at the centre of its pixel.
fn to_canvas(point: MercPoint, bbox: &MercBBox, pixel_size: f64) -> (f32, f32) {
    let pixel = merc_to_pixel(point, bbox, pixel_size);
    (pixel.col as f32 + 0.5, pixel.row as f32 + 0.5)
}

fn polyline(points: &[(f32, f32)], closed: bool) -> Option<Path> {
    let (&(x0, y0), rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(x0, y0);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::coord::{pixel_to_lat_lon, PixelPoint, TileCoord};
    use crate::osm::{FeatureKind, LatLon};

    const SIZE: usize = 64;

    struct Canvas {
        bbox: MercBBox,
        pixel_size: f64,
    }

    impl Canvas {
        fn new() -> Self {
            let bbox = TileCoord::new(17940, 11371, 15).merc_bbox();
            Self {
                pixel_size: bbox.height() / SIZE as f64,
                bbox,
            }
        }

        fn vertex(&self, row: i64, col: i64) -> LatLon {
            let (lat, lon) = pixel_to_lat_lon(PixelPoint::new(row, col), &self.bbox, self.pixel_size);
            LatLon { lat, lon }
        }

        fn feature(&self, pixels: &[(i64, i64)], tags: &[(&str, &str)]) -> Feature {
            let tags: HashMap<String, String> = tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            let vertices = pixels.iter().map(|&(r, c)| self.vertex(r, c)).collect();
            Feature::new(1, FeatureKind::Way, vertices, &tags)
        }
    }

    fn bright() -> Raster {
        Raster::from_pixels(SIZE, vec![200; SIZE * SIZE]).unwrap()
    }

    fn value(raster: &Raster, row: i64, col: i64) -> u8 {
        raster.get(PixelPoint::new(row, col)).unwrap()
    }

    #[test]
    fn test_suppression_width() {
        // 35 m at ~2.39 m/px (zoom 15, 512 px) -> 15 px each side
        assert_eq!(suppression_width(35.0, 1222.99 / 512.0), 31);
        assert_eq!(suppression_width(0.0, 2.0), 1);
        assert_eq!(suppression_width(3.0, 2.0), 5);
    }

    #[test]
    fn test_area_feature_fills_interior() {
        let canvas = Canvas::new();
        let pitch = canvas.feature(
            &[(10, 10), (10, 50), (50, 50), (50, 10), (10, 10)],
            &[("leisure", "pitch")],
        );
        let mut raster = bright();

        suppress(&mut raster, &[pitch], &canvas.bbox, 0.0, canvas.pixel_size);

        for row in 12..49 {
            for col in 12..49 {
                assert_eq!(value(&raster, row, col), 0, "interior ({}, {})", row, col);
            }
        }
        assert_eq!(value(&raster, 2, 2), 200);
        assert_eq!(value(&raster, 60, 30), 200);
    }

    #[test]
    fn test_linear_feature_keeps_interior() {
        let canvas = Canvas::new();
        let track = canvas.feature(
            &[(10, 10), (10, 50), (50, 50), (50, 10), (10, 10)],
            &[("leisure", "track")],
        );
        let mut raster = bright();

        suppress(&mut raster, &[track], &canvas.bbox, 0.0, canvas.pixel_size);

        assert_eq!(value(&raster, 10, 30), 0, "outline suppressed");
        assert_eq!(value(&raster, 30, 30), 200, "interior untouched");
    }

    #[test]
    fn test_line_band_width_follows_distance() {
        let canvas = Canvas::new();
        let path = canvas.feature(&[(32, 0), (32, 63)], &[("highway", "path")]);
        let mut raster = bright();

        // 2 pixels of tolerance on each side -> band 5 px wide
        let distance = 2.0 * canvas.pixel_size;
        suppress(&mut raster, &[path], &canvas.bbox, distance, canvas.pixel_size);

        for row in 30..=34 {
            assert_eq!(value(&raster, row, 20), 0, "row {} in band", row);
        }
        assert_eq!(value(&raster, 27, 20), 200);
        assert_eq!(value(&raster, 37, 20), 200);
    }

    #[test]
    fn test_single_vertex_gets_a_disc() {
        let canvas = Canvas::new();
        let point = canvas.feature(&[(20, 20)], &[("highway", "crossing")]);
        let mut raster = bright();

        let distance = 3.0 * canvas.pixel_size;
        suppress(&mut raster, &[point], &canvas.bbox, distance, canvas.pixel_size);

        assert_eq!(value(&raster, 20, 20), 0);
        assert_eq!(value(&raster, 20, 23), 0);
        assert_eq!(value(&raster, 20, 30), 200);
        assert_eq!(value(&raster, 26, 26), 200, "disc, not square");
    }

    #[test]
    fn test_overlay_is_idempotent() {
        let canvas = Canvas::new();
        let features = vec![
            canvas.feature(&[(5, 5), (40, 60)], &[("highway", "track")]),
            canvas.feature(&[(50, 10), (60, 10), (60, 20), (50, 10)], &[("area", "yes")]),
        ];
        let mut once = bright();
        suppress(&mut once, &features, &canvas.bbox, 5.0, canvas.pixel_size);
        let mut twice = once.clone();
        suppress(&mut twice, &features, &canvas.bbox, 5.0, canvas.pixel_size);

        assert_eq!(once, twice);
        assert!(once.count_at_least(1) < SIZE * SIZE);
    }

    #[test]
    fn test_feature_outside_tile_changes_nothing() {
        let canvas = Canvas::new();
        let far = canvas.feature(&[(-500, -500), (-400, -500)], &[("highway", "path")]);
        let mut raster = bright();

        suppress(&mut raster, &[far], &canvas.bbox, 5.0, canvas.pixel_size);
        assert_eq!(raster, bright());
    }
}
