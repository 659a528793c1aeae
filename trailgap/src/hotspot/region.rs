//! Connected-region traversal over a raster.

use crate::coord::PixelPoint;
use crate::raster::Raster;

/// Result of a bounded region measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Number of pixels visited (and zeroed).
    pub size: usize,
    /// The visited pixels in visit order.
    pub pixels: Vec<PixelPoint>,
}

/// Neighbours in visit order: down, up, right, left.
fn neighbours(p: PixelPoint) -> [PixelPoint; 4] {
    [
        PixelPoint::new(p.row + 1, p.col),
        PixelPoint::new(p.row - 1, p.col),
        PixelPoint::new(p.row, p.col + 1),
        PixelPoint::new(p.row, p.col - 1),
    ]
}

/// Measures the 4-connected region of pixels `>= threshold` around `seed`.
///
/// Depth-first over an explicit frame stack. A pixel is expanded into its
/// neighbours only while the visited count is at most `min_size`; once it
/// exceeds `min_size`, frames already on the stack still visit their
/// remaining neighbours without expanding them. The size can therefore
/// overshoot `min_size + 1` by up to one pixel per pending frame.
///
/// Every visited pixel is set to zero whether or not the region turns out
/// large enough to report.
pub fn measure_region(
    raster: &mut Raster,
    seed: PixelPoint,
    threshold: u8,
    min_size: usize,
) -> Region {
    let mut pixels = Vec::new();
    // (pixel, index of the next neighbour to visit)
    let mut frames: Vec<(PixelPoint, usize)> = Vec::new();

    if visit(raster, seed, threshold, &mut pixels) && pixels.len() <= min_size {
        frames.push((seed, 0));
    }

    while let Some(frame) = frames.last_mut() {
        let (pixel, cursor) = *frame;
        if cursor == 4 {
            frames.pop();
            continue;
        }
        frame.1 += 1;
        let next = neighbours(pixel)[cursor];
        if visit(raster, next, threshold, &mut pixels) && pixels.len() <= min_size {
            frames.push((next, 0));
        }
    }

    Region {
        size: pixels.len(),
        pixels,
    }
}

/// Zeroes and records `p` if it is bright enough.
fn visit(raster: &mut Raster, p: PixelPoint, threshold: u8, pixels: &mut Vec<PixelPoint>) -> bool {
    match raster.get(p) {
        Some(v) if v >= threshold && v > 0 => {
            raster.set(p, 0);
            pixels.push(p);
            true
        }
        _ => false,
    }
}

/// Zeroes the whole component around a reported region, without any bound.
///
/// A pixel joins when its intensity is within `peak - 1` of `peak`, i.e. in
/// `1..=2 * peak - 1`. For peaks of 128 and above that is every nonzero
/// pixel, so dimmer flanks of a trace are erased with its core.
///
/// The seeds themselves are always treated as part of the component, even
/// if they were already zeroed, so a region partly consumed by
/// [`measure_region`] is still erased through it. Returns the number of
/// pixels set to zero.
pub fn erase_component(raster: &mut Raster, seeds: &[PixelPoint], peak: u8) -> usize {
    let ceiling = (2 * u16::from(peak)).saturating_sub(1).min(255) as u8;
    let width = raster.width();
    let mut seen = vec![false; width * width];
    let mut stack: Vec<PixelPoint> = Vec::with_capacity(seeds.len());
    let mut erased = 0;

    let index = |p: PixelPoint| p.row as usize * width + p.col as usize;

    for &seed in seeds {
        if raster.contains(seed) && !seen[index(seed)] {
            seen[index(seed)] = true;
            stack.push(seed);
        }
    }

    while let Some(p) = stack.pop() {
        if raster.get(p).is_some_and(|v| v > 0) {
            raster.set(p, 0);
            erased += 1;
        }
        for n in neighbours(p) {
            if !raster.contains(n) || seen[index(n)] {
                continue;
            }
            if raster.get(n).is_some_and(|v| (1..=ceiling).contains(&v)) {
                seen[index(n)] = true;
                stack.push(n);
            }
        }
    }

    erased
}
