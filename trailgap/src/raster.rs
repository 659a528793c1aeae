//! Single-channel heatmap rasters.
//!
//! A [`Raster`] is a square grid of intensities (0-255) decoded from a
//! heatmap tile. Suppression and hotspot erasure mutate it in place; it is
//! dropped as soon as its tile has been processed.

use std::io::Cursor;
use std::path::Path;

use image::{GrayImage, ImageFormat};
use thiserror::Error;

use crate::coord::PixelPoint;

/// Errors that can occur while building or encoding a raster.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The payload is not a decodable image.
    #[error("undecodable tile image: {0}")]
    Decode(#[from] image::ImageError),

    /// Heatmap tiles must be square.
    #[error("tile is not square: {width}x{height}")]
    NotSquare { width: u32, height: u32 },

    /// Pixel buffer length does not match the declared size.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    /// Writing a debug image failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: image::ImageError,
    },
}

/// Square single-channel intensity grid, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// Creates an all-zero raster.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            pixels: vec![0; width * width],
        }
    }

    /// Wraps an existing row-major pixel buffer.
    pub fn from_pixels(width: usize, pixels: Vec<u8>) -> Result<Self, RasterError> {
        if pixels.len() != width * width {
            return Err(RasterError::BufferSize {
                expected: width * width,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, pixels })
    }

    /// Decodes an encoded tile image, converting it to luminance.
    pub fn decode(bytes: &[u8]) -> Result<Self, RasterError> {
        let gray = image::load_from_memory(bytes)?.to_luma8();
        let (width, height) = gray.dimensions();
        if width != height {
            return Err(RasterError::NotSquare { width, height });
        }
        Ok(Self {
            width: width as usize,
            pixels: gray.into_raw(),
        })
    }

    /// Encodes the raster as a grayscale PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        let mut out = Cursor::new(Vec::new());
        self.to_image().write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    /// Writes the raster as a grayscale PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), RasterError> {
        self.to_image()
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| RasterError::Write {
                path: path.display().to_string(),
                source,
            })
    }

    fn to_image(&self) -> GrayImage {
        // Dimensions always match the buffer, so this cannot fail.
        GrayImage::from_fn(self.width as u32, self.width as u32, |col, row| {
            image::Luma([self.pixels[row as usize * self.width + col as usize]])
        })
    }

    /// Side length in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable row-major pixel data.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Whether `pixel` lies inside the raster.
    pub fn contains(&self, pixel: PixelPoint) -> bool {
        pixel.row >= 0
            && pixel.col >= 0
            && (pixel.row as usize) < self.width
            && (pixel.col as usize) < self.width
    }

    /// Intensity at `pixel`, or `None` outside the raster.
    pub fn get(&self, pixel: PixelPoint) -> Option<u8> {
        self.index(pixel).map(|i| self.pixels[i])
    }

    /// Sets the intensity at `pixel`; ignored outside the raster.
    pub fn set(&mut self, pixel: PixelPoint, value: u8) {
        if let Some(i) = self.index(pixel) {
            self.pixels[i] = value;
        }
    }

    fn index(&self, pixel: PixelPoint) -> Option<usize> {
        self.contains(pixel)
            .then(|| pixel.row as usize * self.width + pixel.col as usize)
    }

    /// The brightest pixel and its intensity.
    ///
    /// Ties resolve to the first pixel in row-major order.
    pub fn brightest(&self) -> Option<(PixelPoint, u8)> {
        let mut best: Option<(usize, u8)> = None;
        for (i, &value) in self.pixels.iter().enumerate() {
            if best.map_or(true, |(_, b)| value > b) {
                best = Some((i, value));
            }
        }
        best.map(|(i, value)| {
            let row = (i / self.width) as i64;
            let col = (i % self.width) as i64;
            (PixelPoint::new(row, col), value)
        })
    }

    /// Number of pixels with intensity at least `threshold`.
    pub fn count_at_least(&self, threshold: u8) -> usize {
        self.pixels.iter().filter(|&&v| v >= threshold).count()
    }

    /// Whether every pixel is zero.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&v| v == 0)
    }

    /// Sets every pixel of a rectangle to `value`, clipped to the raster.
    ///
    /// Mostly useful for building synthetic tiles.
    pub fn fill_rect(&mut self, top: usize, left: usize, height: usize, width: usize, value: u8) {
        for row in top..(top + height).min(self.width) {
            for col in left..(left + width).min(self.width) {
                self.pixels[row * self.width + col] = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_blank() {
        let raster = Raster::new(8);
        assert_eq!(raster.width(), 8);
        assert_eq!(raster.pixels().len(), 64);
        assert!(raster.is_blank());
    }

    #[test]
    fn test_from_pixels_rejects_wrong_length() {
        let result = Raster::from_pixels(4, vec![0; 15]);
        assert!(matches!(
            result,
            Err(RasterError::BufferSize {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn test_brightest_prefers_first_in_row_major_order() {
        let mut raster = Raster::new(4);
        raster.set(PixelPoint::new(2, 1), 200);
        raster.set(PixelPoint::new(1, 3), 200);
        raster.set(PixelPoint::new(3, 3), 100);

        let (pixel, value) = raster.brightest().unwrap();
        assert_eq!(pixel, PixelPoint::new(1, 3));
        assert_eq!(value, 200);
    }

    #[test]
    fn test_brightest_of_empty_raster() {
        assert!(Raster::new(0).brightest().is_none());
    }

    #[test]
    fn test_get_and_set_outside_bounds() {
        let mut raster = Raster::new(4);
        raster.set(PixelPoint::new(-1, 0), 9);
        raster.set(PixelPoint::new(0, 4), 9);
        assert!(raster.is_blank());
        assert_eq!(raster.get(PixelPoint::new(4, 0)), None);
        assert_eq!(raster.get(PixelPoint::new(3, 3)), Some(0));
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut raster = Raster::new(4);
        raster.fill_rect(2, 2, 5, 5, 7);
        assert_eq!(raster.count_at_least(7), 4);
    }

    #[test]
    fn test_png_roundtrip_keeps_pixels() {
        let mut raster = Raster::new(16);
        raster.fill_rect(3, 4, 5, 6, 180);
        raster.set(PixelPoint::new(0, 0), 17);

        let bytes = raster.encode_png().unwrap();
        let decoded = Raster::decode(&bytes).unwrap();
        assert_eq!(decoded, raster);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = Raster::decode(b"definitely not a png");
        assert!(matches!(result, Err(RasterError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_non_square() {
        let img = GrayImage::new(4, 2);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();

        let result = Raster::decode(&out.into_inner());
        assert!(matches!(
            result,
            Err(RasterError::NotSquare {
                width: 4,
                height: 2
            })
        ));
    }

    #[test]
    fn test_save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        Raster::new(4).save_png(&path).unwrap();
        assert!(path.exists());
    }
}
