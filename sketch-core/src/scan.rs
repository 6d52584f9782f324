//! Black pixel scanner.
//!
//! Walks a linear RGBA buffer in row-major order and collects every pixel
//! whose color channels are all zero and whose alpha is not. Fully
//! transparent black does not count.

use tracing::trace;

use crate::{Canvas, CHANNELS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCoord {
    pub x: u32,
    pub y: u32,
}

/// Result of one scan. Derived from the raster and never stored on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelSample {
    pub count: usize,
    /// In scan order: left to right, top to bottom.
    pub coordinates: Vec<PixelCoord>,
}

fn is_black(rgba: &[u8]) -> bool {
    rgba[0] == 0 && rgba[1] == 0 && rgba[2] == 0 && rgba[3] != 0
}

/// Scan a `width`-wide RGBA buffer. A trailing partial pixel is ignored.
pub fn scan(rgba: &[u8], width: u32) -> PixelSample {
    let mut coordinates = Vec::new();
    if width == 0 {
        return PixelSample::default();
    }

    for (pixel, chunk) in rgba.chunks_exact(CHANNELS).enumerate() {
        if !is_black(chunk) {
            continue;
        }
        let offset = pixel * CHANNELS;
        let x = ((offset / CHANNELS) % width as usize) as u32;
        let y = (offset / CHANNELS / width as usize) as u32;
        coordinates.push(PixelCoord { x, y });
    }

    trace!(
        pixels = rgba.len() / CHANNELS,
        matches = coordinates.len(),
        "rgba buffer scanned"
    );

    PixelSample {
        count: coordinates.len(),
        coordinates,
    }
}

impl Canvas {
    /// Scan the live raster for pure black, non-transparent pixels.
    pub fn scan_black(&self) -> PixelSample {
        scan(&self.to_rgba_bytes(), self.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    #[test]
    fn test_blank_canvas_has_no_black() {
        let canvas = Canvas::new(8, 8, Color32::WHITE);
        let sample = canvas.scan_black();
        assert_eq!(sample.count, 0);
        assert!(sample.coordinates.is_empty());
    }

    #[test]
    fn test_transparent_black_is_excluded() {
        let canvas = Canvas::new(4, 4, Color32::TRANSPARENT);
        assert_eq!(canvas.scan_black().count, 0);
    }

    #[test]
    fn test_near_black_is_excluded() {
        let mut canvas = Canvas::new(3, 1, Color32::WHITE);
        canvas.set_pixel(0, 0, Color32::from_rgb(1, 0, 0));
        canvas.set_pixel(1, 0, Color32::from_rgb(0, 0, 1));
        canvas.set_pixel(2, 0, Color32::BLACK);

        let sample = canvas.scan_black();
        assert_eq!(sample.count, 1);
        assert_eq!(sample.coordinates, vec![PixelCoord { x: 2, y: 0 }]);
    }

    #[test]
    fn test_translucent_black_counts() {
        let rgba = [0, 0, 0, 1, 0, 0, 0, 0];
        let sample = scan(&rgba, 2);
        assert_eq!(sample.coordinates, vec![PixelCoord { x: 0, y: 0 }]);
    }

    #[test]
    fn test_coordinates_follow_row_major_order() {
        let mut canvas = Canvas::new(5, 4, Color32::WHITE);
        canvas.set_pixel(3, 2, Color32::BLACK);
        canvas.set_pixel(0, 3, Color32::BLACK);
        canvas.set_pixel(4, 0, Color32::BLACK);

        let sample = canvas.scan_black();
        assert_eq!(sample.count, 3);
        assert_eq!(
            sample.coordinates,
            vec![
                PixelCoord { x: 4, y: 0 },
                PixelCoord { x: 3, y: 2 },
                PixelCoord { x: 0, y: 3 },
            ]
        );
    }

    #[test]
    fn test_scan_is_idempotent() {
        let mut canvas = Canvas::new(6, 6, Color32::WHITE);
        for i in 0..6 {
            canvas.set_pixel(i, i, Color32::BLACK);
        }
        assert_eq!(canvas.scan_black(), canvas.scan_black());
    }

    #[test]
    fn test_partial_trailing_pixel_ignored() {
        let rgba = [0, 0, 0, 255, 0, 0, 0];
        assert_eq!(scan(&rgba, 1).count, 1);
        assert_eq!(scan(&rgba, 0).count, 0);
    }
}
