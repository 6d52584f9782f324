// The raster behind the drawing surface.
// Strokes mutate it in place; snapshots copy it out and back in.

use egui::Color32;
use tracing::{debug, info, trace};

use crate::{RasterError, CHANNELS, SURFACE_HEIGHT, SURFACE_WIDTH};

#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color32>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color32) -> Self {
        info!(
            "Creating new canvas of size {}x{} with background color {:?}",
            width, height, background
        );

        let total_pixels = width as usize * height as usize;
        debug!("Total pixels to initialize: {}", total_pixels);

        Self {
            width,
            height,
            pixels: vec![background; total_pixels],
        }
    }

    fn is_valid_coordinate(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    // row-major
    fn coord_to_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Color of the pixel at (x, y), or `None` outside the canvas.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color32> {
        if !self.is_valid_coordinate(x, y) {
            trace!("Requested pixel color at invalid coordinates ({}, {})", x, y);
            return None;
        }

        Some(self.pixels[self.coord_to_index(x, y)])
    }

    /// Set the pixel at (x, y). Returns false when the coordinate is off-canvas.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color32) -> bool {
        if !self.is_valid_coordinate(x, y) {
            trace!("Dropped pixel write at invalid coordinates ({}, {})", x, y);
            return false;
        }

        let index = self.coord_to_index(x, y);
        self.pixels[index] = color;
        true
    }

    pub fn fill(&mut self, color: Color32) {
        debug!("Filling canvas {:?}", color);
        self.pixels.fill(color);
    }

    /// Reset every pixel to fully transparent black.
    pub fn clear(&mut self) {
        debug!("Clearing canvas");
        self.fill(Color32::TRANSPARENT);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    /// Export the raster as a linear, un-premultiplied RGBA byte buffer in
    /// row-major order.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * CHANNELS);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&pixel.to_srgba_unmultiplied());
        }
        trace!("Exported {} rgba bytes", bytes.len());
        bytes
    }

    /// Replace the whole raster with an un-premultiplied RGBA buffer.
    ///
    /// The canvas is cleared before painting so nothing from the previous
    /// contents survives under transparent regions. A buffer of the wrong
    /// size is rejected before any pixel changes.
    pub fn paint_rgba(&mut self, bytes: &[u8]) -> Result<(), RasterError> {
        let expected = self.pixels.len() * CHANNELS;
        if bytes.len() != expected {
            return Err(RasterError::BufferSize {
                width: self.width,
                height: self.height,
                expected,
                actual: bytes.len(),
            });
        }

        self.clear();
        for (pixel, rgba) in self.pixels.iter_mut().zip(bytes.chunks_exact(CHANNELS)) {
            *pixel = Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3]);
        }
        debug!("Painted {} pixels from rgba buffer", self.pixels.len());
        Ok(())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas::new(SURFACE_WIDTH, SURFACE_HEIGHT, Color32::WHITE)
    }
}
