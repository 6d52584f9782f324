//! sketch-core: the live raster behind the sketchpad and everything that
//! touches its pixels directly.
//!
//! - [`Canvas`] owns the width x height pixel buffer.
//! - [`Tool`]s stamp pixels; [`StrokeState`] turns pointer samples into
//!   straight segments painted with the active tool.
//! - [`scan`] counts pure-black, non-transparent pixels in an RGBA buffer.

use thiserror::Error;

pub mod canvas;
pub mod scan;
pub mod stroke;
pub mod tools;

pub use canvas::Canvas;
pub use egui::Color32;
pub use scan::{scan, PixelCoord, PixelSample};
pub use stroke::StrokeState;
pub use tools::{Brush, Eraser, Tool};

/// Logical width of the drawing surface, one unit per pixel.
pub const SURFACE_WIDTH: u32 = 600;

/// Logical height of the drawing surface, one unit per pixel.
pub const SURFACE_HEIGHT: u32 = 1000;

/// Bytes per pixel in exported buffers (red, green, blue, alpha).
pub const CHANNELS: usize = 4;

/// Errors raised when moving pixel data in or out of a [`Canvas`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    #[error("rgba buffer has {actual} bytes, expected {expected} for a {width}x{height} canvas")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
