// Pen tools that stamp pixels onto the canvas.

use crate::Canvas;
use egui::Color32;
use tracing::trace;

pub trait Tool {
    /// Stamp the tool centred on (x, y). Parts of the stamp that fall
    /// outside the canvas are dropped.
    fn apply(&self, canvas: &mut Canvas, x: i32, y: i32);

    fn name(&self) -> &str;

    fn cursor_size(&self) -> u32 {
        1
    }
}

// Square stamp of side `size` (odd sizes stay centred; even sizes round up).
// Only the part of the square on the canvas is visited.
fn stamp_square(canvas: &mut Canvas, x: i32, y: i32, size: u32, color: Color32) {
    let half_size = i64::from(size / 2);
    let span = |centre: i32, extent: u32| {
        let lo = (i64::from(centre) - half_size).max(0);
        let hi = (i64::from(centre) + half_size).min(i64::from(extent) - 1);
        lo..=hi
    };
    let (xs, ys) = (span(x, canvas.width()), span(y, canvas.height()));
    for py in ys {
        for px in xs.clone() {
            canvas.set_pixel(px as u32, py as u32, color);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub size: u32,
    pub color: Color32,
}

impl Brush {
    pub fn new(size: u32, color: Color32) -> Self {
        Self { size, color }
    }
}

/// One pixel of opaque black, the surface's default stroke style.
impl Default for Brush {
    fn default() -> Self {
        Self::new(1, Color32::BLACK)
    }
}

impl Tool for Brush {
    fn apply(&self, canvas: &mut Canvas, x: i32, y: i32) {
        trace!(
            "Applying Brush at ({}, {}) with size {} and color {:?}",
            x,
            y,
            self.size,
            self.color
        );
        stamp_square(canvas, x, y, self.size, self.color);
    }

    fn name(&self) -> &str {
        "Brush"
    }

    fn cursor_size(&self) -> u32 {
        self.size
    }
}

/// Paints the background color back over existing strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct Eraser {
    pub size: u32,
    pub erase_color: Color32,
}

impl Eraser {
    pub fn new(size: u32, background: Color32) -> Self {
        Self {
            size,
            erase_color: background,
        }
    }
}

impl Tool for Eraser {
    fn apply(&self, canvas: &mut Canvas, x: i32, y: i32) {
        trace!("Applying Eraser at ({}, {}) with size {}", x, y, self.size);
        stamp_square(canvas, x, y, self.size, self.erase_color);
    }

    fn name(&self) -> &str {
        "Eraser"
    }

    fn cursor_size(&self) -> u32 {
        self.size
    }
}
