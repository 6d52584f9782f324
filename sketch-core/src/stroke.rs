//! Pointer gesture tracking.
//!
//! A stroke starts on pointer-down, paints one straight segment per
//! pointer-move from the previously sampled point, and ends on pointer-up or
//! when the pointer leaves the surface.

use tracing::{debug, trace};

use crate::{Canvas, Tool};

/// Pointer coordinates arrive in logical units; one unit is one pixel.
/// Samples are clamped to the surface plus a margin of one stamp width.
fn to_pixel(canvas: &Canvas, tool: &dyn Tool, x: f32, y: f32) -> (i32, i32) {
    let margin = i64::from(tool.cursor_size().min(canvas.width().max(canvas.height())));
    let clamp = |v: f32, extent: u32| -> i32 {
        let hi = (i64::from(extent) + margin).min(i64::from(i32::MAX / 4));
        let lo = -margin.min(i64::from(i32::MAX / 4));
        // NaN saturates to 0
        let v = v.floor() as i64;
        v.clamp(lo, hi) as i32
    };
    (clamp(x, canvas.width()), clamp(y, canvas.height()))
}

/// Paint a straight line from `from` to `to` (inclusive) by stamping `tool`
/// at every Bresenham step. Returns the number of stamps.
pub fn draw_segment(canvas: &mut Canvas, tool: &dyn Tool, from: (i32, i32), to: (i32, i32)) -> usize {
    let (mut x0, mut y0) = from;
    let (x1, y1) = to;
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut stamps = 0;

    loop {
        tool.apply(canvas, x0, y0);
        stamps += 1;
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }

    trace!(?from, ?to, stamps, tool = tool.name(), "segment drawn");
    stamps
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrokeState {
    last: Option<(i32, i32)>,
    segments: usize,
}

impl StrokeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }

    /// Pointer-down: remember the start point. Nothing is painted yet.
    pub fn begin(&mut self, canvas: &Canvas, tool: &dyn Tool, x: f32, y: f32) {
        let point = to_pixel(canvas, tool, x, y);
        debug!(?point, "stroke started");
        self.last = Some(point);
        self.segments = 0;
    }

    /// Pointer-move: paint from the previous sample to this one. Ignored
    /// (returns false) when no stroke is active.
    pub fn extend(&mut self, canvas: &mut Canvas, tool: &dyn Tool, x: f32, y: f32) -> bool {
        let Some(from) = self.last else {
            return false;
        };
        let to = to_pixel(canvas, tool, x, y);
        draw_segment(canvas, tool, from, to);
        self.last = Some(to);
        self.segments += 1;
        true
    }

    /// Pointer-up or pointer-leave. Returns the number of segments painted
    /// if a stroke was active, `None` otherwise.
    pub fn end(&mut self) -> Option<usize> {
        self.last.take()?;
        let segments = std::mem::take(&mut self.segments);
        debug!(segments, "stroke finished");
        Some(segments)
    }
}
