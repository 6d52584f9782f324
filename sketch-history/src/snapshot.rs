// Full-canvas captures encoded as PNG. PNG carries its own dimensions, so a
// snapshot can be validated against the canvas it is restored onto.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat};
use serde::{Deserialize, Serialize};
use sketch_core::Canvas;
use tracing::{debug, trace};

use crate::SnapshotError;

/// Immutable once created. Identity is its position in a history.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    png: Vec<u8>,
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("png_bytes", &self.png.len())
            .finish()
    }
}

impl Snapshot {
    /// Encode the whole canvas.
    pub fn capture(canvas: &Canvas) -> Result<Self, SnapshotError> {
        let rgba = canvas.to_rgba_bytes();
        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(&rgba, canvas.width(), canvas.height(), ExtendedColorType::Rgba8)
            .map_err(SnapshotError::Encode)?;

        debug!(
            width = canvas.width(),
            height = canvas.height(),
            png_bytes = png.len(),
            "snapshot captured"
        );
        Ok(Self { png })
    }

    /// Wrap already-encoded PNG bytes. Validity is only checked on decode.
    pub fn from_png(png: Vec<u8>) -> Self {
        Self { png }
    }

    /// Decode into an un-premultiplied RGBA buffer, checking the dimensions
    /// match what the caller expects.
    pub fn decode(&self, width: u32, height: u32) -> Result<Vec<u8>, SnapshotError> {
        let image = image::load_from_memory_with_format(&self.png, ImageFormat::Png)
            .map_err(SnapshotError::Decode)?
            .into_rgba8();

        let (actual_width, actual_height) = image.dimensions();
        if (actual_width, actual_height) != (width, height) {
            return Err(SnapshotError::DimensionMismatch {
                width,
                height,
                actual_width,
                actual_height,
            });
        }

        trace!(width, height, "snapshot decoded");
        Ok(image.into_raw())
    }

    /// Replace the canvas contents with this snapshot.
    ///
    /// Decoding finishes before the canvas is touched, so a failed restore
    /// leaves the raster as it was and a successful one is complete by the
    /// time this returns.
    pub fn restore(&self, canvas: &mut Canvas) -> Result<(), SnapshotError> {
        let rgba = self.decode(canvas.width(), canvas.height())?;
        canvas.paint_rgba(&rgba)?;
        debug!("canvas restored from snapshot");
        Ok(())
    }
}
