//! sketch-history: snapshot-per-action undo history with write-through
//! persistence.
//!
//! Design rules:
//! - A snapshot is a full PNG capture of the canvas. No diffs.
//! - History is never empty once initialized; the blank canvas is the floor.
//! - Every mutation writes the post-mutation history to the store, so the
//!   persisted copy never lags memory.
//! - Store failures degrade to in-memory operation; they never abort a mutation.

use thiserror::Error;

pub mod history;
pub mod notes;
pub mod snapshot;
pub mod store;

pub use history::{History, HistoryState, HistoryStore};
pub use notes::Notes;
pub use snapshot::Snapshot;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

/// Default key for the serialized drawing history.
pub const HISTORY_KEY: &str = "sketchpad.history";

/// Default key for the notes text.
pub const NOTES_KEY: &str = "sketchpad.notes";

/// Errors produced while encoding or decoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("encode canvas as png")]
    Encode(#[source] image::ImageError),

    #[error("decode png snapshot")]
    Decode(#[source] image::ImageError),

    #[error("snapshot is {actual_width}x{actual_height}, canvas is {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error(transparent)]
    Raster(#[from] sketch_core::RasterError),
}

/// Raised when deserializing a history with no entries.
#[derive(Debug, Error)]
#[error("history must contain at least one snapshot")]
pub struct EmptyHistory;
