//! Undo history for the drawing surface.
//!
//! [`History`] is the in-memory sequence of snapshots, oldest first, which can
//! never be empty. [`HistoryStore`] drives it against a canvas and a
//! [`KeyValueStore`], writing the whole sequence through after every change.

use serde::{Deserialize, Serialize};
use sketch_core::{Canvas, Color32};
use tracing::{debug, info, warn};

use crate::store::{load_json, save_json, KeyValueStore};
use crate::{EmptyHistory, Snapshot, SnapshotError};

/// Lifecycle of an initialized history. Before initialization there is no
/// history value at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    /// Only the blank canvas.
    Seeded,
    /// The blank canvas plus at least one stroke; holds the entry count.
    Populated(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Snapshot>", try_from = "Vec<Snapshot>")]
pub struct History {
    base: Snapshot,
    strokes: Vec<Snapshot>,
}

impl History {
    pub fn seeded(initial: Snapshot) -> Self {
        Self {
            base: initial,
            strokes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        1 + self.strokes.len()
    }

    pub fn state(&self) -> HistoryState {
        if self.strokes.is_empty() {
            HistoryState::Seeded
        } else {
            HistoryState::Populated(self.len())
        }
    }

    /// Most recent snapshot; always present.
    pub fn last(&self) -> &Snapshot {
        self.strokes.last().unwrap_or(&self.base)
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.strokes.push(snapshot);
    }

    /// Drop the newest entry and return the one that is now last. Returns
    /// `None` without changing anything when only the seed is left.
    pub fn pop(&mut self) -> Option<&Snapshot> {
        self.strokes.pop()?;
        Some(self.last())
    }

    /// Discard everything and start again from `initial`.
    pub fn reset(&mut self, initial: Snapshot) {
        self.base = initial;
        self.strokes.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        std::iter::once(&self.base).chain(self.strokes.iter())
    }
}

impl From<History> for Vec<Snapshot> {
    fn from(history: History) -> Self {
        let mut entries = Vec::with_capacity(history.len());
        entries.push(history.base);
        entries.extend(history.strokes);
        entries
    }
}

impl TryFrom<Vec<Snapshot>> for History {
    type Error = EmptyHistory;

    fn try_from(entries: Vec<Snapshot>) -> Result<Self, Self::Error> {
        let mut entries = entries.into_iter();
        let base = entries.next().ok_or(EmptyHistory)?;
        Ok(Self {
            base,
            strokes: entries.collect(),
        })
    }
}

/// The undo mechanism: a [`History`] kept in step with the canvas and with
/// its persisted copy.
#[derive(Debug)]
pub struct HistoryStore {
    history: History,
    key: String,
    background: Color32,
    durable: bool,
}

impl HistoryStore {
    /// Load the persisted history under `key` and restore the canvas to its
    /// newest entry. Missing, corrupt, or undecodable data falls back to a
    /// blank canvas filled with `background` and a single seed snapshot.
    pub fn initialize(
        canvas: &mut Canvas,
        background: Color32,
        key: impl Into<String>,
        store: &mut dyn KeyValueStore,
    ) -> Result<Self, SnapshotError> {
        let key = key.into();

        let loaded = match load_json::<History>(store, &key) {
            Ok(Some(history)) => match Self::restore(canvas, history.last()) {
                Ok(()) => Some(history),
                Err(e) => {
                    warn!(key = %key, error = %e, "persisted snapshot unreadable, starting blank");
                    None
                }
            },
            Ok(None) => {
                debug!(key = %key, "no persisted history");
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "persisted history unreadable, starting blank");
                None
            }
        };

        if let Some(history) = loaded {
            info!(key = %key, entries = history.len(), "history restored from storage");
            return Ok(Self {
                history,
                key,
                background,
                durable: true,
            });
        }

        canvas.fill(background);
        let mut this = Self {
            history: History::seeded(Snapshot::capture(canvas)?),
            key,
            background,
            durable: true,
        };
        this.persist(store);
        info!(key = %this.key, "history seeded with blank canvas");
        Ok(this)
    }

    /// Capture the canvas after a finished stroke and append it.
    pub fn record_stroke(
        &mut self,
        canvas: &Canvas,
        store: &mut dyn KeyValueStore,
    ) -> Result<(), SnapshotError> {
        let snapshot = Snapshot::capture(canvas)?;
        self.history.push(snapshot);
        self.persist(store);
        debug!(entries = self.history.len(), "stroke recorded");
        Ok(())
    }

    /// Step back one stroke. Returns `Ok(false)` when only the blank seed is
    /// left, in which case nothing changes.
    ///
    /// If the entry being returned to cannot be decoded the history is reset
    /// as by [`HistoryStore::clear`].
    pub fn undo(
        &mut self,
        canvas: &mut Canvas,
        store: &mut dyn KeyValueStore,
    ) -> Result<bool, SnapshotError> {
        let Some(previous) = self.history.pop() else {
            debug!("nothing to undo");
            return Ok(false);
        };

        if let Err(e) = Self::restore(canvas, previous) {
            warn!(error = %e, "undo target unreadable, resetting to blank canvas");
            self.clear(canvas, store)?;
            return Ok(true);
        }

        self.persist(store);
        debug!(entries = self.history.len(), "undo applied");
        Ok(true)
    }

    /// Reset the canvas to the background and the history to one fresh seed.
    pub fn clear(
        &mut self,
        canvas: &mut Canvas,
        store: &mut dyn KeyValueStore,
    ) -> Result<(), SnapshotError> {
        canvas.clear();
        canvas.fill(self.background);
        self.history.reset(Snapshot::capture(canvas)?);
        self.persist(store);
        info!("canvas cleared");
        Ok(())
    }

    /// Paint `snapshot` over the whole canvas, replacing prior contents.
    pub fn restore(canvas: &mut Canvas, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        snapshot.restore(canvas)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn state(&self) -> HistoryState {
        self.history.state()
    }

    /// False after the most recent write failed; the session then runs from
    /// memory only until a write succeeds again.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    fn persist(&mut self, store: &mut dyn KeyValueStore) {
        match save_json(store, &self.key, &self.history) {
            Ok(()) => {
                if !self.durable {
                    info!(key = %self.key, "history persistence recovered");
                }
                self.durable = true;
            }
            Err(e) => {
                warn!(
                    key = %self.key,
                    entries = self.history.len(),
                    error = %e,
                    "history not persisted, continuing in memory"
                );
                self.durable = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn blank(width: u32, height: u32) -> Canvas {
        Canvas::new(width, height, Color32::TRANSPARENT)
    }

    fn persisted(store: &MemoryStore, key: &str) -> History {
        load_json::<History>(store, key).unwrap().unwrap()
    }

    #[test]
    fn test_history_never_empty() {
        let seed = Snapshot::from_png(vec![0]);
        let mut history = History::seeded(seed.clone());
        assert_eq!(history.len(), 1);
        assert_eq!(history.state(), HistoryState::Seeded);
        assert!(history.pop().is_none());
        assert_eq!(history.last(), &seed);

        history.push(Snapshot::from_png(vec![1]));
        history.push(Snapshot::from_png(vec![2]));
        assert_eq!(history.state(), HistoryState::Populated(3));
        assert_eq!(history.pop(), Some(&Snapshot::from_png(vec![1])));
        assert_eq!(history.iter().count(), 2);
    }

    #[test]
    fn test_history_serialization_rejects_empty() {
        let mut history = History::seeded(Snapshot::from_png(vec![9]));
        history.push(Snapshot::from_png(vec![8]));
        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(json, "[[9],[8]]");
        assert_eq!(serde_json::from_str::<History>(&json).unwrap(), history);

        assert!(serde_json::from_str::<History>("[]").is_err());
    }

    #[test]
    fn test_initialize_fresh_seeds_and_persists() {
        let mut store = MemoryStore::new();
        let mut canvas = blank(8, 8);
        let hs = HistoryStore::initialize(&mut canvas, Color32::WHITE, "h", &mut store).unwrap();

        assert_eq!(hs.state(), HistoryState::Seeded);
        assert!(canvas.pixels().iter().all(|p| *p == Color32::WHITE));
        assert_eq!(&persisted(&store, "h"), hs.history());
        assert!(hs.is_durable());
    }

    #[test]
    fn test_initialize_recovers_from_corrupt_store() {
        let mut store = MemoryStore::new();
        store.set("h", "[[1,2,3]]").unwrap();
        let mut canvas = blank(8, 8);
        let hs = HistoryStore::initialize(&mut canvas, Color32::WHITE, "h", &mut store).unwrap();

        assert_eq!(hs.len(), 1);
        assert!(canvas.pixels().iter().all(|p| *p == Color32::WHITE));
        // the corrupt value is replaced by the fresh seed
        assert_eq!(&persisted(&store, "h"), hs.history());
    }

    #[test]
    fn test_record_undo_persist_in_lockstep() {
        let mut store = MemoryStore::new();
        let mut canvas = blank(6, 6);
        let mut hs = HistoryStore::initialize(&mut canvas, Color32::WHITE, "h", &mut store).unwrap();

        canvas.set_pixel(1, 1, Color32::BLACK);
        hs.record_stroke(&canvas, &mut store).unwrap();
        let after_first = canvas.clone();
        assert_eq!(&persisted(&store, "h"), hs.history());

        canvas.set_pixel(2, 2, Color32::BLACK);
        hs.record_stroke(&canvas, &mut store).unwrap();
        assert_eq!(hs.state(), HistoryState::Populated(3));
        assert_eq!(persisted(&store, "h").len(), 3);

        assert!(hs.undo(&mut canvas, &mut store).unwrap());
        assert_eq!(canvas, after_first);
        assert_eq!(&persisted(&store, "h"), hs.history());
    }

    #[test]
    fn test_undo_on_seed_is_noop() {
        let mut store = MemoryStore::new();
        let mut canvas = blank(4, 4);
        let mut hs = HistoryStore::initialize(&mut canvas, Color32::WHITE, "h", &mut store).unwrap();
        canvas.set_pixel(0, 0, Color32::BLACK);
        let before = canvas.clone();

        assert!(!hs.undo(&mut canvas, &mut store).unwrap());
        assert_eq!(canvas, before);
        assert_eq!(hs.len(), 1);
    }

    #[test]
    fn test_undo_to_corrupt_entry_resets() {
        let mut store = MemoryStore::new();
        let good = Snapshot::capture(&Canvas::new(4, 4, Color32::BLACK)).unwrap();
        let entries = vec![Snapshot::from_png(vec![0, 1]), Snapshot::from_png(vec![2]), good];
        save_json(&mut store, "h", &entries).unwrap();

        let mut canvas = blank(4, 4);
        let mut hs = HistoryStore::initialize(&mut canvas, Color32::WHITE, "h", &mut store).unwrap();
        assert_eq!(hs.len(), 3);
        assert!(canvas.pixels().iter().all(|p| *p == Color32::BLACK));

        assert!(hs.undo(&mut canvas, &mut store).unwrap());
        assert_eq!(hs.state(), HistoryState::Seeded);
        assert!(canvas.pixels().iter().all(|p| *p == Color32::WHITE));
        assert_eq!(&persisted(&store, "h"), hs.history());
    }

    #[test]
    fn test_clear_reseeds() {
        let mut store = MemoryStore::new();
        let mut canvas = blank(4, 4);
        let mut hs = HistoryStore::initialize(&mut canvas, Color32::WHITE, "h", &mut store).unwrap();
        for i in 0..3 {
            canvas.set_pixel(i, i, Color32::BLACK);
            hs.record_stroke(&canvas, &mut store).unwrap();
        }

        hs.clear(&mut canvas, &mut store).unwrap();
        assert_eq!(hs.len(), 1);
        assert_eq!(canvas.scan_black().count, 0);
        assert_eq!(persisted(&store, "h").len(), 1);
    }

    #[test]
    fn test_quota_failure_degrades_to_memory() {
        let mut canvas = blank(4, 4);
        let mut store = MemoryStore::with_quota(4096);
        let mut hs = HistoryStore::initialize(&mut canvas, Color32::WHITE, "h", &mut store).unwrap();
        assert!(hs.is_durable());

        let mut degraded = false;
        for i in 0..64u32 {
            canvas.set_pixel(i % 4, (i / 4) % 4, Color32::from_rgb(i as u8, 7, 9));
            hs.record_stroke(&canvas, &mut store).unwrap();
            if !hs.is_durable() {
                degraded = true;
                break;
            }
        }
        assert!(degraded);

        // still fully usable in memory
        let len = hs.len();
        assert!(hs.undo(&mut canvas, &mut store).unwrap());
        assert_eq!(hs.len(), len - 1);
    }
}
