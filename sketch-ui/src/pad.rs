//! The sketchpad: drawing surface, undo history, notes and the black pixel
//! readout wired together.
//!
//! Every event that changes canvas content (stroke end, undo, clear, load
//! from storage) re-scans the raster afterwards, so the reported count always
//! matches what is on screen.

use sketch_core::{Brush, Canvas, Eraser, PixelSample, StrokeState, Tool};
use sketch_history::{HistoryStore, KeyValueStore, Notes, SnapshotError};
use tracing::{debug, info, warn};

use crate::command::{Command, Reply, ToolChoice};
use crate::config::PadConfig;

fn pick<'a>(choice: ToolChoice, brush: &'a Brush, eraser: &'a Eraser) -> &'a dyn Tool {
    match choice {
        ToolChoice::Brush => brush,
        ToolChoice::Eraser => eraser,
    }
}

pub struct Sketchpad<S: KeyValueStore> {
    canvas: Canvas,
    history: HistoryStore,
    notes: Notes,
    store: S,
    visible: bool,
    stroke: StrokeState,
    tool: ToolChoice,
    brush: Brush,
    eraser: Eraser,
    sample: PixelSample,
}

impl<S: KeyValueStore> Sketchpad<S> {
    /// Build the surface and load drawing and notes from `store`.
    pub fn open(config: &PadConfig, mut store: S) -> Result<Self, SnapshotError> {
        let background = config.background_color();
        let mut canvas = Canvas::new(config.width, config.height, background);
        let history = HistoryStore::initialize(
            &mut canvas,
            background,
            config.storage.history_key.as_str(),
            &mut store,
        )?;
        let notes = Notes::load(config.storage.notes_key.as_str(), &store);

        let mut pad = Self {
            canvas,
            history,
            notes,
            store,
            visible: config.start_visible,
            stroke: StrokeState::new(),
            tool: ToolChoice::Brush,
            brush: Brush::new(config.brush_size, config.brush_color()),
            eraser: Eraser::new(config.brush_size, background),
            sample: PixelSample::default(),
        };
        pad.rescan();
        info!(
            entries = pad.history.len(),
            black_pixels = pad.sample.count,
            "sketchpad opened"
        );
        Ok(pad)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if !self.visible {
            debug!("pointer down ignored, surface hidden");
            return;
        }
        let tool = pick(self.tool, &self.brush, &self.eraser);
        self.stroke.begin(&self.canvas, tool, x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.visible {
            return;
        }
        let tool = pick(self.tool, &self.brush, &self.eraser);
        self.stroke.extend(&mut self.canvas, tool, x, y);
    }

    pub fn pointer_up(&mut self) {
        self.finish_stroke();
    }

    pub fn pointer_leave(&mut self) {
        self.finish_stroke();
    }

    fn finish_stroke(&mut self) {
        if self.stroke.end().is_none() {
            return;
        }
        if let Err(e) = self.history.record_stroke(&self.canvas, &mut self.store) {
            warn!(error = %e, "stroke not recorded");
        }
        self.rescan();
    }

    /// Step back one stroke. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&mut self.canvas, &mut self.store) {
            Ok(true) => {
                self.rescan();
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!(error = %e, "undo failed");
                self.rescan();
                false
            }
        }
    }

    /// Wipe the drawing back to the background. Safe to call repeatedly.
    pub fn clear(&mut self) {
        if self.stroke.end().is_some() {
            debug!("active stroke discarded by clear");
        }
        if let Err(e) = self.history.clear(&mut self.canvas, &mut self.store) {
            warn!(error = %e, "clear not recorded");
        }
        self.rescan();
    }

    /// Show or hide the surface. Hiding ends any stroke in progress.
    pub fn toggle_visibility(&mut self) -> bool {
        if self.visible {
            self.finish_stroke();
        }
        self.visible = !self.visible;
        debug!(visible = self.visible, "surface visibility toggled");
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn select_tool(&mut self, tool: ToolChoice) {
        debug!(?tool, "tool selected");
        self.tool = tool;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.notes.set(text, &mut self.store);
    }

    pub fn text(&self) -> &str {
        self.notes.text()
    }

    pub fn black_pixel_count(&self) -> usize {
        self.sample.count
    }

    /// Latest scan result, including coordinates.
    pub fn sample(&self) -> &PixelSample {
        &self.sample
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tear down the pad and hand back its store, e.g. to reopen it.
    pub fn into_store(self) -> S {
        self.store
    }

    /// True while both keys are being written through successfully.
    pub fn is_durable(&self) -> bool {
        self.history.is_durable() && self.notes.is_durable()
    }

    pub fn apply(&mut self, command: Command) -> Reply {
        match command {
            Command::PointerDown { x, y } => self.pointer_down(x, y),
            Command::PointerMove { x, y } => self.pointer_move(x, y),
            Command::PointerUp => self.pointer_up(),
            Command::PointerLeave => self.pointer_leave(),
            Command::Undo => return Reply::Undone(self.undo()),
            Command::Clear => self.clear(),
            Command::ToggleVisibility => return Reply::Visible(self.toggle_visibility()),
            Command::SetText(text) => self.set_text(text),
            Command::SelectTool(tool) => self.select_tool(tool),
            Command::QueryCount => return Reply::Count(self.black_pixel_count()),
            Command::QueryText => return Reply::Text(self.text().to_string()),
        }
        Reply::Ack
    }

    fn rescan(&mut self) {
        self.sample = self.canvas.scan_black();
        info!(black_pixels = self.sample.count, "canvas scanned");
        debug!(coordinates = ?self.sample.coordinates, "black pixel coordinates");
    }
}
