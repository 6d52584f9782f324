//! Pad configuration.
//!
//! Loaded from a JSON file; every field has a default so an empty object (or
//! no file at all) gives the stock 600x1000 white surface with a 1px black pen.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sketch_core::{Color32, SURFACE_HEIGHT, SURFACE_WIDTH};
use sketch_history::{HISTORY_KEY, NOTES_KEY};
use thiserror::Error;

/// Environment variable consulted for a config path when none is given.
pub const CONFIG_ENV: &str = "SKETCHPAD_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    pub width: u32,
    pub height: u32,
    /// Un-premultiplied RGBA.
    pub background: [u8; 4],
    pub brush_color: [u8; 4],
    pub brush_size: u32,
    /// The surface starts hidden unless this is set.
    pub start_visible: bool,
    pub storage: StorageConfig,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
            background: [255, 255, 255, 255],
            brush_color: [0, 0, 0, 255],
            brush_size: 1,
            start_visible: false,
            storage: StorageConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for file-backed storage. `None` keeps everything in memory.
    pub dir: Option<PathBuf>,
    pub history_key: String,
    pub notes_key: String,
    /// Byte cap for the in-memory store.
    pub quota_bytes: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            history_key: HISTORY_KEY.into(),
            notes_key: NOTES_KEY.into(),
            quota_bytes: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("surface dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("brush size must be at least 1")]
    ZeroBrush,

    #[error("brush size {size} exceeds the smaller surface side ({max})")]
    BrushTooLarge { size: u32, max: u32 },

    #[error("history and notes cannot share the storage key '{0}'")]
    KeyCollision(String),
}

fn color(rgba: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3])
}

impl PadConfig {
    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("read config file: {}", path.display()))?;
        let config: PadConfig = serde_json::from_str(&data).context("parse config json")?;
        config
            .validate()
            .with_context(|| format!("invalid config: {}", path.display()))?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.brush_size == 0 {
            return Err(ConfigError::ZeroBrush);
        }
        let max = self.width.min(self.height);
        if self.brush_size > max {
            return Err(ConfigError::BrushTooLarge {
                size: self.brush_size,
                max,
            });
        }
        if self.storage.history_key == self.storage.notes_key {
            return Err(ConfigError::KeyCollision(self.storage.history_key.clone()));
        }
        Ok(())
    }

    pub fn background_color(&self) -> Color32 {
        color(self.background)
    }

    pub fn brush_color(&self) -> Color32 {
        color(self.brush_color)
    }
}
