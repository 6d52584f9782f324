//! sketch-ui: the sketchpad controller and its command surface.
//!
//! The host (a browser page, or the `sketchpad` binary reading stdin) turns
//! user input into [`Command`]s and applies them to a [`Sketchpad`].

pub mod command;
pub mod config;
pub mod pad;

pub use command::{Command, CommandError, Reply, ToolChoice};
pub use config::{ConfigError, PadConfig, StorageConfig, CONFIG_ENV};
pub use pad::Sketchpad;
