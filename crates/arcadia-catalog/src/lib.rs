//! Per-game touch adaptation catalog
//!
//! Maps a game identifier plus a device profile to the set of on-screen
//! controls to synthesize, the preferred orientation, and the viewport fit
//! mode. The catalog is a plain data table: built-in entries cover the
//! portal's launch lineup, a TOML file can override or extend them, and
//! unknown identifiers always degrade to a generic two-control scheme
//! instead of failing.

mod catalog;
mod control;
mod game_config;

pub use catalog::{AdaptationCatalog, AdaptationEntry};
pub use control::{ControlKind, Position, Size, TouchControlSpec};
pub use game_config::{
    DEFAULT_DESIGN_HEIGHT, DEFAULT_DESIGN_WIDTH, GameConfig, MIN_SCREEN_FLOOR, ScaleMode,
};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}
