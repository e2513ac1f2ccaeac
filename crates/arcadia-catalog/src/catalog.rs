//! The adaptation table
//!
//! One entry per game, keyed by the portal's game identifier. Entries are
//! pure data; lookups never fail. Unknown identifiers resolve to a generic
//! two-control scheme (joystick + action button) so a game the catalog has
//! never heard of still gets playable touch input.

use crate::{
    CatalogError, ControlKind, DEFAULT_DESIGN_HEIGHT, DEFAULT_DESIGN_WIDTH, GameConfig,
    MIN_SCREEN_FLOOR, Position, ScaleMode, Size, TouchControlSpec,
};
use arcadia_device::{DeviceProfile, Orientation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Touch-target enlargement applied on tablet form factors.
const TABLET_CONTROL_SCALE: f32 = 1.25;

/// One catalog entry: the control scheme and presentation preferences for a
/// single interaction model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptationEntry {
    #[serde(default)]
    pub controls: Vec<TouchControlSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_orientation: Option<Orientation>,

    #[serde(default = "default_scale_mode")]
    pub scale_mode: ScaleMode,
}

fn default_scale_mode() -> ScaleMode {
    ScaleMode::Fit
}

impl AdaptationEntry {
    /// Build the session [`GameConfig`] at the default design resolution.
    pub fn into_game_config(self) -> GameConfig {
        self.into_game_config_sized(DEFAULT_DESIGN_WIDTH, DEFAULT_DESIGN_HEIGHT)
    }

    /// Build the session [`GameConfig`] at an explicit design resolution,
    /// applying the universal minimum screen floor.
    pub fn into_game_config_sized(self, width: u32, height: u32) -> GameConfig {
        GameConfig {
            width,
            height,
            scale_mode: self.scale_mode,
            touch_controls: self.controls,
            preferred_orientation: self.preferred_orientation,
            min_screen: Some(MIN_SCREEN_FLOOR),
        }
    }
}

/// On-disk catalog format: a `[games.<id>]` table per entry plus an
/// optional `[default]` override.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    games: HashMap<String, AdaptationEntry>,

    #[serde(default)]
    default: Option<AdaptationEntry>,
}

/// Lookup table from game identifier to adaptation entry.
#[derive(Debug)]
pub struct AdaptationCatalog {
    entries: HashMap<String, AdaptationEntry>,
    default_entry: AdaptationEntry,
}

impl AdaptationCatalog {
    /// Catalog covering the portal's built-in lineup.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();

        // Run-and-jump: stick to move, one button to jump.
        entries.insert(
            "box-jump".to_string(),
            AdaptationEntry {
                controls: vec![
                    joystick("move", 60.0, 420.0),
                    button("jump", 660.0, 460.0, "Space", "Jump"),
                ],
                preferred_orientation: Some(Orientation::Landscape),
                scale_mode: ScaleMode::Fit,
            },
        );

        // Timing game: the whole surface is one tap zone.
        entries.insert(
            "beat-tapper".to_string(),
            AdaptationEntry {
                controls: vec![full_surface_zone("tap", ControlKind::Tap, vec!["Space"])],
                preferred_orientation: Some(Orientation::Portrait),
                scale_mode: ScaleMode::Fit,
            },
        );

        // Drag puzzle: the whole surface is one swipe zone.
        entries.insert(
            "tile-slide".to_string(),
            AdaptationEntry {
                controls: vec![
                    full_surface_zone(
                        "slide",
                        ControlKind::Swipe,
                        vec!["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"],
                    )
                    .with_sensitivity(1.0),
                ],
                preferred_orientation: Some(Orientation::Portrait),
                scale_mode: ScaleMode::Fit,
            },
        );

        // Twin-control shooter: stick plus fire, cropped to fill the screen.
        entries.insert(
            "star-drift".to_string(),
            AdaptationEntry {
                controls: vec![
                    joystick("steer", 60.0, 420.0),
                    button("fire", 660.0, 460.0, "KeyX", "Fire"),
                ],
                preferred_orientation: Some(Orientation::Landscape),
                scale_mode: ScaleMode::Fill,
            },
        );

        // Paddle game: two directional buttons, stretched edge to edge.
        entries.insert(
            "brick-break".to_string(),
            AdaptationEntry {
                controls: vec![
                    button("left", 20.0, 480.0, "ArrowLeft", "Left"),
                    button("right", 684.0, 480.0, "ArrowRight", "Right"),
                ],
                preferred_orientation: Some(Orientation::Landscape),
                scale_mode: ScaleMode::Stretch,
            },
        );

        Self {
            entries,
            default_entry: generic_entry(),
        }
    }

    /// Load a catalog from a TOML string, falling back to the built-in
    /// generic entry when the file does not override `[default]`.
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(contents)?;
        Ok(Self {
            entries: file.games,
            default_entry: file.default.unwrap_or_else(generic_entry),
        })
    }

    /// Load a catalog from a TOML file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&contents)?;
        tracing::info!(
            "Loaded adaptation catalog with {} entries from {}",
            catalog.entries.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Number of explicit (non-default) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a game has an explicit entry (the generic fallback still
    /// applies when it does not).
    pub fn contains(&self, game_id: &str) -> bool {
        self.entries.contains_key(game_id)
    }

    /// Resolve the adaptation entry for a game on a given device.
    ///
    /// Never fails: unknown identifiers get the generic two-control
    /// scheme. Tablet form factors get proportionally larger touch targets.
    pub fn entry(&self, game_id: &str, profile: &DeviceProfile) -> AdaptationEntry {
        let mut entry = match self.entries.get(game_id) {
            Some(entry) => entry.clone(),
            None => {
                tracing::debug!("No catalog entry for '{game_id}', using generic scheme");
                self.default_entry.clone()
            }
        };

        if profile.form_factor_is_tablet() {
            for control in &mut entry.controls {
                control.size.width *= TABLET_CONTROL_SCALE;
                control.size.height *= TABLET_CONTROL_SCALE;
            }
        }

        entry
    }

    /// Resolve and build the session config in one step.
    pub fn game_config(&self, game_id: &str, profile: &DeviceProfile) -> GameConfig {
        self.entry(game_id, profile).into_game_config()
    }
}

impl Default for AdaptationCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Generic two-control scheme for games absent from the catalog.
fn generic_entry() -> AdaptationEntry {
    AdaptationEntry {
        controls: vec![
            joystick("move", 60.0, 420.0),
            button("action", 660.0, 460.0, "Space", "Action"),
        ],
        preferred_orientation: None,
        scale_mode: ScaleMode::Fit,
    }
}

fn joystick(id: &str, x: f32, y: f32) -> TouchControlSpec {
    TouchControlSpec::new(
        id,
        ControlKind::Joystick,
        Position::new(x, y),
        Size::new(140.0, 140.0),
    )
    .with_keys(["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"])
}

fn button(id: &str, x: f32, y: f32, key: &str, action: &str) -> TouchControlSpec {
    TouchControlSpec::new(
        id,
        ControlKind::Button,
        Position::new(x, y),
        Size::new(96.0, 96.0),
    )
    .with_keys([key])
    .with_action(action)
}

fn full_surface_zone(id: &str, kind: ControlKind, keys: Vec<&str>) -> TouchControlSpec {
    TouchControlSpec::new(
        id,
        kind,
        Position::new(0.0, 0.0),
        Size::new(DEFAULT_DESIGN_WIDTH as f32, DEFAULT_DESIGN_HEIGHT as f32),
    )
    .with_keys(keys)
}
