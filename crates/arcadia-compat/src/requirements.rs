//! Per-game requirements registry
//!
//! Static records describing what each game needs from a device. Loaded
//! once at startup (built-in table or TOML file) and never mutated. Unknown
//! game identifiers resolve to a maximally permissive default record so a
//! game missing from the registry can never fail a compatibility check on
//! lookup alone.

use crate::CompatError;
use arcadia_device::{Orientation, ScreenSize};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// What one game needs from the device running it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRequirements {
    pub min_screen: Option<ScreenSize>,

    pub needs_keyboard: bool,
    pub needs_mouse: bool,
    pub needs_audio: bool,
    pub needs_3d: bool,
    pub needs_gamepad: bool,

    /// Supported orientations; empty means any.
    pub supported_orientations: Vec<Orientation>,

    pub min_memory_mb: Option<u64>,
    pub min_bandwidth_kbps: Option<u32>,

    pub offline_capable: bool,
}

impl GameRequirements {
    /// Whether the game can run in the given orientation.
    pub fn supports_orientation(&self, orientation: Orientation) -> bool {
        self.supported_orientations.is_empty()
            || self.supported_orientations.contains(&orientation)
    }
}

/// On-disk registry format: one `[games.<id>]` table per entry.
#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    games: HashMap<String, GameRequirements>,
}

/// In-memory registry of per-game requirements.
#[derive(Debug)]
pub struct RequirementsRegistry {
    games: HashMap<String, GameRequirements>,
    permissive_default: GameRequirements,
}

impl RequirementsRegistry {
    /// Registry covering the portal's built-in lineup.
    pub fn builtin() -> Self {
        let mut games = HashMap::new();

        games.insert(
            "box-jump".to_string(),
            GameRequirements {
                min_screen: Some(ScreenSize::new(480, 320)),
                needs_keyboard: true,
                supported_orientations: vec![Orientation::Landscape],
                ..Default::default()
            },
        );

        games.insert(
            "beat-tapper".to_string(),
            GameRequirements {
                needs_audio: true,
                offline_capable: true,
                ..Default::default()
            },
        );

        games.insert(
            "tile-slide".to_string(),
            GameRequirements {
                needs_mouse: true,
                offline_capable: true,
                ..Default::default()
            },
        );

        games.insert(
            "star-drift".to_string(),
            GameRequirements {
                min_screen: Some(ScreenSize::new(640, 360)),
                needs_keyboard: true,
                needs_3d: true,
                supported_orientations: vec![Orientation::Landscape],
                min_memory_mb: Some(512),
                ..Default::default()
            },
        );

        games.insert(
            "brick-break".to_string(),
            GameRequirements {
                needs_mouse: true,
                supported_orientations: vec![Orientation::Landscape],
                ..Default::default()
            },
        );

        Self {
            games,
            permissive_default: GameRequirements::default(),
        }
    }

    /// Load a registry from a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self, CompatError> {
        let file: RegistryFile = toml::from_str(contents)?;
        Ok(Self {
            games: file.games,
            permissive_default: GameRequirements::default(),
        })
    }

    /// Load a registry from a TOML file.
    pub fn load(path: &Path) -> Result<Self, CompatError> {
        if !path.exists() {
            return Err(CompatError::NotFound(path.to_path_buf()));
        }
        let registry = Self::from_toml_str(&std::fs::read_to_string(path)?);
        if let Ok(ref r) = registry {
            tracing::info!(
                "Loaded requirements for {} games from {}",
                r.games.len(),
                path.display()
            );
        }
        registry
    }

    /// Requirements for a game; unknown ids get the permissive default.
    pub fn get(&self, game_id: &str) -> &GameRequirements {
        self.games.get(game_id).unwrap_or_else(|| {
            tracing::debug!("No requirements for '{game_id}', using permissive default");
            &self.permissive_default
        })
    }

    pub fn contains(&self, game_id: &str) -> bool {
        self.games.contains_key(game_id)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl Default for RequirementsRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
