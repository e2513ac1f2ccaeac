//! Game surface configuration
//!
//! The read-only configuration a game session runs under: design
//! resolution, viewport fit mode and the touch controls to synthesize.
//! Built once by the catalog, consumed by the touch adapter and the
//! portal's rendering layer.

use crate::TouchControlSpec;
use arcadia_device::{Orientation, ScreenSize};
use serde::{Deserialize, Serialize};

/// Default design resolution games are authored against.
pub const DEFAULT_DESIGN_WIDTH: u32 = 800;
pub const DEFAULT_DESIGN_HEIGHT: u32 = 600;

/// Universal minimum screen floor applied to every game config.
pub const MIN_SCREEN_FLOOR: ScreenSize = ScreenSize {
    width: 320,
    height: 480,
};

/// How the design surface maps onto the physical screen box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Whole surface visible, may letterbox.
    Fit,
    /// No letterboxing, may crop.
    Fill,
    /// Non-uniform stretch to the exact screen box.
    Stretch,
}

/// Per-session game configuration. Read-only once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Design resolution of the game surface.
    pub width: u32,
    pub height: u32,

    pub scale_mode: ScaleMode,

    #[serde(default)]
    pub touch_controls: Vec<TouchControlSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_orientation: Option<Orientation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_screen: Option<ScreenSize>,
}

impl GameConfig {
    /// Whether any touch controls are configured; the portal uses this to
    /// decide if the on-screen controls toggle is worth showing.
    pub fn has_touch_controls(&self) -> bool {
        !self.touch_controls.is_empty()
    }

    /// Minimum screen box, falling back to the universal floor.
    pub fn min_screen_or_floor(&self) -> ScreenSize {
        self.min_screen.unwrap_or(MIN_SCREEN_FLOOR)
    }
}
