//! Viewport geometry
//!
//! Maps the game's design coordinate space onto the physical screen box.
//! The computed transform is the single source of truth for both overlay
//! placement and for translating touches back into design space; using the
//! same factors in both directions is what keeps touch targets visually and
//! functionally aligned.

use crate::{OverlayPlacement, SurfaceError};
use arcadia_catalog::{GameConfig, ScaleMode, TouchControlSpec};
use arcadia_device::{Orientation, ScreenSize};
use serde::{Deserialize, Serialize};

/// Tolerance for float comparisons against the screen box.
const BOX_EPSILON: f32 = 0.5;

/// Margin factor applied when a fitted surface still overflows the screen
/// box (stale dimensions around orientation changes).
const SAFETY_CLAMP: f32 = 0.95;

/// The post-scale pixel box of the game surface, with centering offsets.
///
/// Recomputed from scratch on every resize/orientation event; never mutated
/// in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Scaled surface box in screen pixels.
    pub width: f32,
    pub height: f32,

    /// Uniform scale factor; 1.0 under `Stretch`, where the per-axis
    /// factors come from the box itself.
    pub scale: f32,

    /// Centering margins; negative under `Fill` when the surface crops.
    pub offset_x: f32,
    pub offset_y: f32,

    pub orientation: Orientation,
}

impl ViewportConfig {
    /// Per-axis scale factors. Equal under `Fit`/`Fill`; independent under
    /// `Stretch`. Derived from the box so one formula serves all modes.
    pub fn axis_scale(&self, config: &GameConfig) -> (f32, f32) {
        (
            self.width / config.width.max(1) as f32,
            self.height / config.height.max(1) as f32,
        )
    }

    /// Translate a screen-pixel point into design coordinates.
    pub fn to_design(&self, config: &GameConfig, screen_x: f32, screen_y: f32) -> (f32, f32) {
        let (sx, sy) = self.axis_scale(config);
        ((screen_x - self.offset_x) / sx, (screen_y - self.offset_y) / sy)
    }

    /// Translate a design-space point into screen pixels.
    pub fn to_screen(&self, config: &GameConfig, design_x: f32, design_y: f32) -> (f32, f32) {
        let (sx, sy) = self.axis_scale(config);
        (self.offset_x + design_x * sx, self.offset_y + design_y * sy)
    }
}

/// Compute the viewport transform for a game config on a screen box.
pub fn compute_viewport(config: &GameConfig, screen: ScreenSize) -> ViewportConfig {
    let sw = screen.width.max(1) as f32;
    let sh = screen.height.max(1) as f32;
    let gw = config.width.max(1) as f32;
    let gh = config.height.max(1) as f32;

    let (width, height, scale) = match config.scale_mode {
        ScaleMode::Fit => {
            let mut scale = (sw / gw).min(sh / gh);
            // Stale screen boxes around orientation changes can leave the
            // fitted surface overflowing; pull it back under the box so the
            // host never scrolls.
            if gw * scale > sw + BOX_EPSILON || gh * scale > sh + BOX_EPSILON {
                scale = SAFETY_CLAMP * (sw / gw).min(sh / gh);
            }
            (gw * scale, gh * scale, scale)
        }
        ScaleMode::Fill => {
            let scale = (sw / gw).max(sh / gh);
            (gw * scale, gh * scale, scale)
        }
        ScaleMode::Stretch => (sw, sh, 1.0),
    };

    let viewport = ViewportConfig {
        width,
        height,
        scale,
        offset_x: (sw - width) / 2.0,
        offset_y: (sh - height) / 2.0,
        orientation: Orientation::of(screen),
    };

    tracing::debug!(
        mode = ?config.scale_mode,
        scale = viewport.scale,
        "viewport {}x{} on screen {}x{}",
        viewport.width,
        viewport.height,
        screen.width,
        screen.height
    );

    viewport
}

/// Screen-pixel placement for one control under the current transform.
pub fn place_control(
    spec: &TouchControlSpec,
    config: &GameConfig,
    viewport: &ViewportConfig,
) -> Result<OverlayPlacement, SurfaceError> {
    if spec.size.width <= 0.0 || spec.size.height <= 0.0 {
        return Err(SurfaceError::Overlay(format!(
            "control '{}' has a degenerate size",
            spec.id
        )));
    }

    let (x, y) = viewport.to_screen(config, spec.position.x, spec.position.y);
    let (sx, sy) = viewport.axis_scale(config);

    Ok(OverlayPlacement {
        control_id: spec.id.clone(),
        x,
        y,
        width: spec.size.width * sx,
        height: spec.size.height * sy,
    })
}
