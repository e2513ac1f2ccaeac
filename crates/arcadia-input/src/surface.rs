//! Game surface seam
//!
//! The opaque visual element the adapter decorates. The host owns rendering
//! entirely; the adapter only pushes placements, visual state and
//! presentation hints through this trait and reads the live screen box back.

use crate::ViewportConfig;
use arcadia_device::ScreenSize;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Surface element not found: {0}")]
    NotFound(String),

    #[error("Overlay operation failed: {0}")]
    Overlay(String),

    #[error("Presentation hint rejected: {0}")]
    HintRejected(String),
}

/// Screen-pixel box for one overlay control, derived from the control's
/// design-space spec and the current viewport transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayPlacement {
    pub control_id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Presentation adjustments the compatibility layer can ask the host to
/// apply outside the viewport transform proper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum PresentationHint {
    /// Clamp the effective device pixel ratio.
    ClampPixelRatio(f64),
    /// Scale the portal UI around the surface.
    UiScale(f32),
    /// Ask the game for its reduced-quality mode.
    ReducedQuality,
}

/// Host-side surface the adapter attaches to.
///
/// Placing an overlay whose `control_id` already exists repositions it in
/// place; hosts must not duplicate overlays on repeated placements.
pub trait GameSurface {
    /// Live screen box of the surface's container.
    fn bounds(&self) -> ScreenSize;

    /// Apply a freshly computed viewport transform.
    fn apply_viewport(&mut self, viewport: &ViewportConfig) -> Result<(), SurfaceError>;

    /// Create or reposition one overlay control.
    fn place_overlay(&mut self, placement: &OverlayPlacement) -> Result<(), SurfaceError>;

    /// Remove one overlay control. Removing an unknown id is not an error.
    fn remove_overlay(&mut self, control_id: &str) -> Result<(), SurfaceError>;

    /// Update the pressed visual of a button/tap overlay.
    fn set_overlay_pressed(&mut self, control_id: &str, pressed: bool);

    /// Update a joystick overlay's knob offset, in screen pixels from its
    /// center.
    fn set_overlay_knob(&mut self, control_id: &str, dx: f32, dy: f32);

    /// Suppress the host's default touch behaviors (scrolling, selection)
    /// on the surface while gestures are active.
    fn suppress_native_gestures(&mut self, suppressed: bool);

    /// Apply a presentation hint.
    fn apply_hint(&mut self, hint: &PresentationHint) -> Result<(), SurfaceError>;
}
