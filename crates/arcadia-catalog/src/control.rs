//! On-screen touch control specifications
//!
//! A control spec describes one synthesized overlay (button, joystick,
//! swipe zone or tap zone) in the game's design coordinate space. Specs are
//! immutable once attached; the adapter owns all runtime visual state.

use serde::{Deserialize, Serialize};

/// Kind of synthesized control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Button,
    Joystick,
    Swipe,
    Tap,
}

/// Point in design coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Extent in design coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// One overlay control, positioned and sized in design coordinates.
///
/// `key_mapping` is ordered: buttons and taps use the first entry;
/// joysticks and swipe zones expect `[up, down, left, right]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouchControlSpec {
    pub id: String,
    pub kind: ControlKind,
    pub position: Position,
    pub size: Size,

    #[serde(default)]
    pub key_mapping: Vec<String>,

    /// Optional label shown on the overlay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Swipe-distance scaling factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<f32>,
}

impl TouchControlSpec {
    pub fn new(id: impl Into<String>, kind: ControlKind, position: Position, size: Size) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            size,
            key_mapping: Vec::new(),
            action: None,
            sensitivity: None,
        }
    }

    pub fn with_keys<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.key_mapping = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = Some(sensitivity);
        self
    }

    /// First mapped key, used by button and tap controls.
    pub fn primary_key(&self) -> Option<&str> {
        self.key_mapping.first().map(String::as_str)
    }

    /// Hit-test a design-space point against this control's box.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.position.x
            && x <= self.position.x + self.size.width
            && y >= self.position.y
            && y <= self.position.y + self.size.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joystick() -> TouchControlSpec {
        TouchControlSpec::new(
            "move",
            ControlKind::Joystick,
            Position::new(100.0, 400.0),
            Size::new(140.0, 140.0),
        )
        .with_keys(["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"])
    }

    #[test]
    fn test_builder() {
        let spec = joystick();
        assert_eq!(spec.kind, ControlKind::Joystick);
        assert_eq!(spec.key_mapping.len(), 4);
        assert_eq!(spec.primary_key(), Some("ArrowUp"));
    }

    #[test]
    fn test_contains() {
        let spec = joystick();
        assert!(spec.contains(100.0, 400.0));
        assert!(spec.contains(170.0, 470.0));
        assert!(spec.contains(240.0, 540.0));
        assert!(!spec.contains(241.0, 470.0));
        assert!(!spec.contains(170.0, 399.0));
    }

    #[test]
    fn test_spec_round_trips_through_toml() {
        let spec = joystick().with_sensitivity(1.5);
        let text = toml::to_string(&spec).unwrap();
        let parsed: TouchControlSpec = toml::from_str(&text).unwrap();
        assert_eq!(parsed.id, "move");
        assert_eq!(parsed.sensitivity, Some(1.5));
        assert_eq!(parsed.key_mapping, spec.key_mapping);
    }
}
