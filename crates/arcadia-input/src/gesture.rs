//! Gesture recognition primitives
//!
//! Pure functions over touch displacements; no surface or timer state.
//! Thresholds are expressed in design units so recognition behaves the same
//! at every viewport scale.

use serde::{Deserialize, Serialize};

/// Joystick dead zone per axis, in design units.
pub const JOYSTICK_DEAD_ZONE: f32 = 20.0;

/// Minimum displacement for a swipe, in design units.
pub const SWIPE_MIN_DISTANCE: f32 = 50.0;

/// Maximum duration for a swipe, in milliseconds.
pub const SWIPE_MAX_DURATION_MS: f64 = 300.0;

/// One finger on the surface, in screen pixels with the host's event
/// timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub timestamp_ms: f64,
}

impl TouchPoint {
    pub fn new(id: u64, x: f32, y: f32, timestamp_ms: f64) -> Self {
        Self {
            id,
            x,
            y,
            timestamp_ms,
        }
    }
}

/// Cardinal direction, ordered to match `key_mapping`:
/// `[up, down, left, right]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Index into an `[up, down, left, right]` key mapping.
    pub fn key_index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// The set of directions a joystick displacement implies. Level-triggered:
/// recomputed from the current displacement on every move, never from
/// press/release transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionSet {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionSet {
    /// Directions implied by a displacement vector once it clears the dead
    /// zone on an axis. Screen/design y grows downward, so up is negative.
    pub fn from_displacement(dx: f32, dy: f32, dead_zone: f32) -> Self {
        Self {
            up: dy < -dead_zone,
            down: dy > dead_zone,
            left: dx < -dead_zone,
            right: dx > dead_zone,
        }
    }

    pub fn contains(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.contains(*d))
    }
}

/// Recognize a swipe from its total displacement and elapsed time.
///
/// Pure in (dx, dy, dt): recognized only when the displacement magnitude
/// exceeds [`SWIPE_MIN_DISTANCE`] and the elapsed time stays under
/// [`SWIPE_MAX_DURATION_MS`]. The dominant axis picks the direction; ties
/// go to the horizontal axis.
pub fn recognize_swipe(dx: f32, dy: f32, elapsed_ms: f64) -> Option<Direction> {
    let distance = (dx * dx + dy * dy).sqrt();
    if distance <= SWIPE_MIN_DISTANCE || elapsed_ms >= SWIPE_MAX_DURATION_MS {
        return None;
    }

    let direction = if dx.abs() >= dy.abs() {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };

    Some(direction)
}

/// Clamp a joystick knob offset to its base radius so the knob never
/// escapes the control.
pub fn clamp_knob(dx: f32, dy: f32, radius: f32) -> (f32, f32) {
    let distance = (dx * dx + dy * dy).sqrt();
    if distance <= radius || distance == 0.0 {
        (dx, dy)
    } else {
        let factor = radius / distance;
        (dx * factor, dy * factor)
    }
}
