//! Environment snapshot
//!
//! A one-shot capture of the ambient signals the host exposes (user agent,
//! screen box, touch points, pixel ratio). The profiler only ever reads a
//! snapshot, never the live environment, so classification stays a pure
//! function and hosts without browser globals fall back to a fixed default.

use serde::{Deserialize, Serialize};

/// Raw environment signals captured by the host at startup and on every
/// resize or orientation event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    /// User-agent string, empty when the host has none.
    #[serde(default)]
    pub user_agent: String,

    /// Screen box in physical CSS pixels.
    pub screen_width: u32,
    pub screen_height: u32,

    /// Device pixel ratio as reported; values below 1.0 are clamped during
    /// profiling.
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f64,

    /// Touch-start capability reported by the host.
    #[serde(default)]
    pub touch_capable: bool,

    /// Maximum simultaneous touch points.
    #[serde(default)]
    pub max_touch_points: u32,

    /// Logical CPU core count, if the host reports one.
    #[serde(default)]
    pub hardware_concurrency: Option<u32>,

    /// Estimated available memory in megabytes, if the host reports one.
    #[serde(default)]
    pub device_memory_mb: Option<u64>,

    /// Whether any gamepad is currently connected.
    #[serde(default)]
    pub gamepad_connected: bool,
}

fn default_pixel_ratio() -> f64 {
    1.0
}

impl EnvironmentSnapshot {
    /// Fixed fallback for hosts with no browser globals (server-side
    /// render): a plain 1920x1080 desktop with no touch capability.
    pub fn desktop_default() -> Self {
        Self {
            user_agent: String::new(),
            screen_width: 1920,
            screen_height: 1080,
            pixel_ratio: 1.0,
            touch_capable: false,
            max_touch_points: 0,
            hardware_concurrency: Some(8),
            device_memory_mb: None,
            gamepad_connected: false,
        }
    }

    /// Snapshot for a given screen box with touch enabled; handy when the
    /// host only knows its viewport.
    pub fn touch_screen(width: u32, height: u32) -> Self {
        Self {
            screen_width: width,
            screen_height: height,
            touch_capable: true,
            max_touch_points: 5,
            ..Self::desktop_default()
        }
    }
}

impl Default for EnvironmentSnapshot {
    fn default() -> Self {
        Self::desktop_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_default() {
        let env = EnvironmentSnapshot::desktop_default();
        assert_eq!(env.screen_width, 1920);
        assert_eq!(env.screen_height, 1080);
        assert_eq!(env.pixel_ratio, 1.0);
        assert!(!env.touch_capable);
        assert!(env.user_agent.is_empty());
    }

    #[test]
    fn test_touch_screen_helper() {
        let env = EnvironmentSnapshot::touch_screen(390, 844);
        assert_eq!(env.screen_width, 390);
        assert!(env.touch_capable);
        assert!(env.max_touch_points > 0);
    }

    #[test]
    fn test_snapshot_deserializes_with_defaults() {
        let env: EnvironmentSnapshot =
            serde_json::from_str(r#"{"screen_width": 320, "screen_height": 568}"#).unwrap();
        assert_eq!(env.pixel_ratio, 1.0);
        assert!(!env.touch_capable);
        assert_eq!(env.max_touch_points, 0);
        assert!(env.hardware_concurrency.is_none());
    }
}
