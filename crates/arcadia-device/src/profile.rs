//! Device classification
//!
//! Turns an [`EnvironmentSnapshot`] into a [`DeviceProfile`] using the same
//! heuristics the portal's games are tuned against: user-agent token lists
//! first, screen-box-plus-touch second. Profiles are immutable value
//! objects; a resize or orientation event produces a fresh profile rather
//! than mutating an old one.

use crate::EnvironmentSnapshot;
use serde::{Deserialize, Serialize};

/// Screen box in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check whether this box covers `other` on both axes.
    pub fn covers(&self, other: ScreenSize) -> bool {
        self.width >= other.width && self.height >= other.height
    }
}

/// Screen orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Orientation implied by a screen box: landscape iff wider than tall.
    pub fn of(size: ScreenSize) -> Self {
        if size.width > size.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Host platform, resolved from the user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Android,
    Ios,
    Windows,
    Mac,
    Unknown,
}

impl Platform {
    /// Resolve by substring priority: android > ios > windows > mac.
    /// Matters because iOS user agents also contain "like Mac OS X".
    pub fn from_user_agent(ua: &str) -> Self {
        let ua = ua.to_lowercase();
        if ua.contains("android") {
            Platform::Android
        } else if ua.contains("iphone") || ua.contains("ipad") || ua.contains("ipod") {
            Platform::Ios
        } else if ua.contains("windows") {
            Platform::Windows
        } else if ua.contains("mac os") || ua.contains("macintosh") {
            Platform::Mac
        } else {
            Platform::Unknown
        }
    }
}

/// User-agent tokens that mark a phone-class device.
const MOBILE_TOKENS: &[&str] = &[
    "android",
    "iphone",
    "ipod",
    "windows phone",
    "blackberry",
    "opera mini",
    "mobile",
];

/// User-agent tokens that mark a tablet-class device.
const TABLET_TOKENS: &[&str] = &["ipad", "tablet", "kindle", "silk"];

/// Screen width at or below which a touch device is treated as a phone.
const MOBILE_MAX_WIDTH: u32 = 768;

/// Screen width range in which a touch device is treated as a tablet.
const TABLET_WIDTH_RANGE: (u32, u32) = (768, 1024);

/// Classified device, consumed by the catalog, the touch adapter and the
/// compatibility checker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub is_mobile: bool,
    pub is_tablet: bool,
    pub is_touch: bool,
    pub screen: ScreenSize,
    pub orientation: Orientation,
    pub pixel_ratio: f64,
    pub platform: Platform,
}

impl DeviceProfile {
    /// Classify a device from an environment snapshot.
    ///
    /// Pure and idempotent: the same snapshot always yields the same
    /// profile. A device can satisfy both the mobile and tablet heuristics;
    /// downstream layout code gives tablet priority via
    /// [`DeviceProfile::form_factor_is_tablet`].
    pub fn detect(env: &EnvironmentSnapshot) -> Self {
        let ua = env.user_agent.to_lowercase();
        let screen = ScreenSize::new(env.screen_width, env.screen_height);

        let is_touch = env.touch_capable || env.max_touch_points > 0;

        let ua_mobile = MOBILE_TOKENS.iter().any(|t| ua.contains(t));
        let ua_tablet = TABLET_TOKENS.iter().any(|t| ua.contains(t));

        let is_mobile = ua_mobile || (screen.width <= MOBILE_MAX_WIDTH && is_touch);
        let is_tablet = ua_tablet
            || (screen.width >= TABLET_WIDTH_RANGE.0
                && screen.width <= TABLET_WIDTH_RANGE.1
                && is_touch);

        let profile = Self {
            is_mobile,
            is_tablet,
            is_touch,
            screen,
            orientation: Orientation::of(screen),
            pixel_ratio: env.pixel_ratio.max(1.0),
            platform: Platform::from_user_agent(&env.user_agent),
        };

        tracing::debug!(
            mobile = profile.is_mobile,
            tablet = profile.is_tablet,
            touch = profile.is_touch,
            platform = ?profile.platform,
            "classified device {}x{}",
            screen.width,
            screen.height
        );

        profile
    }

    /// Tablet classification wins over mobile for control-layout purposes.
    pub fn form_factor_is_tablet(&self) -> bool {
        self.is_tablet
    }

    /// A device that has touch but no physical keyboard/mouse expectation.
    pub fn is_touch_only(&self) -> bool {
        self.is_touch && (self.is_mobile || self.is_tablet)
    }
}
