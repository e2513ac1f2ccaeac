//! Device profiling for the Arcadia adaptation engine
//!
//! Classifies the host device (phone, tablet, desktop; touch capability;
//! orientation; platform) from an explicit environment snapshot, so the rest
//! of the engine can decide which controls to synthesize and how to scale
//! the game surface.
//!
//! # Example
//!
//! ```
//! use arcadia_device::{DeviceProfile, EnvironmentSnapshot};
//!
//! let env = EnvironmentSnapshot::desktop_default();
//! let profile = DeviceProfile::detect(&env);
//! assert!(!profile.is_mobile);
//! assert_eq!(profile.screen.width, 1920);
//! ```

mod profile;
mod snapshot;

pub use profile::{DeviceProfile, Orientation, Platform, ScreenSize};
pub use snapshot::EnvironmentSnapshot;
