//! Touch input adapter
//!
//! The runtime bridge between finger input and the keyboard-shaped input a
//! game surface expects. Given a [`GameConfig`](arcadia_catalog::GameConfig)
//! and a host surface, the adapter synthesizes overlay controls, recognizes
//! gestures (buttons, joysticks, swipes, taps), injects key events toward
//! the game, and keeps the viewport transform correct across orientation
//! changes.
//!
//! The host environment plugs in through two seams: [`GameSurface`] (the
//! opaque visual element the overlays live on) and [`InputInjector`] (the
//! synthetic key dispatcher). [`mock`] provides recording implementations
//! of both so gesture logic can be exercised without a real display.
//!
//! # Example
//!
//! ```
//! use arcadia_catalog::AdaptationCatalog;
//! use arcadia_device::{DeviceProfile, EnvironmentSnapshot};
//! use arcadia_input::TouchAdapter;
//! use arcadia_input::mock::{MockSurface, RecordingInjector};
//!
//! let profile = DeviceProfile::detect(&EnvironmentSnapshot::touch_screen(390, 844));
//! let config = AdaptationCatalog::builtin().game_config("box-jump", &profile);
//!
//! let mut adapter = TouchAdapter::new(RecordingInjector::new());
//! adapter.attach(MockSurface::new(390, 844), config).unwrap();
//! assert!(adapter.is_attached());
//! adapter.cleanup();
//! ```

mod adapter;
mod gesture;
mod injector;
pub mod mock;
mod surface;
mod timer;
mod viewport;

pub use adapter::{KEY_TAP_RELEASE_MS, ORIENTATION_SETTLE_MS, TouchAdapter};
pub use gesture::{
    Direction, DirectionSet, JOYSTICK_DEAD_ZONE, SWIPE_MAX_DURATION_MS, SWIPE_MIN_DISTANCE,
    TouchPoint, clamp_knob, recognize_swipe,
};
pub use injector::{InjectError, InputInjector};
pub use surface::{GameSurface, OverlayPlacement, PresentationHint, SurfaceError};
pub use timer::{DeferredAction, TimerQueue, TimerSlot};
pub use viewport::{ViewportConfig, compute_viewport, place_control};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Input injection error: {0}")]
    Inject(#[from] InjectError),
}
