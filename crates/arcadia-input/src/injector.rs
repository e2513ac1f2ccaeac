//! Synthetic key injection seam
//!
//! The adapter never constructs host input events itself; it calls through
//! this trait, so the gesture logic can be tested against a recording
//! implementation and the portal can plug in whatever event dispatch its
//! embedding supports.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("Key event dispatch failed for '{key}': {reason}")]
    Dispatch { key: String, reason: String },
}

impl InjectError {
    pub fn dispatch(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Dispatch {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Dispatches synthesized key events at the game surface.
///
/// Keys are identified by the same strings used in
/// [`TouchControlSpec::key_mapping`](arcadia_catalog::TouchControlSpec)
/// (`"ArrowUp"`, `"Space"`, ...). Implementations must tolerate a release
/// for a key that was never pressed; the joystick's level-triggered update
/// releases all mapped directions before pressing the current set.
pub trait InputInjector {
    fn press(&mut self, key: &str) -> Result<(), InjectError>;
    fn release(&mut self, key: &str) -> Result<(), InjectError>;
}
