//! Mock implementations for testing without a real display surface
//!
//! `RecordingInjector` captures every synthesized key event and
//! `MockSurface` records overlay placements and visual state, both behind
//! shared handles so tests keep inspecting them after the adapter takes
//! ownership. The portal's desktop dev mode uses the same types to run
//! games without touch hardware.

use crate::{
    GameSurface, InjectError, InputInjector, OverlayPlacement, PresentationHint, SurfaceError,
    ViewportConfig,
};
use arcadia_device::ScreenSize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// One recorded key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedEvent {
    Press(String),
    Release(String),
}

/// Shared event log of a [`RecordingInjector`].
#[derive(Debug, Default)]
pub struct InjectorLog {
    pub events: Vec<InjectedEvent>,
    fail_keys: HashSet<String>,
}

impl InjectorLog {
    /// Keys currently held according to the event sequence.
    pub fn held(&self) -> BTreeSet<String> {
        let mut held = BTreeSet::new();
        for event in &self.events {
            match event {
                InjectedEvent::Press(key) => {
                    held.insert(key.clone());
                }
                InjectedEvent::Release(key) => {
                    held.remove(key);
                }
            }
        }
        held
    }

    /// Keys pressed, in order, ignoring releases.
    pub fn presses(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                InjectedEvent::Press(key) => Some(key.clone()),
                InjectedEvent::Release(_) => None,
            })
            .collect()
    }
}

/// Injector that records events into a shared log.
pub struct RecordingInjector {
    log: Arc<RwLock<InjectorLog>>,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self {
            log: Arc::new(RwLock::new(InjectorLog::default())),
        }
    }

    /// Make every dispatch of `key` fail, for error-path tests.
    pub fn fail_on(self, key: impl Into<String>) -> Self {
        if let Ok(mut log) = self.log.write() {
            log.fail_keys.insert(key.into());
        }
        self
    }

    /// Shared handle for inspection after the adapter takes ownership.
    pub fn log(&self) -> Arc<RwLock<InjectorLog>> {
        Arc::clone(&self.log)
    }
}

impl Default for RecordingInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl InputInjector for RecordingInjector {
    fn press(&mut self, key: &str) -> Result<(), InjectError> {
        let mut log = self
            .log
            .write()
            .map_err(|_| InjectError::dispatch(key, "log lock poisoned"))?;
        if log.fail_keys.contains(key) {
            return Err(InjectError::dispatch(key, "mock dispatch failure"));
        }
        tracing::debug!("[MOCK] key down: {key}");
        log.events.push(InjectedEvent::Press(key.to_string()));
        Ok(())
    }

    fn release(&mut self, key: &str) -> Result<(), InjectError> {
        let mut log = self
            .log
            .write()
            .map_err(|_| InjectError::dispatch(key, "log lock poisoned"))?;
        if log.fail_keys.contains(key) {
            return Err(InjectError::dispatch(key, "mock dispatch failure"));
        }
        tracing::debug!("[MOCK] key up: {key}");
        log.events.push(InjectedEvent::Release(key.to_string()));
        Ok(())
    }
}

/// Shared state of a [`MockSurface`].
#[derive(Debug)]
pub struct MockSurfaceState {
    /// Live screen box; tests mutate this to simulate rotation.
    pub bounds: ScreenSize,
    pub viewport: Option<ViewportConfig>,
    pub overlays: HashMap<String, OverlayPlacement>,
    pub pressed: HashMap<String, bool>,
    pub knobs: HashMap<String, (f32, f32)>,
    pub native_gestures_suppressed: bool,
    pub hints: Vec<PresentationHint>,
    /// Total `place_overlay` calls, including repositions.
    pub placements_applied: u32,
    /// Control id whose placement should fail, for error-path tests.
    pub fail_overlay_for: Option<String>,
}

impl MockSurfaceState {
    fn new(bounds: ScreenSize) -> Self {
        Self {
            bounds,
            viewport: None,
            overlays: HashMap::new(),
            pressed: HashMap::new(),
            knobs: HashMap::new(),
            native_gestures_suppressed: false,
            hints: Vec::new(),
            placements_applied: 0,
            fail_overlay_for: None,
        }
    }
}

/// Surface that records everything the adapter does to it.
pub struct MockSurface {
    state: Arc<RwLock<MockSurfaceState>>,
}

impl MockSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSurfaceState::new(ScreenSize::new(
                width, height,
            )))),
        }
    }

    /// Make placement of one control id fail, for error-path tests.
    pub fn failing_overlay(self, control_id: impl Into<String>) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.fail_overlay_for = Some(control_id.into());
        }
        self
    }

    /// Shared handle for manipulation and inspection in tests.
    pub fn state(&self) -> Arc<RwLock<MockSurfaceState>> {
        Arc::clone(&self.state)
    }
}

impl GameSurface for MockSurface {
    fn bounds(&self) -> ScreenSize {
        self.state
            .read()
            .map(|s| s.bounds)
            .unwrap_or(ScreenSize::new(0, 0))
    }

    fn apply_viewport(&mut self, viewport: &ViewportConfig) -> Result<(), SurfaceError> {
        if let Ok(mut state) = self.state.write() {
            state.viewport = Some(viewport.clone());
        }
        tracing::debug!(
            "[MOCK] viewport applied: {}x{}",
            viewport.width,
            viewport.height
        );
        Ok(())
    }

    fn place_overlay(&mut self, placement: &OverlayPlacement) -> Result<(), SurfaceError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| SurfaceError::Overlay("state lock poisoned".into()))?;
        if state.fail_overlay_for.as_deref() == Some(placement.control_id.as_str()) {
            return Err(SurfaceError::Overlay(format!(
                "mock placement failure for '{}'",
                placement.control_id
            )));
        }
        state.placements_applied += 1;
        state
            .overlays
            .insert(placement.control_id.clone(), placement.clone());
        tracing::debug!("[MOCK] overlay placed: {}", placement.control_id);
        Ok(())
    }

    fn remove_overlay(&mut self, control_id: &str) -> Result<(), SurfaceError> {
        if let Ok(mut state) = self.state.write() {
            state.overlays.remove(control_id);
            state.pressed.remove(control_id);
            state.knobs.remove(control_id);
        }
        tracing::debug!("[MOCK] overlay removed: {control_id}");
        Ok(())
    }

    fn set_overlay_pressed(&mut self, control_id: &str, pressed: bool) {
        if let Ok(mut state) = self.state.write() {
            state.pressed.insert(control_id.to_string(), pressed);
        }
    }

    fn set_overlay_knob(&mut self, control_id: &str, dx: f32, dy: f32) {
        if let Ok(mut state) = self.state.write() {
            state.knobs.insert(control_id.to_string(), (dx, dy));
        }
    }

    fn suppress_native_gestures(&mut self, suppressed: bool) {
        if let Ok(mut state) = self.state.write() {
            state.native_gestures_suppressed = suppressed;
        }
    }

    fn apply_hint(&mut self, hint: &PresentationHint) -> Result<(), SurfaceError> {
        if let Ok(mut state) = self.state.write() {
            state.hints.push(hint.clone());
        }
        tracing::debug!("[MOCK] hint applied: {hint:?}");
        Ok(())
    }
}
