//! The touch adapter runtime
//!
//! One adapter instance owns one attached surface at a time, plus all
//! overlay runtime state (pressed visuals, joystick anchors, in-flight
//! gestures, pending deferred actions). The host feeds it touch events in
//! screen pixels and pumps [`TouchAdapter::advance`] from its event loop;
//! the adapter translates everything into key presses on its
//! [`InputInjector`].

use crate::gesture::{DirectionSet, JOYSTICK_DEAD_ZONE, TouchPoint, clamp_knob, recognize_swipe};
use crate::timer::{DeferredAction, TimerQueue, TimerSlot};
use crate::viewport::{ViewportConfig, compute_viewport, place_control};
use crate::{AdapterError, GameSurface, InputInjector};
use arcadia_catalog::{ControlKind, GameConfig, TouchControlSpec};
use std::collections::HashMap;

/// Settle delay after an orientation event before the screen box is
/// re-read, in milliseconds.
pub const ORIENTATION_SETTLE_MS: f64 = 100.0;

/// Delay between the synthetic press and release of a tap or swipe key,
/// in milliseconds.
pub const KEY_TAP_RELEASE_MS: f64 = 100.0;

/// Runtime state for one overlay control.
#[derive(Debug)]
struct ControlRuntime {
    spec: TouchControlSpec,
    /// Touch currently bound to this control.
    touch: Option<u64>,
    /// Keys this control is currently holding down.
    held_keys: Vec<String>,
    /// Joystick anchor in design coordinates.
    anchor: Option<(f32, f32)>,
    /// Swipe start position (design coordinates) and timestamp.
    swipe_start: Option<(f32, f32, f64)>,
}

impl ControlRuntime {
    fn new(spec: TouchControlSpec) -> Self {
        Self {
            spec,
            touch: None,
            held_keys: Vec::new(),
            anchor: None,
            swipe_start: None,
        }
    }
}

struct Attachment<S> {
    surface: S,
    config: GameConfig,
    viewport: ViewportConfig,
    controls: Vec<ControlRuntime>,
    /// Active touch identifiers, bound to a control index or tracked free.
    touches: HashMap<u64, Option<usize>>,
    gestures_enabled: bool,
    timers: TimerQueue,
}

/// Runtime bridge between finger input and the key events a game surface
/// expects.
///
/// State machine: idle until [`attach`](Self::attach); attaching while
/// already attached tears the previous surface down first, so overlays and
/// held keys can never duplicate or leak. [`cleanup`](Self::cleanup) is
/// idempotent and callable mid-gesture.
pub struct TouchAdapter<S: GameSurface, I: InputInjector> {
    injector: I,
    attached: Option<Attachment<S>>,
}

impl<S: GameSurface, I: InputInjector> TouchAdapter<S, I> {
    pub fn new(injector: I) -> Self {
        Self {
            injector,
            attached: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// Current viewport transform, if attached.
    pub fn viewport(&self) -> Option<&ViewportConfig> {
        self.attached.as_ref().map(|a| &a.viewport)
    }

    /// Session config, if attached.
    pub fn config(&self) -> Option<&GameConfig> {
        self.attached.as_ref().map(|a| &a.config)
    }

    /// Number of touches currently tracked.
    pub fn active_touch_count(&self) -> usize {
        self.attached.as_ref().map_or(0, |a| a.touches.len())
    }

    /// Attach to a surface and synthesize the configured overlay controls.
    ///
    /// Computes the initial viewport transform, applies it, and places one
    /// overlay per control spec. On any placement failure the overlays
    /// created so far are removed again before the error is returned.
    pub fn attach(&mut self, surface: S, config: GameConfig) -> Result<(), AdapterError> {
        if self.attached.is_some() {
            tracing::info!("Adapter already attached; detaching previous surface first");
            self.cleanup();
        }

        let mut surface = surface;
        let viewport = compute_viewport(&config, surface.bounds());
        surface.apply_viewport(&viewport)?;

        let mut placed: Vec<String> = Vec::new();
        for spec in &config.touch_controls {
            let result =
                place_control(spec, &config, &viewport).and_then(|p| surface.place_overlay(&p));
            if let Err(e) = result {
                for id in &placed {
                    let _ = surface.remove_overlay(id);
                }
                return Err(e.into());
            }
            placed.push(spec.id.clone());
        }

        tracing::info!(
            controls = config.touch_controls.len(),
            scale = viewport.scale,
            "Touch adapter attached"
        );

        let controls = config
            .touch_controls
            .iter()
            .cloned()
            .map(ControlRuntime::new)
            .collect();

        self.attached = Some(Attachment {
            surface,
            config,
            viewport,
            controls,
            touches: HashMap::new(),
            gestures_enabled: false,
            timers: TimerQueue::new(),
        });
        Ok(())
    }

    /// Enable raw touch tracking on the surface: unbound touches are
    /// bookkept for multi-touch awareness and the host's default touch
    /// behaviors (scrolling, selection) are suppressed.
    pub fn enable_gestures(&mut self) {
        match self.attached.as_mut() {
            Some(att) => {
                att.gestures_enabled = true;
                att.surface.suppress_native_gestures(true);
                tracing::debug!("Gesture tracking enabled");
            }
            None => tracing::warn!("enable_gestures called with no surface attached"),
        }
    }

    /// Route a touch-start event. Events on an unattached adapter are
    /// ignored.
    pub fn on_touch_start(&mut self, touch: TouchPoint) -> Result<(), AdapterError> {
        let Some(att) = self.attached.as_mut() else {
            return Ok(());
        };
        match touch_start(att, &mut self.injector, touch) {
            Ok(()) => Ok(()),
            Err(e) => self.fail_and_teardown(e),
        }
    }

    /// Route a touch-move event.
    pub fn on_touch_move(&mut self, touch: TouchPoint) -> Result<(), AdapterError> {
        let Some(att) = self.attached.as_mut() else {
            return Ok(());
        };
        match touch_move(att, &mut self.injector, touch) {
            Ok(()) => Ok(()),
            Err(e) => self.fail_and_teardown(e),
        }
    }

    /// Route a touch-end event.
    pub fn on_touch_end(&mut self, touch: TouchPoint) -> Result<(), AdapterError> {
        let Some(att) = self.attached.as_mut() else {
            return Ok(());
        };
        match touch_finish(att, &mut self.injector, touch, true) {
            Ok(()) => Ok(()),
            Err(e) => self.fail_and_teardown(e),
        }
    }

    /// Route a touch-cancel event: like an end, but no swipe is
    /// recognized from a cancelled gesture.
    pub fn on_touch_cancel(&mut self, touch: TouchPoint) -> Result<(), AdapterError> {
        let Some(att) = self.attached.as_mut() else {
            return Ok(());
        };
        match touch_finish(att, &mut self.injector, touch, false) {
            Ok(()) => Ok(()),
            Err(e) => self.fail_and_teardown(e),
        }
    }

    /// Note an orientation/resize event. The viewport is not recomputed
    /// immediately: a settle delay lets the host finish reporting new
    /// dimensions, and a second event within the delay supersedes the
    /// first.
    pub fn handle_orientation_change(&mut self, now_ms: f64) {
        let Some(att) = self.attached.as_mut() else {
            return;
        };
        att.timers.schedule(
            TimerSlot::OrientationSettle,
            now_ms,
            ORIENTATION_SETTLE_MS,
            DeferredAction::OrientationSettle,
        );
        tracing::debug!("Orientation change noted; settle pending");
    }

    /// Fire every deferred action due at `now_ms`: delayed key releases
    /// and the orientation settle, which re-reads the screen box and
    /// repositions (not recreates) every overlay.
    pub fn advance(&mut self, now_ms: f64) -> Result<(), AdapterError> {
        let Some(att) = self.attached.as_mut() else {
            return Ok(());
        };
        match run_due_actions(att, &mut self.injector, now_ms) {
            Ok(()) => Ok(()),
            Err(e) => self.fail_and_teardown(e),
        }
    }

    /// Detach and return the surface, releasing every held key and
    /// removing every overlay. `None` when nothing was attached.
    pub fn detach(&mut self) -> Option<S> {
        let mut att = self.attached.take()?;

        for control in &mut att.controls {
            for key in std::mem::take(&mut control.held_keys) {
                if let Err(e) = self.injector.release(&key) {
                    tracing::warn!("Failed to release '{key}' during teardown: {e}");
                }
            }
        }

        for control in &att.controls {
            if let Err(e) = att.surface.remove_overlay(&control.spec.id) {
                tracing::warn!("Failed to remove overlay '{}': {e}", control.spec.id);
            }
        }

        att.surface.suppress_native_gestures(false);
        att.timers.clear();
        att.touches.clear();
        tracing::info!("Touch adapter detached");
        Some(att.surface)
    }

    /// Idempotent full teardown. Safe to call repeatedly and on an adapter
    /// that was never attached.
    pub fn cleanup(&mut self) {
        let _ = self.detach();
    }

    fn fail_and_teardown(&mut self, error: AdapterError) -> Result<(), AdapterError> {
        tracing::warn!("Input synthesis failed: {error}; tearing adapter down");
        self.cleanup();
        Err(error)
    }
}

fn touch_start<S: GameSurface, I: InputInjector>(
    att: &mut Attachment<S>,
    injector: &mut I,
    touch: TouchPoint,
) -> Result<(), AdapterError> {
    let (dx, dy) = att.viewport.to_design(&att.config, touch.x, touch.y);

    let hit = att
        .controls
        .iter()
        .position(|c| c.touch.is_none() && c.spec.contains(dx, dy));

    match hit {
        Some(_) => {
            att.touches.insert(touch.id, hit);
        }
        None if att.gestures_enabled => {
            att.touches.insert(touch.id, None);
        }
        None => {}
    }

    let Some(index) = hit else {
        return Ok(());
    };

    att.controls[index].touch = Some(touch.id);
    match att.controls[index].spec.kind {
        ControlKind::Button => {
            let Some(key) = att.controls[index].spec.primary_key().map(str::to_string) else {
                return Ok(());
            };
            injector.press(&key)?;
            att.controls[index].held_keys.push(key);
            let id = att.controls[index].spec.id.clone();
            att.surface.set_overlay_pressed(&id, true);
        }
        ControlKind::Joystick => {
            att.controls[index].anchor = Some((dx, dy));
        }
        ControlKind::Swipe => {
            att.controls[index].swipe_start = Some((dx, dy, touch.timestamp_ms));
        }
        ControlKind::Tap => {
            tap_press(att, injector, index, touch.timestamp_ms)?;
        }
    }
    Ok(())
}

/// Press a tap/swipe key and arm its delayed release. A release still
/// pending from the previous tap in the same slot is settled first so
/// press/release events stay strictly paired.
fn tap_press<S: GameSurface, I: InputInjector>(
    att: &mut Attachment<S>,
    injector: &mut I,
    index: usize,
    now_ms: f64,
) -> Result<(), AdapterError> {
    let Some(key) = att.controls[index].spec.primary_key().map(str::to_string) else {
        return Ok(());
    };
    let id = att.controls[index].spec.id.clone();
    let slot = TimerSlot::ControlRelease(id.clone());

    if let Some(DeferredAction::ReleaseKey { key: prev, .. }) = att.timers.cancel(&slot) {
        injector.release(&prev)?;
        att.controls[index].held_keys.retain(|k| k != &prev);
    }

    injector.press(&key)?;
    att.controls[index].held_keys.push(key.clone());
    att.surface.set_overlay_pressed(&id, true);
    att.timers.schedule(
        slot,
        now_ms,
        KEY_TAP_RELEASE_MS,
        DeferredAction::ReleaseKey {
            control_id: id,
            key,
        },
    );
    Ok(())
}

fn touch_move<S: GameSurface, I: InputInjector>(
    att: &mut Attachment<S>,
    injector: &mut I,
    touch: TouchPoint,
) -> Result<(), AdapterError> {
    let Some(Some(index)) = att.touches.get(&touch.id).copied() else {
        return Ok(());
    };
    if att.controls[index].spec.kind != ControlKind::Joystick {
        return Ok(());
    }
    let Some((ax, ay)) = att.controls[index].anchor else {
        return Ok(());
    };

    let (px, py) = att.viewport.to_design(&att.config, touch.x, touch.y);
    let (dx, dy) = (px - ax, py - ay);

    // Level-triggered: the held set is recomputed from the current
    // displacement on every move. All mapped directions are released
    // before the new set goes down, so no stale key can survive a move.
    let directions = DirectionSet::from_displacement(dx, dy, JOYSTICK_DEAD_ZONE);
    let mapping = att.controls[index].spec.key_mapping.clone();
    for key in mapping.iter().take(4) {
        injector.release(key)?;
    }

    let mut held = Vec::new();
    for direction in directions.iter() {
        if let Some(key) = mapping.get(direction.key_index()) {
            injector.press(key)?;
            held.push(key.clone());
        }
    }
    att.controls[index].held_keys = held;

    // Knob stays inside its base: clamp in design units, push to the
    // surface in screen pixels.
    let spec = &att.controls[index].spec;
    let radius = spec.size.width.min(spec.size.height) / 2.0;
    let (kx, ky) = clamp_knob(dx, dy, radius);
    let (sx, sy) = att.viewport.axis_scale(&att.config);
    let id = spec.id.clone();
    att.surface.set_overlay_knob(&id, kx * sx, ky * sy);

    Ok(())
}

fn touch_finish<S: GameSurface, I: InputInjector>(
    att: &mut Attachment<S>,
    injector: &mut I,
    touch: TouchPoint,
    recognize: bool,
) -> Result<(), AdapterError> {
    let Some(binding) = att.touches.remove(&touch.id) else {
        return Ok(());
    };
    let Some(index) = binding else {
        return Ok(());
    };

    att.controls[index].touch = None;
    match att.controls[index].spec.kind {
        ControlKind::Button => {
            let held = std::mem::take(&mut att.controls[index].held_keys);
            for key in held {
                injector.release(&key)?;
            }
            let id = att.controls[index].spec.id.clone();
            att.surface.set_overlay_pressed(&id, false);
        }
        ControlKind::Joystick => {
            att.controls[index].anchor = None;
            att.controls[index].held_keys.clear();
            let mapping = att.controls[index].spec.key_mapping.clone();
            for key in mapping.iter().take(4) {
                injector.release(key)?;
            }
            let id = att.controls[index].spec.id.clone();
            att.surface.set_overlay_knob(&id, 0.0, 0.0);
        }
        ControlKind::Swipe => {
            let start = att.controls[index].swipe_start.take();
            if recognize && let Some((sx, sy, start_ms)) = start {
                let (px, py) = att.viewport.to_design(&att.config, touch.x, touch.y);
                let sensitivity = att.controls[index].spec.sensitivity.unwrap_or(1.0);
                let (dx, dy) = ((px - sx) * sensitivity, (py - sy) * sensitivity);
                let elapsed = touch.timestamp_ms - start_ms;

                if let Some(direction) = recognize_swipe(dx, dy, elapsed) {
                    let key = att.controls[index]
                        .spec
                        .key_mapping
                        .get(direction.key_index())
                        .cloned();
                    if let Some(key) = key {
                        swipe_tap(att, injector, index, key, touch.timestamp_ms)?;
                    }
                }
            }
        }
        ControlKind::Tap => {
            // The delayed release is already armed; nothing to do here.
        }
    }
    Ok(())
}

/// Press a recognized swipe's key and arm the delayed release, settling a
/// still-pending release from the previous swipe on the same control.
fn swipe_tap<S: GameSurface, I: InputInjector>(
    att: &mut Attachment<S>,
    injector: &mut I,
    index: usize,
    key: String,
    now_ms: f64,
) -> Result<(), AdapterError> {
    let id = att.controls[index].spec.id.clone();
    let slot = TimerSlot::ControlRelease(id.clone());

    if let Some(DeferredAction::ReleaseKey { key: prev, .. }) = att.timers.cancel(&slot) {
        injector.release(&prev)?;
        att.controls[index].held_keys.retain(|k| k != &prev);
    }

    injector.press(&key)?;
    att.controls[index].held_keys.push(key.clone());
    att.timers.schedule(
        slot,
        now_ms,
        KEY_TAP_RELEASE_MS,
        DeferredAction::ReleaseKey {
            control_id: id,
            key,
        },
    );
    Ok(())
}

fn run_due_actions<S: GameSurface, I: InputInjector>(
    att: &mut Attachment<S>,
    injector: &mut I,
    now_ms: f64,
) -> Result<(), AdapterError> {
    for action in att.timers.due(now_ms) {
        match action {
            DeferredAction::ReleaseKey { control_id, key } => {
                injector.release(&key)?;
                if let Some(control) = att
                    .controls
                    .iter_mut()
                    .find(|c| c.spec.id == control_id)
                {
                    control.held_keys.retain(|k| k != &key);
                }
                att.surface.set_overlay_pressed(&control_id, false);
            }
            DeferredAction::OrientationSettle => {
                let viewport = compute_viewport(&att.config, att.surface.bounds());
                att.surface.apply_viewport(&viewport)?;
                for control in &att.controls {
                    let placement = place_control(&control.spec, &att.config, &viewport)?;
                    att.surface.place_overlay(&placement)?;
                }
                att.viewport = viewport;
                tracing::debug!("Viewport recomputed after orientation settle");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockSurface, RecordingInjector};
    use arcadia_catalog::{AdaptationCatalog, ScaleMode};
    use arcadia_device::{DeviceProfile, EnvironmentSnapshot};

    fn game_config(game_id: &str) -> GameConfig {
        let profile = DeviceProfile::detect(&EnvironmentSnapshot::touch_screen(390, 844));
        AdaptationCatalog::builtin().game_config(game_id, &profile)
    }

    #[test]
    fn test_attach_creates_overlays_and_viewport() {
        let surface = MockSurface::new(844, 390);
        let state = surface.state();
        let mut adapter = TouchAdapter::new(RecordingInjector::new());

        adapter.attach(surface, game_config("box-jump")).unwrap();

        assert!(adapter.is_attached());
        let s = state.read().unwrap();
        assert_eq!(s.overlays.len(), 2);
        assert!(s.viewport.is_some());
    }

    #[test]
    fn test_attach_while_attached_detaches_first() {
        let first = MockSurface::new(844, 390);
        let first_state = first.state();
        let mut adapter = TouchAdapter::new(RecordingInjector::new());
        adapter.attach(first, game_config("box-jump")).unwrap();

        let second = MockSurface::new(390, 844);
        let second_state = second.state();
        adapter.attach(second, game_config("beat-tapper")).unwrap();

        // Old surface fully stripped, new one populated.
        assert!(first_state.read().unwrap().overlays.is_empty());
        assert_eq!(second_state.read().unwrap().overlays.len(), 1);
    }

    #[test]
    fn test_attach_rolls_back_on_placement_failure() {
        let surface = MockSurface::new(844, 390).failing_overlay("jump");
        let state = surface.state();
        let mut adapter = TouchAdapter::new(RecordingInjector::new());

        let err = adapter.attach(surface, game_config("box-jump"));
        assert!(err.is_err());
        assert!(!adapter.is_attached());
        assert!(state.read().unwrap().overlays.is_empty());
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let surface = MockSurface::new(844, 390);
        let state = surface.state();
        let mut adapter = TouchAdapter::new(RecordingInjector::new());
        adapter.attach(surface, game_config("box-jump")).unwrap();

        adapter.cleanup();
        let after_first: Vec<String> = state.read().unwrap().overlays.keys().cloned().collect();
        adapter.cleanup();
        let after_second: Vec<String> = state.read().unwrap().overlays.keys().cloned().collect();

        assert!(after_first.is_empty());
        assert_eq!(after_first, after_second);
        assert!(!adapter.is_attached());
    }

    #[test]
    fn test_cleanup_on_never_attached_adapter() {
        let mut adapter: TouchAdapter<MockSurface, RecordingInjector> =
            TouchAdapter::new(RecordingInjector::new());
        adapter.cleanup();
        adapter.cleanup();
        assert!(!adapter.is_attached());
    }

    #[test]
    fn test_events_on_unattached_adapter_are_ignored() {
        let mut adapter: TouchAdapter<MockSurface, RecordingInjector> =
            TouchAdapter::new(RecordingInjector::new());
        assert!(adapter.on_touch_start(TouchPoint::new(1, 0.0, 0.0, 0.0)).is_ok());
        assert!(adapter.on_touch_move(TouchPoint::new(1, 5.0, 5.0, 10.0)).is_ok());
        assert!(adapter.on_touch_end(TouchPoint::new(1, 5.0, 5.0, 20.0)).is_ok());
        adapter.handle_orientation_change(0.0);
        assert!(adapter.advance(1000.0).is_ok());
    }

    #[test]
    fn test_free_touches_tracked_only_with_gestures_enabled() {
        let surface = MockSurface::new(800, 600);
        let mut adapter = TouchAdapter::new(RecordingInjector::new());

        let mut config = game_config("box-jump");
        config.scale_mode = ScaleMode::Stretch;
        adapter.attach(surface, config).unwrap();

        // A touch on empty surface area, gestures disabled: not tracked.
        adapter
            .on_touch_start(TouchPoint::new(7, 400.0, 50.0, 0.0))
            .unwrap();
        assert_eq!(adapter.active_touch_count(), 0);

        adapter.enable_gestures();
        adapter
            .on_touch_start(TouchPoint::new(8, 400.0, 50.0, 10.0))
            .unwrap();
        assert_eq!(adapter.active_touch_count(), 1);

        adapter
            .on_touch_end(TouchPoint::new(8, 400.0, 50.0, 20.0))
            .unwrap();
        assert_eq!(adapter.active_touch_count(), 0);
    }

    #[test]
    fn test_enable_gestures_suppresses_native_behavior() {
        let surface = MockSurface::new(844, 390);
        let state = surface.state();
        let mut adapter = TouchAdapter::new(RecordingInjector::new());
        adapter.attach(surface, game_config("box-jump")).unwrap();

        adapter.enable_gestures();
        assert!(state.read().unwrap().native_gestures_suppressed);

        adapter.cleanup();
        assert!(!state.read().unwrap().native_gestures_suppressed);
    }
}
