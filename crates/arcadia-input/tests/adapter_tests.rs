//! Integration tests for the touch adapter gesture pipeline

use arcadia_catalog::{ControlKind, GameConfig, Position, ScaleMode, Size, TouchControlSpec};
use arcadia_input::mock::{InjectedEvent, MockSurface, RecordingInjector};
use arcadia_input::{KEY_TAP_RELEASE_MS, TouchAdapter, TouchPoint};
use arcadia_device::ScreenSize;

/// 800x600 stretch config on an 800x600 surface: screen pixels and design
/// units coincide, which keeps gesture coordinates readable.
fn identity_config(controls: Vec<TouchControlSpec>) -> GameConfig {
    GameConfig {
        width: 800,
        height: 600,
        scale_mode: ScaleMode::Stretch,
        touch_controls: controls,
        preferred_orientation: None,
        min_screen: None,
    }
}

fn joystick_spec() -> TouchControlSpec {
    TouchControlSpec::new(
        "move",
        ControlKind::Joystick,
        Position::new(100.0, 100.0),
        Size::new(200.0, 200.0),
    )
    .with_keys(["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"])
}

fn swipe_spec() -> TouchControlSpec {
    TouchControlSpec::new(
        "slide",
        ControlKind::Swipe,
        Position::new(0.0, 0.0),
        Size::new(800.0, 600.0),
    )
    .with_keys(["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"])
}

fn tap_spec() -> TouchControlSpec {
    TouchControlSpec::new(
        "tap",
        ControlKind::Tap,
        Position::new(0.0, 0.0),
        Size::new(800.0, 600.0),
    )
    .with_keys(["Space"])
}

fn button_spec() -> TouchControlSpec {
    TouchControlSpec::new(
        "jump",
        ControlKind::Button,
        Position::new(600.0, 400.0),
        Size::new(100.0, 100.0),
    )
    .with_keys(["Space"])
}

fn attached(
    controls: Vec<TouchControlSpec>,
) -> (
    TouchAdapter<MockSurface, RecordingInjector>,
    std::sync::Arc<std::sync::RwLock<arcadia_input::mock::InjectorLog>>,
    std::sync::Arc<std::sync::RwLock<arcadia_input::mock::MockSurfaceState>>,
) {
    let injector = RecordingInjector::new();
    let log = injector.log();
    let surface = MockSurface::new(800, 600);
    let state = surface.state();

    let mut adapter = TouchAdapter::new(injector);
    adapter.attach(surface, identity_config(controls)).unwrap();
    (adapter, log, state)
}

#[test]
fn test_button_press_and_release() {
    let (mut adapter, log, state) = attached(vec![button_spec()]);

    adapter
        .on_touch_start(TouchPoint::new(1, 650.0, 450.0, 0.0))
        .unwrap();
    assert_eq!(log.read().unwrap().held().len(), 1);
    assert_eq!(state.read().unwrap().pressed.get("jump"), Some(&true));

    adapter
        .on_touch_end(TouchPoint::new(1, 650.0, 450.0, 80.0))
        .unwrap();
    assert!(log.read().unwrap().held().is_empty());
    assert_eq!(state.read().unwrap().pressed.get("jump"), Some(&false));

    let events = &log.read().unwrap().events;
    assert_eq!(
        events.as_slice(),
        [
            InjectedEvent::Press("Space".into()),
            InjectedEvent::Release("Space".into()),
        ]
    );
}

#[test]
fn test_button_emits_one_key_down_per_touch_down() {
    let (mut adapter, log, _state) = attached(vec![button_spec()]);

    adapter
        .on_touch_start(TouchPoint::new(1, 650.0, 450.0, 0.0))
        .unwrap();
    // A second finger landing on the same held button must not retrigger.
    adapter
        .on_touch_start(TouchPoint::new(2, 640.0, 440.0, 10.0))
        .unwrap();

    assert_eq!(log.read().unwrap().presses(), vec!["Space".to_string()]);
}

#[test]
fn test_joystick_level_triggered_directions() {
    let (mut adapter, log, _state) = attached(vec![joystick_spec()]);

    // Anchor at the control center.
    adapter
        .on_touch_start(TouchPoint::new(1, 200.0, 200.0, 0.0))
        .unwrap();
    assert!(log.read().unwrap().held().is_empty());

    // Displacement (0, -30): beyond the dead zone upward only.
    adapter
        .on_touch_move(TouchPoint::new(1, 200.0, 170.0, 16.0))
        .unwrap();
    let held = log.read().unwrap().held();
    assert_eq!(held.iter().collect::<Vec<_>>(), vec!["ArrowUp"]);

    // Displacement (30, 0): ArrowUp must be released before ArrowRight
    // goes down, and nothing else may be held afterwards.
    adapter
        .on_touch_move(TouchPoint::new(1, 230.0, 200.0, 32.0))
        .unwrap();
    let held = log.read().unwrap().held();
    assert_eq!(held.iter().collect::<Vec<_>>(), vec!["ArrowRight"]);

    {
        let log = log.read().unwrap();
        let up_release = log
            .events
            .iter()
            .rposition(|e| *e == InjectedEvent::Release("ArrowUp".into()))
            .expect("ArrowUp released");
        let right_press = log
            .events
            .iter()
            .rposition(|e| *e == InjectedEvent::Press("ArrowRight".into()))
            .expect("ArrowRight pressed");
        assert!(up_release < right_press);
    }

    // Release recenters and lets every direction go.
    adapter
        .on_touch_end(TouchPoint::new(1, 230.0, 200.0, 48.0))
        .unwrap();
    assert!(log.read().unwrap().held().is_empty());
}

#[test]
fn test_joystick_dead_zone_holds_nothing() {
    let (mut adapter, log, _state) = attached(vec![joystick_spec()]);

    adapter
        .on_touch_start(TouchPoint::new(1, 200.0, 200.0, 0.0))
        .unwrap();
    adapter
        .on_touch_move(TouchPoint::new(1, 210.0, 190.0, 16.0))
        .unwrap();

    assert!(log.read().unwrap().held().is_empty());
}

#[test]
fn test_joystick_diagonal_holds_two_directions() {
    let (mut adapter, log, _state) = attached(vec![joystick_spec()]);

    adapter
        .on_touch_start(TouchPoint::new(1, 200.0, 200.0, 0.0))
        .unwrap();
    adapter
        .on_touch_move(TouchPoint::new(1, 230.0, 230.0, 16.0))
        .unwrap();

    let held = log.read().unwrap().held();
    assert!(held.contains("ArrowDown"));
    assert!(held.contains("ArrowRight"));
    assert_eq!(held.len(), 2);
}

#[test]
fn test_joystick_knob_is_clamped_to_base() {
    let (mut adapter, _log, state) = attached(vec![joystick_spec()]);

    adapter
        .on_touch_start(TouchPoint::new(1, 200.0, 200.0, 0.0))
        .unwrap();
    // Way outside the 100-unit radius.
    adapter
        .on_touch_move(TouchPoint::new(1, 500.0, 200.0, 16.0))
        .unwrap();

    let (kx, ky) = state.read().unwrap().knobs["move"];
    assert!((kx - 100.0).abs() < 0.01);
    assert_eq!(ky, 0.0);

    adapter
        .on_touch_end(TouchPoint::new(1, 500.0, 200.0, 32.0))
        .unwrap();
    assert_eq!(state.read().unwrap().knobs["move"], (0.0, 0.0));
}

#[test]
fn test_swipe_recognized_then_released_after_delay() {
    let (mut adapter, log, _state) = attached(vec![swipe_spec()]);

    adapter
        .on_touch_start(TouchPoint::new(1, 100.0, 100.0, 0.0))
        .unwrap();
    adapter
        .on_touch_end(TouchPoint::new(1, 180.0, 100.0, 200.0))
        .unwrap();

    // Swipe right: key down immediately, still held before the delay.
    assert_eq!(
        log.read().unwrap().held().iter().collect::<Vec<_>>(),
        vec!["ArrowRight"]
    );

    adapter.advance(200.0 + KEY_TAP_RELEASE_MS - 1.0).unwrap();
    assert!(!log.read().unwrap().held().is_empty());

    adapter.advance(200.0 + KEY_TAP_RELEASE_MS).unwrap();
    assert!(log.read().unwrap().held().is_empty());
}

#[test]
fn test_short_or_slow_swipes_are_not_recognized() {
    let (mut adapter, log, _state) = attached(vec![swipe_spec()]);

    // Distance 30 in 200 ms: too short.
    adapter
        .on_touch_start(TouchPoint::new(1, 100.0, 100.0, 0.0))
        .unwrap();
    adapter
        .on_touch_end(TouchPoint::new(1, 130.0, 100.0, 200.0))
        .unwrap();

    // Distance 60 in 400 ms: too slow.
    adapter
        .on_touch_start(TouchPoint::new(2, 100.0, 100.0, 1000.0))
        .unwrap();
    adapter
        .on_touch_end(TouchPoint::new(2, 160.0, 100.0, 1400.0))
        .unwrap();

    assert!(log.read().unwrap().events.is_empty());
}

#[test]
fn test_cancelled_swipe_is_not_recognized() {
    let (mut adapter, log, _state) = attached(vec![swipe_spec()]);

    adapter
        .on_touch_start(TouchPoint::new(1, 100.0, 100.0, 0.0))
        .unwrap();
    adapter
        .on_touch_cancel(TouchPoint::new(1, 180.0, 100.0, 200.0))
        .unwrap();

    assert!(log.read().unwrap().events.is_empty());
}

#[test]
fn test_swipe_sensitivity_scales_displacement() {
    let spec = swipe_spec().with_sensitivity(2.0);
    let (mut adapter, log, _state) = attached(vec![spec]);

    // Raw distance 30 would not recognize; sensitivity 2.0 doubles it.
    adapter
        .on_touch_start(TouchPoint::new(1, 100.0, 100.0, 0.0))
        .unwrap();
    adapter
        .on_touch_end(TouchPoint::new(1, 130.0, 100.0, 200.0))
        .unwrap();

    assert_eq!(log.read().unwrap().presses(), vec!["ArrowRight".to_string()]);
}

#[test]
fn test_tap_presses_then_releases_after_delay() {
    let (mut adapter, log, state) = attached(vec![tap_spec()]);

    adapter
        .on_touch_start(TouchPoint::new(1, 400.0, 300.0, 50.0))
        .unwrap();
    assert_eq!(log.read().unwrap().presses(), vec!["Space".to_string()]);
    assert_eq!(state.read().unwrap().pressed.get("tap"), Some(&true));

    adapter.advance(50.0 + KEY_TAP_RELEASE_MS).unwrap();
    assert!(log.read().unwrap().held().is_empty());
    assert_eq!(state.read().unwrap().pressed.get("tap"), Some(&false));
}

#[test]
fn test_rapid_taps_keep_press_release_pairs_strict() {
    let (mut adapter, log, _state) = attached(vec![tap_spec()]);

    adapter
        .on_touch_start(TouchPoint::new(1, 400.0, 300.0, 0.0))
        .unwrap();
    adapter
        .on_touch_end(TouchPoint::new(1, 400.0, 300.0, 20.0))
        .unwrap();

    // Second tap lands before the first release timer fires: the pending
    // release is settled immediately, then the new press goes down.
    adapter
        .on_touch_start(TouchPoint::new(2, 400.0, 300.0, 50.0))
        .unwrap();

    {
        let log = log.read().unwrap();
        assert_eq!(
            log.events.as_slice(),
            [
                InjectedEvent::Press("Space".into()),
                InjectedEvent::Release("Space".into()),
                InjectedEvent::Press("Space".into()),
            ]
        );
    }

    // Only the superseding timer remains; it fires at 150, not 100.
    adapter.advance(100.0).unwrap();
    assert_eq!(log.read().unwrap().held().len(), 1);
    adapter.advance(150.0).unwrap();
    assert!(log.read().unwrap().held().is_empty());
}

#[test]
fn test_orientation_change_is_debounced_and_repositions_overlays() {
    let injector = RecordingInjector::new();
    let surface = MockSurface::new(390, 844);
    let state = surface.state();

    let mut config = identity_config(vec![joystick_spec(), button_spec()]);
    config.scale_mode = ScaleMode::Fit;

    let mut adapter = TouchAdapter::new(injector);
    adapter.attach(surface, config).unwrap();

    let placements_before = state.read().unwrap().placements_applied;
    let portrait_jump = state.read().unwrap().overlays["jump"].clone();

    // Rotate the device, then report two orientation events in quick
    // succession; the second supersedes the first.
    if let Ok(mut s) = state.write() {
        s.bounds = ScreenSize::new(844, 390);
    }
    adapter.handle_orientation_change(1000.0);
    adapter.handle_orientation_change(1050.0);

    // First (superseded) deadline passes without a recompute.
    adapter.advance(1100.0).unwrap();
    assert_eq!(
        state.read().unwrap().placements_applied,
        placements_before
    );

    adapter.advance(1150.0).unwrap();
    {
        let s = state.read().unwrap();
        // Repositioned, not recreated: same two overlay ids, new boxes.
        assert_eq!(s.overlays.len(), 2);
        assert_eq!(s.placements_applied, placements_before + 2);
        assert_ne!(s.overlays["jump"], portrait_jump);
    }
    assert_eq!(
        adapter.viewport().unwrap().orientation,
        arcadia_device::Orientation::Landscape
    );
}

#[test]
fn test_injection_failure_tears_down_cleanly() {
    let injector = RecordingInjector::new().fail_on("Space");
    let surface = MockSurface::new(800, 600);
    let state = surface.state();

    let mut adapter = TouchAdapter::new(injector);
    adapter
        .attach(surface, identity_config(vec![button_spec()]))
        .unwrap();

    let err = adapter.on_touch_start(TouchPoint::new(1, 650.0, 450.0, 0.0));
    assert!(err.is_err());

    // Rolled back to pre-attach: no overlays, no attachment, and safe to
    // clean up again.
    assert!(!adapter.is_attached());
    assert!(state.read().unwrap().overlays.is_empty());
    adapter.cleanup();
}

#[test]
fn test_cleanup_mid_gesture_releases_held_keys() {
    let (mut adapter, log, _state) = attached(vec![joystick_spec()]);

    adapter
        .on_touch_start(TouchPoint::new(1, 200.0, 200.0, 0.0))
        .unwrap();
    adapter
        .on_touch_move(TouchPoint::new(1, 200.0, 150.0, 16.0))
        .unwrap();
    assert!(!log.read().unwrap().held().is_empty());

    adapter.cleanup();
    assert!(log.read().unwrap().held().is_empty());
}

#[test]
fn test_multi_touch_controls_operate_independently() {
    let (mut adapter, log, _state) = attached(vec![joystick_spec(), button_spec()]);

    // One finger steering, another jumping.
    adapter
        .on_touch_start(TouchPoint::new(1, 200.0, 200.0, 0.0))
        .unwrap();
    adapter
        .on_touch_move(TouchPoint::new(1, 200.0, 160.0, 16.0))
        .unwrap();
    adapter
        .on_touch_start(TouchPoint::new(2, 650.0, 450.0, 20.0))
        .unwrap();

    let held = log.read().unwrap().held();
    assert!(held.contains("ArrowUp"));
    assert!(held.contains("Space"));

    // Lifting the jump finger leaves the stick direction held.
    adapter
        .on_touch_end(TouchPoint::new(2, 650.0, 450.0, 60.0))
        .unwrap();
    let held = log.read().unwrap().held();
    assert!(held.contains("ArrowUp"));
    assert!(!held.contains("Space"));
}
