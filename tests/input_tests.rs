use imbrush::input::{InputBridge, MOUSE_LEFT, MOUSE_RIGHT};
use winit::keyboard::{Key, NamedKey};

#[test]
fn events_before_the_snapshot_are_visible_in_it() {
    let mut bridge = InputBridge::new();
    bridge.pointer_moved(10.0, 20.0);
    bridge.button(MOUSE_LEFT, true);
    bridge.scroll(0.0, 1.0);
    bridge.text("hi");

    let snapshot = bridge.snapshot();
    assert_eq!(snapshot.mouse_pos, Some((10.0, 20.0)));
    assert!(snapshot.mouse_down[MOUSE_LEFT]);
    assert!(snapshot.mouse_pressed[MOUSE_LEFT]);
    assert_eq!(snapshot.scroll, (0.0, 1.0));
    assert_eq!(snapshot.text, "hi");
}

#[test]
fn events_after_frame_begin_are_buffered_for_the_next_frame() {
    let mut bridge = InputBridge::new();
    let first = bridge.snapshot();
    assert!(!first.mouse_pressed[MOUSE_RIGHT]);

    // Arrives while the frame is being built.
    bridge.button(MOUSE_RIGHT, true);

    let second = bridge.snapshot();
    assert!(
        second.mouse_pressed[MOUSE_RIGHT],
        "late events must surface in the next frame, not be dropped"
    );
}

#[test]
fn edge_flags_reset_each_frame_but_held_state_persists() {
    let mut bridge = InputBridge::new();
    bridge.button(MOUSE_LEFT, true);

    let first = bridge.snapshot();
    assert!(first.mouse_pressed[MOUSE_LEFT]);
    assert!(first.mouse_down[MOUSE_LEFT]);

    let second = bridge.snapshot();
    assert!(!second.mouse_pressed[MOUSE_LEFT], "press edge must not repeat");
    assert!(second.mouse_down[MOUSE_LEFT], "held state persists until release");

    bridge.button(MOUSE_LEFT, false);
    let third = bridge.snapshot();
    assert!(third.mouse_released[MOUSE_LEFT]);
    assert!(!third.mouse_down[MOUSE_LEFT]);
}

#[test]
fn scroll_accumulates_within_a_frame() {
    let mut bridge = InputBridge::new();
    bridge.scroll(1.0, 2.0);
    bridge.scroll(0.5, -1.0);
    let snapshot = bridge.snapshot();
    assert_eq!(snapshot.scroll, (1.5, 1.0));
    assert_eq!(bridge.snapshot().scroll, (0.0, 0.0));
}

#[test]
fn key_events_keep_press_and_release_separate() {
    let mut bridge = InputBridge::new();
    bridge.key(Key::Named(NamedKey::Enter), true);
    bridge.key(Key::Named(NamedKey::Escape), false);

    let snapshot = bridge.snapshot();
    assert_eq!(snapshot.keys_pressed, vec![Key::Named(NamedKey::Enter)]);
    assert_eq!(snapshot.keys_released, vec![Key::Named(NamedKey::Escape)]);
}

#[test]
fn window_signals_pass_through_once() {
    let mut bridge = InputBridge::new();
    bridge.resized(400, 300);
    bridge.focus(false);
    bridge.close_requested();

    let snapshot = bridge.snapshot();
    assert_eq!(snapshot.resized, Some((400, 300)));
    assert_eq!(snapshot.focus, Some(false));
    assert!(snapshot.close_requested);

    let next = bridge.snapshot();
    assert_eq!(next.resized, None);
    assert_eq!(next.focus, None);
    assert!(!next.close_requested);
}
