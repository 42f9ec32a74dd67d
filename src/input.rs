use winit::keyboard::Key;

/// Mouse buttons the backend forwards. Other buttons are ignored.
pub const MOUSE_LEFT: usize = 0;
pub const MOUSE_RIGHT: usize = 1;
pub const MOUSE_MIDDLE: usize = 2;

/// Input state for one frame, handed to the GUI layer before it builds its
/// draw list.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// Cursor position in surface pixels, if the cursor has entered the
    /// window at least once.
    pub mouse_pos: Option<(f32, f32)>,
    /// Held state, indexed by `MOUSE_LEFT` / `MOUSE_RIGHT` / `MOUSE_MIDDLE`.
    pub mouse_down: [bool; 3],
    /// Buttons that went down this frame.
    pub mouse_pressed: [bool; 3],
    /// Buttons that went up this frame.
    pub mouse_released: [bool; 3],
    /// Accumulated scroll delta since the last frame.
    pub scroll: (f32, f32),
    pub keys_pressed: Vec<Key>,
    pub keys_released: Vec<Key>,
    /// Text input received since the last frame.
    pub text: String,
    /// Focus change this frame, if any.
    pub focus: Option<bool>,
    pub close_requested: bool,
    /// Window resize received since the last frame, if any.
    pub resized: Option<(u32, u32)>,
}

/// Collects native windowing events and surfaces them to the GUI layer one
/// frame at a time.
///
/// Events always accumulate into a pending snapshot; [`snapshot`] drains it
/// at frame start. Anything arriving after frame-begin lands in the next
/// pending snapshot, so late events are buffered, never dropped.
///
/// [`snapshot`]: InputBridge::snapshot
#[derive(Default)]
pub struct InputBridge {
    pending: InputSnapshot,
    // Held state persists across frames; edges do not.
    mouse_pos: Option<(f32, f32)>,
    mouse_down: [bool; 3],
}

impl InputBridge {
    pub fn new() -> Self {
        Self::default()
    }

    // Position is held state: `snapshot` reads it from the persistent copy.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.mouse_pos = Some((x, y));
    }

    pub fn button(&mut self, index: usize, pressed: bool) {
        if index >= 3 {
            return;
        }
        self.mouse_down[index] = pressed;
        if pressed {
            self.pending.mouse_pressed[index] = true;
        } else {
            self.pending.mouse_released[index] = true;
        }
    }

    pub fn scroll(&mut self, dx: f32, dy: f32) {
        self.pending.scroll.0 += dx;
        self.pending.scroll.1 += dy;
    }

    pub fn key(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.pending.keys_pressed.push(key);
        } else {
            self.pending.keys_released.push(key);
        }
    }

    pub fn text(&mut self, text: &str) {
        self.pending.text.push_str(text);
    }

    pub fn focus(&mut self, focused: bool) {
        self.pending.focus = Some(focused);
    }

    pub fn close_requested(&mut self) {
        self.pending.close_requested = true;
    }

    pub fn resized(&mut self, width: u32, height: u32) {
        self.pending.resized = Some((width, height));
    }

    /// Drain the pending events into a frame snapshot. Runs strictly before
    /// the GUI layer's frame-begin step.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let mut snapshot = std::mem::take(&mut self.pending);
        snapshot.mouse_pos = self.mouse_pos;
        snapshot.mouse_down = self.mouse_down;
        snapshot
    }
}
