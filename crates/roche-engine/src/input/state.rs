use glam::DVec2;

/// Logical keys the simulation reacts to.
/// The window layer maps physical keys onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Slower time warp (K by default).
    WarpDown,
    /// Faster time warp (L by default).
    WarpUp,
    /// Start or cancel a focus switch (Tab).
    SwitchFocus,
    /// Save a screenshot (F12).
    Screenshot,
    /// Print renderer profiler times (F5).
    DumpProfiler,
    /// Leave the application (Escape).
    Quit,
}

impl Key {
    pub const COUNT: usize = 6;

    /// Dense index for per-key storage.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Mouse buttons tracked for camera drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Orbits the camera (azimuth / elevation).
    Primary,
    /// Zooms the camera.
    Secondary,
}

/// Raw input polled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    keys: [bool; Key::COUNT],
    /// Cursor position in window pixels.
    pub cursor: DVec2,
    pub primary_down: bool,
    pub secondary_down: bool,
    /// The window asked to close.
    pub close_requested: bool,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.keys[key.index()] = true;
        self
    }

    pub fn with_cursor(mut self, x: f64, y: f64) -> Self {
        self.cursor = DVec2::new(x, y);
        self
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.set_button(button, true);
        self
    }

    pub fn set_key(&mut self, key: Key, down: bool) {
        self.keys[key.index()] = down;
    }

    pub fn set_button(&mut self, button: MouseButton, down: bool) {
        match button {
            MouseButton::Primary => self.primary_down = down,
            MouseButton::Secondary => self.secondary_down = down,
        }
    }

    /// Whether `key` is currently held.
    pub fn key_down(&self, key: Key) -> bool {
        self.keys[key.index()]
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Primary => self.primary_down,
            MouseButton::Secondary => self.secondary_down,
        }
    }

    pub fn any_button_down(&self) -> bool {
        self.primary_down || self.secondary_down
    }
}

/// Anything that can be polled for the current input state (a window, a script).
pub trait InputSource {
    /// Non-blocking poll of the current state.
    fn poll(&mut self) -> InputSnapshot;
}

/// Drag gesture fed into the camera for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragInput {
    /// Cursor movement since the previous frame, x negated so dragging right
    /// orbits the camera left.
    pub delta: DVec2,
    pub primary: bool,
    pub secondary: bool,
}

impl DragInput {
    pub const NONE: Self = Self { delta: DVec2::ZERO, primary: false, secondary: false };

    pub fn orbit(dx: f64, dy: f64) -> Self {
        Self { delta: DVec2::new(dx, dy), primary: true, secondary: false }
    }

    pub fn zoom(dy: f64) -> Self {
        Self { delta: DVec2::new(0.0, dy), primary: false, secondary: true }
    }
}

/// Cursor history and the drag gate.
///
/// Dragging engages on the first button-down and persists until both buttons
/// are released.
#[derive(Debug, Clone, Default)]
pub struct MouseTracker {
    previous: Option<DVec2>,
    dragging: bool,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute this frame's drag from the snapshot. The first poll has no
    /// previous cursor and yields a zero delta.
    pub fn drag(&mut self, input: &InputSnapshot) -> DragInput {
        let any_down = input.any_button_down();
        if any_down && !self.dragging {
            self.dragging = true;
        } else if self.dragging && !any_down {
            self.dragging = false;
        }

        if !self.dragging {
            return DragInput::NONE;
        }
        let previous = self.previous.unwrap_or(input.cursor);
        DragInput {
            delta: DVec2::new(previous.x - input.cursor.x, input.cursor.y - previous.y),
            primary: input.primary_down,
            secondary: input.secondary_down,
        }
    }

    /// Remember the cursor for next frame's delta.
    pub fn store(&mut self, input: &InputSnapshot) {
        self.previous = Some(input.cursor);
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}
