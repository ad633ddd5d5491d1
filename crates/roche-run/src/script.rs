use std::collections::VecDeque;

use glam::DVec2;
use roche_engine::{InputSnapshot, InputSource, Key, MouseButton};

/// Input source that replays a prepared sequence of frames.
/// Once the script runs out every poll returns an idle snapshot.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputSnapshot>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw snapshots.
    pub fn frames(mut self, frames: impl IntoIterator<Item = InputSnapshot>) -> Self {
        self.frames.extend(frames);
        self
    }

    /// `count` idle frames.
    pub fn wait(self, count: usize) -> Self {
        self.frames(std::iter::repeat(InputSnapshot::new()).take(count))
    }

    /// Key down for one frame, then up for one frame.
    pub fn press(self, key: Key) -> Self {
        self.frames([InputSnapshot::new().with_key(key), InputSnapshot::new()])
    }

    /// Hold `button` and move the cursor from `from` to `to` over `steps`
    /// frames, then release.
    pub fn drag(self, button: MouseButton, from: DVec2, to: DVec2, steps: usize) -> Self {
        let steps = steps.max(1);
        let moves = (0..=steps).map(move |i| {
            let p = from.lerp(to, i as f64 / steps as f64);
            InputSnapshot::new().with_cursor(p.x, p.y).with_button(button)
        });
        let release = InputSnapshot::new().with_cursor(to.x, to.y);
        self.frames(moves.chain(std::iter::once(release)))
    }

    /// Frames left in the script.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Built-in tour: speed up time, orbit the camera, visit every body,
    /// take a screenshot, print the profiler and quit.
    pub fn tour(body_count: usize) -> Self {
        let mut script = Self::new().wait(30);
        for _ in 0..3 {
            script = script.press(Key::WarpUp);
        }
        script = script
            .drag(MouseButton::Primary, DVec2::new(400.0, 300.0), DVec2::new(250.0, 320.0), 20)
            .wait(30)
            .drag(MouseButton::Secondary, DVec2::new(400.0, 300.0), DVec2::new(400.0, 260.0), 10)
            .wait(30);
        for _ in 0..body_count.saturating_sub(1) {
            script = script.press(Key::SwitchFocus).wait(120);
        }
        script
            .press(Key::Screenshot)
            .press(Key::DumpProfiler)
            .wait(10)
            .press(Key::Quit)
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputSnapshot {
        self.frames.pop_front().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_one_frame_down_one_up() {
        let mut input = ScriptedInput::new().press(Key::WarpUp);
        assert!(input.poll().key_down(Key::WarpUp));
        assert!(!input.poll().key_down(Key::WarpUp));
        assert_eq!(input.remaining(), 0);
        assert_eq!(input.poll(), InputSnapshot::new());
    }

    #[test]
    fn drag_moves_cursor_then_releases() {
        let mut input = ScriptedInput::new()
            .drag(MouseButton::Primary, DVec2::ZERO, DVec2::new(10.0, 0.0), 2);
        assert_eq!(input.remaining(), 4);

        let first = input.poll();
        assert!(first.primary_down);
        assert_eq!(first.cursor, DVec2::ZERO);
        assert_eq!(input.poll().cursor, DVec2::new(5.0, 0.0));
        assert_eq!(input.poll().cursor, DVec2::new(10.0, 0.0));

        let release = input.poll();
        assert!(!release.any_button_down());
    }

    #[test]
    fn tour_ends_with_quit() {
        let input = ScriptedInput::tour(3);
        let last_down = input.frames.iter().rev().nth(1).unwrap();
        assert!(last_down.key_down(Key::Quit));
    }
}
