use super::state::{InputSnapshot, Key};

/// Turns "is the key down" polling into single-press events.
///
/// One instance lives for the whole session and is handed to the frame
/// update by reference.
#[derive(Debug, Clone, Default)]
pub struct InputEdgeTracker {
    held: [bool; Key::COUNT],
}

impl InputEdgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True only on the transition from released to held. Always records
    /// `is_down` as the new held state.
    pub fn pressed_once(&mut self, key: Key, is_down: bool) -> bool {
        let was_held = std::mem::replace(&mut self.held[key.index()], is_down);
        is_down && !was_held
    }

    /// `pressed_once` reading the key from a snapshot.
    pub fn pressed_in(&mut self, input: &InputSnapshot, key: Key) -> bool {
        self.pressed_once(key, input.key_down(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_press() {
        let mut tracker = InputEdgeTracker::new();
        let polls = [true, true, true, false, true];
        let fired: Vec<bool> = polls
            .iter()
            .map(|&down| tracker.pressed_once(Key::SwitchFocus, down))
            .collect();
        assert_eq!(fired, vec![true, false, false, false, true]);
    }

    #[test]
    fn keys_are_independent() {
        let mut tracker = InputEdgeTracker::new();
        assert!(tracker.pressed_once(Key::WarpUp, true));
        assert!(tracker.pressed_once(Key::WarpDown, true));
        assert!(!tracker.pressed_once(Key::WarpUp, true));
        assert!(!tracker.pressed_once(Key::WarpDown, true));
        assert!(!tracker.pressed_once(Key::Screenshot, false));
    }

    #[test]
    fn released_poll_clears_held_state() {
        let mut tracker = InputEdgeTracker::new();
        tracker.pressed_once(Key::Screenshot, true);
        assert!(!tracker.pressed_once(Key::Screenshot, false));
        assert!(tracker.pressed_once(Key::Screenshot, true));
    }

    #[test]
    fn reads_from_snapshot() {
        let mut tracker = InputEdgeTracker::new();
        let snap = InputSnapshot::new().with_key(Key::DumpProfiler);
        assert!(tracker.pressed_in(&snap, Key::DumpProfiler));
        assert!(!tracker.pressed_in(&snap, Key::DumpProfiler));
        assert!(!tracker.pressed_in(&InputSnapshot::new(), Key::DumpProfiler));
        assert!(tracker.pressed_in(&snap, Key::DumpProfiler));
    }
}
