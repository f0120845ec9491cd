use std::collections::HashSet;

use super::types::{Key, MouseButton};

/// Per-frame input deltas.
///
/// Cleared by the runtime after the frame callback has consumed it.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys that went down this frame (key repeat excluded).
    pub keys_pressed: HashSet<Key>,
    /// Keys that went up this frame.
    pub keys_released: HashSet<Key>,

    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    /// Accumulated relative mouse motion (raw device units).
    pub pointer_delta: (f32, f32),
    /// Accumulated scroll, in lines.
    pub wheel: (f32, f32),
}

impl InputFrame {
    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.pointer_delta = (0.0, 0.0);
        self.wheel = (0.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_everything() {
        let mut frame = InputFrame::default();
        frame.keys_pressed.insert(Key::W);
        frame.buttons_released.insert(MouseButton::Left);
        frame.pointer_delta = (3.0, 4.0);
        frame.wheel = (0.0, 1.0);

        frame.clear();

        assert!(frame.keys_pressed.is_empty());
        assert!(frame.buttons_released.is_empty());
        assert_eq!(frame.pointer_delta, (0.0, 0.0));
        assert_eq!(frame.wheel, (0.0, 0.0));
    }
}
