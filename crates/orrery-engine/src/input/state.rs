use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, MouseButton, MouseButtonState};

/// Current input state for the window.
///
/// Holds "is down" information and the pointer position; per-frame
/// transitions are recorded into an [`InputFrame`].
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,
    /// Pointer position in logical pixels, `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,
    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // Focus loss mid-press would otherwise leave stuck keys.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::Key { key, state } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(key) {
                        frame.keys_pressed.insert(key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(&key) {
                        frame.keys_released.insert(key);
                    }
                }
            },

            InputEvent::Button { button, state } => match state {
                MouseButtonState::Pressed => {
                    if self.buttons_down.insert(button) {
                        frame.buttons_pressed.insert(button);
                    }
                }
                MouseButtonState::Released => {
                    if self.buttons_down.remove(&button) {
                        frame.buttons_released.insert(button);
                    }
                }
            },

            InputEvent::PointerMoved { x, y } => {
                self.pointer_pos = Some((x, y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::PointerDelta { dx, dy } => {
                frame.pointer_delta.0 += dx;
                frame.pointer_delta.1 += dy;
            }

            InputEvent::Wheel { dx, dy } => {
                frame.wheel.0 += dx;
                frame.wheel.1 += dy;
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(state: &mut InputState, frame: &mut InputFrame, key: Key) {
        state.apply_event(frame, InputEvent::Key { key, state: KeyState::Pressed });
    }

    fn release(state: &mut InputState, frame: &mut InputFrame, key: Key) {
        state.apply_event(frame, InputEvent::Key { key, state: KeyState::Released });
    }

    #[test]
    fn press_records_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        press(&mut state, &mut frame, Key::W);
        press(&mut state, &mut frame, Key::W); // key repeat

        assert!(state.key_down(Key::W));
        assert_eq!(frame.keys_pressed.len(), 1);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        release(&mut state, &mut frame, Key::A);
        assert!(frame.keys_released.is_empty());
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        press(&mut state, &mut frame, Key::W);
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.key_down(Key::W));
        assert!(state.buttons_down.is_empty());
    }

    #[test]
    fn pointer_deltas_accumulate() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::PointerDelta { dx: 1.0, dy: -2.0 });
        state.apply_event(&mut frame, InputEvent::PointerDelta { dx: 0.5, dy: 0.5 });

        assert_eq!(frame.pointer_delta, (1.5, -1.5));
    }
}
