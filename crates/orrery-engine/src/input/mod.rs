//! Keyboard/mouse input.
//!
//! `InputState` answers "is this held right now"; `InputFrame` collects the
//! per-frame deltas (presses, releases, mouse motion, wheel) and is cleared
//! after each frame is consumed.

mod frame;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState, MouseButton, MouseButtonState};
