//! Platform-agnostic input event types.
//!
//! Only the keys the demo actually reacts to get named variants; everything
//! else is carried as `Unknown` so the state tracking stays consistent.

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Shift,
    W,
    A,
    S,
    D,
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Translated input event, produced by the runtime from winit events.
#[derive(Debug, Clone)]
pub enum InputEvent {
    Focused(bool),
    Key { key: Key, state: KeyState },
    Button { button: MouseButton, state: MouseButtonState },
    PointerMoved { x: f32, y: f32 },
    PointerLeft,
    /// Relative mouse motion from the device, in raw units. Delivered even
    /// while the cursor is captured, which window-space positions are not.
    PointerDelta { dx: f32, dy: f32 },
    Wheel { dx: f32, dy: f32 },
}
