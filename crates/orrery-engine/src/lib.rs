//! Orrery engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the demo:
//! window/event loop, wgpu device + surface, frame timing, input state,
//! GPU asset upload and the 3D render passes.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod color;
pub mod assets;
pub mod render;

pub use color::Color;
