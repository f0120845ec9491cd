//! Orrery scene crate.
//!
//! Pure CPU side of the demo: transform composition, the time-parameterized
//! body animations, the fly camera, lights and the per-scene state struct.
//! No GPU or windowing dependency, so everything here is unit-testable.

pub mod bodies;
pub mod camera;
pub mod lights;
pub mod state;
pub mod transform;

pub use camera::{Camera, MoveInput};
pub use lights::{DirectionalLight, LightRig, PointLight};
pub use state::{BodyKind, DrawBody, SceneParams, SceneState, Toggles};
