//! GPU rendering subsystem.
//!
//! Each pass owns its pipelines and buffers and records into the frame
//! encoder via [`RenderTarget`]. Frame order is fixed by the app:
//! clear → mesh pass → skybox → outline pass → overlay → present.

mod ctx;
pub mod passes;

pub use ctx::{RenderCtx, RenderTarget};
pub use passes::{MeshDraw, MeshPass, OutlineDraw, OutlinePass, SkyboxPass};
pub use passes::{DirLightUniform, FrameUniform, LightsUniform, PointLightUniform, MAX_POINT_LIGHTS};
