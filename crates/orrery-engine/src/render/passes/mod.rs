//! The three scene passes: lit meshes, skybox, stencil outlines.

mod common;
mod mesh;
mod outline;
mod skybox;

pub use common::{
    DirLightUniform, FrameUniform, LightsUniform, PointLightUniform, MAX_POINT_LIGHTS,
};
pub use mesh::{MeshDraw, MeshPass};
pub use outline::{OutlineDraw, OutlinePass};
pub use skybox::SkyboxPass;
