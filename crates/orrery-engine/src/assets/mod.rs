//! GPU asset upload: meshes, 2D textures, cubemaps.
//!
//! Loading is best-effort: a missing file logs a warning and the caller
//! substitutes a built-in stand-in (unit cube, checkerboard, flat cubemap)
//! so the demo runs without any asset directory.

mod cubemap;
mod mesh;
mod obj;
mod texture;

pub use cubemap::Cubemap;
pub use mesh::{Mesh, MeshData, Vertex};
pub use obj::load_obj;
pub use texture::Texture2d;
