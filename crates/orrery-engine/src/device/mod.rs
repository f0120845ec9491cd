//! GPU device + surface management.
//!
//! Responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - the depth-stencil attachment that tracks the surface size
//! - acquiring frames and providing encoders/views for rendering

mod depth;
mod gpu;

pub use depth::{DEPTH_STENCIL_FORMAT, DepthStencilTarget};
pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
