//! Shared GPU uniform layouts and stencil configurations.
//!
//! Everything here is `#[repr(C)]` + `Pod` and mirrors a WGSL struct; vec3
//! fields are widened to `[f32; 4]` to satisfy uniform alignment rules.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};

use crate::device::DEPTH_STENCIL_FORMAT;

/// Point-light budget of the mesh shader. The light rig truncates to this.
pub const MAX_POINT_LIGHTS: usize = 4;

/// Per-object uniform slot stride.
///
/// Matches the default `min_uniform_buffer_offset_alignment` (256); per-object
/// data is written at `index * STRIDE` and bound with a dynamic offset.
pub(super) const OBJECT_UNIFORM_STRIDE: u64 = 256;

// ── frame uniforms ────────────────────────────────────────────────────────

/// Camera data, shared by all three passes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = camera world position.
    pub view_pos: [f32; 4],
}

impl FrameUniform {
    pub fn new(view_proj: Mat4, view_pos: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            view_pos: [view_pos.x, view_pos.y, view_pos.z, 1.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
pub struct DirLightUniform {
    /// xyz = direction the light travels (not toward the light).
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// x = constant, y = linear, z = quadratic falloff terms.
    pub attenuation: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
pub struct LightsUniform {
    pub dir: DirLightUniform,
    pub points: [PointLightUniform; MAX_POINT_LIGHTS],
    /// x = active point-light count.
    pub count: [u32; 4],
}

// ── per-object uniforms ───────────────────────────────────────────────────

/// Mesh-pass per-object data.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Normal matrix (inverse-transpose of the model 3x3) as three
    /// 16-byte-aligned columns.
    pub normal: [[f32; 4]; 3],
    /// rgb = albedo tint, a = shininess exponent.
    pub tint: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4, tint: [f32; 3], shininess: f32) -> Self {
        let normal = normal_matrix(model);
        let cols = normal.to_cols_array_2d();
        Self {
            model: model.to_cols_array_2d(),
            normal: [
                [cols[0][0], cols[0][1], cols[0][2], 0.0],
                [cols[1][0], cols[1][1], cols[1][2], 0.0],
                [cols[2][0], cols[2][1], cols[2][2], 0.0],
            ],
            tint: [tint[0], tint[1], tint[2], shininess],
        }
    }
}

/// Outline-pass per-object data.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct OutlineUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// Inverse-transpose of the model's upper 3x3, for transforming normals under
/// non-uniform scale.
pub(super) fn normal_matrix(model: Mat4) -> Mat3 {
    Mat3::from_mat4(model).inverse().transpose()
}

pub(super) fn object_offset(index: usize) -> u32 {
    (index as u64 * OBJECT_UNIFORM_STRIDE) as u32
}

// ── depth-stencil configurations ──────────────────────────────────────────

/// Mesh pass: normal depth testing; outlined objects replace the stencil
/// with their reference value wherever they pass the depth test.
pub(super) fn mesh_depth_stencil() -> wgpu::DepthStencilState {
    let face = wgpu::StencilFaceState {
        compare: wgpu::CompareFunction::Always,
        fail_op: wgpu::StencilOperation::Keep,
        depth_fail_op: wgpu::StencilOperation::Keep,
        pass_op: wgpu::StencilOperation::Replace,
    };
    wgpu::DepthStencilState {
        format: DEPTH_STENCIL_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState {
            front: face,
            back: face,
            read_mask: 0xFF,
            write_mask: 0xFF,
        },
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Outline pass: depth test disabled so the border shows through occluders,
/// stencil passes only outside the object's own silhouette, stencil writes
/// masked off.
pub(super) fn outline_depth_stencil() -> wgpu::DepthStencilState {
    let face = wgpu::StencilFaceState {
        compare: wgpu::CompareFunction::NotEqual,
        fail_op: wgpu::StencilOperation::Keep,
        depth_fail_op: wgpu::StencilOperation::Keep,
        pass_op: wgpu::StencilOperation::Keep,
    };
    wgpu::DepthStencilState {
        format: DEPTH_STENCIL_FORMAT,
        depth_write_enabled: false,
        depth_compare: wgpu::CompareFunction::Always,
        stencil: wgpu::StencilState {
            front: face,
            back: face,
            read_mask: 0xFF,
            write_mask: 0x00,
        },
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Skybox: drawn last among opaques at depth 1.0, so `LessEqual` with writes
/// off fills exactly the untouched background pixels.
pub(super) fn skybox_depth_stencil() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_STENCIL_FORMAT,
        depth_write_enabled: false,
        depth_compare: wgpu::CompareFunction::LessEqual,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

// ── buffer helpers ────────────────────────────────────────────────────────

/// Creates (or grows) a per-object uniform buffer with `capacity` slots.
pub(super) fn create_object_buffer(
    device: &wgpu::Device,
    label: &str,
    capacity: usize,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: capacity as u64 * OBJECT_UNIFORM_STRIDE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Packs per-object uniforms into stride-aligned slots for one upload.
pub(super) fn pack_object_uniforms<T: Pod>(uniforms: &[T]) -> Vec<u8> {
    let stride = OBJECT_UNIFORM_STRIDE as usize;
    let mut bytes = vec![0u8; uniforms.len() * stride];
    for (i, u) in uniforms.iter().enumerate() {
        let src = bytemuck::bytes_of(u);
        bytes[i * stride..i * stride + src.len()].copy_from_slice(src);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn normal_matrix_of_rotation_is_the_rotation() {
        let rot = Mat4::from_rotation_y(0.7);
        let n = normal_matrix(rot);
        assert!(n.abs_diff_eq(Mat3::from_mat4(rot), 1e-5));
    }

    #[test]
    fn normal_matrix_undoes_nonuniform_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let n = normal_matrix(model);
        // A normal along +x must shrink, not stretch, under the x-scale.
        let v = n * Vec3::X;
        assert!((v.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn object_uniforms_land_on_stride_boundaries() {
        let uniforms = [
            ObjectUniform::new(Mat4::IDENTITY, [1.0, 0.0, 0.0], 32.0),
            ObjectUniform::new(Mat4::IDENTITY, [0.0, 1.0, 0.0], 32.0),
        ];
        let bytes = pack_object_uniforms(&uniforms);
        assert_eq!(bytes.len(), 2 * OBJECT_UNIFORM_STRIDE as usize);

        let second = &bytes[OBJECT_UNIFORM_STRIDE as usize..];
        let restored: &ObjectUniform =
            bytemuck::from_bytes(&second[..std::mem::size_of::<ObjectUniform>()]);
        assert_eq!(restored.tint, [0.0, 1.0, 0.0, 32.0]);
    }

    #[test]
    fn uniform_sizes_fit_their_slots() {
        assert!(std::mem::size_of::<ObjectUniform>() as u64 <= OBJECT_UNIFORM_STRIDE);
        assert!(std::mem::size_of::<OutlineUniform>() as u64 <= OBJECT_UNIFORM_STRIDE);
        // WGSL-side sizes; a mismatch here means the shader structs drifted.
        assert_eq!(std::mem::size_of::<FrameUniform>(), 80);
        assert_eq!(std::mem::size_of::<LightsUniform>(), 64 + 4 * 80 + 16);
    }
}
