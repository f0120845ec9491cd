use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Interleaved mesh vertex: position, normal, texture coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// CPU-side mesh, ready for upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Axis-aligned unit cube (side 1, centered at the origin), one quad per
    /// face with outward normals and full-face UVs.
    pub fn cube() -> Self {
        // (normal, four corners counter-clockwise seen from outside)
        const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([0.0, 0.0, 1.0], [
                [-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5],
            ]),
            ([0.0, 0.0, -1.0], [
                [0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5],
            ]),
            ([1.0, 0.0, 0.0], [
                [0.5, -0.5, 0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5],
            ]),
            ([-1.0, 0.0, 0.0], [
                [-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5],
            ]),
            ([0.0, 1.0, 0.0], [
                [-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5],
            ]),
            ([0.0, -1.0, 0.0], [
                [-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5],
            ]),
        ];
        const UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, corners) in FACES {
            let base = vertices.len() as u32;
            for (corner, uv) in corners.iter().zip(UVS) {
                vertices.push(Vertex {
                    position: *corner,
                    normal,
                    uv,
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }
}

/// Uploaded mesh: vertex + index buffers.
pub struct Mesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl Mesh {
    pub fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }

    /// Binds the buffers and issues the indexed draw.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, instances: std::ops::Range<u32>) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, instances);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn cube_has_24_vertices_and_36_indices() {
        let cube = MeshData::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert!(cube.indices.iter().all(|&i| (i as usize) < 24));
    }

    #[test]
    fn cube_normals_point_outward() {
        for v in MeshData::cube().vertices {
            let pos = Vec3::from(v.position);
            let normal = Vec3::from(v.normal);
            // Each face corner lies on the half of the cube its normal faces.
            assert!(pos.dot(normal) > 0.0, "inward normal at {pos:?}");
        }
    }

    #[test]
    fn cube_triangles_wind_counter_clockwise() {
        let cube = MeshData::cube();
        for tri in cube.indices.chunks(3) {
            let [a, b, c] = [
                Vec3::from(cube.vertices[tri[0] as usize].position),
                Vec3::from(cube.vertices[tri[1] as usize].position),
                Vec3::from(cube.vertices[tri[2] as usize].position),
            ];
            let face_normal = (b - a).cross(c - a);
            let stated = Vec3::from(cube.vertices[tri[0] as usize].normal);
            assert!(face_normal.dot(stated) > 0.0, "clockwise triangle {tri:?}");
        }
    }
}
