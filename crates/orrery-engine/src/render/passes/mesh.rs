use glam::Mat4;

use crate::assets::{Mesh, Texture2d, Vertex};
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    self, FrameUniform, LightsUniform, ObjectUniform, OBJECT_UNIFORM_STRIDE,
};

/// One lit, textured object for the main pass.
pub struct MeshDraw<'a> {
    pub mesh: &'a Mesh,
    /// Material bind group from [`MeshPass::create_material`].
    pub material: &'a wgpu::BindGroup,
    pub model: Mat4,
    /// Albedo multiplier; white leaves the texture untouched.
    pub tint: [f32; 3],
    pub shininess: f32,
    /// Stencil reference written where the object passes the depth test.
    /// `Some` marks the object for the outline pass; must be non-zero since
    /// the stencil clears to 0.
    pub stencil_ref: Option<u32>,
}

/// Blinn-Phong multi-light pass over all visible meshes.
///
/// Per-object data lives in one uniform buffer with 256-byte slots bound at
/// dynamic offsets; the buffer grows when a frame carries more objects than
/// ever before.
pub struct MeshPass {
    frame_buf: wgpu::Buffer,
    lights_buf: wgpu::Buffer,
    frame_bg: wgpu::BindGroup,

    object_bgl: wgpu::BindGroupLayout,
    object_buf: wgpu::Buffer,
    object_bg: wgpu::BindGroup,
    object_capacity: usize,

    frame_bgl: wgpu::BindGroupLayout,
    material_bgl: wgpu::BindGroupLayout,

    pipeline: Option<wgpu::RenderPipeline>,
    pipeline_format: Option<wgpu::TextureFormat>,
}

impl MeshPass {
    pub fn new(device: &wgpu::Device) -> Self {
        let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery mesh frame bgl"),
            entries: &[
                uniform_entry(0, std::mem::size_of::<FrameUniform>() as u64, false),
                uniform_entry(1, std::mem::size_of::<LightsUniform>() as u64, false),
            ],
        });

        let object_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery mesh object bgl"),
            entries: &[uniform_entry(
                0,
                std::mem::size_of::<ObjectUniform>() as u64,
                true,
            )],
        });

        let material_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery mesh material bgl"),
            entries: &[
                texture_entry(0),
                sampler_entry(1),
                texture_entry(2),
                sampler_entry(3),
            ],
        });

        let frame_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orrery mesh frame ubo"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lights_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orrery mesh lights ubo"),
            size: std::mem::size_of::<LightsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orrery mesh frame bg"),
            layout: &frame_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buf.as_entire_binding(),
                },
            ],
        });

        let object_capacity = 8;
        let object_buf = common::create_object_buffer(device, "orrery mesh object ubo", object_capacity);
        let object_bg = object_bind_group(device, &object_bgl, &object_buf);

        Self {
            frame_buf,
            lights_buf,
            frame_bg,
            object_bgl,
            object_buf,
            object_bg,
            object_capacity,
            frame_bgl,
            material_bgl,
            pipeline: None,
            pipeline_format: None,
        }
    }

    /// Builds a material bind group from diffuse + specular maps.
    pub fn create_material(
        &self,
        device: &wgpu::Device,
        diffuse: &Texture2d,
        specular: &Texture2d,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orrery mesh material"),
            layout: &self.material_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(diffuse.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(diffuse.sampler()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(specular.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(specular.sampler()),
                },
            ],
        })
    }

    /// Renders `draws` with the given camera and lights.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        frame: &FrameUniform,
        lights: &LightsUniform,
        draws: &[MeshDraw<'_>],
    ) {
        if draws.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_object_capacity(ctx, draws.len());

        ctx.queue
            .write_buffer(&self.frame_buf, 0, bytemuck::bytes_of(frame));
        ctx.queue
            .write_buffer(&self.lights_buf, 0, bytemuck::bytes_of(lights));

        let uniforms: Vec<ObjectUniform> = draws
            .iter()
            .map(|d| ObjectUniform::new(d.model, d.tint, d.shininess))
            .collect();
        ctx.queue
            .write_buffer(&self.object_buf, 0, &common::pack_object_uniforms(&uniforms));

        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("orrery mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &self.frame_bg, &[]);

        for (i, draw) in draws.iter().enumerate() {
            rpass.set_bind_group(1, &self.object_bg, &[common::object_offset(i)]);
            rpass.set_bind_group(2, draw.material, &[]);
            rpass.set_stencil_reference(draw.stencil_ref.unwrap_or(0));
            draw.mesh.draw(&mut rpass, 0..1);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orrery mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("orrery mesh pipeline layout"),
            bind_group_layouts: &[&self.frame_bgl, &self.object_bgl, &self.material_bgl],
            push_constant_ranges: &[],
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("orrery mesh pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(common::mesh_depth_stencil()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        self.pipeline = Some(pipeline);
        self.pipeline_format = Some(ctx.surface_format);
    }

    fn ensure_object_capacity(&mut self, ctx: &RenderCtx<'_>, needed: usize) {
        if needed <= self.object_capacity {
            return;
        }
        while self.object_capacity < needed {
            self.object_capacity *= 2;
        }
        self.object_buf =
            common::create_object_buffer(ctx.device, "orrery mesh object ubo", self.object_capacity);
        self.object_bg = object_bind_group(ctx.device, &self.object_bgl, &self.object_buf);
    }
}

fn object_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("orrery mesh object bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: std::num::NonZeroU64::new(std::mem::size_of::<ObjectUniform>() as u64),
            }),
        }],
    })
}

fn uniform_entry(binding: u32, min_size: u64, dynamic: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: dynamic,
            min_binding_size: std::num::NonZeroU64::new(min_size),
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

// OBJECT_UNIFORM_STRIDE is part of this pass's contract with the offsets.
const _: () = assert!(std::mem::size_of::<ObjectUniform>() as u64 <= OBJECT_UNIFORM_STRIDE);
