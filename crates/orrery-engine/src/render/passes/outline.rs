use glam::{Mat4, Vec3};

use crate::assets::{Mesh, Vertex};
use crate::color::Color;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{self, FrameUniform, OutlineUniform};

/// One object to outline. `model` is the unscaled model matrix; the pass
/// applies the enlargement itself.
pub struct OutlineDraw<'a> {
    pub mesh: &'a Mesh,
    pub model: Mat4,
    /// Must match the reference the mesh pass wrote for this object.
    pub stencil_ref: u32,
}

/// Silhouette outline pass.
///
/// Second half of the classic two-pass stencil technique: the mesh pass wrote
/// each outlined object's reference into the stencil buffer; this pass
/// re-renders the object scaled up with a flat color wherever the stencil
/// does NOT hold that reference — which is exactly the border ring.
pub struct OutlinePass {
    frame_buf: wgpu::Buffer,
    frame_bg: wgpu::BindGroup,
    frame_bgl: wgpu::BindGroupLayout,

    object_bgl: wgpu::BindGroupLayout,
    object_buf: wgpu::Buffer,
    object_bg: wgpu::BindGroup,
    object_capacity: usize,

    pipeline: Option<wgpu::RenderPipeline>,
    pipeline_format: Option<wgpu::TextureFormat>,
}

impl OutlinePass {
    pub fn new(device: &wgpu::Device) -> Self {
        let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery outline frame bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<FrameUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let object_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery outline object bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<OutlineUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let frame_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orrery outline frame ubo"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orrery outline frame bg"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buf.as_entire_binding(),
            }],
        });

        let object_capacity = 8;
        let object_buf =
            common::create_object_buffer(device, "orrery outline object ubo", object_capacity);
        let object_bg = object_bind_group(device, &object_bgl, &object_buf);

        Self {
            frame_buf,
            frame_bg,
            frame_bgl,
            object_bgl,
            object_buf,
            object_bg,
            object_capacity,
            pipeline: None,
            pipeline_format: None,
        }
    }

    /// Renders outlines for `draws`, each enlarged by `scale` (1.1 = 110%).
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        frame: &FrameUniform,
        draws: &[OutlineDraw<'_>],
        scale: f32,
        color: Color,
    ) {
        if draws.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_object_capacity(ctx, draws.len());

        ctx.queue
            .write_buffer(&self.frame_buf, 0, bytemuck::bytes_of(frame));

        // Enlargement happens about the object's local origin, matching the
        // original scale-after-compose formulation.
        let enlarge = Mat4::from_scale(Vec3::splat(scale));
        let uniforms: Vec<OutlineUniform> = draws
            .iter()
            .map(|d| OutlineUniform {
                model: (d.model * enlarge).to_cols_array_2d(),
                color: color.to_array(),
            })
            .collect();
        ctx.queue
            .write_buffer(&self.object_buf, 0, &common::pack_object_uniforms(&uniforms));

        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("orrery outline pass"),
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
            rpass.set_stencil_reference(draw.stencil_ref);
            draw.mesh.draw(&mut rpass, 0..1);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orrery outline shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/outline.wgsl").into()),
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("orrery outline pipeline layout"),
            bind_group_layouts: &[&self.frame_bgl, &self.object_bgl],
            push_constant_ranges: &[],
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("orrery outline pipeline"),
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
            depth_stencil: Some(common::outline_depth_stencil()),
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
            common::create_object_buffer(ctx.device, "orrery outline object ubo", self.object_capacity);
        self.object_bg = object_bind_group(ctx.device, &self.object_bgl, &self.object_buf);
    }
}

fn object_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("orrery outline object bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: std::num::NonZeroU64::new(std::mem::size_of::<OutlineUniform>() as u64),
            }),
        }],
    })
}
