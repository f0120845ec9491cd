use glam::{Mat3, Mat4};

use crate::assets::Cubemap;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{self, FrameUniform};

/// Cubemap skybox pass.
///
/// Drawn after the opaque geometry: the shader pins the cube to depth 1.0
/// (`pos.xyww`) and the `LessEqual` depth test fills only background pixels.
/// The cube geometry lives in the shader, so no vertex buffer is needed.
pub struct SkyboxPass {
    frame_buf: wgpu::Buffer,
    frame_bg: wgpu::BindGroup,
    frame_bgl: wgpu::BindGroupLayout,
    sky_bgl: wgpu::BindGroupLayout,
    sky_bg: Option<wgpu::BindGroup>,

    pipeline: Option<wgpu::RenderPipeline>,
    pipeline_format: Option<wgpu::TextureFormat>,
}

impl SkyboxPass {
    pub fn new(device: &wgpu::Device) -> Self {
        let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery skybox frame bgl"),
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

        let sky_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery skybox texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let frame_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orrery skybox frame ubo"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orrery skybox frame bg"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buf.as_entire_binding(),
            }],
        });

        Self {
            frame_buf,
            frame_bg,
            frame_bgl,
            sky_bgl,
            sky_bg: None,
            pipeline: None,
            pipeline_format: None,
        }
    }

    /// Binds the cubemap to sample. Call once after loading (and again only
    /// if the cubemap is replaced).
    pub fn set_cubemap(&mut self, device: &wgpu::Device, cubemap: &Cubemap) {
        self.sky_bg = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orrery skybox texture bg"),
            layout: &self.sky_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(cubemap.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(cubemap.sampler()),
                },
            ],
        }));
    }

    /// Renders the skybox with the camera's rotation only.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view: Mat4,
        projection: Mat4,
    ) {
        if self.sky_bg.is_none() {
            return;
        }

        self.ensure_pipeline(ctx);

        let Some(sky_bg) = self.sky_bg.as_ref() else {
            return;
        };

        // Strip the translation so the box never moves relative to the eye.
        let rotation_only = Mat4::from_mat3(Mat3::from_mat4(view));
        let frame = FrameUniform::new(projection * rotation_only, glam::Vec3::ZERO);
        ctx.queue
            .write_buffer(&self.frame_buf, 0, bytemuck::bytes_of(&frame));

        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("orrery skybox pass"),
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
        rpass.set_bind_group(1, sky_bg, &[]);
        // 36 vertices from the shader-side cube table.
        rpass.draw(0..36, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orrery skybox shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/skybox.wgsl").into()),
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("orrery skybox pipeline layout"),
            bind_group_layouts: &[&self.frame_bgl, &self.sky_bgl],
            push_constant_ranges: &[],
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("orrery skybox pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
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
                // Viewed from inside the cube.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(common::skybox_depth_stencil()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        self.pipeline = Some(pipeline);
        self.pipeline_format = Some(ctx.surface_format);
    }
}
