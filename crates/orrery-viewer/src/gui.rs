//! egui integration: event routing, per-frame UI run, overlay render pass.

use winit::event::WindowEvent;
use winit::window::Window;

use orrery_engine::render::{RenderCtx, RenderTarget};

/// Tessellated UI output for one frame, handed from the update step to the
/// render step.
pub struct GuiFrame {
    textures_delta: egui::TexturesDelta,
    primitives: Vec<egui::ClippedPrimitive>,
    pixels_per_point: f32,
}

pub struct Gui {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Gui {
    pub fn new(window: &Window, device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            None,
            None,
            None,
        );
        // No depth attachment: the overlay draws on top of the finished 3D
        // frame in its own pass.
        let renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                dithering: false,
                ..Default::default()
            },
        );

        Self { ctx, state, renderer }
    }

    /// Feeds a window event to egui. Returns true when egui consumed it and
    /// the scene should not react.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    pub fn wants_pointer_input(&self) -> bool {
        self.ctx.wants_pointer_input()
    }

    pub fn wants_keyboard_input(&self) -> bool {
        self.ctx.wants_keyboard_input()
    }

    /// Runs the UI closure for this frame and tessellates the output.
    pub fn run(&mut self, window: &Window, mut ui: impl FnMut(&egui::Context)) -> GuiFrame {
        let raw_input = self.state.take_egui_input(window);
        let output = self.ctx.run(raw_input, |ctx| ui(ctx));
        self.state
            .handle_platform_output(window, output.platform_output);

        let pixels_per_point = self.ctx.pixels_per_point();
        let primitives = self.ctx.tessellate(output.shapes, pixels_per_point);

        GuiFrame {
            textures_delta: output.textures_delta,
            primitives,
            pixels_per_point,
        }
    }

    /// Draws the UI over the current frame contents.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, frame: GuiFrame) {
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [ctx.size.width, ctx.size.height],
            pixels_per_point: frame.pixels_per_point,
        };

        for (id, delta) in &frame.textures_delta.set {
            self.renderer
                .update_texture(ctx.device, ctx.queue, *id, delta);
        }
        self.renderer.update_buffers(
            ctx.device,
            ctx.queue,
            target.encoder,
            &frame.primitives,
            &screen,
        );

        {
            let rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("orrery gui pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static pass; the encoder outlives it.
            self.renderer
                .render(&mut rpass.forget_lifetime(), &frame.primitives, &screen);
        }

        for id in &frame.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
