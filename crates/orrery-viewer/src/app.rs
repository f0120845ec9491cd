//! The viewer application: input handling, asset loading, frame assembly.

use std::path::Path;

use glam::Vec3;
use winit::event::WindowEvent;
use winit::window::Window;

use orrery_engine::Color;
use orrery_engine::assets::{Cubemap, Mesh, MeshData, Texture2d, load_obj};
use orrery_engine::core::{App, AppControl, FrameCtx};
use orrery_engine::input::{Key, MouseButton};
use orrery_engine::render::{
    DirLightUniform, FrameUniform, LightsUniform, MAX_POINT_LIGHTS, MeshDraw, MeshPass,
    OutlineDraw, OutlinePass, PointLightUniform, SkyboxPass,
};
use orrery_scene::{BodyKind, Camera, LightRig, MoveInput, SceneState};

use crate::gui::Gui;
use crate::panel::{self, FrameStats};

const ASSET_DIR: &str = "assets";
const SPRINT_MULTIPLIER: f32 = 3.0;

pub struct ViewerApp {
    scene: SceneState,
    camera: Camera,
    cursor_captured: bool,
    stats: FrameStats,

    // Built on the first frame, once a device exists.
    gfx: Option<GfxResources>,
    gui: Option<Gui>,
}

impl ViewerApp {
    pub fn new() -> Self {
        Self {
            scene: SceneState::new(),
            camera: Camera::default(),
            cursor_captured: false,
            stats: FrameStats::new(),
            gfx: None,
            gui: None,
        }
    }
}

impl App for ViewerApp {
    fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> AppControl {
        if let Some(gui) = self.gui.as_mut() {
            // While captured, the panel is not the pointer target.
            if !self.cursor_captured {
                gui.on_window_event(window, event);
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.gfx.is_none() {
            self.gfx = Some(GfxResources::load(ctx.gpu.device(), ctx.gpu.queue()));
        }
        if self.gui.is_none() {
            self.gui = Some(Gui::new(
                ctx.window.window,
                ctx.gpu.device(),
                ctx.gpu.surface_format(),
            ));
        }

        let dt = ctx.time.dt;
        self.stats.push(dt);

        let gui_keyboard = self.gui.as_ref().is_some_and(|g| g.wants_keyboard_input());
        let gui_pointer = self.gui.as_ref().is_some_and(|g| g.wants_pointer_input());

        if !gui_keyboard {
            if ctx.input_frame.pressed(Key::Escape) {
                return AppControl::Exit;
            }
            if ctx.input_frame.pressed(Key::Enter) {
                self.cursor_captured = !self.cursor_captured;
                ctx.window.set_cursor_captured(self.cursor_captured);
            }
            if ctx.input_frame.pressed(Key::Space) {
                self.scene.toggles.animate = !self.scene.toggles.animate;
            }

            let axis = |pos: bool, neg: bool| (pos as i32 - neg as i32) as f32;
            let movement = MoveInput {
                forward: axis(ctx.input.key_down(Key::W), ctx.input.key_down(Key::S)),
                strafe: axis(ctx.input.key_down(Key::D), ctx.input.key_down(Key::A)),
                boost: if ctx.input.key_down(Key::Shift) {
                    SPRINT_MULTIPLIER
                } else {
                    0.0
                },
            };
            self.camera.process_move(movement, dt);
        }

        let looking = self.cursor_captured || ctx.input.button_down(MouseButton::Right);
        if looking && !gui_pointer {
            let (dx, dy) = ctx.input_frame.pointer_delta;
            self.camera.process_look(dx, dy);
        }
        if !gui_pointer {
            let (_, wheel_y) = ctx.input_frame.wheel;
            if wheel_y != 0.0 {
                self.camera.process_scroll(wheel_y);
            }
        }

        self.scene.update(dt);

        // UI runs before the draw lists so slider changes land this frame.
        let gui_frame = {
            let scene = &mut self.scene;
            let camera = &mut self.camera;
            let stats = &self.stats;
            let Some(gui) = self.gui.as_mut() else {
                return AppControl::Continue;
            };
            gui.run(ctx.window.window, |egui_ctx| {
                panel::draw(egui_ctx, scene, camera, stats);
            })
        };

        let view = self.camera.view_matrix();
        let projection = self.camera.projection(ctx.window.aspect_ratio());
        let frame = FrameUniform::new(projection * view, self.camera.position);
        let lights = lights_uniform(&self.scene.lights);

        let snapshot = self.scene.snapshot();
        let outline_scale = self.scene.params.outline_scale;
        let [or, og, ob] = self.scene.params.outline_color;
        let outline_color = Color::rgb(or, og, ob);
        let [br, bg, bb] = self.scene.params.background;
        let clear = Color::rgb(br, bg, bb);
        let skybox_on = self.scene.toggles.skybox;

        let Some(gfx) = self.gfx.as_mut() else {
            return AppControl::Continue;
        };
        let GfxResources {
            mesh_pass,
            outline_pass,
            skybox_pass,
            bodies,
        } = gfx;

        let mut mesh_draws = Vec::with_capacity(snapshot.len());
        let mut outline_draws = Vec::new();
        for (i, body) in snapshot.iter().enumerate() {
            // The stencil clears to 0, so references start at 1.
            let stencil_ref = body.outline.then(|| i as u32 + 1);
            mesh_draws.push(MeshDraw {
                mesh: bodies.mesh(body.kind),
                material: bodies.material(body.kind),
                model: body.model,
                tint: BodyGfx::tint(body.kind),
                shininess: 32.0,
                stencil_ref,
            });
            if let Some(stencil_ref) = stencil_ref {
                outline_draws.push(OutlineDraw {
                    mesh: bodies.mesh(body.kind),
                    model: body.model,
                    stencil_ref,
                });
            }
        }

        let Some(gui) = self.gui.as_mut() else {
            return AppControl::Continue;
        };

        ctx.render(clear, |rctx, target| {
            mesh_pass.render(rctx, target, &frame, &lights, &mesh_draws);
            if skybox_on {
                skybox_pass.render(rctx, target, view, projection);
            }
            outline_pass.render(rctx, target, &frame, &outline_draws, outline_scale, outline_color);
            gui.render(rctx, target, gui_frame);
        })
    }
}

// ── GPU resources ─────────────────────────────────────────────────────────

struct GfxResources {
    mesh_pass: MeshPass,
    outline_pass: OutlinePass,
    skybox_pass: SkyboxPass,
    bodies: BodyGfx,
}

struct BodyGfx {
    sphere: Mesh,
    ship: Mesh,
    devourer: Mesh,

    sun_mat: wgpu::BindGroup,
    planet_mat: wgpu::BindGroup,
    moon_mat: wgpu::BindGroup,
    ship_mat: wgpu::BindGroup,
    devourer_mat: wgpu::BindGroup,
}

impl BodyGfx {
    fn mesh(&self, kind: BodyKind) -> &Mesh {
        match kind {
            BodyKind::Sun | BodyKind::Planet | BodyKind::Moon => &self.sphere,
            BodyKind::Ship => &self.ship,
            BodyKind::Devourer => &self.devourer,
        }
    }

    fn material(&self, kind: BodyKind) -> &wgpu::BindGroup {
        match kind {
            BodyKind::Sun => &self.sun_mat,
            BodyKind::Planet => &self.planet_mat,
            BodyKind::Moon => &self.moon_mat,
            BodyKind::Ship => &self.ship_mat,
            BodyKind::Devourer => &self.devourer_mat,
        }
    }

    /// Albedo tint; keeps the bodies tellable apart even on the fallback
    /// checkerboard textures.
    fn tint(kind: BodyKind) -> [f32; 3] {
        match kind {
            BodyKind::Sun => [1.0, 0.85, 0.4],
            BodyKind::Planet => [0.45, 0.65, 1.0],
            BodyKind::Moon => [0.8, 0.8, 0.8],
            BodyKind::Ship => [0.9, 0.9, 0.95],
            BodyKind::Devourer => [0.9, 0.3, 0.25],
        }
    }
}

impl GfxResources {
    fn load(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let mesh_pass = MeshPass::new(device);
        let outline_pass = OutlinePass::new(device);
        let mut skybox_pass = SkyboxPass::new(device);

        let sphere = upload_mesh(device, "sphere", "models/sphere.obj");
        let ship = upload_mesh(device, "ship", "models/ship.obj");
        let devourer = upload_mesh(device, "devourer", "models/devourer.obj");

        let sun_mat = body_material(&mesh_pass, device, queue, "sun", [255, 220, 120]);
        let planet_mat = body_material(&mesh_pass, device, queue, "planet", [120, 160, 255]);
        let moon_mat = body_material(&mesh_pass, device, queue, "moon", [200, 200, 200]);
        let ship_mat = body_material(&mesh_pass, device, queue, "ship", [220, 220, 230]);
        let devourer_mat = body_material(&mesh_pass, device, queue, "devourer", [230, 90, 70]);

        let cubemap = load_skybox(device, queue);
        skybox_pass.set_cubemap(device, &cubemap);

        Self {
            mesh_pass,
            outline_pass,
            skybox_pass,
            bodies: BodyGfx {
                sphere,
                ship,
                devourer,
                sun_mat,
                planet_mat,
                moon_mat,
                ship_mat,
                devourer_mat,
            },
        }
    }
}

fn upload_mesh(device: &wgpu::Device, label: &str, rel: &str) -> Mesh {
    let path = Path::new(ASSET_DIR).join(rel);
    let data = match load_obj(&path) {
        Ok(data) => data,
        Err(err) => {
            log::warn!(
                "mesh {} unavailable: {err:#}; using built-in cube",
                path.display()
            );
            MeshData::cube()
        }
    };
    Mesh::upload(device, label, &data)
}

fn body_material(
    mesh_pass: &MeshPass,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    name: &str,
    fallback: [u8; 3],
) -> wgpu::BindGroup {
    let diffuse_path = Path::new(ASSET_DIR).join(format!("textures/{name}.png"));
    let diffuse = match Texture2d::from_path(device, queue, &diffuse_path) {
        Ok(tex) => tex,
        Err(err) => {
            log::warn!(
                "texture {} unavailable: {err:#}; using checkerboard",
                diffuse_path.display()
            );
            let dark = [fallback[0] / 2, fallback[1] / 2, fallback[2] / 2];
            Texture2d::checkerboard(device, queue, 8, fallback, dark)
        }
    };

    let specular_path = Path::new(ASSET_DIR).join(format!("textures/{name}_specular.png"));
    let specular = match Texture2d::from_path(device, queue, &specular_path) {
        Ok(tex) => tex,
        // Missing specular maps are the common case; a dim uniform map
        // keeps the highlight subtle.
        Err(_) => Texture2d::solid(device, queue, [70, 70, 70, 255]),
    };

    mesh_pass.create_material(device, &diffuse, &specular)
}

fn load_skybox(device: &wgpu::Device, queue: &wgpu::Queue) -> Cubemap {
    let dir = Path::new(ASSET_DIR).join("skybox");
    let faces = ["px", "nx", "py", "ny", "pz", "nz"].map(|f| dir.join(format!("{f}.png")));
    let refs = faces.each_ref().map(|p| p.as_path());

    match Cubemap::from_faces(device, queue, &refs) {
        Ok(cubemap) => cubemap,
        Err(err) => {
            log::warn!("skybox unavailable: {err:#}; using flat sky");
            Cubemap::solid(device, queue, [10, 12, 24, 255])
        }
    }
}

// ── lights ────────────────────────────────────────────────────────────────

fn vec4(v: Vec3, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

/// Packs the scene's light rig into the shader layout, truncating to the
/// shader's point-light budget.
fn lights_uniform(rig: &LightRig) -> LightsUniform {
    let mut out = LightsUniform {
        dir: DirLightUniform {
            direction: vec4(rig.sun.direction, 0.0),
            ambient: vec4(rig.sun.ambient, 0.0),
            diffuse: vec4(rig.sun.diffuse, 0.0),
            specular: vec4(rig.sun.specular, 0.0),
        },
        ..Default::default()
    };

    for (slot, light) in out.points.iter_mut().zip(&rig.points) {
        *slot = PointLightUniform {
            position: vec4(light.position, 1.0),
            ambient: vec4(light.ambient, 0.0),
            diffuse: vec4(light.diffuse, 0.0),
            specular: vec4(light.specular, 0.0),
            attenuation: [light.constant, light.linear, light.quadratic, 0.0],
        };
    }
    out.count[0] = rig.points.len().min(MAX_POINT_LIGHTS) as u32;

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_scene::PointLight;

    #[test]
    fn lights_uniform_packs_the_solar_rig() {
        let rig = LightRig::solar();
        let uniform = lights_uniform(&rig);

        assert_eq!(uniform.count[0], 1);
        assert_eq!(uniform.points[0].position, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(uniform.points[0].attenuation, [1.0, 0.09, 0.032, 0.0]);
        // Unused slots stay zeroed.
        assert_eq!(uniform.points[1].diffuse, [0.0; 4]);
    }

    #[test]
    fn lights_uniform_truncates_to_the_budget() {
        let mut rig = LightRig::solar();
        for i in 0..8 {
            rig.points
                .push(PointLight::new(Vec3::new(i as f32, 0.0, 0.0), Vec3::ONE));
        }
        let uniform = lights_uniform(&rig);
        assert_eq!(uniform.count[0] as usize, MAX_POINT_LIGHTS);
    }
}
