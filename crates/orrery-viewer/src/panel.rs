//! The debug panel: feature toggles, animation tunables, frame stats.

use orrery_scene::{Camera, SceneState};

/// Smoothed frame statistics shown in the panel.
#[derive(Debug, Clone, Copy)]
pub struct FrameStats {
    /// Exponential moving average of the frame time, seconds.
    dt_avg: f32,
}

impl FrameStats {
    pub fn new() -> Self {
        Self { dt_avg: 1.0 / 60.0 }
    }

    pub fn push(&mut self, dt: f32) {
        self.dt_avg += (dt - self.dt_avg) * 0.05;
    }

    pub fn frame_ms(&self) -> f32 {
        self.dt_avg * 1000.0
    }

    pub fn fps(&self) -> f32 {
        if self.dt_avg > 0.0 { 1.0 / self.dt_avg } else { 0.0 }
    }
}

pub fn draw(ctx: &egui::Context, scene: &mut SceneState, camera: &mut Camera, stats: &FrameStats) {
    egui::Window::new("orrery")
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.label(format!(
                "{:.2} ms / frame ({:.0} fps)",
                stats.frame_ms(),
                stats.fps()
            ));
            ui.separator();

            let t = &mut scene.toggles;
            ui.checkbox(&mut t.animate, "animate");
            ui.checkbox(&mut t.outlines, "outlines");
            ui.checkbox(&mut t.skybox, "skybox");
            ui.checkbox(&mut t.ship, "ship");
            ui.checkbox(&mut t.devourer, "devourer");

            let p = &mut scene.params;

            ui.collapsing("planet", |ui| {
                ui.add(egui::Slider::new(&mut p.planet.orbit_distance, 2.0..=20.0).text("distance"));
                ui.add(egui::Slider::new(&mut p.planet.orbit_speed, 0.0..=2.0).text("orbit speed"));
                ui.add(egui::Slider::new(&mut p.planet.spin_speed, 0.0..=4.0).text("spin speed"));
            });

            ui.collapsing("moon", |ui| {
                ui.add(egui::Slider::new(&mut p.moon.orbit_distance, 0.5..=6.0).text("distance"));
                ui.add(egui::Slider::new(&mut p.moon.orbit_speed, 0.0..=4.0).text("orbit speed"));
            });

            ui.collapsing("ship", |ui| {
                ui.add(egui::Slider::new(&mut p.ship.tilt, 0.0..=1.2).text("tilt"));
                ui.add(egui::Slider::new(&mut p.ship.orbit_speed, 0.0..=2.0).text("orbit speed"));
            });

            ui.collapsing("devourer", |ui| {
                ui.add(egui::Slider::new(&mut p.devourer.orbit_speed, 0.0..=1.0).text("orbit speed"));
                ui.add(egui::Slider::new(&mut p.devourer.flip_rate, 0.0..=6.0).text("flip rate"));
            });

            ui.collapsing("look", |ui| {
                ui.add(egui::Slider::new(&mut p.outline_scale, 1.0..=1.5).text("outline scale"));
                ui.horizontal(|ui| {
                    ui.color_edit_button_rgb(&mut p.outline_color);
                    ui.label("outline");
                });
                ui.horizontal(|ui| {
                    ui.color_edit_button_rgb(&mut p.background);
                    ui.label("background");
                });
            });

            ui.collapsing("camera", |ui| {
                ui.add(egui::Slider::new(&mut camera.move_speed, 1.0..=30.0).text("speed"));
                ui.label(format!(
                    "pos ({:.1}, {:.1}, {:.1})",
                    camera.position.x, camera.position.y, camera.position.z
                ));
            });

            ui.separator();
            ui.label("enter: capture mouse / wasd: fly / esc: quit");
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_converge_toward_the_frame_time() {
        let mut stats = FrameStats::new();
        for _ in 0..500 {
            stats.push(0.032);
        }
        assert!((stats.frame_ms() - 32.0).abs() < 1.0);
        assert!((stats.fps() - 31.25).abs() < 1.5);
    }
}
