//! Free-flying camera with yaw/pitch mouse look and WASD-style movement.

use glam::{Mat4, Vec3};

const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;
const FOV_MIN: f32 = 1.0 * std::f32::consts::PI / 180.0;
const FOV_MAX: f32 = 45.0 * std::f32::consts::PI / 180.0;

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    /// Yaw in radians, 0 looking down -Z.
    pub yaw: f32,
    /// Pitch in radians, positive looking up.
    pub pitch: f32,
    /// Vertical field of view, radians.
    pub fov_y: f32,
    pub move_speed: f32,
    pub look_sensitivity: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 4.0, 14.0),
            yaw: 0.0,
            pitch: -0.25,
            fov_y: 45.0_f32.to_radians(),
            move_speed: 6.0,
            look_sensitivity: 0.0025,
            z_near: 0.1,
            z_far: 200.0,
        }
    }
}

/// Per-frame movement intent, already scaled by the caller's key state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    pub forward: f32,
    pub strafe: f32,
    /// Speed multiplier for the sprint modifier, 1.0 when unheld.
    pub boost: f32,
}

impl Camera {
    /// Unit vector the camera is looking along.
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(sy * cp, sp, -cy * cp).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    /// Perspective projection with wgpu's 0..1 depth range.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(1e-4), self.z_near, self.z_far)
    }

    pub fn process_move(&mut self, input: MoveInput, dt: f32) {
        let boost = if input.boost > 0.0 { input.boost } else { 1.0 };
        let step = self.move_speed * boost * dt;
        // Movement stays on the look direction, including pitch, so flying
        // up is just looking up and holding forward.
        self.position += self.forward() * (input.forward * step);
        self.position += self.right() * (input.strafe * step);
    }

    pub fn process_look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.look_sensitivity;
        self.pitch = (self.pitch - dy * self.look_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Wheel zoom narrows or widens the field of view.
    pub fn process_scroll(&mut self, delta: f32) {
        self.fov_y = (self.fov_y - delta * 0.05).clamp(FOV_MIN, FOV_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_looks_roughly_at_the_origin() {
        let cam = Camera::default();
        let to_origin = (-cam.position).normalize();
        assert!(cam.forward().dot(to_origin) > 0.9);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = Camera::default();
        cam.process_look(0.0, -100_000.0);
        assert!(cam.pitch <= PITCH_LIMIT + 1e-6);
        cam.process_look(0.0, 100_000.0);
        assert!(cam.pitch >= -PITCH_LIMIT - 1e-6);
    }

    #[test]
    fn forward_move_follows_the_look_direction() {
        let mut cam = Camera { pitch: 0.0, yaw: 0.0, ..Camera::default() };
        let before = cam.position;
        cam.process_move(MoveInput { forward: 1.0, ..Default::default() }, 0.5);
        let moved = cam.position - before;
        assert!(moved.normalize().abs_diff_eq(Vec3::NEG_Z, 1e-5));
        assert!((moved.length() - cam.move_speed * 0.5).abs() < 1e-4);
    }

    #[test]
    fn boost_scales_movement() {
        let mut plain = Camera { pitch: 0.0, ..Camera::default() };
        let mut fast = plain.clone();
        plain.process_move(MoveInput { forward: 1.0, ..Default::default() }, 1.0);
        fast.process_move(MoveInput { forward: 1.0, boost: 3.0, ..Default::default() }, 1.0);
        let a = (plain.position - Camera::default().position).length();
        let b = (fast.position - Camera::default().position).length();
        assert!((b - 3.0 * a).abs() < 1e-4);
    }

    #[test]
    fn scroll_zoom_is_clamped() {
        let mut cam = Camera::default();
        cam.process_scroll(1e6);
        assert!(cam.fov_y >= FOV_MIN - 1e-6);
        cam.process_scroll(-1e6);
        assert!(cam.fov_y <= FOV_MAX + 1e-6);
    }

    #[test]
    fn view_matrix_moves_the_world_opposite_the_camera() {
        let cam = Camera {
            position: Vec3::new(0.0, 0.0, 5.0),
            yaw: 0.0,
            pitch: 0.0,
            ..Camera::default()
        };
        let eye_space = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!(eye_space.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));
    }
}
