//! CPU-side light descriptions. The renderer converts these into its own
//! uniform layout.

use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels, not toward the light.
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.3, -1.0, -0.4).normalize(),
            ambient: Vec3::splat(0.05),
            diffuse: Vec3::splat(0.35),
            specular: Vec3::splat(0.4),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl PointLight {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position,
            ambient: color * 0.1,
            diffuse: color,
            specular: color,
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }

    /// Attenuation factor at `distance`.
    pub fn attenuation(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// The lights the demo scene actually uses.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub sun: DirectionalLight,
    pub points: Vec<PointLight>,
}

impl LightRig {
    /// Dim directional fill plus a warm point light at the sun.
    pub fn solar() -> Self {
        Self {
            sun: DirectionalLight::default(),
            points: vec![PointLight::new(Vec3::ZERO, Vec3::new(1.0, 0.92, 0.75))],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attenuation_falls_off_with_distance() {
        let light = PointLight::new(Vec3::ZERO, Vec3::ONE);
        assert!((light.attenuation(0.0) - 1.0).abs() < 1e-6);
        assert!(light.attenuation(5.0) > light.attenuation(10.0));
        assert!(light.attenuation(50.0) < 0.02);
    }

    #[test]
    fn solar_rig_has_a_centered_point_light() {
        let rig = LightRig::solar();
        assert_eq!(rig.points.len(), 1);
        assert_eq!(rig.points[0].position, Vec3::ZERO);
        assert!(rig.sun.direction.is_normalized());
    }
}
