//! Time-parameterized model matrices for the four animated bodies.
//!
//! Each builder is a pure function of elapsed seconds and its parameter
//! struct; the step order is the contract (orbit rotation outside the
//! translation, spin inside it).

use glam::{Mat4, Vec3};

use crate::transform::{compose, Step};

/// Devourer flip limit: ±15 degrees.
pub const FLIP_LIMIT: f32 = 15.0 * std::f32::consts::PI / 180.0;

/// Oscillation amplitude before the clamp. Overdriving the sine makes the
/// flip dwell at the ±limit instead of easing through it.
const FLIP_OVERDRIVE: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanetParams {
    pub orbit_distance: f32,
    /// Radians per second around the sun.
    pub orbit_speed: f32,
    /// Radians per second about its own axis.
    pub spin_speed: f32,
    pub scale: f32,
}

impl Default for PlanetParams {
    fn default() -> Self {
        Self {
            orbit_distance: 7.0,
            orbit_speed: 0.25,
            spin_speed: 0.9,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoonParams {
    /// Distance from the planet.
    pub orbit_distance: f32,
    pub orbit_speed: f32,
    pub spin_speed: f32,
    pub scale: f32,
}

impl Default for MoonParams {
    fn default() -> Self {
        Self {
            orbit_distance: 2.0,
            orbit_speed: 1.4,
            spin_speed: 0.5,
            scale: 0.35,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipParams {
    /// Orbital-plane tilt in radians.
    pub tilt: f32,
    pub orbit_distance: f32,
    pub orbit_speed: f32,
    pub scale: f32,
}

impl Default for ShipParams {
    fn default() -> Self {
        Self {
            tilt: 0.4,
            orbit_distance: 4.0,
            orbit_speed: 0.6,
            scale: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DevourerParams {
    pub orbit_distance: f32,
    pub orbit_speed: f32,
    /// Oscillation rate of the flip, radians per second of phase.
    pub flip_rate: f32,
    pub scale: f32,
}

impl Default for DevourerParams {
    fn default() -> Self {
        Self {
            orbit_distance: 11.0,
            orbit_speed: 0.12,
            flip_rate: 1.8,
            scale: 1.6,
        }
    }
}

/// Planet: orbit rotation, out to orbit distance, then self-spin.
pub fn planet_model(t: f32, p: &PlanetParams) -> Mat4 {
    compose(&[
        Step::RotateY(t * p.orbit_speed),
        Step::Translate(Vec3::new(0.0, 0.0, p.orbit_distance)),
        Step::RotateY(t * p.spin_speed),
        Step::Scale(Vec3::splat(p.scale)),
    ])
}

/// Moon: the planet's orbital frame first, then the moon's own orbit,
/// offset and spin. Nesting the frames keeps it tracking the planet.
pub fn moon_model(t: f32, planet: &PlanetParams, m: &MoonParams) -> Mat4 {
    compose(&[
        Step::RotateY(t * planet.orbit_speed),
        Step::Translate(Vec3::new(0.0, 0.0, planet.orbit_distance)),
        Step::RotateY(t * m.orbit_speed),
        Step::Translate(Vec3::new(0.0, 0.0, m.orbit_distance)),
        Step::RotateY(t * m.spin_speed),
        Step::Scale(Vec3::splat(m.scale)),
    ])
}

/// Ship: tilt the orbital plane, then orbit, then out to distance.
pub fn ship_model(t: f32, p: &ShipParams) -> Mat4 {
    compose(&[
        Step::RotateZ(p.tilt),
        Step::RotateY(t * p.orbit_speed),
        Step::Translate(Vec3::new(0.0, 0.0, p.orbit_distance)),
        Step::Scale(Vec3::splat(p.scale)),
    ])
}

/// Devourer flip angle at time `t`, clamped to [`FLIP_LIMIT`].
pub fn devourer_flip(t: f32, p: &DevourerParams) -> f32 {
    ((t * p.flip_rate).sin() * FLIP_OVERDRIVE * FLIP_LIMIT).clamp(-FLIP_LIMIT, FLIP_LIMIT)
}

/// Devourer: slow outer orbit with the oscillating flip about its roll axis.
pub fn devourer_model(t: f32, p: &DevourerParams) -> Mat4 {
    compose(&[
        Step::RotateY(t * p.orbit_speed),
        Step::Translate(Vec3::new(0.0, 0.0, p.orbit_distance)),
        Step::RotateZ(devourer_flip(t, p)),
        Step::Scale(Vec3::splat(p.scale)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planet_matrix_identity() {
        // For all t, the composed planet matrix equals
        // rotate(t*orbit) * translate(0,0,d) * rotate(t*spin) * scale.
        let p = PlanetParams::default();
        for t in [0.0_f32, 0.37, 2.0, 17.5, 1000.0] {
            let expected = Mat4::from_rotation_y(t * p.orbit_speed)
                * Mat4::from_translation(Vec3::new(0.0, 0.0, p.orbit_distance))
                * Mat4::from_rotation_y(t * p.spin_speed)
                * Mat4::from_scale(Vec3::splat(p.scale));
            assert!(
                planet_model(t, &p).abs_diff_eq(expected, 1e-4),
                "mismatch at t = {t}"
            );
        }
    }

    #[test]
    fn planet_stays_on_its_orbit_radius() {
        let p = PlanetParams::default();
        for t in [0.0_f32, 1.0, 3.3, 9.9] {
            let pos = planet_model(t, &p).transform_point3(Vec3::ZERO);
            assert!((pos.length() - p.orbit_distance).abs() < 1e-4);
            // Orbit is in the XZ plane.
            assert!(pos.y.abs() < 1e-5);
        }
    }

    #[test]
    fn planet_spin_does_not_move_the_center() {
        let p = PlanetParams::default();
        let fast = PlanetParams { spin_speed: 10.0, ..p.clone() };
        let a = planet_model(2.0, &p).transform_point3(Vec3::ZERO);
        let b = planet_model(2.0, &fast).transform_point3(Vec3::ZERO);
        assert!(a.abs_diff_eq(b, 1e-5));
    }

    #[test]
    fn moon_stays_near_the_planet() {
        let planet = PlanetParams::default();
        let moon = MoonParams::default();
        for t in [0.0_f32, 0.5, 2.7, 31.4] {
            let planet_pos = planet_model(t, &planet).transform_point3(Vec3::ZERO);
            let moon_pos = moon_model(t, &planet, &moon).transform_point3(Vec3::ZERO);
            let dist = planet_pos.distance(moon_pos);
            assert!(
                (dist - moon.orbit_distance).abs() < 1e-4,
                "moon drifted to {dist} at t = {t}"
            );
        }
    }

    #[test]
    fn ship_orbit_is_tilted() {
        let p = ShipParams::default();
        // Over a full orbit the ship must leave the XZ plane.
        let mut max_y = 0.0_f32;
        let period = 2.0 * std::f32::consts::PI / p.orbit_speed;
        for i in 0..64 {
            let t = period * i as f32 / 64.0;
            let pos = ship_model(t, &p).transform_point3(Vec3::ZERO);
            max_y = max_y.max(pos.y.abs());
        }
        assert!(max_y > 1.0, "tilt had no effect, max |y| = {max_y}");
    }

    #[test]
    fn devourer_flip_respects_the_clamp() {
        let p = DevourerParams::default();
        let mut hit_limit = false;
        for i in 0..1000 {
            let flip = devourer_flip(i as f32 * 0.01, &p);
            assert!(flip.abs() <= FLIP_LIMIT + 1e-6);
            if (flip.abs() - FLIP_LIMIT).abs() < 1e-6 {
                hit_limit = true;
            }
        }
        // The overdriven sine must actually reach the clamp.
        assert!(hit_limit);
    }

    #[test]
    fn devourer_flip_oscillates() {
        let p = DevourerParams::default();
        let half_period = std::f32::consts::PI / p.flip_rate;
        let quarter = half_period / 2.0;
        assert!(devourer_flip(quarter, &p) > 0.0);
        assert!(devourer_flip(quarter + half_period, &p) < 0.0);
    }
}
