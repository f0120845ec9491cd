//! Ordered model-matrix composition.
//!
//! Matrices multiply in glm style: composing `[A, B, C]` yields `A * B * C`,
//! so the first listed step is the outermost (applied last to the vertex
//! going local → world). Reads the same as a chain of
//! `model = translate(model, ..)` calls in the usual tutorial formulation.

use glam::{Mat4, Vec3};

/// One step of a model transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Step {
    Translate(Vec3),
    /// Angles in radians throughout.
    RotateX(f32),
    RotateY(f32),
    RotateZ(f32),
    RotateAxis(Vec3, f32),
    Scale(Vec3),
}

impl Step {
    pub fn matrix(self) -> Mat4 {
        match self {
            Step::Translate(v) => Mat4::from_translation(v),
            Step::RotateX(a) => Mat4::from_rotation_x(a),
            Step::RotateY(a) => Mat4::from_rotation_y(a),
            Step::RotateZ(a) => Mat4::from_rotation_z(a),
            Step::RotateAxis(axis, a) => Mat4::from_axis_angle(axis.normalize(), a),
            Step::Scale(v) => Mat4::from_scale(v),
        }
    }
}

/// Folds the identity through `steps` with right-multiplication.
pub fn compose(steps: &[Step]) -> Mat4 {
    steps
        .iter()
        .fold(Mat4::IDENTITY, |model, step| model * step.matrix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn empty_composition_is_identity() {
        assert_eq!(compose(&[]), Mat4::IDENTITY);
    }

    #[test]
    fn compose_matches_manual_product() {
        let steps = [
            Step::RotateY(0.3),
            Step::Translate(Vec3::new(0.0, 0.0, 5.0)),
            Step::Scale(Vec3::splat(2.0)),
        ];
        let manual = Mat4::from_rotation_y(0.3)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0))
            * Mat4::from_scale(Vec3::splat(2.0));
        assert!(compose(&steps).abs_diff_eq(manual, 1e-6));
    }

    #[test]
    fn rotate_before_translate_produces_an_orbit() {
        // Outer rotation swings the translated point around the origin:
        // a quarter turn about Y carries +Z onto +X.
        let m = compose(&[
            Step::RotateY(FRAC_PI_2),
            Step::Translate(Vec3::new(0.0, 0.0, 1.0)),
        ]);
        let p = m.transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn translate_before_rotate_spins_in_place() {
        // Inner rotation spins the object about its own origin; its world
        // position is unaffected.
        let m = compose(&[
            Step::Translate(Vec3::new(0.0, 0.0, 1.0)),
            Step::RotateY(FRAC_PI_2),
        ]);
        let p = m.transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-6));
    }

    #[test]
    fn rotate_axis_matches_dedicated_rotations() {
        let about_y = Step::RotateAxis(Vec3::Y, 0.8).matrix();
        assert!(about_y.abs_diff_eq(Mat4::from_rotation_y(0.8), 1e-6));
        // Axis is normalized before use.
        let scaled_axis = Step::RotateAxis(Vec3::Y * 7.0, 0.8).matrix();
        assert!(scaled_axis.abs_diff_eq(about_y, 1e-6));
    }
}
