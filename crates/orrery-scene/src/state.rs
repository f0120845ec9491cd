//! Authoritative scene state: what exists, how it is tuned, and where
//! everything sits at the current animation time.

use glam::{Mat4, Vec3};

use crate::bodies::{
    self, DevourerParams, MoonParams, PlanetParams, ShipParams,
};
use crate::lights::LightRig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Sun,
    Planet,
    Moon,
    Ship,
    Devourer,
}

/// UI-driven feature switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggles {
    pub animate: bool,
    pub outlines: bool,
    pub skybox: bool,
    pub ship: bool,
    pub devourer: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            animate: true,
            outlines: true,
            skybox: true,
            ship: true,
            devourer: true,
        }
    }
}

/// Tunables exposed by the debug panel.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneParams {
    pub planet: PlanetParams,
    pub moon: MoonParams,
    pub ship: ShipParams,
    pub devourer: DevourerParams,
    pub sun_scale: f32,
    /// Scale factor applied to outlined meshes on the outline pass.
    pub outline_scale: f32,
    pub outline_color: [f32; 3],
    pub background: [f32; 3],
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            planet: PlanetParams::default(),
            moon: MoonParams::default(),
            ship: ShipParams::default(),
            devourer: DevourerParams::default(),
            sun_scale: 2.2,
            outline_scale: 1.1,
            outline_color: [1.0, 0.62, 0.1],
            background: [0.02, 0.02, 0.04],
        }
    }
}

/// One body ready to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawBody {
    pub kind: BodyKind,
    pub model: Mat4,
    /// Whether this body gets the stencil outline.
    pub outline: bool,
}

#[derive(Debug, Clone)]
pub struct SceneState {
    pub toggles: Toggles,
    pub params: SceneParams,
    pub lights: LightRig,
    elapsed: f32,
}

impl SceneState {
    pub fn new() -> Self {
        Self {
            toggles: Toggles::default(),
            params: SceneParams::default(),
            lights: LightRig::solar(),
            elapsed: 0.0,
        }
    }

    /// Animation clock, only advancing while the animate toggle is on.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn update(&mut self, dt: f32) {
        if self.toggles.animate {
            self.elapsed += dt;
        }
    }

    /// Bodies to draw at the current clock, respecting the toggles.
    pub fn snapshot(&self) -> Vec<DrawBody> {
        let t = self.elapsed;
        let p = &self.params;
        let outlines = self.toggles.outlines;

        let mut list = vec![
            DrawBody {
                kind: BodyKind::Sun,
                model: Mat4::from_scale(Vec3::splat(p.sun_scale)),
                outline: false,
            },
            DrawBody {
                kind: BodyKind::Planet,
                model: bodies::planet_model(t, &p.planet),
                outline: outlines,
            },
            DrawBody {
                kind: BodyKind::Moon,
                model: bodies::moon_model(t, &p.planet, &p.moon),
                outline: outlines,
            },
        ];
        if self.toggles.ship {
            list.push(DrawBody {
                kind: BodyKind::Ship,
                model: bodies::ship_model(t, &p.ship),
                outline: false,
            });
        }
        if self.toggles.devourer {
            list.push(DrawBody {
                kind: BodyKind::Devourer,
                model: bodies::devourer_model(t, &p.devourer),
                outline: outlines,
            });
        }
        list
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_freezes_the_clock() {
        let mut scene = SceneState::new();
        scene.update(1.0);
        assert!((scene.elapsed() - 1.0).abs() < 1e-6);
        scene.toggles.animate = false;
        scene.update(1.0);
        assert!((scene.elapsed() - 1.0).abs() < 1e-6);
        let frozen = scene.snapshot();
        scene.update(5.0);
        assert_eq!(scene.snapshot(), frozen);
    }

    #[test]
    fn toggles_remove_optional_bodies() {
        let mut scene = SceneState::new();
        assert_eq!(scene.snapshot().len(), 5);
        scene.toggles.ship = false;
        scene.toggles.devourer = false;
        let bodies = scene.snapshot();
        assert_eq!(bodies.len(), 3);
        assert!(bodies.iter().all(|b| b.kind != BodyKind::Ship));
        assert!(bodies.iter().all(|b| b.kind != BodyKind::Devourer));
    }

    #[test]
    fn outline_toggle_clears_outline_flags() {
        let mut scene = SceneState::new();
        assert!(scene.snapshot().iter().any(|b| b.outline));
        scene.toggles.outlines = false;
        assert!(scene.snapshot().iter().all(|b| !b.outline));
    }

    #[test]
    fn sun_is_never_outlined() {
        let scene = SceneState::new();
        let sun = scene
            .snapshot()
            .into_iter()
            .find(|b| b.kind == BodyKind::Sun)
            .unwrap();
        assert!(!sun.outline);
        assert!(sun.model.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::ZERO, 1e-6));
    }
}
