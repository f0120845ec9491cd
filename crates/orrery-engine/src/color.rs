//! Linear RGBA color used for clears, tints and the outline pass.

/// Straight-alpha color in linear space.
///
/// The demo renders opaque geometry only, so no premultiplication is done;
/// values go straight into clear ops and shader uniforms.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Converts sRGB bytes to a linear color.
    pub fn from_srgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(
            srgb_to_linear(r as f32 / 255.0),
            srgb_to_linear(g as f32 / 255.0),
            srgb_to_linear(b as f32 / 255.0),
        )
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_black_and_white_are_exact() {
        assert_eq!(Color::from_srgb_u8(0, 0, 0), Color::BLACK);
        let w = Color::from_srgb_u8(255, 255, 255);
        assert!((w.r - 1.0).abs() < 1e-6);
        assert!((w.g - 1.0).abs() < 1e-6);
        assert!((w.b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn srgb_midtone_is_darker_in_linear() {
        let c = Color::from_srgb_u8(128, 128, 128);
        // 0.5 sRGB is roughly 0.214 linear.
        assert!(c.r > 0.2 && c.r < 0.23);
    }

    #[test]
    fn to_array_preserves_order() {
        let c = Color::rgba(0.1, 0.2, 0.3, 0.4);
        assert_eq!(c.to_array(), [0.1, 0.2, 0.3, 0.4]);
    }
}
