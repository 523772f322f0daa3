/// Straight-alpha RGBA stroke color.
///
/// Channels are expected in `[0, 1]`. Strokes are drawn opaque by default, so no
/// premultiplication is applied; the fragment shader outputs the color as is.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn red() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn green() -> Self {
        Self::new(0.0, 1.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn blue() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Creates a color from sRGB-encoded bytes (`0`–`255`), e.g. a hex palette.
    ///
    /// RGB is decoded to linear with the sRGB transfer function so it displays as
    /// written on an sRGB surface. Alpha is linear and only scaled.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            srgb_to_linear(r),
            srgb_to_linear(g),
            srgb_to_linear(b),
            a as f32 / 255.0,
        )
    }

    /// Channels in GPU order `[r, g, b, a]`.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

fn srgb_to_linear(v: u8) -> f32 {
    let c = v as f32 / 255.0;
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
    fn default_is_opaque_black() {
        assert_eq!(Color::default(), Color::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn from_srgb_u8_decodes_to_linear() {
        let c = Color::from_srgb_u8(255, 0, 128, 255);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        approx::assert_relative_eq!(c.b, 0.2158, epsilon = 1e-4);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn from_srgb_u8_keeps_alpha_linear() {
        let c = Color::from_srgb_u8(10, 10, 10, 128);
        approx::assert_relative_eq!(c.a, 128.0 / 255.0);
        approx::assert_relative_eq!(c.r, 10.0 / 255.0 / 12.92);
    }
}
