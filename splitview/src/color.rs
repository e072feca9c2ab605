use crate::math::Lerpable;

/// RGB colour with components in `0.0..=1.0`, stored in sRGB space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a colour from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Parses `#rrggbb` or `0xrrggbb`.
    pub fn parse(src: &str) -> Option<Self> {
        let digits = src
            .strip_prefix('#')
            .or_else(|| src.strip_prefix("0x"))
            .or_else(|| src.strip_prefix("0X"))?;

        if digits.len() != 6 {
            return None;
        }

        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }

    pub fn scale(&self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    pub fn to_linear(&self) -> Self {
        Self::new(
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
        )
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            255,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Lerpable for Color {
    fn lerp(&self, other: &Self, factor: f64) -> Self {
        let f = factor as f32;

        Self::new(
            self.r + (other.r - self.r) * f,
            self.g + (other.g - self.g) * f,
            self.b + (other.b - self.b) * f,
        )
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
    fn parses_hex_forms() {
        assert_eq!(Color::parse("#ffffff"), Some(Color::WHITE));
        assert_eq!(Color::parse("0x000000"), Some(Color::BLACK));
        assert_eq!(Color::parse("#000040"), Some(Color::from_hex(0x000040)));
        assert_eq!(Color::parse("ffffff"), None);
        assert_eq!(Color::parse("#fffff"), None);
        assert_eq!(Color::parse("#gggggg"), None);
    }

    #[test]
    fn linear_conversion_keeps_extremes() {
        assert_eq!(Color::BLACK.to_linear(), Color::BLACK);
        assert!((Color::WHITE.to_linear().g - 1.0).abs() < 1e-6);

        let mid = Color::new(0.5, 0.5, 0.5).to_linear();
        assert!((mid.r - 0.214).abs() < 1e-3);
    }
}
