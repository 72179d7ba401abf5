//====================================================================

/// Linear RGBA colour, components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0., 0., 0.);
    pub const WHITE: Color = Color::rgb(1., 1., 1.);
    pub const RED: Color = Color::rgb(1., 0., 0.);
    pub const GREEN: Color = Color::rgb(0., 1., 0.);
    pub const BLUE: Color = Color::rgb(0., 0., 1.);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1. }
    }

    /// Colour from 8 bit channels, as written in `#rrggbb` notation.
    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255., g as f32 / 255., b as f32 / 255.)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Color> for [f32; 4] {
    #[inline]
    fn from(value: Color) -> Self {
        value.to_array()
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb8_bounds() {
        assert_eq!(Color::from_rgb8(0, 0, 0), Color::BLACK);
        assert_eq!(Color::from_rgb8(255, 255, 255), Color::WHITE);
    }

    #[test]
    fn test_from_rgb8_usable_in_consts() {
        const GREY: Color = Color::from_rgb8(0xee, 0xee, 0xee);
        assert_eq!(GREY.to_array(), [238. / 255., 238. / 255., 238. / 255., 1.]);
    }
}

//====================================================================
