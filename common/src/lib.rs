//====================================================================

use std::fmt::Display;

pub use color::Color;
pub use handle::ImageHandle;

mod color;
mod handle;

//====================================================================

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    #[inline]
    pub const fn new(width: T, height: T) -> Self {
        Self { width, height }
    }
}

impl<T> From<(T, T)> for Size<T> {
    #[inline]
    fn from(value: (T, T)) -> Self {
        Self {
            width: value.0,
            height: value.1,
        }
    }
}

impl<T> From<Size<T>> for (T, T) {
    #[inline]
    fn from(value: Size<T>) -> Self {
        (value.width, value.height)
    }
}

impl<T: Display> Display for Size<T> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.width, self.height)
    }
}

//====================================================================

/// Top-left position that centres `window` on `screen`.
///
/// Uses floor division, so a window larger than the screen gets a negative
/// offset rounded towards negative infinity.
pub fn centered_position(screen: Size<u32>, window: Size<u32>) -> (i32, i32) {
    let x = (i64::from(screen.width) - i64::from(window.width)).div_euclid(2);
    let y = (i64::from(screen.height) - i64::from(window.height)).div_euclid(2);

    (x as i32, y as i32)
}

//====================================================================

/// Placement of a drawable in canvas space.
///
/// `translation` is the centre of the drawable in pixels (y pointing down),
/// `scale` stretches the unit quad the renderer draws.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub translation: glam::Vec3,
    pub rotation: glam::Quat,
    pub scale: glam::Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: glam::Vec3::ZERO,
            rotation: glam::Quat::IDENTITY,
            scale: glam::Vec3::ONE,
        }
    }
}

impl Transform {
    #[inline]
    pub fn from_translation(translation: impl Into<glam::Vec3>) -> Self {
        let translation = translation.into();
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Centre of a `size` rectangle whose top-left corner sits at `top_left`.
    #[inline]
    pub fn from_top_left(top_left: glam::Vec2, size: glam::Vec2) -> Self {
        Self::from_translation((top_left + size / 2.).extend(0.))
    }

    /// Centre of a `size` rectangle whose bottom edge is centred on `anchor`.
    #[inline]
    pub fn from_bottom_center(anchor: glam::Vec2, size: glam::Vec2) -> Self {
        Self::from_translation(glam::vec3(anchor.x, anchor.y - size.y / 2., 0.))
    }

    #[inline]
    pub fn position(&self) -> glam::Vec2 {
        self.translation.truncate()
    }

    #[inline]
    pub fn to_matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl From<&Transform> for glam::Mat4 {
    #[inline]
    fn from(value: &Transform) -> Self {
        value.to_matrix()
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_position_full_hd() {
        let pos = centered_position(Size::new(1920, 1080), Size::new(1080, 700));
        assert_eq!(pos, (420, 190));
    }

    #[test]
    fn test_centered_position_floors_odd_remainder() {
        let pos = centered_position(Size::new(1001, 801), Size::new(100, 100));
        assert_eq!(pos, (450, 350));
    }

    #[test]
    fn test_centered_position_window_larger_than_screen() {
        let pos = centered_position(Size::new(100, 100), Size::new(201, 100));
        assert_eq!(pos, (-51, 0));
    }

    #[test]
    fn test_transform_anchors() {
        let size = glam::vec2(40., 20.);

        let top_left = Transform::from_top_left(glam::vec2(4., 4.), size);
        assert_eq!(top_left.position(), glam::vec2(24., 14.));

        let bottom = Transform::from_bottom_center(glam::vec2(100., 300.), size);
        assert_eq!(bottom.position(), glam::vec2(100., 290.));
    }

    #[test]
    fn test_size_tuple_conversions() {
        let size: Size<u32> = (1080, 700).into();
        assert_eq!(size, Size::new(1080, 700));
        assert_eq!(size.to_string(), "(1080, 700)");

        let (w, h): (u32, u32) = size.into();
        assert_eq!((w, h), (1080, 700));
    }
}

//====================================================================
