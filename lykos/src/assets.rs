//====================================================================

use std::path::{Path, PathBuf};

use common::ImageHandle;
use thiserror::Error;
use winit::window::{BadIcon, Icon};

//====================================================================

pub const SPRITE_ERROR_PATH: &str = "assets/sprite_error.png";

const BUILTIN_SPRITE_SIZE: u32 = 64;
const BUILTIN_SPRITE_CELL: u32 = 8;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Unable to load image '{path}': {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Unable to build icon: {0}")]
    Icon(#[from] BadIcon),

    #[error("Cannot scale a {width}px wide image to {target}px")]
    InvalidScale { width: u32, target: u32 },
}

/// Where a fighter's sprite ended up coming from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteSource {
    /// The requested file.
    Loaded,
    /// The error sprite on disk.
    Fallback,
    /// Neither file could be read, so a generated image is used.
    Builtin,
}

//====================================================================

pub fn load_image(path: impl AsRef<Path>) -> Result<ImageHandle, AssetError> {
    let path = path.as_ref();

    let image = image::open(path).map_err(|source| AssetError::Image {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!(
        "Loaded image '{}' ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    Ok(ImageHandle::new(image.to_rgba8()))
}

/// Loads a sprite, never failing: the requested file, then the error sprite on
/// disk, then a generated checkerboard.
pub fn load_sprite(path: impl AsRef<Path>) -> (ImageHandle, SpriteSource) {
    let path = path.as_ref();

    match load_image(path) {
        Ok(image) => return (image, SpriteSource::Loaded),
        Err(e) => log::warn!("{}. Using error sprite instead", e),
    }

    if path != Path::new(SPRITE_ERROR_PATH) {
        match load_image(SPRITE_ERROR_PATH) {
            Ok(image) => return (image, SpriteSource::Fallback),
            Err(e) => log::warn!("{}", e),
        }
    }

    log::warn!("Using built-in error sprite");
    (builtin_error_sprite(), SpriteSource::Builtin)
}

pub fn builtin_error_sprite() -> ImageHandle {
    let image = image::RgbaImage::from_fn(BUILTIN_SPRITE_SIZE, BUILTIN_SPRITE_SIZE, |x, y| {
        match (x / BUILTIN_SPRITE_CELL + y / BUILTIN_SPRITE_CELL) % 2 {
            0 => image::Rgba([255, 0, 255, 255]),
            _ => image::Rgba([0, 0, 0, 255]),
        }
    });

    ImageHandle::new(image)
}

pub fn load_icon(path: impl AsRef<Path>) -> Result<Icon, AssetError> {
    let image = load_image(path)?;
    let (width, height) = (image.width(), image.height());

    Ok(Icon::from_rgba(image.image().as_raw().clone(), width, height)?)
}

//====================================================================

/// Resizes `image` to `width` pixels, keeping its aspect ratio.
pub fn scale_to_width(image: &ImageHandle, width: u32) -> Result<ImageHandle, AssetError> {
    let old_width = image.width();

    if old_width == 0 || width == 0 {
        return Err(AssetError::InvalidScale {
            width: old_width,
            target: width,
        });
    }

    let height = (u64::from(image.height()) * u64::from(width) + u64::from(old_width) / 2)
        / u64::from(old_width);
    let height = u32::try_from(height.max(1)).map_err(|_| AssetError::InvalidScale {
        width: old_width,
        target: width,
    })?;

    let scaled = image::imageops::resize(
        image.image(),
        width,
        height,
        image::imageops::FilterType::Nearest,
    );

    Ok(ImageHandle::new(scaled))
}

/// [`scale_to_width`], falling back to the untouched image on failure.
pub fn scale_or_keep(image: &ImageHandle, width: u32) -> ImageHandle {
    match scale_to_width(image, width) {
        Ok(scaled) => scaled,
        Err(e) => {
            log::error!("{}. Keeping original image", e);
            image.clone()
        }
    }
}

/// Largest `max_width × max_height` region of `image` starting at the top-left.
pub fn crop(image: &ImageHandle, max_width: u32, max_height: u32) -> ImageHandle {
    if image.width() <= max_width && image.height() <= max_height {
        return image.clone();
    }

    let cropped = image::imageops::crop_imm(
        image.image(),
        0,
        0,
        image.width().min(max_width),
        image.height().min(max_height),
    )
    .to_image();

    ImageHandle::new(cropped)
}

//====================================================================

/// White ellipse filling a `width × height` transparent image.
pub fn ellipse(width: u32, height: u32) -> ImageHandle {
    let radius = glam::vec2(width as f32 / 2., height as f32 / 2.);

    let image = image::RgbaImage::from_fn(width.max(1), height.max(1), |x, y| {
        let pixel = glam::vec2(x as f32 + 0.5, y as f32 + 0.5);
        let offset = (pixel - radius) / radius.max(glam::Vec2::ONE);

        match offset.length_squared() <= 1. {
            true => image::Rgba([255, 255, 255, 255]),
            false => image::Rgba([0, 0, 0, 0]),
        }
    });

    ImageHandle::new(image)
}

/// White rectangle with a black `border` pixel outline.
pub fn outlined_rect(width: u32, height: u32, border: u32) -> ImageHandle {
    let (width, height) = (width.max(1), height.max(1));

    let image = image::RgbaImage::from_fn(width, height, |x, y| {
        let edge = x < border || y < border || x + border >= width || y + border >= height;

        match edge {
            true => image::Rgba([0, 0, 0, 255]),
            false => image::Rgba([255, 255, 255, 255]),
        }
    });

    ImageHandle::new(image)
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::write_png;

    #[test]
    fn test_load_image_reads_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "sprite.png", 48, 32);

        let image = load_image(&path).unwrap();
        assert_eq!((image.width(), image.height()), (48, 32));
    }

    #[test]
    fn test_load_image_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(dir.path().join("missing.png")).unwrap_err();

        assert!(matches!(err, AssetError::Image { .. }));
    }

    #[test]
    fn test_load_sprite_never_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (image, source) = load_sprite(dir.path().join("missing.png"));

        assert_ne!(source, SpriteSource::Loaded);
        assert!(image.width() > 0);
    }

    #[test]
    fn test_scale_to_width_keeps_aspect_ratio() {
        let image = ImageHandle::new(image::RgbaImage::new(300, 200));
        let scaled = scale_to_width(&image, 150).unwrap();

        assert_eq!((scaled.width(), scaled.height()), (150, 100));
    }

    #[test]
    fn test_scale_to_width_never_reaches_zero_height() {
        let image = ImageHandle::new(image::RgbaImage::new(1000, 1));
        let scaled = scale_to_width(&image, 10).unwrap();

        assert_eq!((scaled.width(), scaled.height()), (10, 1));
    }

    #[test]
    fn test_scale_or_keep_returns_original_on_failure() {
        let image = ImageHandle::new(image::RgbaImage::new(30, 20));
        let kept = scale_or_keep(&image, 0);

        assert_eq!(kept, image);
    }

    #[test]
    fn test_crop_only_when_needed() {
        let image = ImageHandle::new(image::RgbaImage::new(800, 300));

        let cropped = crop(&image, 698, 348);
        assert_eq!((cropped.width(), cropped.height()), (698, 300));

        let small = ImageHandle::new(image::RgbaImage::new(10, 10));
        assert_eq!(crop(&small, 698, 348), small);
    }

    #[test]
    fn test_ellipse_is_transparent_in_corners() {
        let shadow = ellipse(40, 30);
        let pixels = shadow.image();

        assert_eq!(pixels.get_pixel(0, 0).0[3], 0);
        assert_eq!(pixels.get_pixel(20, 15).0[3], 255);
    }

    #[test]
    fn test_outlined_rect_border() {
        let rect = outlined_rect(20, 15, 3);
        let pixels = rect.image();

        assert_eq!(pixels.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(pixels.get_pixel(2, 7).0, [0, 0, 0, 255]);
        assert_eq!(pixels.get_pixel(19, 14).0, [0, 0, 0, 255]);
        assert_eq!(pixels.get_pixel(10, 7).0, [255, 255, 255, 255]);
    }
}

//====================================================================
