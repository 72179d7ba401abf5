//====================================================================

use std::sync::{atomic::AtomicU32, Arc};

use crate::Size;

//====================================================================

static CURRENT_IMAGE_ID: AtomicU32 = AtomicU32::new(0);

/// Shared, immutable RGBA image.
///
/// Cloning is cheap. Every distinct image gets its own id, which the renderer
/// uses as the key of its uploaded texture.
#[derive(Clone, Debug)]
pub struct ImageHandle {
    id: u32,
    image: Arc<image::RgbaImage>,
}

impl ImageHandle {
    pub fn new(image: image::RgbaImage) -> Self {
        let id = CURRENT_IMAGE_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Self {
            id,
            image: Arc::new(image),
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn image(&self) -> &image::RgbaImage {
        &self.image
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[inline]
    pub fn size(&self) -> Size<u32> {
        Size::new(self.image.width(), self.image.height())
    }
}

impl PartialEq for ImageHandle {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ImageHandle {}

impl From<image::RgbaImage> for ImageHandle {
    #[inline]
    fn from(value: image::RgbaImage) -> Self {
        Self::new(value)
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_get_distinct_ids() {
        let a = ImageHandle::new(image::RgbaImage::new(2, 3));
        let b = ImageHandle::new(image::RgbaImage::new(2, 3));

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.size(), Size::new(2, 3));
    }
}

//====================================================================
