//====================================================================

use std::{num::NonZeroUsize, sync::Arc};

use common::{Color, ImageHandle};
use lru::LruCache;

use crate::{texture::Texture, tools};

//====================================================================

const TEXTURE_CACHE_SIZE: usize = 64;

/// Image ids count up from 0, so the white texture can never collide.
const WHITE_TEXTURE_ID: u32 = u32::MAX;

//====================================================================

pub struct LoadedTexture {
    id: u32,
    _texture: Texture,
    bind_group: wgpu::BindGroup,
}

impl LoadedTexture {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        id: u32,
        texture: Texture,
    ) -> Self {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Texture {} bind group", id)),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        Self {
            id,
            _texture: texture,
            bind_group,
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

impl PartialEq for LoadedTexture {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

//====================================================================

/// Gpu copies of [`ImageHandle`]s keyed by image id, plus the plain white
/// texture flat rectangles are tinted from.
pub struct TextureStorage {
    layout: wgpu::BindGroupLayout,
    white: Arc<LoadedTexture>,
    loaded: LruCache<u32, Arc<LoadedTexture>>,
}

impl TextureStorage {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sprite Texture Bind Group Layout"),
            entries: &[tools::bgl_texture_entry(0), tools::bgl_sampler_entry(1)],
        });

        let white = Arc::new(LoadedTexture::new(
            device,
            &layout,
            WHITE_TEXTURE_ID,
            Texture::from_color(device, queue, Color::WHITE, Some("White Texture")),
        ));

        Self {
            layout,
            white,
            loaded: LruCache::new(
                NonZeroUsize::new(TEXTURE_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN),
            ),
        }
    }

    /// Layout of the bind group every sprite texture is bound with.
    #[inline]
    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Texture for `image`, uploading it on first use. `None` gives the white texture.
    pub fn get(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: Option<&ImageHandle>,
    ) -> Arc<LoadedTexture> {
        let Some(image) = image else {
            return self.white.clone();
        };

        if let Some(texture) = self.loaded.get(&image.id()) {
            return texture.clone();
        }

        log::trace!("Uploading image {} {}", image.id(), image.size());

        let label = format!("Image {}", image.id());
        let texture = Arc::new(LoadedTexture::new(
            device,
            &self.layout,
            image.id(),
            Texture::from_image(device, queue, image.image(), Some(&label)),
        ));

        if let Some((evicted, _)) = self.loaded.push(image.id(), texture.clone()) {
            if evicted != image.id() {
                log::trace!("Evicted texture {}", evicted);
            }
        }

        texture
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_texture_id_is_never_an_image_id() {
        let image = ImageHandle::new(image::RgbaImage::new(1, 1));
        assert_ne!(image.id(), WHITE_TEXTURE_ID);
    }
}

//====================================================================
