//====================================================================

use std::{ops::Range, sync::Arc};

use common::{Color, ImageHandle, Transform};
use hecs::{Entity, World};

use crate::{
    texture_storage::{LoadedTexture, TextureStorage},
    tools,
};

//====================================================================

/// Textured (or flat, when `image` is `None`) quad centred on its [`Transform`].
#[derive(Clone, Debug)]
pub struct Sprite {
    pub image: Option<ImageHandle>,
    pub size: glam::Vec2,
    pub color: Color,
}

impl Sprite {
    #[inline]
    pub fn image(image: ImageHandle) -> Self {
        Self {
            size: glam::vec2(image.width() as f32, image.height() as f32),
            image: Some(image),
            color: Color::WHITE,
        }
    }

    #[inline]
    pub fn rect(size: glam::Vec2, color: Color) -> Self {
        Self {
            image: None,
            size,
            color,
        }
    }
}

/// Stacking order of a drawable. Lower values are drawn first (further back).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Depth(pub i64);

/// Entities that carry a [`Transform`], [`Sprite`] and [`Depth`], back to front.
/// Ties are broken by entity id.
pub fn draw_order(world: &World) -> Vec<Entity> {
    let mut entities = world
        .query::<(&Transform, &Sprite, &Depth)>()
        .iter()
        .map(|(entity, (_, _, depth))| (*depth, entity))
        .collect::<Vec<_>>();

    entities.sort_by_key(|(depth, entity)| (*depth, entity.id()));
    entities.into_iter().map(|(_, entity)| entity).collect()
}

//====================================================================

pub struct TextureRenderer {
    pipeline: wgpu::RenderPipeline,

    instances: Option<tools::InstanceBuffer<InstanceTexture>>,
    batches: Vec<(Arc<LoadedTexture>, Range<u32>)>,
}

impl TextureRenderer {
    pub(crate) fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let pipeline = tools::create_pipeline(
            device,
            config,
            "Texture Pipeline",
            &[camera_bind_group_layout, texture_bind_group_layout],
            &[InstanceTexture::layout()],
            include_str!("../shaders/texture.wgsl"),
            tools::RenderPipelineDescriptor {
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    ..Default::default()
                },
                ..Default::default()
            }
            .with_alpha_blending(),
        );

        Self {
            pipeline,
            instances: None,
            batches: Vec::new(),
        }
    }

    pub(crate) fn prep(
        &mut self,
        world: &World,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        textures: &mut TextureStorage,
    ) {
        self.batches.clear();

        let mut raw = Vec::new();

        draw_order(world).into_iter().for_each(|entity| {
            let Ok(mut query) = world.query_one::<(&Transform, &Sprite)>(entity) else {
                return;
            };
            let Some((transform, sprite)) = query.get() else {
                return;
            };

            let texture = textures.get(device, queue, sprite.image.as_ref());

            let index = raw.len() as u32;
            raw.push(InstanceTexture {
                transform: transform.to_matrix(),
                color: sprite.color.to_array().into(),
                size: sprite.size,
                pad: [0.; 2],
            });

            // Consecutive draws of the same texture share one draw call
            let same_texture =
                matches!(self.batches.last(), Some((last, _)) if last.id() == texture.id());

            if !same_texture {
                self.batches.push((texture, index..index + 1));
            } else if let Some((_, range)) = self.batches.last_mut() {
                range.end = index + 1;
            }
        });

        match &mut self.instances {
            Some(instances) => instances.update(device, queue, &raw),
            None if !raw.is_empty() => {
                self.instances = Some(tools::InstanceBuffer::new(device, &raw));
            }
            None => {}
        }
    }

    pub(crate) fn render(&self, pass: &mut wgpu::RenderPass, camera_bind_group: &wgpu::BindGroup) {
        let Some(instances) = &self.instances else {
            return;
        };

        if instances.count() == 0 {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera_bind_group, &[]);
        pass.set_vertex_buffer(0, instances.buffer().slice(..));

        self.batches.iter().for_each(|(texture, range)| {
            pass.set_bind_group(1, texture.bind_group(), &[]);
            pass.draw(0..4, range.clone());
        });
    }
}

//====================================================================

#[repr(C)]
#[derive(bytemuck::Pod, bytemuck::Zeroable, Clone, Copy, Debug)]
pub struct InstanceTexture {
    pub transform: glam::Mat4,
    pub color: glam::Vec4,
    pub size: glam::Vec2,
    pub pad: [f32; 2],
}

impl InstanceTexture {
    fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
            0 => Float32x4, // Transform
            1 => Float32x4,
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4, // Color
            5 => Float32x4, // Size
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &VERTEX_ATTRIBUTES,
        }
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_rect(world: &mut World, depth: i64) -> Entity {
        world.spawn((
            Transform::default(),
            Sprite::rect(glam::vec2(10., 10.), Color::RED),
            Depth(depth),
        ))
    }

    #[test]
    fn test_draw_order_is_back_to_front() {
        let mut world = World::new();

        let front = spawn_rect(&mut world, 5);
        let back = spawn_rect(&mut world, -3);
        let middle = spawn_rect(&mut world, 0);

        assert_eq!(draw_order(&world), vec![back, middle, front]);
    }

    #[test]
    fn test_draw_order_skips_incomplete_entities() {
        let mut world = World::new();

        let drawn = spawn_rect(&mut world, 0);
        world.spawn((Transform::default(), Depth(1)));

        assert_eq!(draw_order(&world), vec![drawn]);
    }

    #[test]
    fn test_instance_layout_matches_attributes() {
        // 4 transform columns + colour + size/pad
        assert_eq!(std::mem::size_of::<InstanceTexture>(), 6 * 16);
    }
}

//====================================================================
