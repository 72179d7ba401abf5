//====================================================================

use camera::{Camera, OrthographicCamera};
use common::{Color, Size};
use hecs::World;
use pipelines::texture_pipeline::TextureRenderer;
use texture_storage::TextureStorage;
use thiserror::Error;
use wgpu::SurfaceTarget;

pub mod camera;
pub mod pipelines;
pub mod texture;
pub mod texture_storage;
pub mod tools;

pub use pipelines::texture_pipeline::{draw_order, Depth, Sprite};

//====================================================================

#[derive(Error, Debug)]
pub enum RendererError {
    #[error("Unable to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("No suitable graphics adapter found")]
    NoAdapter,

    #[error("Unable to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("Surface reports no supported formats")]
    UnsupportedSurface,
}

//====================================================================

pub struct Renderer {
    core: RendererCore,
    textures: TextureStorage,

    pub camera: Camera,
    pub clear_color: wgpu::Color,

    texture_pipeline: TextureRenderer,
}

impl Renderer {
    pub fn new(
        window: impl Into<SurfaceTarget<'static>>,
        window_size: Size<u32>,
    ) -> Result<Self, RendererError> {
        let core = pollster::block_on(RendererCore::new(window, window_size))?;
        let textures = TextureStorage::new(&core.device, &core.queue);

        let camera = Camera::new(&core.device, OrthographicCamera::new_sized(window_size));

        let texture_pipeline = TextureRenderer::new(
            &core.device,
            &core.config,
            textures.layout(),
            camera.bind_group_layout(),
        );

        Ok(Self {
            core,
            textures,
            camera,
            clear_color: wgpu::Color {
                r: 0.2,
                g: 0.2,
                b: 0.2,
                a: 1.,
            },
            texture_pipeline,
        })
    }

    pub fn resize(&mut self, new_size: Size<u32>) {
        self.core.config.width = new_size.width;
        self.core.config.height = new_size.height;
        self.core
            .surface
            .configure(&self.core.device, &self.core.config);

        self.camera.camera.set_size(new_size);
    }

    #[inline]
    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = wgpu::Color {
            r: f64::from(color.r),
            g: f64::from(color.g),
            b: f64::from(color.b),
            a: f64::from(color.a),
        };
    }

    #[inline]
    pub fn tick(&mut self, world: &World) {
        self.update(world);
        self.render();
    }

    fn update(&mut self, world: &World) {
        self.camera.update_camera(&self.core.queue);

        self.texture_pipeline.prep(
            world,
            &self.core.device,
            &self.core.queue,
            &mut self.textures,
        );
    }

    fn render(&mut self) {
        let (surface_texture, surface_view) = match self.core.surface.get_current_texture() {
            Ok(texture) => {
                let view = texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                (texture, view)
            }
            Err(_) => {
                log::warn!("Unable to get surface texture - skipping frame");
                return;
            }
        };

        let mut encoder =
            self.core
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Main command encoder"),
                });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.texture_pipeline
            .render(&mut render_pass, self.camera.bind_group());

        // Finish render pass
        std::mem::drop(render_pass);

        self.core.queue.submit(Some(encoder.finish()));
        surface_texture.present();
    }
}

//====================================================================

pub struct RendererCore {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
}

impl RendererCore {
    pub async fn new(
        window: impl Into<SurfaceTarget<'static>>,
        window_size: Size<u32>,
    ) -> Result<Self, RendererError> {
        log::debug!("Creating core wgpu renderer components.");
        log::debug!("Window inner size = {:?}", window_size);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .ok_or(RendererError::NoAdapter)?;

        log::debug!("Chosen device adapter: {:#?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);

        let surface_format = surface_capabilities
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .or_else(|| surface_capabilities.formats.first())
            .copied()
            .ok_or(RendererError::UnsupportedSurface)?;

        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: window_size.width.max(1),
            height: window_size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };

        surface.configure(&device, &config);

        log::debug!("Successfully created core wgpu components.");

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }
}

//====================================================================
