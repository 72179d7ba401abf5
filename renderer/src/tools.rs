//====================================================================

use std::marker::PhantomData;

use wgpu::util::DeviceExt;

//====================================================================

pub struct RenderPipelineDescriptor<'a> {
    pub primitive: wgpu::PrimitiveState,
    pub multisample: wgpu::MultisampleState,
    pub blend: Option<wgpu::BlendState>,
    pub cache: Option<&'a wgpu::PipelineCache>,
}

impl Default for RenderPipelineDescriptor<'_> {
    fn default() -> Self {
        Self {
            primitive: wgpu::PrimitiveState::default(),
            multisample: Default::default(),
            blend: Some(wgpu::BlendState::REPLACE),
            cache: None,
        }
    }
}

impl RenderPipelineDescriptor<'_> {
    pub fn with_alpha_blending(mut self) -> Self {
        self.blend = Some(wgpu::BlendState::ALPHA_BLENDING);
        self
    }
}

pub fn create_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    label: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    vertex_buffers: &[wgpu::VertexBufferLayout],
    shader_module_data: &str,

    desc: RenderPipelineDescriptor,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} layout", label)),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{} shader module", label)),
        source: wgpu::ShaderSource::Wgsl(shader_module_data.into()),
    });

    let fragment_targets = [Some(wgpu::ColorTargetState {
        format: config.format,
        blend: desc.blend,
        write_mask: wgpu::ColorWrites::all(),
    })];

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader_module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: vertex_buffers,
        },
        primitive: desc.primitive,
        depth_stencil: None,
        multisample: desc.multisample,
        fragment: Some(wgpu::FragmentState {
            module: &shader_module,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &fragment_targets,
        }),
        multiview: None,
        cache: desc.cache,
    })
}

//====================================================================

/// bind group layout uniform entry
pub fn bgl_uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn bgl_texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

pub fn bgl_sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

//====================================================================

pub fn create_instance_buffer<T: bytemuck::Pod>(
    device: &wgpu::Device,
    label: &str,
    data: &[T],
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Instance Buffer", label)),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}

//====================================================================

pub struct InstanceBuffer<T> {
    phantom: PhantomData<T>,
    buffer: wgpu::Buffer,
    capacity: usize,
    count: u32,
}

impl<T: bytemuck::Pod> InstanceBuffer<T> {
    #[inline]
    pub fn new(device: &wgpu::Device, data: &[T]) -> Self {
        Self {
            phantom: PhantomData,
            buffer: create_instance_buffer(device, std::any::type_name::<T>(), data),
            capacity: data.len(),
            count: data.len() as u32,
        }
    }

    pub fn update(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[T]) {
        self.count = data.len() as u32;

        if data.is_empty() {
            return;
        }

        // We can fit all data inside existing buffer
        if data.len() <= self.capacity {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
            return;
        }

        // Buffer is too small to fit new data. Create a new bigger one.
        self.buffer = create_instance_buffer(device, std::any::type_name::<T>(), data);
        self.capacity = data.len();
    }

    #[inline]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }
}

//====================================================================
