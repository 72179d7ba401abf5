//====================================================================

use common::Size;
use wgpu::util::DeviceExt;

//====================================================================

pub struct Camera {
    pub camera: OrthographicCamera,
    pub data: CameraData,
}

impl Camera {
    #[inline]
    pub fn new(device: &wgpu::Device, camera: OrthographicCamera) -> Self {
        Self {
            data: CameraData::new(device, &camera),
            camera,
        }
    }

    #[inline]
    pub fn update_camera(&self, queue: &wgpu::Queue) {
        self.data.update_camera(queue, &self.camera);
    }

    #[inline]
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        self.data.bind_group_layout()
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        self.data.bind_group()
    }
}

//====================================================================

pub struct CameraData {
    camera_buffer: wgpu::Buffer,
    camera_bind_group_layout: wgpu::BindGroupLayout,
    camera_bind_group: wgpu::BindGroup,
}

impl CameraData {
    pub fn new<C: CameraUniform>(device: &wgpu::Device, camera: &C) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera buffer"),
            contents: bytemuck::cast_slice(&[camera.into_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[crate::tools::bgl_uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                )],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(camera_buffer.as_entire_buffer_binding()),
            }],
        });

        Self {
            camera_buffer,
            camera_bind_group_layout,
            camera_bind_group,
        }
    }

    #[inline]
    pub fn update_camera<C: CameraUniform>(&self, queue: &wgpu::Queue, camera: &C) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.into_uniform()]),
        );
    }

    #[inline]
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.camera_bind_group_layout
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.camera_bind_group
    }
}

//====================================================================

pub trait CameraUniform {
    fn into_uniform(&self) -> CameraUniformRaw;
}

#[repr(C)]
#[derive(bytemuck::Pod, bytemuck::Zeroable, Clone, Copy)]
pub struct CameraUniformRaw {
    view_projection: glam::Mat4,
    camera_position: glam::Vec3,
    _padding: u32,
}

impl CameraUniformRaw {
    pub fn new(view_projection: glam::Mat4, camera_position: glam::Vec3) -> Self {
        Self {
            view_projection,
            camera_position,
            _padding: 0,
        }
    }
}

//--------------------------------------------------

/// Pixel-space camera: (0, 0) is the top-left corner of the window and y
/// grows downwards, like a canvas.
#[derive(Debug, Clone)]
pub struct OrthographicCamera {
    pub width: f32,
    pub height: f32,
    pub z_near: f32,
    pub z_far: f32,

    pub translation: glam::Vec3,
}

impl Default for OrthographicCamera {
    fn default() -> Self {
        Self {
            width: 1080.,
            height: 700.,
            z_near: -1.,
            z_far: 1.,

            translation: glam::Vec3::ZERO,
        }
    }
}

impl CameraUniform for OrthographicCamera {
    fn into_uniform(&self) -> CameraUniformRaw {
        CameraUniformRaw::new(self.get_projection(), self.translation)
    }
}

impl OrthographicCamera {
    pub fn new_sized(size: Size<u32>) -> Self {
        Self {
            width: size.width as f32,
            height: size.height as f32,
            ..Default::default()
        }
    }

    pub fn set_size(&mut self, size: Size<u32>) {
        self.width = size.width as f32;
        self.height = size.height as f32;
    }

    pub fn get_projection(&self) -> glam::Mat4 {
        // bottom/top swapped so canvas y points down
        let projection_matrix = glam::Mat4::orthographic_lh(
            0.,
            self.width,
            self.height,
            0.,
            self.z_near,
            self.z_far,
        );

        projection_matrix * glam::Mat4::from_translation(-self.translation)
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_maps_canvas_corners() {
        let camera = OrthographicCamera::new_sized(Size::new(1080, 700));
        let projection = camera.get_projection();

        let top_left = projection.project_point3(glam::vec3(0., 0., 0.));
        assert!((top_left.x + 1.).abs() < 1e-5);
        assert!((top_left.y - 1.).abs() < 1e-5);

        let bottom_right = projection.project_point3(glam::vec3(1080., 700., 0.));
        assert!((bottom_right.x - 1.).abs() < 1e-5);
        assert!((bottom_right.y + 1.).abs() < 1e-5);
    }
}

//====================================================================
