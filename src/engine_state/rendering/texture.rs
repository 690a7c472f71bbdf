//! Texture handling for the rendering pipeline.
//!
//! This module provides the offscreen render targets: a colour texture that can be
//! copied back to the host, and the depth texture used during the voxel pass.

/// Represents a GPU texture with its default view.
pub struct Texture {
    /// The underlying WebGPU texture resource.
    pub texture: wgpu::Texture,
    /// The texture view used as a render attachment.
    pub view: wgpu::TextureView,
    /// Dimensions of the texture.
    pub size: wgpu::Extent3d,
}

impl Texture {
    /// The texture format used for depth buffers.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// The texture format used for the colour target.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Bytes per pixel of [`Texture::COLOR_FORMAT`].
    pub const COLOR_BYTES_PER_PIXEL: u32 = 4;

    /// Creates a new depth texture.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `width`, `height` - Dimensions in pixels
    /// * `label` - Debug label for the texture
    pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32, label: &str) -> Self {
        Self::create(
            device,
            width,
            height,
            Self::DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
            label,
        )
    }

    /// Creates a colour render target that can be copied to a buffer.
    pub fn create_color_target(device: &wgpu::Device, width: u32, height: u32, label: &str) -> Self {
        Self::create(
            device,
            width,
            height,
            Self::COLOR_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            label,
        )
    }

    fn create(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        };

        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            size,
        }
    }

    /// Row pitch of a colour readback, padded to the copy alignment.
    pub fn padded_bytes_per_row(width: u32) -> u32 {
        let unpadded = width * Self::COLOR_BYTES_PER_PIXEL;
        let alignment = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        unpadded.div_ceil(alignment) * alignment
    }
}
