use anyhow::Result;

use crate::coords::Viewport;

use super::Texture;

/// What renderers need from the GPU layer while setting up or drawing a frame.
///
/// Borrowed for one call; renderers clone the device and queue handles they
/// keep.
#[derive(Clone, Copy)]
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Format pipelines must target.
    pub surface_format: wgpu::TextureFormat,
    /// Target size in logical pixels.
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self { device, queue, surface_format, viewport }
    }

    /// Shorthand for [`Texture::from_rgba8`].
    pub fn texture_rgba8(&self, width: u32, height: u32, pixels: &[u8]) -> Result<Texture> {
        Texture::from_rgba8(self, width, height, pixels)
    }
}
