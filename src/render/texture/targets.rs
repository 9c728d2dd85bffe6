//! Offscreen render targets for the HDR scene and bloom chain

use wgpu::{Device, Extent3d, Texture, TextureView};

/// HDR color format the scene is rendered into
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
/// Depth format shared by the moon and star passes
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Size-dependent textures, recreated on every resize.
///
/// The bloom textures are half resolution: `bloom_a` receives the bright
/// pass and the vertical blur, `bloom_b` the horizontal blur.
pub struct RenderTargets {
    #[allow(dead_code)]
    hdr: Texture,
    #[allow(dead_code)]
    depth: Texture,
    #[allow(dead_code)]
    bloom_a: Texture,
    #[allow(dead_code)]
    bloom_b: Texture,

    pub hdr_view: TextureView,
    pub depth_view: TextureView,
    pub bloom_a_view: TextureView,
    pub bloom_b_view: TextureView,

    width: u32,
    height: u32,
}

impl RenderTargets {
    pub fn new(device: &Device, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let (bloom_width, bloom_height) = bloom_size(width, height);

        let hdr = create_target(
            device,
            "scene_hdr",
            width,
            height,
            HDR_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let depth = create_target(
            device,
            "scene_depth",
            width,
            height,
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let bloom_usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let bloom_a = create_target(device, "bloom_a", bloom_width, bloom_height, HDR_FORMAT, bloom_usage);
        let bloom_b = create_target(device, "bloom_b", bloom_width, bloom_height, HDR_FORMAT, bloom_usage);

        let hdr_view = hdr.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());
        let bloom_a_view = bloom_a.create_view(&wgpu::TextureViewDescriptor::default());
        let bloom_b_view = bloom_b.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            hdr,
            depth,
            bloom_a,
            bloom_b,
            hdr_view,
            depth_view,
            bloom_a_view,
            bloom_b_view,
            width,
            height,
        }
    }

    /// Full-resolution size
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size of the bloom textures
    pub fn bloom_size(&self) -> (u32, u32) {
        bloom_size(self.width, self.height)
    }
}

/// Half resolution, never below one texel.
pub fn bloom_size(width: u32, height: u32) -> (u32, u32) {
    ((width / 2).max(1), (height / 2).max(1))
}

fn create_target(
    device: &Device,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    usage: wgpu::TextureUsages,
) -> Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    })
}
