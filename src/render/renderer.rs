//! Frame orchestration for the moon scene

use image::RgbaImage;

use crate::config::ViewerConfig;
use crate::core::camera::Camera;
use crate::core::error::Error;
use crate::phase::FrameOutput;
use crate::render::buffer::CameraBuffer;
use crate::render::context::GpuContext;
use crate::render::pipeline::{
    BloomPipeline, DisplayParams, DisplayPipeline, MoonParams, MoonPipeline, StarsPipeline,
};
use crate::render::texture::{MoonTexture, RenderTargets};
use crate::scene::{SphereMesh, Starfield};

/// Owns every GPU resource of the scene and records one frame per call.
///
/// Frame order: scene pass (moon then stars, into HDR + depth), bloom
/// bright/blur passes at half resolution, display pass to the surface.
pub struct MoonRenderer {
    camera_buffer: CameraBuffer,
    moon: MoonPipeline,
    stars: StarsPipeline,
    bloom: BloomPipeline,
    display: DisplayPipeline,
    targets: RenderTargets,
    #[allow(dead_code)]
    surface_texture: MoonTexture,
    moon_intensity: f32,
}

impl MoonRenderer {
    pub fn new(gpu: &GpuContext, config: &ViewerConfig, surface: &RgbaImage) -> Self {
        let device = &gpu.device;
        let queue = &gpu.queue;
        let (width, height) = gpu.size();

        let camera_buffer = CameraBuffer::new(device);
        let targets = RenderTargets::new(device, width, height);

        let surface_texture = MoonTexture::upload(device, queue, surface);
        let mesh = SphereMesh::new(&config.sphere);
        let moon = MoonPipeline::new(
            device,
            queue,
            camera_buffer.bind_group_layout(),
            &mesh,
            &surface_texture,
        );

        let starfield = Starfield::generate(&config.starfield);
        let stars = StarsPipeline::new(device, queue, camera_buffer.bind_group_layout(), &starfield);

        let bloom = BloomPipeline::new(device, queue, config.bloom, &targets);
        let display_params = DisplayParams::new(config.exposure, bloom.strength(), gpu.format());
        let display = DisplayPipeline::new(device, queue, gpu.format(), &display_params, &targets);

        log::info!(
            "Renderer ready: {} moon triangles, {} stars, {}x{}",
            mesh.index_count() / 3,
            starfield.len(),
            width,
            height
        );

        Self {
            camera_buffer,
            moon,
            stars,
            bloom,
            display,
            targets,
            surface_texture,
            moon_intensity: MoonParams::default().intensity,
        }
    }

    /// Recreate size-dependent targets. Zero sizes are ignored.
    pub fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32) {
        if width == 0 || height == 0 || self.targets.size() == (width, height) {
            return;
        }
        self.targets = RenderTargets::new(&gpu.device, width, height);
        self.bloom.resize(&gpu.device, &gpu.queue, &self.targets);
        self.display.resize(&gpu.device, &self.targets);
        log::debug!("Render targets resized to {}x{}", width, height);
    }

    /// Render and present one frame. A skipped frame (lost surface) is not
    /// an error.
    pub fn render(&mut self, gpu: &GpuContext, camera: &Camera, frame: &FrameOutput) -> Result<(), Error> {
        let Some(output) = gpu.acquire_frame()? else {
            return Ok(());
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.camera_buffer.update(&gpu.queue, camera);
        self.moon.update_params(
            &gpu.queue,
            &MoonParams {
                light_dir: frame.light_direction.to_array(),
                // Narrowed only for the GPU
                time: frame.time as f32,
                intensity: self.moon_intensity,
                _pad: [0.0; 3],
            },
        );

        let mut encoder = gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            self.moon.draw(&mut pass, self.camera_buffer.bind_group());
            self.stars.draw(&mut pass, self.camera_buffer.bind_group());
        }

        self.bloom.render(&mut encoder, &self.targets);
        self.display.render(&mut encoder, &view);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
