//! Bloom post-process: bright pass followed by a separable blur.
//!
//! All three passes run at half resolution. The result ends up in
//! `RenderTargets::bloom_a_view` and is added back by the display pass,
//! scaled by the configured strength.

use bytemuck::{Pod, Zeroable};

use crate::config::BloomConfig;
use crate::render::texture::{RenderTargets, HDR_FORMAT};

/// Per-pass bloom parameters (must match bloom.wgsl `BloomParams`)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BloomParams {
    /// Size of one destination texel in UV units
    pub texel_size: [f32; 2],
    /// Blur axis, zero for the bright pass
    pub direction: [f32; 2],
    /// Luminance below which pixels do not bloom
    pub threshold: f32,
    /// Kernel spread multiplier
    pub spread: f32,
    pub _pad: [f32; 2],
}

impl BloomParams {
    pub fn bright_pass(config: &BloomConfig, bloom_size: (u32, u32)) -> Self {
        Self {
            texel_size: texel_size(bloom_size),
            direction: [0.0, 0.0],
            threshold: config.threshold,
            spread: blur_spread(config.radius),
            _pad: [0.0; 2],
        }
    }

    pub fn blur_pass(config: &BloomConfig, bloom_size: (u32, u32), horizontal: bool) -> Self {
        Self {
            direction: if horizontal { [1.0, 0.0] } else { [0.0, 1.0] },
            ..Self::bright_pass(config, bloom_size)
        }
    }
}

fn texel_size((width, height): (u32, u32)) -> [f32; 2] {
    [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32]
}

/// Radius 0 keeps the kernel at one texel per tap; radius 1 doubles it.
fn blur_spread(radius: f32) -> f32 {
    1.0 + radius.clamp(0.0, 1.0)
}

/// Half-resolution bright extraction and blur passes.
pub struct BloomPipeline {
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    bright_params: wgpu::Buffer,
    blur_h_params: wgpu::Buffer,
    blur_v_params: wgpu::Buffer,
    bright_bind_group: wgpu::BindGroup,
    blur_h_bind_group: wgpu::BindGroup,
    blur_v_bind_group: wgpu::BindGroup,
    config: BloomConfig,
}

impl BloomPipeline {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: BloomConfig,
        targets: &RenderTargets,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("bloom_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/bloom.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bloom_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("bloom_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let make_pipeline = |label: &str, fragment_entry: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[], // Fullscreen triangle
                    compilation_options: Default::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fragment_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: HDR_FORMAT,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                multiview_mask: None,
                cache: None,
            })
        };
        let bright_pipeline = make_pipeline("bloom_bright_pipeline", "fs_bright");
        let blur_pipeline = make_pipeline("bloom_blur_pipeline", "fs_blur");

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("bloom_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let make_params = |label: &str| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<BloomParams>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let bright_params = make_params("bloom_bright_params");
        let blur_h_params = make_params("bloom_blur_h_params");
        let blur_v_params = make_params("bloom_blur_v_params");

        let bind = |label: &str, params: &wgpu::Buffer, source: &wgpu::TextureView| {
            Self::make_bind_group(device, &bind_group_layout, &sampler, label, params, source)
        };
        let bright_bind_group = bind("bloom_bright_bg", &bright_params, &targets.hdr_view);
        let blur_h_bind_group = bind("bloom_blur_h_bg", &blur_h_params, &targets.bloom_a_view);
        let blur_v_bind_group = bind("bloom_blur_v_bg", &blur_v_params, &targets.bloom_b_view);

        let pipeline = Self {
            bright_pipeline,
            blur_pipeline,
            bind_group_layout,
            sampler,
            bright_params,
            blur_h_params,
            blur_v_params,
            bright_bind_group,
            blur_h_bind_group,
            blur_v_bind_group,
            config,
        };
        pipeline.write_params(queue, targets.bloom_size());
        pipeline
    }

    fn make_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        label: &str,
        params: &wgpu::Buffer,
        source: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn write_params(&self, queue: &wgpu::Queue, bloom_size: (u32, u32)) {
        let bright = BloomParams::bright_pass(&self.config, bloom_size);
        let blur_h = BloomParams::blur_pass(&self.config, bloom_size, true);
        let blur_v = BloomParams::blur_pass(&self.config, bloom_size, false);
        queue.write_buffer(&self.bright_params, 0, bytemuck::bytes_of(&bright));
        queue.write_buffer(&self.blur_h_params, 0, bytemuck::bytes_of(&blur_h));
        queue.write_buffer(&self.blur_v_params, 0, bytemuck::bytes_of(&blur_v));
    }

    /// Rebind to freshly created targets after a resize.
    pub fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, targets: &RenderTargets) {
        let layout = &self.bind_group_layout;
        let sampler = &self.sampler;
        self.bright_bind_group =
            Self::make_bind_group(device, layout, sampler, "bloom_bright_bg", &self.bright_params, &targets.hdr_view);
        self.blur_h_bind_group =
            Self::make_bind_group(device, layout, sampler, "bloom_blur_h_bg", &self.blur_h_params, &targets.bloom_a_view);
        self.blur_v_bind_group =
            Self::make_bind_group(device, layout, sampler, "bloom_blur_v_bg", &self.blur_v_params, &targets.bloom_b_view);
        self.write_params(queue, targets.bloom_size());
    }

    pub fn strength(&self) -> f32 {
        self.config.strength
    }

    /// Bright pass into `bloom_a`, horizontal blur into `bloom_b`, vertical
    /// blur back into `bloom_a`.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, targets: &RenderTargets) {
        Self::fullscreen_pass(
            encoder,
            "bloom_bright_pass",
            &targets.bloom_a_view,
            &self.bright_pipeline,
            &self.bright_bind_group,
        );
        Self::fullscreen_pass(
            encoder,
            "bloom_blur_h_pass",
            &targets.bloom_b_view,
            &self.blur_pipeline,
            &self.blur_h_bind_group,
        );
        Self::fullscreen_pass(
            encoder,
            "bloom_blur_v_pass",
            &targets.bloom_a_view,
            &self.blur_pipeline,
            &self.blur_v_bind_group,
        );
    }

    fn fullscreen_pass(
        encoder: &mut wgpu::CommandEncoder,
        label: &str,
        target: &wgpu::TextureView,
        pipeline: &wgpu::RenderPipeline,
        bind_group: &wgpu::BindGroup,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_size() {
        assert_eq!(std::mem::size_of::<BloomParams>(), 32);
    }

    #[test]
    fn test_bright_pass_params() {
        let params = BloomParams::bright_pass(&BloomConfig::default(), (640, 360));
        assert_eq!(params.direction, [0.0, 0.0]);
        assert_eq!(params.threshold, 0.1);
        assert!((params.texel_size[0] - 1.0 / 640.0).abs() < 1e-9);
        assert!((params.texel_size[1] - 1.0 / 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_blur_directions() {
        let config = BloomConfig::default();
        assert_eq!(BloomParams::blur_pass(&config, (8, 8), true).direction, [1.0, 0.0]);
        assert_eq!(BloomParams::blur_pass(&config, (8, 8), false).direction, [0.0, 1.0]);
    }

    #[test]
    fn test_spread_from_radius() {
        assert!((blur_spread(0.1) - 1.1).abs() < 1e-6);
        assert_eq!(blur_spread(-3.0), 1.0);
        assert_eq!(blur_spread(5.0), 2.0);
    }
}
