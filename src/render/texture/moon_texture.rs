//! Moon surface texture: loaded from disk or generated.

use std::path::Path;

use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::error::Error;

/// Width of the generated equirectangular surface; height is half of it.
pub const PROCEDURAL_WIDTH: u32 = 512;
const PROCEDURAL_SEED: u64 = 0x4D00_4E5F;
const CRATER_COUNT: usize = 48;

/// Decode an image file into RGBA8.
pub fn load_surface(path: &Path) -> Result<RgbaImage, Error> {
    let image = image::open(path)
        .map_err(|e| Error::Texture(format!("{}: {}", path.display(), e)))?
        .to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::Texture(format!("{}: image is empty", path.display())));
    }
    log::info!("Loaded moon texture {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image)
}

/// Grey cratered surface used when no texture file is configured.
///
/// Deterministic for a given width. Craters are darker bowls with a lighter
/// rim, placed in UV space and wrapped horizontally across the seam.
pub fn procedural_surface(width: u32) -> RgbaImage {
    let width = width.max(2);
    let height = (width / 2).max(1);
    let mut rng = StdRng::seed_from_u64(PROCEDURAL_SEED);

    let craters: Vec<(f32, f32, f32)> = (0..CRATER_COUNT)
        .map(|_| {
            let u = rng.r#gen::<f32>();
            let v = 0.1 + rng.r#gen::<f32>() * 0.8;
            let r = 0.01 + rng.r#gen::<f32>().powi(2) * 0.05;
            (u, v, r)
        })
        .collect();

    RgbaImage::from_fn(width, height, |x, y| {
        let u = (x as f32 + 0.5) / width as f32;
        let v = (y as f32 + 0.5) / height as f32;
        // Broad maria-like variation
        let mut shade = 0.62 + 0.08 * (u * 9.0).sin() * (v * 7.0).cos();
        for &(cu, cv, r) in &craters {
            let du = (u - cu).abs();
            let du = du.min(1.0 - du) * 2.0;
            let d = (du * du + (v - cv) * (v - cv)).sqrt() / r;
            if d < 0.8 {
                shade -= 0.12 * (1.0 - d / 0.8);
            } else if d < 1.0 {
                shade += 0.06;
            }
        }
        let c = (shade.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([c, c, c, 255])
    })
}

/// GPU copy of the moon surface with its sampler.
pub struct MoonTexture {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl MoonTexture {
    /// Upload an RGBA8 image as an sRGB texture.
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("moon_surface"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("moon_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { texture, view, sampler }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedural_dimensions() {
        let img = procedural_surface(PROCEDURAL_WIDTH);
        assert_eq!(img.dimensions(), (512, 256));
        assert!(img.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_procedural_is_deterministic_and_grey() {
        let a = procedural_surface(64);
        let b = procedural_surface(64);
        assert_eq!(a, b);
        assert!(a.pixels().all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2]));
    }

    #[test]
    fn test_procedural_has_variation() {
        let img = procedural_surface(128);
        let min = img.pixels().map(|p| p.0[0]).min().unwrap();
        let max = img.pixels().map(|p| p.0[0]).max().unwrap();
        assert!(max > min + 20, "expected visible craters, range {}..{}", min, max);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_surface(Path::new("/nonexistent/moon.png")).unwrap_err();
        assert!(matches!(err, Error::Texture(_)));
    }

    #[test]
    fn test_load_roundtrip_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moon.png");
        procedural_surface(32).save(&path).unwrap();
        let loaded = load_surface(&path).unwrap();
        assert_eq!(loaded.dimensions(), (32, 16));
    }
}
