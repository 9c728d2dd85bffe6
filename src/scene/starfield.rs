//! Random star backdrop.

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use crate::config::StarfieldConfig;

/// Star positions scattered in a slab behind the moon.
pub struct Starfield {
    pub positions: Vec<[f32; 3]>,
}

impl Starfield {
    /// Generate stars from a seeded RNG, so a config always yields the same sky.
    pub fn generate(config: &StarfieldConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let positions = (0..config.count)
            .map(|_| {
                let x = (rng.r#gen::<f32>() - 0.5) * config.extent;
                let y = (rng.r#gen::<f32>() - 0.5) * config.extent;
                let z = -rng.r#gen::<f32>() * config.depth;
                [x, y, z]
            })
            .collect();
        Self { positions }
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.positions.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex buffer layout for the star pipeline (one vec3 per star)
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_and_bounds() {
        let config = StarfieldConfig::default();
        let stars = Starfield::generate(&config);
        assert_eq!(stars.len(), 100);
        for [x, y, z] in &stars.positions {
            assert!((-1000.0..1000.0).contains(x), "x = {x}");
            assert!((-1000.0..1000.0).contains(y), "y = {y}");
            assert!((-1000.0..=0.0).contains(z), "z = {z}");
        }
    }

    #[test]
    fn test_same_seed_same_sky() {
        let config = StarfieldConfig::default();
        let a = Starfield::generate(&config);
        let b = Starfield::generate(&config);
        assert_eq!(a.positions, b.positions);

        let other = Starfield::generate(&StarfieldConfig { seed: 7, ..config });
        assert_ne!(a.positions, other.positions);
    }

    #[test]
    fn test_empty_starfield() {
        let stars = Starfield::generate(&StarfieldConfig { count: 0, ..Default::default() });
        assert!(stars.is_empty());
    }
}
