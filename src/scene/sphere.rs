//! UV sphere mesh for the moon body.

use bytemuck::{Pod, Zeroable};
use std::f32::consts::{PI, TAU};

use crate::config::{SphereConfig, MAX_SPHERE_SEGMENTS};

/// Sphere vertex as uploaded to the GPU (must match moon.wgsl `VertexInput`)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl SphereVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    /// Vertex buffer layout for the moon pipeline
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle mesh of a sphere centered on the origin.
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Build a UV sphere.
    ///
    /// Rows run from the north pole (v = 0) to the south pole (v = 1); each
    /// row repeats its first vertex at u = 1 so the texture seam has its own
    /// UVs. Pole rows emit a single triangle per column.
    pub fn new(config: &SphereConfig) -> Self {
        let w = config.width_segments.clamp(3, MAX_SPHERE_SEGMENTS);
        let h = config.height_segments.clamp(2, MAX_SPHERE_SEGMENTS);
        let r = config.radius;

        let mut vertices = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
        for iy in 0..=h {
            let v = iy as f32 / h as f32;
            let (sin_theta, cos_theta) = (v * PI).sin_cos();
            for ix in 0..=w {
                let u = ix as f32 / w as f32;
                let (sin_phi, cos_phi) = (u * TAU).sin_cos();
                let normal = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
                vertices.push(SphereVertex {
                    position: [normal[0] * r, normal[1] * r, normal[2] * r],
                    normal,
                    uv: [u, v],
                });
            }
        }

        let row = w + 1;
        let mut indices = Vec::with_capacity((6 * w * (h - 1)) as usize);
        for iy in 0..h {
            for ix in 0..w {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != h - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn moon() -> SphereMesh {
        SphereMesh::new(&SphereConfig::default())
    }

    #[test]
    fn test_counts() {
        let mesh = moon();
        assert_eq!(mesh.vertices.len(), 51 * 51);
        assert_eq!(mesh.indices.len(), 6 * 50 * 49);
        let max = *mesh.indices.iter().max().unwrap();
        assert!((max as usize) < mesh.vertices.len());
    }

    #[test]
    fn test_segments_are_clamped() {
        let mesh = SphereMesh::new(&SphereConfig {
            radius: 1.0,
            width_segments: u32::MAX,
            height_segments: 2,
        });
        assert_eq!(mesh.vertices.len(), 1025 * 3);
        assert_eq!(mesh.index_count(), 6 * 1024);
    }

    #[test]
    fn test_vertices_on_surface_with_unit_normals() {
        let mesh = moon();
        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            let n = Vec3::from(v.normal);
            assert!((p.length() - 10.0).abs() < 1e-3, "radius {}", p.length());
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!((p / 10.0 - n).length() < 1e-5);
        }
    }

    #[test]
    fn test_triangles_face_outward() {
        let mesh = moon();
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from(mesh.vertices[tri[i] as usize].position));
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(
                face_normal.dot(centroid) > 0.0,
                "inward-facing triangle {tri:?}"
            );
        }
    }

    #[test]
    fn test_vertex_layout_size() {
        assert_eq!(std::mem::size_of::<SphereVertex>(), 32);
    }
}
