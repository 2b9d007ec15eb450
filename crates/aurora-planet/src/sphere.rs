//! UV sphere tessellation for the planet and its shells.
//!
//! Vertices are laid out in `height_segments + 1` rings of
//! `width_segments + 1` vertices from the north pole down. The seam column is
//! duplicated so `u` runs 0..=1 without wrapping, and the degenerate pole
//! triangles are skipped.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use aurora_render::{BufferAllocator, MeshBuffer};

/// Radius of the planet body.
pub const PLANET_RADIUS: f32 = 2.5;
/// Radius of the cloud shell.
pub const CLOUD_RADIUS: f32 = 2.55;
/// Radius of the glow shell.
pub const GLOW_RADIUS: f32 = 2.6;
/// Segments around and from pole to pole for every body.
pub const SPHERE_SEGMENTS: u32 = 64;

/// Shape parameters of a UV sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereGeometry {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl SphereGeometry {
    /// Segment counts are clamped to the minimum that still encloses a volume
    /// (3 around, 2 from pole to pole).
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self {
            radius,
            width_segments: width_segments.max(3),
            height_segments: height_segments.max(2),
        }
    }

    pub fn vertex_count(&self) -> usize {
        ((self.width_segments + 1) * (self.height_segments + 1)) as usize
    }

    /// Two triangles per quad, minus one per quad on the two pole rows.
    pub fn index_count(&self) -> usize {
        (self.width_segments * (2 * self.height_segments - 2) * 3) as usize
    }

    pub fn build(&self) -> SphereMesh {
        let ws = self.width_segments;
        let hs = self.height_segments;
        let mut vertices = Vec::with_capacity(self.vertex_count());

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            // Pole vertices sit halfway between their neighbours in u.
            let u_offset = if iy == 0 {
                0.5 / ws as f32
            } else if iy == hs {
                -0.5 / ws as f32
            } else {
                0.0
            };
            let theta = v * std::f32::consts::PI;
            let (sin_theta, cos_theta) = theta.sin_cos();

            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let phi = u * std::f32::consts::TAU;
                let (sin_phi, cos_phi) = phi.sin_cos();

                let normal = Vec3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
                let position = normal * self.radius;
                let tangent = Vec3::new(sin_phi, 0.0, cos_phi);

                vertices.push(SphereVertex {
                    position: position.to_array(),
                    normal: normal.to_array(),
                    tangent: tangent.to_array(),
                    uv: [u + u_offset, v],
                });
            }
        }

        let row = ws + 1;
        let mut indices = Vec::with_capacity(self.index_count());
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        SphereMesh { vertices, indices }
    }
}

/// Interleaved sphere vertex: position, normal, tangent (+u direction), uv.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub uv: [f32; 2],
}

impl SphereVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x3,
        3 => Float32x2,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side sphere mesh.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn upload(&self, device: &wgpu::Device, label: &str) -> MeshBuffer {
        BufferAllocator::new(device).create_mesh(label, &self.vertices, &self.indices)
    }
}
