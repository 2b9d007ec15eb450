//! Procedural background starfield: a random point cloud scattered through a
//! cube around the scene, with an empty sphere carved out of the middle so no
//! star sits inside or near the planet.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use aurora_render::{BlendMode, CAMERA_UNIFORM_WGSL, PhysicalSize, TargetConfig, multisample_state};

/// Number of candidate points drawn per field.
pub const STAR_ATTEMPTS: usize = 15_000;
/// Half the side length of the sampling cube.
pub const STAR_FIELD_HALF_EXTENT: f32 = 1000.0;
/// Candidates at or inside this distance from the origin are dropped.
pub const STAR_EXCLUSION_RADIUS: f32 = 100.0;
/// Point size in world units, attenuated with distance.
pub const STAR_POINT_SIZE: f32 = 0.7;
/// Uniform star color.
pub const STAR_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// An immutable set of star positions.
#[derive(Debug, Clone, PartialEq)]
pub struct StarPointSet {
    positions: Vec<Vec3>,
}

impl StarPointSet {
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Rejection sampler for the starfield.
///
/// Every attempt draws each coordinate uniformly from
/// `[-half_extent, half_extent)` and keeps the point only if it lies strictly
/// outside `exclusion_radius`. Rejected attempts are not retried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarFieldGenerator {
    pub attempts: usize,
    pub half_extent: f32,
    pub exclusion_radius: f32,
}

impl Default for StarFieldGenerator {
    fn default() -> Self {
        Self {
            attempts: STAR_ATTEMPTS,
            half_extent: STAR_FIELD_HALF_EXTENT,
            exclusion_radius: STAR_EXCLUSION_RADIUS,
        }
    }
}

impl StarFieldGenerator {
    /// Generate a field from the given random source.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> StarPointSet {
        let side = self.half_extent * 2.0;
        let mut positions = Vec::with_capacity(self.attempts);

        for _ in 0..self.attempts {
            let point = Vec3::new(
                (rng.random::<f32>() - 0.5) * side,
                (rng.random::<f32>() - 0.5) * side,
                (rng.random::<f32>() - 0.5) * side,
            );
            if point.length() > self.exclusion_radius {
                positions.push(point);
            }
        }

        log::debug!(
            "Generated {} stars from {} attempts",
            positions.len(),
            self.attempts
        );
        StarPointSet { positions }
    }

    /// Generate a reproducible field for `Some(seed)`, or a fresh one from the thread RNG.
    pub fn generate_seeded(&self, seed: Option<u64>) -> StarPointSet {
        match seed {
            Some(seed) => self.generate(&mut ChaCha8Rng::seed_from_u64(seed)),
            None => self.generate(&mut rand::rng()),
        }
    }
}

/// GPU uniform for the star point sprites.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct StarUniforms {
    /// Model rotation of the whole field.
    pub model: [[f32; 4]; 4],
    /// RGB color, alpha 1.
    pub color: [f32; 4],
    /// Viewport size in pixels.
    pub viewport: [f32; 2],
    /// World-space point size.
    pub point_size: f32,
    /// Padding for 16-byte alignment.
    pub _padding: f32,
}

impl StarUniforms {
    pub fn new(rotation_y: f32, viewport: PhysicalSize) -> Self {
        Self {
            model: Mat4::from_rotation_y(rotation_y).to_cols_array_2d(),
            color: [STAR_COLOR[0], STAR_COLOR[1], STAR_COLOR[2], 1.0],
            viewport: [viewport.width as f32, viewport.height as f32],
            point_size: STAR_POINT_SIZE,
            _padding: 0.0,
        }
    }
}

/// WGSL body for the star sprites. Prefixed with the shared camera declaration.
///
/// Each instance is one star expanded into a screen-aligned square whose pixel
/// size is `point_size * (viewport_height / 2) / depth`, never smaller than one pixel.
pub const STAR_SHADER_SOURCE: &str = r#"
struct StarUniforms {
    model: mat4x4<f32>,
    color: vec4<f32>,
    viewport: vec2<f32>,
    point_size: f32,
    _padding: f32,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

@group(1) @binding(0)
var<uniform> stars: StarUniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
};

@vertex
fn vs_star(@builtin(vertex_index) vertex_index: u32, @location(0) position: vec3<f32>) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vertex_index];

    var clip = camera.view_proj * stars.model * vec4<f32>(position, 1.0);
    let depth = max(clip.w, 1e-4);
    let pixels = max(stars.point_size * stars.viewport.y * 0.5 / depth, 1.0);
    let half_ndc = vec2<f32>(pixels / stars.viewport.x, pixels / stars.viewport.y);
    clip = vec4<f32>(clip.xy + corner * half_ndc * clip.w, clip.z, clip.w);

    var out: VertexOutput;
    out.clip_position = clip;
    return out;
}

@fragment
fn fs_star() -> @location(0) vec4<f32> {
    return stars.color;
}
"#;

/// Draws the starfield as instanced point sprites.
pub struct StarFieldRenderer {
    pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

impl StarFieldRenderer {
    /// Upload `points` and build the sprite pipeline.
    pub fn new(
        device: &wgpu::Device,
        camera_layout: &wgpu::BindGroupLayout,
        targets: TargetConfig,
        points: &StarPointSet,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let source = format!("{CAMERA_UNIFORM_WGSL}{STAR_SHADER_SOURCE}");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("star-shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("star-uniform-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<StarUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("star-pipeline-layout"),
            bind_group_layouts: &[camera_layout, &uniform_bgl],
            immediate_size: 0,
        });

        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            }],
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("star-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_star"),
                buffers: &[instance_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(BlendMode::Opaque.depth_stencil()),
            multisample: multisample_state(targets.sample_count),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_star"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: targets.color_format,
                    blend: BlendMode::Opaque.blend_state(),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let raw: Vec<[f32; 3]> = points.positions().iter().map(|p| p.to_array()).collect();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star-instances"),
            contents: bytemuck::cast_slice(&raw),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniforms = StarUniforms::new(0.0, PhysicalSize::clamped(1, 1));
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star-uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("star-uniform-bg"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        log::info!("Starfield renderer initialized with {} stars", points.len());

        Self {
            pipeline,
            instance_buffer,
            instance_count: points.len() as u32,
            uniform_buffer,
            uniform_bind_group,
        }
    }

    /// Upload the field's current rotation and the viewport size.
    pub fn update(&self, queue: &wgpu::Queue, rotation_y: f32, viewport: PhysicalSize) {
        let uniforms = StarUniforms::new(rotation_y, viewport);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, camera: &'a wgpu::BindGroup) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera, &[]);
        pass.set_bind_group(1, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        pass.draw(0..6, 0..self.instance_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_star_outside_exclusion_radius() {
        let generator = StarFieldGenerator::default();
        for seed in [1, 42, 7_777, 123_456] {
            let field = generator.generate(&mut ChaCha8Rng::seed_from_u64(seed));
            for (i, p) in field.positions().iter().enumerate() {
                assert!(
                    p.length() > STAR_EXCLUSION_RADIUS,
                    "Seed {seed}: star {i} at distance {} is inside the exclusion sphere",
                    p.length()
                );
            }
        }
    }

    #[test]
    fn test_star_count_bounded_by_attempts() {
        let generator = StarFieldGenerator::default();
        for seed in [3, 99, 2024] {
            let field = generator.generate(&mut ChaCha8Rng::seed_from_u64(seed));
            assert!(field.len() <= STAR_ATTEMPTS);
            // The exclusion sphere is ~0.05% of the cube volume.
            assert!(
                field.len() > 14_900,
                "Seed {seed}: only {} stars survived",
                field.len()
            );
        }
    }

    #[test]
    fn test_stars_inside_sampling_cube() {
        let field = StarFieldGenerator::default().generate(&mut ChaCha8Rng::seed_from_u64(5));
        for p in field.positions() {
            assert!(p.abs().max_element() <= STAR_FIELD_HALF_EXTENT);
        }
    }

    #[test]
    fn test_unseeded_field_holds_invariants() {
        let field = StarFieldGenerator::default().generate_seeded(None);
        assert!(!field.is_empty());
        assert!(field.len() <= STAR_ATTEMPTS);
        assert!(
            field
                .positions()
                .iter()
                .all(|p| p.length() > STAR_EXCLUSION_RADIUS)
        );
    }

    #[test]
    fn test_same_seed_produces_same_field() {
        let generator = StarFieldGenerator::default();
        assert_eq!(
            generator.generate_seeded(Some(11)),
            generator.generate_seeded(Some(11))
        );
        assert_ne!(
            generator.generate_seeded(Some(11)),
            generator.generate_seeded(Some(12))
        );
    }

    #[test]
    fn test_exclusion_covering_cube_rejects_everything() {
        let generator = StarFieldGenerator {
            attempts: 500,
            half_extent: 10.0,
            exclusion_radius: 100.0,
        };
        let field = generator.generate(&mut ChaCha8Rng::seed_from_u64(1));
        assert!(field.is_empty());
    }

    #[test]
    fn test_octants_evenly_populated() {
        let field = StarFieldGenerator::default().generate(&mut ChaCha8Rng::seed_from_u64(42));
        let mut octants = [0usize; 8];
        for p in field.positions() {
            let octant = ((p.x >= 0.0) as usize)
                | (((p.y >= 0.0) as usize) << 1)
                | (((p.z >= 0.0) as usize) << 2);
            octants[octant] += 1;
        }
        for (i, &count) in octants.iter().enumerate() {
            assert!(
                (1_500..=2_250).contains(&count),
                "Octant {i} has {count} stars, expected roughly 1875"
            );
        }
    }

    #[test]
    fn test_star_uniforms_layout() {
        assert_eq!(std::mem::size_of::<StarUniforms>(), 96);
        let uniforms = StarUniforms::new(0.0, PhysicalSize::clamped(1280, 720));
        assert_eq!(uniforms.viewport, [1280.0, 720.0]);
        assert_eq!(uniforms.point_size, STAR_POINT_SIZE);
        assert_eq!(uniforms.color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_uniform_model_rotates_about_y() {
        let uniforms = StarUniforms::new(std::f32::consts::FRAC_PI_2, PhysicalSize::clamped(1, 1));
        let model = Mat4::from_cols_array_2d(&uniforms.model);
        let rotated = model.transform_point3(Vec3::X);
        assert!((rotated - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_shader_entry_points() {
        assert!(STAR_SHADER_SOURCE.contains("fn vs_star"));
        assert!(STAR_SHADER_SOURCE.contains("fn fs_star"));
        assert!(STAR_SHADER_SOURCE.contains("var<uniform> camera: CameraUniform"));
    }
}
