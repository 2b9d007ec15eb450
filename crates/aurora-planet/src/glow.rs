//! Atmospheric glow: a back-facing shell just outside the clouds whose
//! brightness follows `(c - N·V)^p`, so it reads as a rim halo around the
//! planet rather than a solid sphere.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use aurora_render::{BlendMode, CAMERA_UNIFORM_WGSL, MeshBuffer, TargetConfig, multisample_state};

use crate::sphere::SphereMesh;

/// Bias term `c`.
pub const GLOW_BIAS: f32 = 0.1;
/// Exponent `p`.
pub const GLOW_POWER: f32 = 5.0;
/// Glow color as a 24-bit sRGB hex value.
pub const GLOW_COLOR_HEX: u32 = 0x93c5fd;

/// Convert a 24-bit sRGB hex color to linear RGB.
pub fn hex_to_linear_rgb(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let srgb = ((hex >> shift) & 0xff) as f32 / 255.0;
        if srgb <= 0.04045 {
            srgb / 12.92
        } else {
            ((srgb + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(channel(16), channel(8), channel(0))
}

/// Rim intensity for a surface normal seen along `view_vector`.
///
/// The base is clamped at zero before exponentiation, so fragments facing the
/// viewer more directly than `c` allows contribute nothing instead of NaN.
pub fn glow_intensity(normal: Vec3, view_vector: Vec3, c: f32, p: f32) -> f32 {
    let n = normal.normalize_or_zero();
    let v = view_vector.normalize_or_zero();
    (c - n.dot(v)).max(0.0).powf(p)
}

/// Named parameters read by the glow shader every frame. Only the values
/// change; `view_vector` follows the camera position.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct GlowUniforms {
    /// xyz = view vector, w unused.
    pub view_vector: [f32; 4],
    /// rgb = linear glow color, a unused.
    pub glow_color: [f32; 4],
    pub c: f32,
    pub p: f32,
    pub _padding: [f32; 2],
}

impl Default for GlowUniforms {
    fn default() -> Self {
        let color = hex_to_linear_rgb(GLOW_COLOR_HEX);
        Self {
            view_vector: [0.0, 0.0, 1.0, 0.0],
            glow_color: [color.x, color.y, color.z, 1.0],
            c: GLOW_BIAS,
            p: GLOW_POWER,
            _padding: [0.0; 2],
        }
    }
}

impl GlowUniforms {
    pub fn set_view_vector(&mut self, view_vector: Vec3) {
        self.view_vector = [view_vector.x, view_vector.y, view_vector.z, 0.0];
    }

    pub fn view_vector(&self) -> Vec3 {
        Vec3::new(self.view_vector[0], self.view_vector[1], self.view_vector[2])
    }

    pub fn glow_color(&self) -> Vec3 {
        Vec3::new(self.glow_color[0], self.glow_color[1], self.glow_color[2])
    }

    /// CPU evaluation of the shaded color for one normal.
    pub fn shade(&self, normal: Vec3) -> Vec3 {
        self.glow_color() * glow_intensity(normal, self.view_vector(), self.c, self.p)
    }
}

/// WGSL body for the glow shell. Prefixed with the shared camera declaration.
///
/// The shell is static, so normals and the view vector share world space and
/// their dot product matches the view-space one.
pub const GLOW_SHADER_SOURCE: &str = r#"
struct GlowUniforms {
    view_vector: vec4<f32>,
    glow_color: vec4<f32>,
    c: f32,
    p: f32,
    _padding: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

@group(1) @binding(0)
var<uniform> glow: GlowUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) tangent: vec3<f32>,
    @location(3) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) intensity: f32,
};

@vertex
fn vs_glow(in: VertexInput) -> VertexOutput {
    let n = normalize(in.normal);
    let v = normalize(glow.view_vector.xyz);
    var out: VertexOutput;
    out.intensity = pow(max(glow.c - dot(n, v), 0.0), glow.p);
    out.clip_position = camera.view_proj * vec4<f32>(in.position, 1.0);
    return out;
}

@fragment
fn fs_glow(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(glow.glow_color.rgb * in.intensity, 1.0);
}
"#;

/// Draws the glow shell: front faces culled, additive, depth-tested without writes.
pub struct GlowRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

impl GlowRenderer {
    pub fn new(
        device: &wgpu::Device,
        camera_layout: &wgpu::BindGroupLayout,
        targets: TargetConfig,
        mesh: &SphereMesh,
        uniforms: &GlowUniforms,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let source = format!("{CAMERA_UNIFORM_WGSL}{GLOW_SHADER_SOURCE}");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("glow-shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glow-uniform-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<GlowUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("glow-pipeline-layout"),
            bind_group_layouts: &[camera_layout, &uniform_bgl],
            immediate_size: 0,
        });

        let blend = BlendMode::Additive;
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("glow-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_glow"),
                buffers: &[crate::sphere::SphereVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                // Back side only: the halo is the far half of the shell.
                cull_mode: Some(wgpu::Face::Front),
                ..Default::default()
            },
            depth_stencil: Some(blend.depth_stencil()),
            multisample: multisample_state(targets.sample_count),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_glow"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: targets.color_format,
                    blend: blend.blend_state(),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glow-uniforms"),
            contents: bytemuck::bytes_of(uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glow-uniform-bg"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        tracing::info!(
            "Glow renderer initialized ({} triangles)",
            mesh.triangle_count()
        );

        Self {
            pipeline,
            mesh: mesh.upload(device, "glow-shell"),
            uniform_buffer,
            uniform_bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniforms: &GlowUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, camera: &'a wgpu::BindGroup) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera, &[]);
        pass.set_bind_group(1, &self.uniform_bind_group, &[]);
        self.mesh.bind(pass);
        self.mesh.draw(pass);
    }
}
