//! Textured standard-material surfaces: the opaque planet body and the
//! additive cloud shell share one shader and differ only in material values,
//! blend mode and which maps have arrived.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use aurora_lighting::{LIGHTS_UNIFORM_WGSL, PBR_FUNCTIONS_WGSL};
use aurora_render::{
    BlendMode, CAMERA_UNIFORM_WGSL, GpuTexture, MeshBuffer, TargetConfig, TextureError,
    create_sphere_sampler, multisample_state,
};

use crate::sphere::{SphereMesh, SphereVertex};

/// Texture maps a standard material samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialMap {
    /// Base color (albedo).
    Color,
    /// Tangent-space normal map.
    Normal,
    /// Specular intensity, read from the red channel.
    Specular,
    /// Emission, multiplied by the material's emissive color.
    Emissive,
}

impl MaterialMap {
    pub const ALL: [MaterialMap; 4] = [
        MaterialMap::Color,
        MaterialMap::Normal,
        MaterialMap::Specular,
        MaterialMap::Emissive,
    ];

    pub fn index(self) -> usize {
        match self {
            MaterialMap::Color => 0,
            MaterialMap::Normal => 1,
            MaterialMap::Specular => 2,
            MaterialMap::Emissive => 3,
        }
    }

    /// Color data is sRGB-encoded; normals and specular masks are linear.
    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            MaterialMap::Color | MaterialMap::Emissive => wgpu::TextureFormat::Rgba8UnormSrgb,
            MaterialMap::Normal | MaterialMap::Specular => wgpu::TextureFormat::Rgba8Unorm,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MaterialMap::Color => "color",
            MaterialMap::Normal => "normal",
            MaterialMap::Specular => "specular",
            MaterialMap::Emissive => "emissive",
        }
    }
}

/// Standard (metal/rough) surface parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMaterial {
    pub metalness: f32,
    pub roughness: f32,
    pub opacity: f32,
    /// Linear RGB multiplier for the emissive map.
    pub emissive: Vec3,
    pub blend: BlendMode,
    /// Color map texel used until the real map arrives.
    pub fallback_color: [u8; 4],
}

impl StandardMaterial {
    /// Metal/rough planet body with city lights on the emissive map.
    pub fn planet() -> Self {
        Self {
            metalness: 0.5,
            roughness: 0.7,
            opacity: 1.0,
            emissive: Vec3::ONE,
            blend: BlendMode::Opaque,
            fallback_color: [255, 255, 255, 255],
        }
    }

    /// Partially transparent additive cloud layer.
    pub fn clouds() -> Self {
        Self {
            metalness: 0.0,
            roughness: 1.0,
            opacity: 0.4,
            emissive: Vec3::ZERO,
            blend: BlendMode::Additive,
            fallback_color: [0, 0, 0, 255],
        }
    }

    /// Placeholder texel for `map`. Neutral: a missing map changes nothing
    /// beyond the map's own contribution.
    pub fn fallback_texel(&self, map: MaterialMap) -> [u8; 4] {
        match map {
            MaterialMap::Color => self.fallback_color,
            MaterialMap::Normal => [128, 128, 255, 255],
            MaterialMap::Specular => [255, 255, 255, 255],
            MaterialMap::Emissive => [0, 0, 0, 255],
        }
    }
}

/// Per-surface uniform, 96 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SurfaceUniforms {
    pub model: [[f32; 4]; 4],
    /// x = metalness, y = roughness, z = opacity, w unused.
    pub params: [f32; 4],
    /// rgb = emissive color, a unused.
    pub emissive: [f32; 4],
}

impl SurfaceUniforms {
    pub fn new(material: &StandardMaterial, rotation_y: f32) -> Self {
        Self {
            model: Mat4::from_rotation_y(rotation_y).to_cols_array_2d(),
            params: [material.metalness, material.roughness, material.opacity, 0.0],
            emissive: [material.emissive.x, material.emissive.y, material.emissive.z, 0.0],
        }
    }
}

/// WGSL body for standard surfaces. Prefixed with the camera, lights and BRDF sources.
pub const SURFACE_SHADER_SOURCE: &str = r#"
struct SurfaceUniforms {
    model: mat4x4<f32>,
    params: vec4<f32>,
    emissive: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

@group(1) @binding(0)
var<uniform> body: SurfaceUniforms;
@group(1) @binding(1)
var color_map: texture_2d<f32>;
@group(1) @binding(2)
var normal_map: texture_2d<f32>;
@group(1) @binding(3)
var specular_map: texture_2d<f32>;
@group(1) @binding(4)
var emissive_map: texture_2d<f32>;
@group(1) @binding(5)
var map_sampler: sampler;

@group(2) @binding(0)
var<uniform> lights: SceneLights;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) tangent: vec3<f32>,
    @location(3) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) world_tangent: vec3<f32>,
    @location(3) uv: vec2<f32>,
};

@vertex
fn vs_surface(in: VertexInput) -> VertexOutput {
    let world = body.model * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip_position = camera.view_proj * world;
    out.world_position = world.xyz;
    // Rotation-only model matrix: it is its own normal matrix.
    out.world_normal = (body.model * vec4<f32>(in.normal, 0.0)).xyz;
    out.world_tangent = (body.model * vec4<f32>(in.tangent, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_surface(in: VertexOutput) -> @location(0) vec4<f32> {
    let albedo = textureSample(color_map, map_sampler, in.uv).rgb;
    let tangent_normal = textureSample(normal_map, map_sampler, in.uv).xyz * 2.0 - 1.0;
    let specular_scale = textureSample(specular_map, map_sampler, in.uv).r;
    let emission = textureSample(emissive_map, map_sampler, in.uv).rgb;

    let n = normalize(in.world_normal);
    let t = normalize(in.world_tangent - n * dot(n, in.world_tangent));
    let b = cross(n, t);
    let normal = normalize(mat3x3<f32>(t, b, n) * tangent_normal);

    let view_dir = normalize(camera.camera_pos.xyz - in.world_position);
    let metallic = body.params.x;
    let roughness = body.params.y;

    let sun = evaluate_brdf(
        lights.sun_to_light.xyz,
        view_dir,
        normal,
        albedo,
        metallic,
        roughness,
        specular_scale,
    ) * lights.sun_color.rgb * lights.sun_to_light.w * PI;
    let ambient = lights.ambient.rgb * albedo;
    let emissive = body.emissive.rgb * emission;

    return vec4<f32>(ambient + sun + emissive, body.params.z);
}
"#;

/// Full shader source for standard surfaces.
pub fn surface_shader_source() -> String {
    format!(
        "{CAMERA_UNIFORM_WGSL}{LIGHTS_UNIFORM_WGSL}{PBR_FUNCTIONS_WGSL}{SURFACE_SHADER_SOURCE}"
    )
}

/// Draws one textured sphere with a standard material.
///
/// Every map starts as a 1x1 fallback; [`SurfaceRenderer::set_map`] swaps in
/// a loaded texture and rebuilds the material bind group.
pub struct SurfaceRenderer {
    label: &'static str,
    material: StandardMaterial,
    pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
    uniform_buffer: wgpu::Buffer,
    material_layout: wgpu::BindGroupLayout,
    material_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    maps: [GpuTexture; 4],
    loaded: [bool; 4],
}

impl SurfaceRenderer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera_layout: &wgpu::BindGroupLayout,
        lights_layout: &wgpu::BindGroupLayout,
        targets: TargetConfig,
        label: &'static str,
        mesh: &SphereMesh,
        material: StandardMaterial,
    ) -> Result<Self, TextureError> {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(surface_shader_source().into()),
        });

        let material_layout = create_material_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("surface-pipeline-layout"),
            bind_group_layouts: &[camera_layout, &material_layout, lights_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_surface"),
                buffers: &[SphereVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(material.blend.depth_stencil()),
            multisample: multisample_state(targets.sample_count),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_surface"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: targets.color_format,
                    blend: material.blend.blend_state(),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("surface-uniforms"),
            contents: bytemuck::bytes_of(&SurfaceUniforms::new(&material, 0.0)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let fallback = |map: MaterialMap| {
            GpuTexture::solid(
                device,
                queue,
                &format!("{label}-{}-fallback", map.label()),
                material.fallback_texel(map),
                map.format(),
            )
        };
        let maps = [
            fallback(MaterialMap::Color)?,
            fallback(MaterialMap::Normal)?,
            fallback(MaterialMap::Specular)?,
            fallback(MaterialMap::Emissive)?,
        ];
        let sampler = create_sphere_sampler(device);
        let material_bind_group =
            create_material_bind_group(device, &material_layout, &uniform_buffer, &maps, &sampler);

        tracing::info!(
            "Surface renderer '{label}' initialized ({} triangles, {:?})",
            mesh.triangle_count(),
            material.blend
        );

        Ok(Self {
            label,
            material,
            pipeline,
            mesh: mesh.upload(device, label),
            uniform_buffer,
            material_layout,
            material_bind_group,
            sampler,
            maps,
            loaded: [false; 4],
        })
    }

    pub fn material(&self) -> &StandardMaterial {
        &self.material
    }

    /// Whether `map` has been replaced by a loaded texture.
    pub fn is_loaded(&self, map: MaterialMap) -> bool {
        self.loaded[map.index()]
    }

    /// Replace one map and rebind the material.
    pub fn set_map(&mut self, device: &wgpu::Device, map: MaterialMap, texture: GpuTexture) {
        tracing::debug!(
            "'{}' {} map replaced ({}x{})",
            self.label,
            map.label(),
            texture.dimensions.0,
            texture.dimensions.1
        );
        self.maps[map.index()] = texture;
        self.loaded[map.index()] = true;
        self.material_bind_group = create_material_bind_group(
            device,
            &self.material_layout,
            &self.uniform_buffer,
            &self.maps,
            &self.sampler,
        );
    }

    /// Upload the body's current rotation about Y.
    pub fn update(&self, queue: &wgpu::Queue, rotation_y: f32) {
        let uniforms = SurfaceUniforms::new(&self.material, rotation_y);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    pub fn render<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        camera: &'a wgpu::BindGroup,
        lights: &'a wgpu::BindGroup,
    ) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera, &[]);
        pass.set_bind_group(1, &self.material_bind_group, &[]);
        pass.set_bind_group(2, lights, &[]);
        self.mesh.bind(pass);
        self.mesh.draw(pass);
    }
}

fn create_material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let texture_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    };

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("surface-material-bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<SurfaceUniforms>() as u64,
                    ),
                },
                count: None,
            },
            texture_entry(1),
            texture_entry(2),
            texture_entry(3),
            texture_entry(4),
            wgpu::BindGroupLayoutEntry {
                binding: 5,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

fn create_material_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniform_buffer: &wgpu::Buffer,
    maps: &[GpuTexture; 4],
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("surface-material-bg"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&maps[0].view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&maps[1].view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::TextureView(&maps[2].view),
            },
            wgpu::BindGroupEntry {
                binding: 4,
                resource: wgpu::BindingResource::TextureView(&maps[3].view),
            },
            wgpu::BindGroupEntry {
                binding: 5,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::{PLANET_RADIUS, SphereGeometry};

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<SurfaceUniforms>(), 96);
    }

    #[test]
    fn test_planet_material_values() {
        let planet = StandardMaterial::planet();
        assert_eq!(planet.metalness, 0.5);
        assert_eq!(planet.roughness, 0.7);
        assert_eq!(planet.opacity, 1.0);
        assert_eq!(planet.emissive, Vec3::ONE);
        assert_eq!(planet.blend, BlendMode::Opaque);
    }

    #[test]
    fn test_cloud_material_values() {
        let clouds = StandardMaterial::clouds();
        assert_eq!(clouds.opacity, 0.4);
        assert_eq!(clouds.blend, BlendMode::Additive);
        // Until the cloud map arrives the shell adds nothing.
        assert_eq!(clouds.fallback_texel(MaterialMap::Color), [0, 0, 0, 255]);
    }

    #[test]
    fn test_fallbacks_are_neutral() {
        let planet = StandardMaterial::planet();
        assert_eq!(planet.fallback_texel(MaterialMap::Color), [255; 4]);
        assert_eq!(
            planet.fallback_texel(MaterialMap::Normal),
            [128, 128, 255, 255]
        );
        assert_eq!(planet.fallback_texel(MaterialMap::Emissive), [0, 0, 0, 255]);
    }

    #[test]
    fn test_map_indices_distinct() {
        let mut seen = [false; 4];
        for map in MaterialMap::ALL {
            assert!(!seen[map.index()]);
            seen[map.index()] = true;
        }
        assert!(MaterialMap::Color.format().is_srgb());
        assert!(!MaterialMap::Normal.format().is_srgb());
    }

    #[test]
    fn test_uniform_rotation_spins_about_y() {
        let uniforms =
            SurfaceUniforms::new(&StandardMaterial::planet(), std::f32::consts::FRAC_PI_2);
        let model = Mat4::from_cols_array_2d(&uniforms.model);
        let moved = model.transform_point3(Vec3::X);
        assert!((moved - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(model.transform_point3(Vec3::Y), Vec3::Y);
    }

    #[test]
    fn test_shader_source_is_complete() {
        let source = surface_shader_source();
        for needle in [
            "struct CameraUniform",
            "struct SceneLights",
            "fn evaluate_brdf(",
            "fn fs_surface",
        ] {
            assert!(source.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn test_set_map_marks_loaded() {
        let Some((device, queue)) = aurora_render::create_test_device_queue() else {
            return;
        };
        let camera = aurora_render::CameraBinding::new(&device);
        let lights = aurora_lighting::LightsBinding::new(&device, &Default::default());
        let mesh = SphereGeometry::new(PLANET_RADIUS, 16, 16).build();
        let mut renderer = SurfaceRenderer::new(
            &device,
            &queue,
            &camera.bind_group_layout,
            &lights.bind_group_layout,
            TargetConfig {
                color_format: wgpu::TextureFormat::Bgra8UnormSrgb,
                sample_count: 1,
            },
            "test-planet",
            &mesh,
            StandardMaterial::planet(),
        )
        .expect("surface renderer");
        assert!(!renderer.is_loaded(MaterialMap::Color));

        let texture = GpuTexture::solid(
            &device,
            &queue,
            "test-color",
            [10, 20, 30, 255],
            MaterialMap::Color.format(),
        )
        .unwrap();
        renderer.set_map(&device, MaterialMap::Color, texture);
        assert!(renderer.is_loaded(MaterialMap::Color));
        assert!(!renderer.is_loaded(MaterialMap::Normal));
    }
}
