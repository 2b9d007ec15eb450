//! The scene's light rig: one ambient fill and one directional key light,
//! packed into a single uniform bound at group 2 by the surface shaders.

use std::num::NonZeroU64;

use aurora_render::BufferAllocator;
use bytemuck::{Pod, Zeroable};

use crate::ambient::{AmbientLight, AmbientLightUniform};
use crate::directional::{DirectionalLight, DirectionalLightUniform};

/// Bind group index the surface shaders expect the lights at.
pub const LIGHTS_BIND_GROUP: u32 = 2;

/// WGSL declaration matching [`SceneLightsUniform`].
pub const LIGHTS_UNIFORM_WGSL: &str = r#"
struct SceneLights {
    ambient: vec4<f32>,
    sun_to_light: vec4<f32>,
    sun_color: vec4<f32>,
};
"#;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneLights {
    pub ambient: AmbientLight,
    pub sun: DirectionalLight,
}

impl SceneLights {
    pub fn to_uniform(&self) -> SceneLightsUniform {
        SceneLightsUniform {
            ambient: self.ambient.to_uniform(),
            sun: self.sun.to_uniform(),
        }
    }

    /// Outgoing radiance for a standard-material surface point, mirroring
    /// the planet fragment shader without textures or emission.
    #[cfg(test)]
    pub(crate) fn shade_cpu(
        &self,
        normal: glam::Vec3,
        view_dir: glam::Vec3,
        albedo: glam::Vec3,
        metallic: f32,
        roughness: f32,
        specular_scale: f32,
    ) -> glam::Vec3 {
        use crate::pbr::{PUNCTUAL_LIGHT_SCALE, evaluate_brdf_cpu};

        let ambient = self.ambient.radiance() * albedo;
        let brdf = evaluate_brdf_cpu(
            self.sun.to_light(),
            view_dir,
            normal,
            albedo,
            metallic,
            roughness,
            specular_scale,
        );
        ambient + brdf * self.sun.color * self.sun.intensity * PUNCTUAL_LIGHT_SCALE
    }
}

/// GPU-side light rig, 48 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneLightsUniform {
    pub ambient: AmbientLightUniform,
    pub sun: DirectionalLightUniform,
}

/// Lights uniform buffer, its layout, and a ready bind group.
pub struct LightsBinding {
    pub buffer: wgpu::Buffer,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
}

impl LightsBinding {
    pub fn new(device: &wgpu::Device, lights: &SceneLights) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lights-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(
                        std::mem::size_of::<SceneLightsUniform>() as u64
                    ),
                },
                count: None,
            }],
        });

        let buffer = BufferAllocator::new(device)
            .create_uniform_buffer("lights-uniform", &lights.to_uniform());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lights-bind-group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, lights: &SceneLights) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&lights.to_uniform()));
    }
}
