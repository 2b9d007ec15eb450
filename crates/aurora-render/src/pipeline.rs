//! Shared pipeline pieces: the camera uniform binding and the blend/depth
//! states used by the scene's opaque and additive layers.

use bytemuck::{Pod, Zeroable};
use std::num::NonZeroU64;

use crate::buffer::BufferAllocator;
use crate::camera::Camera;
use crate::depth::DepthBuffer;

/// Uniform buffer for camera view-projection matrix and world position.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4], // 64 bytes, mat4x4
    pub camera_pos: [f32; 4],     // 16 bytes, w = 1
}

/// WGSL declaration matching [`CameraUniform`], shared by every scene shader.
pub const CAMERA_UNIFORM_WGSL: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
};
"#;

/// Camera uniform buffer, its layout, and a ready bind group (group 0).
pub struct CameraBinding {
    pub buffer: wgpu::Buffer,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
}

impl CameraBinding {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<CameraUniform>() as u64),
                },
                count: None,
            }],
        });

        let buffer = BufferAllocator::new(device)
            .create_uniform_buffer("camera-uniform", &CameraUniform::zeroed());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera-bind-group"),
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

    /// Upload the camera's current matrices.
    pub fn update(&self, queue: &wgpu::Queue, camera: &Camera) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&camera.to_uniform()));
    }
}

/// How a layer composites onto what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Replaces the destination and writes depth.
    Opaque,
    /// Adds `src * alpha` to the destination; depth-tested, no depth write.
    Additive,
}

impl BlendMode {
    pub fn blend_state(self) -> Option<wgpu::BlendState> {
        match self {
            BlendMode::Opaque => None,
            BlendMode::Additive => Some(wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::Zero,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            }),
        }
    }

    pub fn writes_depth(self) -> bool {
        matches!(self, BlendMode::Opaque)
    }

    /// Reverse-Z depth state for this blend mode.
    pub fn depth_stencil(self) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: self.writes_depth(),
            depth_compare: DepthBuffer::COMPARE_FUNCTION,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

/// Multisample state for the given sample count.
pub fn multisample_state(sample_count: u32) -> wgpu::MultisampleState {
    wgpu::MultisampleState {
        count: sample_count,
        mask: !0,
        alpha_to_coverage_enabled: false,
    }
}

/// Target formats and sample count shared by every scene pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetConfig {
    pub color_format: wgpu::TextureFormat,
    pub sample_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_uniform_size() {
        // mat4x4<f32> + vec4<f32>
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn test_wgsl_declares_camera_fields() {
        assert!(CAMERA_UNIFORM_WGSL.contains("view_proj: mat4x4<f32>"));
        assert!(CAMERA_UNIFORM_WGSL.contains("camera_pos: vec4<f32>"));
    }

    #[test]
    fn test_opaque_writes_depth_without_blending() {
        assert!(BlendMode::Opaque.blend_state().is_none());
        assert!(BlendMode::Opaque.depth_stencil().depth_write_enabled);
    }

    #[test]
    fn test_additive_adds_onto_destination() {
        let blend = BlendMode::Additive.blend_state().unwrap();
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.color.operation, wgpu::BlendOperation::Add);
        // Additive layers leave the canvas alpha untouched.
        assert_eq!(blend.alpha.src_factor, wgpu::BlendFactor::Zero);
        assert!(!BlendMode::Additive.depth_stencil().depth_write_enabled);
    }

    #[test]
    fn test_depth_compare_is_reverse_z() {
        for mode in [BlendMode::Opaque, BlendMode::Additive] {
            assert_eq!(
                mode.depth_stencil().depth_compare,
                wgpu::CompareFunction::GreaterEqual
            );
        }
    }

    #[test]
    fn test_multisample_state_count() {
        assert_eq!(multisample_state(4).count, 4);
        assert_eq!(multisample_state(1).count, 1);
    }
}
