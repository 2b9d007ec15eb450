//! GPU texture creation: uploads decoded RGBA images, generates mipmaps, and
//! builds the 1x1 placeholder textures materials sample before their images arrive.

/// A GPU texture with its view and metadata.
pub struct GpuTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// Default view into the texture.
    pub view: wgpu::TextureView,
    /// Width and height in texels.
    pub dimensions: (u32, u32),
    /// Pixel format.
    pub format: wgpu::TextureFormat,
    /// Number of mip levels (1 if mipmaps were not generated).
    pub mip_level_count: u32,
}

/// Errors that can occur during texture creation.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// Pixel data length doesn't match the expected size for the given dimensions and format.
    #[error(
        "texture data size ({actual}) does not match expected ({expected}) for {width}x{height} {format:?}"
    )]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    },

    /// Width or height is zero.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// A side exceeds the device's `max_texture_dimension_2d`.
    #[error("texture {width}x{height} exceeds the device limit of {max} texels per side")]
    TooLarge { width: u32, height: u32, max: u32 },
}

/// Calculates the number of mip levels for the given dimensions.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    (width.max(height) as f32).log2().floor() as u32 + 1
}

impl GpuTexture {
    /// Upload a 2D texture from raw pixel data.
    #[allow(clippy::too_many_arguments)]
    pub fn from_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        mipmaps: Option<&MipmapGenerator>,
        label: &str,
        data: &[u8],
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Result<Self, TextureError> {
        validate_dimensions(width, height, device.limits().max_texture_dimension_2d)?;
        validate_data_size(data, width, height, format)?;

        let mip_levels = if mipmaps.is_some() {
            mip_level_count(width, height)
        } else {
            1
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row(width, format)),
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        if let Some(generator) = mipmaps
            && mip_levels > 1
        {
            generator.generate(device, queue, &texture, format, mip_levels);
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::info!("Created texture '{label}' ({width}x{height}, {mip_levels} mips)");
        Ok(Self {
            texture,
            view,
            dimensions: (width, height),
            format,
            mip_level_count: mip_levels,
        })
    }

    /// A 1x1 texture filled with `rgba`.
    pub fn solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        rgba: [u8; 4],
        format: wgpu::TextureFormat,
    ) -> Result<Self, TextureError> {
        Self::from_pixels(device, queue, None, label, &rgba, 1, 1, format)
    }
}

/// Linear sampler that wraps horizontally around the sphere seam and clamps at the poles.
pub fn create_sphere_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("sphere-sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Linear,
        anisotropy_clamp: 4,
        ..Default::default()
    })
}

/// WGSL shader for mipmap generation via fullscreen blit.
const BLIT_SHADER_SOURCE: &str = r#"
@group(0) @binding(0) var src_texture: texture_2d<f32>;
@group(0) @binding(1) var src_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VertexOutput {
    // Full-screen triangle
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: VertexOutput;
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(src_texture, src_sampler, in.uv);
}
"#;

/// Downsamples mip level N-1 into level N with a linear blit.
pub struct MipmapGenerator {
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl MipmapGenerator {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blit-bind-group-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit-shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_SHADER_SOURCE.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blit-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("blit-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            shader,
            pipeline_layout,
            bind_group_layout,
            sampler,
        }
    }

    fn generate(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
        format: wgpu::TextureFormat,
        mip_count: u32,
    ) {
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mipmap-pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("mipmap-encoder"),
        });

        for level in 1..mip_count {
            let src_view = texture.create_view(&wgpu::TextureViewDescriptor {
                base_mip_level: level - 1,
                mip_level_count: Some(1),
                ..Default::default()
            });

            let dst_view = texture.create_view(&wgpu::TextureViewDescriptor {
                base_mip_level: level,
                mip_level_count: Some(1),
                ..Default::default()
            });

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("mipmap-bind-group"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&src_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            });

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mipmap-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &dst_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Calculate the expected byte size for a texture.
fn expected_byte_size(width: u32, height: u32, format: wgpu::TextureFormat) -> usize {
    let bpp = format.block_copy_size(None).unwrap_or(4) as usize;
    width as usize * height as usize * bpp
}

/// Calculate bytes per row for a texture.
fn bytes_per_row(width: u32, format: wgpu::TextureFormat) -> u32 {
    let bpp = format.block_copy_size(None).unwrap_or(4);
    width * bpp
}

/// Validate that dimensions are non-zero and within `max` per side.
fn validate_dimensions(width: u32, height: u32, max: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    if width > max || height > max {
        return Err(TextureError::TooLarge { width, height, max });
    }
    Ok(())
}

/// Validate that data size matches expected size.
fn validate_data_size(
    data: &[u8],
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
) -> Result<(), TextureError> {
    let expected = expected_byte_size(width, height, format);
    if data.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: data.len(),
            expected,
            width,
            height,
            format,
        });
    }
    Ok(())
}

/// Request a headless device and queue, used by GPU tests across the workspace.
/// Returns `None` if no adapter is available.
pub fn create_test_device_queue() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;

        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mipmap_level_count_calculation() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(2048, 1024), 12);
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        assert!(matches!(
            validate_dimensions(0, 16, 8192),
            Err(TextureError::ZeroDimensions {
                width: 0,
                height: 16
            })
        ));
        assert!(validate_dimensions(1, 1, 8192).is_ok());
    }

    #[test]
    fn test_validate_rejects_sides_over_limit() {
        assert!(matches!(
            validate_dimensions(8193, 10, 8192),
            Err(TextureError::TooLarge {
                width: 8193,
                height: 10,
                max: 8192
            })
        ));
        assert!(matches!(
            validate_dimensions(10, 16384, 8192),
            Err(TextureError::TooLarge { .. })
        ));
        assert!(validate_dimensions(8192, 8192, 8192).is_ok());
    }

    #[test]
    fn test_validate_data_size() {
        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        assert!(validate_data_size(&[0u8; 64], 4, 4, format).is_ok());
        assert!(matches!(
            validate_data_size(&[0u8; 32], 4, 4, format),
            Err(TextureError::DataSizeMismatch {
                actual: 32,
                expected: 64,
                ..
            })
        ));
    }

    #[test]
    fn test_solid_texture_is_single_texel() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let tex = GpuTexture::solid(
            &device,
            &queue,
            "fallback",
            [128, 128, 255, 255],
            wgpu::TextureFormat::Rgba8Unorm,
        )
        .unwrap();
        assert_eq!(tex.dimensions, (1, 1));
        assert_eq!(tex.mip_level_count, 1);
    }

    #[test]
    fn test_mipmap_generation_sets_correct_mip_count() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let generator = MipmapGenerator::new(&device);
        let data = vec![255u8; 64 * 32 * 4];
        let tex = GpuTexture::from_pixels(
            &device,
            &queue,
            Some(&generator),
            "mipmapped",
            &data,
            64,
            32,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        )
        .unwrap();
        assert_eq!(tex.mip_level_count, 7);
    }

    #[test]
    fn test_zero_dimensions_returns_error() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let result = GpuTexture::from_pixels(
            &device,
            &queue,
            None,
            "zero",
            &[],
            0,
            0,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        );
        assert!(matches!(result, Err(TextureError::ZeroDimensions { .. })));
    }

    #[test]
    fn test_oversized_upload_returns_error() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let width = device.limits().max_texture_dimension_2d + 1;
        let data = vec![0u8; width as usize * 4];
        let result = GpuTexture::from_pixels(
            &device,
            &queue,
            None,
            "oversized",
            &data,
            width,
            1,
            wgpu::TextureFormat::Rgba8Unorm,
        );
        assert!(matches!(result, Err(TextureError::TooLarge { .. })));
    }
}
