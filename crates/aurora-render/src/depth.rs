//! Depth and multisampled color targets sized to the surface.
//!
//! Uses reverse-Z depth mapping where near plane maps to 1.0 and far plane maps to 0.0,
//! which keeps precision across the 0.1..1000 clip range the starfield needs.

/// Sample count used when antialiasing is enabled.
pub const MSAA_SAMPLES: u32 = 4;

/// Normalize a configured sample count to one wgpu accepts for render targets.
pub fn supported_sample_count(requested: u32) -> u32 {
    if requested >= MSAA_SAMPLES {
        MSAA_SAMPLES
    } else {
        1
    }
}

/// Depth buffer with reverse-Z configuration.
pub struct DepthBuffer {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    sample_count: u32,
}

impl DepthBuffer {
    /// 32-bit float depth format for maximum precision with reverse-Z.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Reverse-Z clear value: 0.0 represents the far plane.
    pub const CLEAR_VALUE: f32 = 0.0;

    /// Reverse-Z depth comparison: closer objects have higher depth values.
    pub const COMPARE_FUNCTION: wgpu::CompareFunction = wgpu::CompareFunction::GreaterEqual;

    /// Create a new depth buffer with the specified dimensions and sample count.
    pub fn new(device: &wgpu::Device, width: u32, height: u32, sample_count: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-buffer"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            format: Self::FORMAT,
            width,
            height,
            sample_count,
        }
    }

    /// Resize the depth buffer to new dimensions.
    /// No-op if dimensions are unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        *self = Self::new(device, width, height, self.sample_count);
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Get the current width of the depth buffer.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the current height of the depth buffer.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Multisampled color target that resolves into the surface texture.
pub struct MsaaTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    sample_count: u32,
}

impl MsaaTarget {
    /// Create a multisampled color texture matching the surface format.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa-color-target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            format,
            width,
            height,
            sample_count,
        }
    }

    /// Recreate the target at new dimensions. No-op if unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        *self = Self::new(device, self.format, width, height, self.sample_count);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
