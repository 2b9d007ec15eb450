//! Render pass abstraction for reducing wgpu boilerplate.
//!
//! Provides [`RenderPassBuilder`] for declarative render pass configuration
//! and [`FrameEncoder`] for managing per-frame command encoding lifecycle.

use std::sync::Arc;

/// Fully transparent clear color, so the window background shows through.
pub const TRANSPARENT: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

/// Configuration for depth stencil attachment.
#[derive(Debug)]
pub struct DepthAttachmentConfig {
    pub view: wgpu::TextureView,
    pub clear_value: f32,
    pub compare: wgpu::CompareFunction,
}

/// Builder for configuring render pass descriptors with a fluent API.
#[derive(Debug)]
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    depth_attachment: Option<DepthAttachmentConfig>,
    msaa_target: Option<wgpu::TextureView>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    /// Create a new render pass builder with a transparent clear color.
    pub fn new() -> Self {
        Self {
            clear_color: TRANSPARENT,
            depth_attachment: None,
            msaa_target: None,
            label: None,
        }
    }

    /// Set the clear color for the color attachment.
    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Set up depth stencil attachment with the reverse-Z compare function.
    pub fn depth(mut self, view: wgpu::TextureView, clear_value: f32) -> Self {
        self.depth_attachment = Some(DepthAttachmentConfig {
            view,
            clear_value,
            compare: wgpu::CompareFunction::GreaterEqual,
        });
        self
    }

    /// Render into a multisampled target and resolve into the frame's surface view.
    pub fn msaa(mut self, msaa_view: wgpu::TextureView) -> Self {
        self.msaa_target = Some(msaa_view);
        self
    }

    /// Set debug label for the render pass.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn create_render_pass<'encoder>(
        &'encoder self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        surface_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let (view, resolve_target) = match &self.msaa_target {
            Some(msaa_view) => (msaa_view, Some(surface_view)),
            None => (surface_view, None),
        };

        let color_attachment = wgpu::RenderPassColorAttachment {
            view,
            resolve_target,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        let depth_stencil_attachment =
            self.depth_attachment
                .as_ref()
                .map(|depth| wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(depth.clear_value),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        let descriptor = wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        };

        encoder.begin_render_pass(&descriptor)
    }
}

/// Manages per-frame command encoding lifecycle with automatic submission.
pub struct FrameEncoder {
    encoder: Option<wgpu::CommandEncoder>,
    queue: Arc<wgpu::Queue>,
    surface_texture: Option<wgpu::SurfaceTexture>,
    surface_view: wgpu::TextureView,
    submitted: bool,
}

impl FrameEncoder {
    /// Create a new frame encoder for the given device, queue, and surface texture.
    pub fn new(
        device: &wgpu::Device,
        queue: Arc<wgpu::Queue>,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder: Some(encoder),
            queue,
            surface_texture: Some(surface_texture),
            surface_view,
            submitted: false,
        }
    }

    /// Begin a render pass using the provided builder configuration.
    ///
    /// Returns `None` once the frame has been submitted.
    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &'a RenderPassBuilder,
    ) -> Option<wgpu::RenderPass<'a>> {
        let encoder = self.encoder.as_mut()?;
        Some(builder.create_render_pass(encoder, &self.surface_view))
    }

    /// Returns a reference to the queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Submit the command buffer to the queue and present the surface texture.
    /// Consumes self to prevent double-submission.
    pub fn submit(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if self.submitted {
            return;
        }

        if let (Some(encoder), Some(surface_texture)) =
            (self.encoder.take(), self.surface_texture.take())
        {
            let command_buffer = encoder.finish();
            self.queue.submit([command_buffer]);
            surface_texture.present();
            self.submitted = true;
        }
    }
}

impl Drop for FrameEncoder {
    fn drop(&mut self) {
        if !self.submitted {
            log::warn!("FrameEncoder dropped without explicit submit() - auto-submitting");
            self.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_clear_color() {
        let builder = RenderPassBuilder::new().clear_color(wgpu::Color::RED);
        assert_eq!(builder.clear_color.r, 1.0);
        assert_eq!(builder.clear_color.g, 0.0);
        assert_eq!(builder.clear_color.b, 0.0);
        assert_eq!(builder.clear_color.a, 1.0);
    }

    #[test]
    fn test_default_clear_color_is_transparent() {
        let builder = RenderPassBuilder::new();
        assert_eq!(builder.clear_color, TRANSPARENT);
        assert_eq!(builder.clear_color.a, 0.0);
    }

    #[test]
    fn test_depth_attachment_is_optional() {
        let builder = RenderPassBuilder::new();
        assert!(builder.depth_attachment.is_none());
    }

    #[test]
    fn test_msaa_target_is_optional() {
        let builder = RenderPassBuilder::new();
        assert!(builder.msaa_target.is_none());
    }

    #[test]
    fn test_label_is_stored() {
        let builder = RenderPassBuilder::new().label("scene-pass");
        assert_eq!(builder.label, Some("scene-pass"));
    }
}
