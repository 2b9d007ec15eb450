//! Viewport management: keeps the camera aspect ratio and the output surface
//! in step with the window size.

use crate::camera::Camera;

/// Minimum surface dimension (prevents zero-size panics and a zero aspect ratio).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
}

impl PhysicalSize {
    /// Build a size with both dimensions clamped to [`MIN_SURFACE_DIMENSION`].
    pub fn clamped(width: u32, height: u32) -> Self {
        Self {
            width: width.max(MIN_SURFACE_DIMENSION),
            height: height.max(MIN_SURFACE_DIMENSION),
        }
    }

    /// Width / height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// A drawable target that can be resized to match the viewport.
pub trait OutputSurface {
    fn resize(&mut self, width: u32, height: u32);
}

/// Owns the camera and the current output dimensions.
#[derive(Debug, Clone)]
pub struct Viewport {
    camera: Camera,
    size: PhysicalSize,
}

impl Viewport {
    /// Create a viewport and bring the camera's aspect ratio in line with it.
    pub fn new(mut camera: Camera, width: u32, height: u32) -> Self {
        let size = PhysicalSize::clamped(width, height);
        camera.set_aspect_ratio(size.width as f32, size.height as f32);
        camera.update_projection_matrix();
        Self { camera, size }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Current output dimensions.
    pub fn size(&self) -> PhysicalSize {
        self.size
    }

    /// Apply a resize signal.
    ///
    /// Recomputes the camera aspect ratio, marks its projection dirty and
    /// resizes the output surface. Every call performs the full update, even
    /// when the size did not change. Zero dimensions are clamped to 1.
    pub fn resynchronize(
        &mut self,
        width: u32,
        height: u32,
        surface: &mut dyn OutputSurface,
    ) -> PhysicalSize {
        let size = PhysicalSize::clamped(width, height);
        self.size = size;
        self.camera
            .set_aspect_ratio(size.width as f32, size.height as f32);
        surface.resize(size.width, size.height);
        log::debug!(
            "Viewport resynchronized to {}x{} (aspect {:.4})",
            size.width,
            size.height,
            size.aspect_ratio()
        );
        size
    }
}
