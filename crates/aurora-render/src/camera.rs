//! Perspective camera with a lazily recomputed projection matrix.

use crate::pipeline::CameraUniform;
use glam::{Mat4, Quat, Vec3};

/// A perspective camera that generates view and projection matrices.
///
/// The projection is cached. Changing the aspect ratio only marks it dirty;
/// [`Camera::update_projection_matrix`] recomputes it before the next render.
#[derive(Debug, Clone)]
pub struct Camera {
    /// World-space position.
    pub position: Vec3,
    /// Orientation as a unit quaternion.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    fov_y: f32,
    /// Width / height.
    aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    near: f32,
    /// Far clip plane distance (always positive, > near).
    far: f32,
    projection: Mat4,
    projection_dirty: bool,
}

impl Camera {
    /// Create a perspective camera at the origin looking down -Z.
    pub fn perspective(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y,
            aspect_ratio,
            near,
            far,
            projection: Mat4::IDENTITY,
            projection_dirty: true,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Builder-style position override.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// Current width / height ratio.
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Update the aspect ratio and mark the projection dirty.
    ///
    /// Callers must pass non-zero dimensions.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = width / height;
        self.projection_dirty = true;
    }

    /// Whether the cached projection is stale.
    pub fn is_projection_dirty(&self) -> bool {
        self.projection_dirty
    }

    /// Recompute the cached projection if it is dirty.
    pub fn update_projection_matrix(&mut self) {
        if !self.projection_dirty {
            return;
        }
        // Reverse-Z: near plane maps to depth 1, far plane to depth 0.
        self.projection = Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near);
        self.projection_dirty = false;
    }

    /// The cached projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Compute the view matrix (inverse of camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), self.up())
    }

    /// Combined view-projection matrix using the cached projection.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Orient the camera to face `target`, keeping world +Y as up.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = target - self.position;
        if forward.length_squared() < f32::EPSILON {
            return;
        }
        let forward = forward.normalize();
        let right = forward.cross(Vec3::Y);
        if right.length_squared() < f32::EPSILON {
            return;
        }
        let right = right.normalize();
        let up = right.cross(forward);
        self.rotation = Quat::from_mat3(&glam::Mat3::from_cols(right, up, -forward)).normalize();
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// The up direction vector (+Y in camera space).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// The right direction vector (+X in camera space).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Convert the camera to a uniform suitable for GPU upload.
    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            camera_pos: [self.position.x, self.position.y, self.position.z, 1.0],
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(75f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0)
    }
}
