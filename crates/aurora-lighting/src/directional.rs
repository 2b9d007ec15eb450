//! Directional light: a single sun-like light source for the planet.
//!
//! The [`DirectionalLight`] struct describes the CPU-side light properties,
//! while [`DirectionalLightUniform`] is the GPU-side representation written
//! to a uniform buffer.

use bytemuck::{Pod, Zeroable};

/// Intensity of the key light.
pub const SUN_INTENSITY: f32 = 1.5;
/// Where the key light sits. It always aims at the origin.
pub const SUN_POSITION: glam::Vec3 = glam::Vec3::new(5.0, 3.0, 5.0);

/// CPU-side directional light description.
///
/// Like a positioned sun aimed at a target: only the direction from
/// `position` to `target` matters, not the distance.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    pub position: glam::Vec3,
    pub target: glam::Vec3,
    /// Linear RGB color of the light (not premultiplied by intensity).
    pub color: glam::Vec3,
    /// Scalar intensity multiplier.
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            position: SUN_POSITION,
            target: glam::Vec3::ZERO,
            color: glam::Vec3::ONE,
            intensity: SUN_INTENSITY,
        }
    }
}

impl DirectionalLight {
    /// Normalized direction the light travels (from `position` toward `target`).
    ///
    /// Falls back to straight down when position and target coincide.
    pub fn direction(&self) -> glam::Vec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(glam::Vec3::NEG_Y)
    }

    /// Normalized direction from a lit surface toward the light.
    pub fn to_light(&self) -> glam::Vec3 {
        -self.direction()
    }

    /// Build the GPU-side uniform from this light's properties.
    pub fn to_uniform(&self) -> DirectionalLightUniform {
        let to_light = self.to_light();
        DirectionalLightUniform {
            to_light_intensity: [to_light.x, to_light.y, to_light.z, self.intensity],
            color_padding: [self.color.x, self.color.y, self.color.z, 0.0],
        }
    }
}

/// GPU-side representation, 32 bytes, std140-compatible.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    /// xyz = direction toward the light (normalized), w = intensity.
    pub to_light_intensity: [f32; 4],
    /// xyz = color (linear RGB), w = padding.
    pub color_padding: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_is_normalized() {
        let light = DirectionalLight::default();
        let len = light.direction().length();
        assert!(
            (len - 1.0).abs() < 1e-6,
            "direction must be unit length, got {len}"
        );
    }

    #[test]
    fn test_default_aims_from_sun_position_at_origin() {
        let light = DirectionalLight::default();
        let expected = (-SUN_POSITION).normalize();
        assert!((light.direction() - expected).length() < 1e-6);
        assert!((light.to_light() - SUN_POSITION.normalize()).length() < 1e-6);
        assert_eq!(light.intensity, 1.5);
    }

    #[test]
    fn test_coincident_position_falls_back_to_down() {
        let light = DirectionalLight {
            position: glam::Vec3::ONE,
            target: glam::Vec3::ONE,
            ..DirectionalLight::default()
        };
        assert_eq!(light.direction(), glam::Vec3::NEG_Y);
    }

    #[test]
    fn test_uniform_buffer_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<DirectionalLightUniform>(), 32);
        assert_eq!(
            std::mem::offset_of!(DirectionalLightUniform, to_light_intensity),
            0
        );
        assert_eq!(
            std::mem::offset_of!(DirectionalLightUniform, color_padding),
            16
        );
    }

    #[test]
    fn test_uniform_packs_intensity() {
        let uniform = DirectionalLight::default().to_uniform();
        assert_eq!(uniform.to_light_intensity[3], SUN_INTENSITY);
        assert_eq!(uniform.color_padding, [1.0, 1.0, 1.0, 0.0]);
    }
}
