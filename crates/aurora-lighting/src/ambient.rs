//! Ambient light: uniform fill that reaches every surface regardless of orientation.

use bytemuck::{Pod, Zeroable};

/// Intensity of the fill light around the planet.
pub const AMBIENT_INTENSITY: f32 = 0.2;

/// CPU-side ambient light description.
#[derive(Clone, Debug, PartialEq)]
pub struct AmbientLight {
    /// Linear RGB color of the light (not premultiplied by intensity).
    pub color: glam::Vec3,
    /// Scalar intensity multiplier.
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: glam::Vec3::ONE,
            intensity: AMBIENT_INTENSITY,
        }
    }
}

impl AmbientLight {
    /// Color premultiplied by intensity.
    pub fn radiance(&self) -> glam::Vec3 {
        self.color * self.intensity
    }

    pub fn to_uniform(&self) -> AmbientLightUniform {
        let radiance = self.radiance();
        AmbientLightUniform {
            color_intensity: [radiance.x, radiance.y, radiance.z, self.intensity],
        }
    }
}

/// GPU-side representation, 16 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct AmbientLightUniform {
    /// xyz = color × intensity, w = raw intensity.
    pub color_intensity: [f32; 4],
}
