//! Renderable bodies: geometry plus material, optionally spinning.

use aurora_planet::{GlowUniforms, SphereGeometry, StandardMaterial};
use aurora_space::StarPointSet;

use crate::rotation::RotationState;

/// The fixed set of bodies in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyId {
    Planet,
    Clouds,
    Glow,
    Stars,
}

impl BodyId {
    pub fn name(self) -> &'static str {
        match self {
            BodyId::Planet => "planet",
            BodyId::Clouds => "clouds",
            BodyId::Glow => "glow",
            BodyId::Stars => "stars",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere(SphereGeometry),
    Points(StarPointSet),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Lit, textured surface.
    Standard(StandardMaterial),
    /// Rim glow driven by named uniforms.
    Glow(GlowUniforms),
    /// Unlit points of a fixed size and color.
    Points { size: f32, color: [f32; 3] },
}

/// One renderable owned by the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBody {
    pub id: BodyId,
    pub geometry: Geometry,
    pub material: Material,
    /// `None` for bodies that never spin.
    pub rotation: Option<RotationState>,
}

impl MeshBody {
    /// Current spin about Y for the renderer, zero for static bodies.
    pub fn render_angle(&self) -> f32 {
        self.rotation
            .as_ref()
            .map_or(0.0, RotationState::render_angle)
    }
}
