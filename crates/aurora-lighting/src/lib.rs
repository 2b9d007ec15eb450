//! Light types and PBR shading for the planet surface.

mod ambient;
mod directional;
mod lights;
pub mod pbr;

pub use ambient::{AMBIENT_INTENSITY, AmbientLight, AmbientLightUniform};
pub use directional::{DirectionalLight, DirectionalLightUniform, SUN_INTENSITY, SUN_POSITION};
pub use lights::{
    LIGHTS_BIND_GROUP, LIGHTS_UNIFORM_WGSL, LightsBinding, SceneLights, SceneLightsUniform,
};
pub use pbr::PBR_FUNCTIONS_WGSL;
