//! Planet rendering: sphere tessellation, the textured planet and cloud
//! surfaces, and the atmospheric glow shell.

pub mod glow;
pub mod sphere;
pub mod surface;

pub use glow::{
    GLOW_BIAS, GLOW_COLOR_HEX, GLOW_POWER, GLOW_SHADER_SOURCE, GlowRenderer, GlowUniforms,
    glow_intensity, hex_to_linear_rgb,
};
pub use sphere::{
    CLOUD_RADIUS, GLOW_RADIUS, PLANET_RADIUS, SPHERE_SEGMENTS, SphereGeometry, SphereMesh,
    SphereVertex,
};
pub use surface::{
    MaterialMap, SURFACE_SHADER_SOURCE, StandardMaterial, SurfaceRenderer, SurfaceUniforms,
    surface_shader_source,
};
