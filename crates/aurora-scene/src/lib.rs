//! Scene composition: the planet, its cloud and glow shells, the starfield,
//! and the lights, plus the rotation state the animation loop advances.

mod assets;
mod body;
mod rotation;
mod scene;

pub use assets::{
    AssetLoader, EARTH_CLOUDS_URL, EARTH_COLOR_URL, EARTH_EMISSIVE_URL, EARTH_NORMAL_URL,
    EARTH_SPECULAR_URL, TextureRef, scene_textures,
};
pub use body::{BodyId, Geometry, Material, MeshBody};
pub use rotation::{
    CLOUD_SPIN_PER_TICK, PLANET_SPIN_PER_TICK, RotationState, STAR_SPIN_PER_TICK,
};
pub use scene::{Scene, compose_scene, initial_camera_position};
