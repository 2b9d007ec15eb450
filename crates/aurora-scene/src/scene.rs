//! The scene graph and its one-time composition.

use glam::Vec3;

use aurora_lighting::SceneLights;
use aurora_planet::{
    CLOUD_RADIUS, GLOW_RADIUS, GlowUniforms, PLANET_RADIUS, SPHERE_SEGMENTS, SphereGeometry,
    StandardMaterial,
};
use aurora_render::Camera;
use aurora_space::{STAR_COLOR, STAR_POINT_SIZE, StarPointSet};

use crate::assets::{AssetLoader, TextureRef, scene_textures};
use crate::body::{BodyId, Geometry, Material, MeshBody};
use crate::rotation::{
    CLOUD_SPIN_PER_TICK, PLANET_SPIN_PER_TICK, RotationState, STAR_SPIN_PER_TICK,
};

/// Every body and light in the backdrop.
///
/// Built once by [`compose_scene`]. Afterwards only rotations (advanced by the
/// animation loop) and the glow view vector (tracking the camera) change.
#[derive(Debug, Clone)]
pub struct Scene {
    bodies: Vec<MeshBody>,
    lights: SceneLights,
    textures: Vec<TextureRef>,
}

impl Scene {
    pub fn bodies(&self) -> &[MeshBody] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&MeshBody> {
        self.bodies.iter().find(|body| body.id == id)
    }

    pub fn lights(&self) -> &SceneLights {
        &self.lights
    }

    /// Textures requested from the loader during composition.
    pub fn textures(&self) -> &[TextureRef] {
        &self.textures
    }

    /// Total accumulated rotation of a body, if it spins.
    pub fn rotation(&self, id: BodyId) -> Option<f64> {
        self.body(id)?.rotation.as_ref().map(RotationState::angle)
    }

    pub fn glow_uniforms(&self) -> Option<&GlowUniforms> {
        self.bodies.iter().find_map(|body| match &body.material {
            Material::Glow(uniforms) => Some(uniforms),
            _ => None,
        })
    }

    pub fn star_points(&self) -> Option<&StarPointSet> {
        self.bodies.iter().find_map(|body| match &body.geometry {
            Geometry::Points(points) => Some(points),
            _ => None,
        })
    }

    /// Advance every spinning body by one tick.
    pub fn advance_rotations(&mut self) {
        for rotation in self.bodies.iter_mut().filter_map(|b| b.rotation.as_mut()) {
            rotation.advance();
        }
    }

    /// Point the glow's view vector at the camera.
    pub fn track_camera(&mut self, camera: &Camera) {
        for body in &mut self.bodies {
            if let Material::Glow(uniforms) = &mut body.material {
                uniforms.set_view_vector(camera.position);
            }
        }
    }
}

fn sphere(radius: f32) -> Geometry {
    Geometry::Sphere(SphereGeometry::new(radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS))
}

/// Build the scene and request its textures.
///
/// Texture requests are fire-and-forget: composition never waits on them
/// and never fails because of them.
pub fn compose_scene(loader: &dyn AssetLoader, stars: StarPointSet) -> Scene {
    let star_count = stars.len();
    let bodies = vec![
        MeshBody {
            id: BodyId::Planet,
            geometry: sphere(PLANET_RADIUS),
            material: Material::Standard(StandardMaterial::planet()),
            rotation: Some(RotationState::new(PLANET_SPIN_PER_TICK)),
        },
        MeshBody {
            id: BodyId::Clouds,
            geometry: sphere(CLOUD_RADIUS),
            material: Material::Standard(StandardMaterial::clouds()),
            rotation: Some(RotationState::new(CLOUD_SPIN_PER_TICK)),
        },
        MeshBody {
            id: BodyId::Glow,
            geometry: sphere(GLOW_RADIUS),
            material: Material::Glow(GlowUniforms::default()),
            rotation: None,
        },
        MeshBody {
            id: BodyId::Stars,
            geometry: Geometry::Points(stars),
            material: Material::Points {
                size: STAR_POINT_SIZE,
                color: STAR_COLOR,
            },
            rotation: Some(RotationState::new(STAR_SPIN_PER_TICK)),
        },
    ];

    let textures = scene_textures().to_vec();
    for texture in &textures {
        loader.load(texture);
    }

    tracing::info!(
        "Scene composed: {} bodies, {star_count} stars, {} textures requested",
        bodies.len(),
        textures.len()
    );

    Scene {
        bodies,
        lights: SceneLights::default(),
        textures,
    }
}

/// Initial camera placement: on +Z at `distance`, facing the origin.
pub fn initial_camera_position(distance: f32) -> Vec3 {
    Vec3::new(0.0, 0.0, distance)
}
