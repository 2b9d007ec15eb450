//! GPU renderer for the composed scene.
//!
//! One render pass per frame, drawing the opaque planet, then the star
//! points, then the additive cloud and glow shells on top.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use tracing::{info, warn};

use aurora_config::RenderConfig;
use aurora_lighting::LightsBinding;
use aurora_planet::{GlowRenderer, SphereGeometry, StandardMaterial, SurfaceRenderer};
use aurora_render::{
    Camera, CameraBinding, DepthBuffer, FrameEncoder, GpuTexture, MipmapGenerator, MsaaTarget,
    OutputSurface, PhysicalSize, RenderContext, RenderPassBuilder, TargetConfig,
    supported_sample_count,
};
use aurora_scene::{BodyId, Geometry, Material, Scene};
use aurora_space::StarFieldRenderer;

use crate::animation::FrameRenderer;
use crate::assets::LoadedTexture;
use crate::error::{AppError, FrameError};

pub struct SceneRenderer {
    gpu: RenderContext,
    queue: Arc<wgpu::Queue>,
    clear_color: wgpu::Color,
    depth: DepthBuffer,
    msaa: Option<MsaaTarget>,
    camera: CameraBinding,
    lights: LightsBinding,
    planet: SurfaceRenderer,
    clouds: SurfaceRenderer,
    stars: StarFieldRenderer,
    glow: GlowRenderer,
    mipmaps: MipmapGenerator,
    textures: Receiver<LoadedTexture>,
}

fn standard_body(
    scene: &Scene,
    id: BodyId,
) -> Result<(SphereGeometry, StandardMaterial), AppError> {
    match scene.body(id) {
        Some(body) => match (&body.geometry, &body.material) {
            (Geometry::Sphere(geometry), Material::Standard(material)) => {
                Ok((*geometry, *material))
            }
            _ => Err(AppError::MissingBody(id)),
        },
        None => Err(AppError::MissingBody(id)),
    }
}

fn sphere_geometry(scene: &Scene, id: BodyId) -> Result<SphereGeometry, AppError> {
    match scene.body(id).map(|body| &body.geometry) {
        Some(Geometry::Sphere(geometry)) => Ok(*geometry),
        _ => Err(AppError::MissingBody(id)),
    }
}

fn clear_color(config: &RenderConfig) -> wgpu::Color {
    let [r, g, b, a] = config.clear_color;
    wgpu::Color { r, g, b, a }
}

impl SceneRenderer {
    /// Build every pipeline for `scene`. Decoded textures arriving on
    /// `textures` replace the fallback maps as they come in.
    pub fn new(
        gpu: RenderContext,
        scene: &Scene,
        config: &RenderConfig,
        textures: Receiver<LoadedTexture>,
    ) -> Result<Self, AppError> {
        let device = &gpu.device;
        let size = gpu.size();
        let sample_count = supported_sample_count(config.msaa_samples);
        let targets = TargetConfig {
            color_format: gpu.surface_format,
            sample_count,
        };

        let camera = CameraBinding::new(device);
        let lights = LightsBinding::new(device, scene.lights());

        let (planet_sphere, planet_material) = standard_body(scene, BodyId::Planet)?;
        let planet = SurfaceRenderer::new(
            device,
            &gpu.queue,
            &camera.bind_group_layout,
            &lights.bind_group_layout,
            targets,
            "planet",
            &planet_sphere.build(),
            planet_material,
        )?;

        let (cloud_sphere, cloud_material) = standard_body(scene, BodyId::Clouds)?;
        let clouds = SurfaceRenderer::new(
            device,
            &gpu.queue,
            &camera.bind_group_layout,
            &lights.bind_group_layout,
            targets,
            "clouds",
            &cloud_sphere.build(),
            cloud_material,
        )?;

        let glow_uniforms = scene
            .glow_uniforms()
            .ok_or(AppError::MissingBody(BodyId::Glow))?;
        let glow = GlowRenderer::new(
            device,
            &camera.bind_group_layout,
            targets,
            &sphere_geometry(scene, BodyId::Glow)?.build(),
            glow_uniforms,
        );

        let star_points = scene
            .star_points()
            .ok_or(AppError::MissingBody(BodyId::Stars))?;
        let stars = StarFieldRenderer::new(device, &camera.bind_group_layout, targets, star_points);

        let depth = DepthBuffer::new(device, size.width, size.height, sample_count);
        let msaa = (sample_count > 1).then(|| {
            MsaaTarget::new(
                device,
                gpu.surface_format,
                size.width,
                size.height,
                sample_count,
            )
        });
        let mipmaps = MipmapGenerator::new(device);

        info!(
            "Scene renderer ready: {}x{}, {sample_count}x MSAA, {} stars",
            size.width,
            size.height,
            star_points.len()
        );

        let queue = Arc::new(gpu.queue.clone());
        Ok(Self {
            gpu,
            queue,
            clear_color: clear_color(config),
            depth,
            msaa,
            camera,
            lights,
            planet,
            clouds,
            stars,
            glow,
            mipmaps,
            textures,
        })
    }

    pub fn size(&self) -> PhysicalSize {
        self.gpu.size()
    }

    /// Upload any textures decoded since the last frame. Never blocks.
    pub fn receive_textures(&mut self) {
        let pending: Vec<LoadedTexture> = self.textures.try_iter().collect();
        for loaded in pending {
            let target = match loaded.texture.body {
                BodyId::Planet => &mut self.planet,
                BodyId::Clouds => &mut self.clouds,
                other => {
                    warn!("No textured surface for {}", other.name());
                    continue;
                }
            };

            let map = loaded.texture.map;
            let label = format!("{}-{}", loaded.texture.body.name(), map.label());
            match GpuTexture::from_pixels(
                &self.gpu.device,
                &self.gpu.queue,
                Some(&self.mipmaps),
                &label,
                &loaded.rgba,
                loaded.width,
                loaded.height,
                map.format(),
            ) {
                Ok(texture) => target.set_map(&self.gpu.device, map, texture),
                Err(e) => warn!("Upload of {label} failed, keeping fallback: {e}"),
            }
        }
    }
}

impl OutputSurface for SceneRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        let size = PhysicalSize::clamped(width, height);
        self.gpu.resize(size.width, size.height);
        self.depth.resize(&self.gpu.device, size.width, size.height);
        if let Some(msaa) = &mut self.msaa {
            msaa.resize(&self.gpu.device, size.width, size.height);
        }
    }
}

impl FrameRenderer for SceneRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), FrameError> {
        self.receive_textures();

        let angle = |id: BodyId| scene.body(id).map_or(0.0, |body| body.render_angle());
        self.camera.update(&self.queue, camera);
        self.planet.update(&self.queue, angle(BodyId::Planet));
        self.clouds.update(&self.queue, angle(BodyId::Clouds));
        self.stars
            .update(&self.queue, angle(BodyId::Stars), self.gpu.size());
        if let Some(glow) = scene.glow_uniforms() {
            self.glow.update(&self.queue, glow);
        }

        let surface_texture = self.gpu.get_current_texture()?;

        let mut builder = RenderPassBuilder::new()
            .clear_color(self.clear_color)
            .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .label("scene-pass");
        if let Some(msaa) = &self.msaa {
            builder = builder.msaa(msaa.view.clone());
        }

        let mut encoder =
            FrameEncoder::new(&self.gpu.device, Arc::clone(&self.queue), surface_texture);
        {
            let mut pass = encoder
                .begin_render_pass(&builder)
                .ok_or(FrameError::EncoderClosed)?;
            let camera_bg = &self.camera.bind_group;
            let lights_bg = &self.lights.bind_group;

            self.planet.render(&mut pass, camera_bg, lights_bg);
            self.stars.render(&mut pass, camera_bg);
            self.clouds.render(&mut pass, camera_bg, lights_bg);
            self.glow.render(&mut pass, camera_bg);
        }
        encoder.submit();

        Ok(())
    }
}
