//! Mutable state shared by the animation loop, the resize path and the
//! pointer controller: the scene and the viewport that owns the camera.

use glam::Vec3;

use aurora_config::CameraConfig;
use aurora_input::{PointerController, Tilt, TiltTarget};
use aurora_render::{Camera, OutputSurface, PhysicalSize, Viewport};
use aurora_scene::{Scene, initial_camera_position};

pub struct SceneContext {
    pub scene: Scene,
    pub viewport: Viewport,
}

impl SceneContext {
    /// Place a perspective camera on +Z at `config.start_z`, facing the origin.
    pub fn new(mut scene: Scene, config: &CameraConfig, width: u32, height: u32) -> Self {
        let mut camera = Camera::perspective(
            config.fov_y_degrees.to_radians(),
            1.0,
            config.near,
            config.far,
        )
        .with_position(initial_camera_position(config.start_z));
        camera.look_at(Vec3::ZERO);

        let viewport = Viewport::new(camera, width, height);
        scene.track_camera(viewport.camera());

        Self { scene, viewport }
    }

    pub fn camera(&self) -> &Camera {
        self.viewport.camera()
    }

    pub fn size(&self) -> PhysicalSize {
        self.viewport.size()
    }

    /// Window resized: resynchronize camera aspect and `surface`.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        surface: &mut dyn OutputSurface,
    ) -> PhysicalSize {
        self.viewport.resynchronize(width, height, surface)
    }

    /// Pointer moved to window pixel `(x, y)`.
    pub fn pointer_moved(
        &mut self,
        controller: &mut PointerController,
        x: f64,
        y: f64,
        form: &mut dyn TiltTarget,
    ) -> Tilt {
        let size = self.viewport.size();
        controller.on_pointer_moved(
            x,
            y,
            size.width,
            size.height,
            self.viewport.camera_mut(),
            form,
        )
    }
}
