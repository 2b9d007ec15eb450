//! Pointer interaction: maps pointer motion to an eased camera sway around
//! the planet and a perspective tilt on the login form.
//!
//! Both effects run on every pointer-move event and are independent of the
//! animation loop. The camera never jumps to its target: each event moves it
//! a fixed fraction of the remaining distance, so it approaches the target
//! asymptotically.

use glam::Vec3;

use aurora_config::InputConfig;
use aurora_render::Camera;

/// Normalized pointer position: `x` grows rightward, `y` grows upward, both
/// in `[-1, 1]` with the screen center at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    /// Normalize window pixel coordinates. Zero-sized windows are treated as 1px.
    pub fn from_screen(x: f64, y: f64, width: u32, height: u32) -> Self {
        let width = f64::from(width.max(1));
        let height = f64::from(height.max(1));
        Self {
            x: (x / width * 2.0 - 1.0) as f32,
            y: (-(y / height) * 2.0 + 1.0) as f32,
        }
    }
}

/// Rotation applied to the form, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    /// Rotation about the horizontal axis.
    pub x_deg: f32,
    /// Rotation about the vertical axis.
    pub y_deg: f32,
}

impl Tilt {
    /// `x_deg = y * -max`, `y_deg = x * max`.
    pub fn from_pointer(pointer: PointerState, max_degrees: f32) -> Self {
        // Adding zero folds -0.0 into 0.0 at the screen center.
        Self {
            x_deg: pointer.y * -max_degrees + 0.0,
            y_deg: pointer.x * max_degrees + 0.0,
        }
    }

    /// CSS transform string, e.g. `perspective(1000px) rotateX(-10deg) rotateY(10deg)`.
    pub fn to_css(&self, perspective_px: f32) -> String {
        format!(
            "perspective({perspective_px}px) rotateX({}deg) rotateY({}deg)",
            self.x_deg, self.y_deg
        )
    }
}

/// Anything that can display the form tilt.
pub trait TiltTarget {
    fn apply_tilt(&mut self, tilt: Tilt);
}

/// Converts pointer events into camera easing and form tilt.
#[derive(Debug, Clone)]
pub struct PointerController {
    camera_sway: f32,
    ease_factor: f32,
    max_tilt_degrees: f32,
    form_perspective_px: f32,
    rest_distance: f32,
    pointer: PointerState,
}

impl PointerController {
    /// `rest_distance` is the camera's distance along +Z when the pointer is centered.
    pub fn new(config: &InputConfig, rest_distance: f32) -> Self {
        Self {
            camera_sway: config.camera_sway,
            ease_factor: config.ease_factor.clamp(0.0, 1.0),
            max_tilt_degrees: config.max_tilt_degrees,
            form_perspective_px: config.form_perspective_px,
            rest_distance,
            pointer: PointerState::default(),
        }
    }

    /// Last normalized pointer position.
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn form_perspective_px(&self) -> f32 {
        self.form_perspective_px
    }

    /// Where the camera heads for a given pointer position.
    pub fn camera_target(&self, pointer: PointerState) -> Vec3 {
        Vec3::new(
            pointer.x * self.camera_sway,
            pointer.y * self.camera_sway,
            self.rest_distance,
        )
    }

    /// Move the camera one easing step toward `target` and face the origin.
    pub fn ease_camera(&self, camera: &mut Camera, target: Vec3) {
        camera.position = camera.position.lerp(target, self.ease_factor);
        camera.look_at(Vec3::ZERO);
    }

    /// Handle one pointer-move event in window pixel coordinates.
    pub fn on_pointer_moved(
        &mut self,
        x: f64,
        y: f64,
        width: u32,
        height: u32,
        camera: &mut Camera,
        form: &mut dyn TiltTarget,
    ) -> Tilt {
        self.pointer = PointerState::from_screen(x, y, width, height);

        let target = self.camera_target(self.pointer);
        self.ease_camera(camera, target);

        let tilt = Tilt::from_pointer(self.pointer, self.max_tilt_degrees);
        form.apply_tilt(tilt);
        tracing::trace!(
            "pointer ({:.3}, {:.3}) -> tilt ({:.2}, {:.2})",
            self.pointer.x,
            self.pointer.y,
            tilt.x_deg,
            tilt.y_deg
        );
        tilt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingForm {
        tilts: Vec<Tilt>,
    }

    impl TiltTarget for RecordingForm {
        fn apply_tilt(&mut self, tilt: Tilt) {
            self.tilts.push(tilt);
        }
    }

    fn controller() -> PointerController {
        PointerController::new(&InputConfig::default(), 5.0)
    }

    fn start_camera() -> Camera {
        Camera::default().with_position(Vec3::new(0.0, 0.0, 5.0))
    }

    #[test]
    fn test_normalization_corners() {
        let top_left = PointerState::from_screen(0.0, 0.0, 800, 600);
        assert_eq!(top_left, PointerState { x: -1.0, y: 1.0 });
        let bottom_right = PointerState::from_screen(800.0, 600.0, 800, 600);
        assert_eq!(bottom_right, PointerState { x: 1.0, y: -1.0 });
        let center = PointerState::from_screen(400.0, 300.0, 800, 600);
        assert_eq!(center, PointerState { x: 0.0, y: 0.0 });
    }

    #[test]
    fn test_zero_size_window_is_finite() {
        let pointer = PointerState::from_screen(0.0, 0.0, 0, 0);
        assert!(pointer.x.is_finite() && pointer.y.is_finite());
    }

    #[test]
    fn test_tilt_at_center_is_zero() {
        let mut ctrl = controller();
        let mut camera = start_camera();
        let mut form = RecordingForm::default();
        let tilt = ctrl.on_pointer_moved(400.0, 300.0, 800, 600, &mut camera, &mut form);
        assert_eq!(tilt, Tilt { x_deg: 0.0, y_deg: 0.0 });
        assert_eq!(
            tilt.to_css(1000.0),
            "perspective(1000px) rotateX(0deg) rotateY(0deg)"
        );
    }

    #[test]
    fn test_tilt_at_top_left() {
        let mut ctrl = controller();
        let mut camera = start_camera();
        let mut form = RecordingForm::default();
        let tilt = ctrl.on_pointer_moved(0.0, 0.0, 800, 600, &mut camera, &mut form);
        // x = -1, y = 1: tiltX = 1 * -10, tiltY = -1 * 10.
        assert_eq!(tilt, Tilt { x_deg: -10.0, y_deg: -10.0 });
        assert_eq!(form.tilts, vec![tilt]);
    }

    #[test]
    fn test_tilt_at_bottom_right() {
        let mut ctrl = controller();
        let mut camera = start_camera();
        let mut form = RecordingForm::default();
        let tilt = ctrl.on_pointer_moved(800.0, 600.0, 800, 600, &mut camera, &mut form);
        assert_eq!(tilt, Tilt { x_deg: 10.0, y_deg: 10.0 });
        assert_eq!(
            tilt.to_css(1000.0),
            "perspective(1000px) rotateX(10deg) rotateY(10deg)"
        );
    }

    #[test]
    fn test_camera_target() {
        let ctrl = controller();
        let target = ctrl.camera_target(PointerState { x: 1.0, y: -1.0 });
        assert_eq!(target, Vec3::new(0.5, -0.5, 5.0));
    }

    #[test]
    fn test_camera_converges_geometrically() {
        let ctrl = controller();
        let mut camera = start_camera();
        let target = ctrl.camera_target(PointerState { x: 1.0, y: 1.0 });
        let d0 = camera.position.distance(target);

        let mut previous = d0;
        for k in 1..=40 {
            ctrl.ease_camera(&mut camera, target);
            let d = camera.position.distance(target);
            assert!(d < previous, "step {k}: distance did not shrink");
            let expected = d0 * 0.95_f32.powi(k);
            assert!(
                (d - expected).abs() <= expected * 1e-3,
                "step {k}: distance {d}, expected {expected}"
            );
            previous = d;
        }
        // Never overshoots or lands exactly.
        assert!(camera.position.distance(target) > 0.0);
    }

    #[test]
    fn test_camera_faces_origin_after_move() {
        let mut ctrl = controller();
        let mut camera = start_camera();
        let mut form = RecordingForm::default();
        for _ in 0..20 {
            ctrl.on_pointer_moved(700.0, 100.0, 800, 600, &mut camera, &mut form);
        }
        let to_origin = (-camera.position).normalize();
        assert!((camera.forward() - to_origin).length() < 1e-5);
        assert_eq!(form.tilts.len(), 20);
    }

    #[test]
    fn test_pointer_is_overwritten_each_event() {
        let mut ctrl = controller();
        let mut camera = start_camera();
        let mut form = RecordingForm::default();
        ctrl.on_pointer_moved(0.0, 0.0, 800, 600, &mut camera, &mut form);
        ctrl.on_pointer_moved(400.0, 300.0, 800, 600, &mut camera, &mut form);
        assert_eq!(ctrl.pointer(), PointerState { x: 0.0, y: 0.0 });
    }
}
