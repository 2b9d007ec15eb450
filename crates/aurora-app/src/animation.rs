//! The per-frame driver: spin the bodies, then draw the scene once.
//!
//! The host calls [`AnimationLoop::tick`] on every display refresh. A tick
//! never fails: a frame that cannot be drawn is logged and the next refresh
//! tries again. The loop runs until its [`StopHandle`] is triggered.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use aurora_render::Camera;
use aurora_scene::Scene;

use crate::context::SceneContext;
use crate::error::FrameError;

/// Frames between periodic frame-count log lines.
pub const FRAME_LOG_INTERVAL: u64 = 600;

/// Draws the scene through a camera. Implemented by the GPU renderer.
pub trait FrameRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), FrameError>;
}

/// Shared cancellation flag for an [`AnimationLoop`].
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        if !self.0.swap(true, Ordering::SeqCst) {
            info!("Animation loop stop requested");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    /// Schedule another tick on the next refresh.
    Running,
    /// Stopped; nothing was advanced or drawn.
    Stopped,
}

#[derive(Debug, Default)]
pub struct AnimationLoop {
    stop: StopHandle,
    frames: u64,
    failed_frames: u64,
    started: bool,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Ticks that reached the renderer, including failed ones.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn failed_frames(&self) -> u64 {
        self.failed_frames
    }

    /// Run one frame.
    ///
    /// Advances every rotation by one increment, points the glow at the
    /// current camera, refreshes a dirty projection and renders exactly once.
    pub fn tick(
        &mut self,
        context: &mut SceneContext,
        renderer: &mut dyn FrameRenderer,
    ) -> LoopStatus {
        if self.stop.is_stopped() {
            return LoopStatus::Stopped;
        }
        if !self.started {
            info!("Animation loop started");
            self.started = true;
        }

        context.scene.advance_rotations();
        context.scene.track_camera(context.viewport.camera());
        context.viewport.camera_mut().update_projection_matrix();

        if let Err(e) = renderer.render(&context.scene, context.viewport.camera()) {
            self.failed_frames += 1;
            warn!(
                "Frame {} skipped: {e} ({} failed so far)",
                self.frames, self.failed_frames
            );
        }
        self.frames += 1;

        if self.frames % FRAME_LOG_INTERVAL == 0 {
            debug!(
                "Rendered {} frames ({} failed)",
                self.frames, self.failed_frames
            );
        }

        LoopStatus::Running
    }
}
