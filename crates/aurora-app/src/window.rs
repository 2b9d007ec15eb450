//! Window creation and event handling via winit.
//!
//! Provides [`AppState`] which implements winit's [`ApplicationHandler`] trait,
//! and a [`run`] function to start the event loop.

use std::sync::Arc;

use tracing::{error, info, instrument};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use aurora_config::Config;
use aurora_input::PointerController;
use aurora_render::{SurfaceOptions, init_render_context_blocking};
use aurora_scene::compose_scene;
use aurora_space::StarFieldGenerator;

use crate::animation::{AnimationLoop, LoopStatus, StopHandle};
use crate::assets::ThreadedTextureLoader;
use crate::context::SceneContext;
use crate::error::AppError;
use crate::form::FormOverlay;
use crate::renderer::SceneRenderer;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
        .with_transparent(config.window.transparent)
}

/// Application state. Everything GPU-bound is created on the first `resumed`.
pub struct AppState {
    config: Config,
    window: Option<Arc<Window>>,
    context: Option<SceneContext>,
    renderer: Option<SceneRenderer>,
    pointer: PointerController,
    form: FormOverlay,
    animation: AnimationLoop,
    startup_error: Option<AppError>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let pointer = PointerController::new(&config.input, config.camera.start_z);
        let form = FormOverlay::new(pointer.form_perspective_px());
        Self {
            config,
            window: None,
            context: None,
            renderer: None,
            pointer,
            form,
            animation: AnimationLoop::new(),
            startup_error: None,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.animation.stop_handle()
    }

    pub fn form(&self) -> &FormOverlay {
        &self.form
    }

    pub fn context(&self) -> Option<&SceneContext> {
        self.context.as_ref()
    }

    /// The error that ended startup, if any.
    pub fn take_startup_error(&mut self) -> Option<AppError> {
        self.startup_error.take()
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attrs = window_attributes_from_config(&self.config);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let gpu = init_render_context_blocking(
            window.clone(),
            SurfaceOptions {
                vsync: self.config.window.vsync,
                transparent: self.config.window.transparent,
            },
        )?;

        let loader = ThreadedTextureLoader::spawn(
            self.config.assets.root.clone(),
            gpu.device.limits().max_texture_dimension_2d,
        )?;
        let stars = StarFieldGenerator::default().generate_seeded(self.config.starfield.seed);
        let scene = compose_scene(&loader, stars);

        let size = gpu.size();
        let renderer = SceneRenderer::new(gpu, &scene, &self.config.render, loader.results())?;
        let context = SceneContext::new(scene, &self.config.camera, size.width, size.height);
        // The worker drains the queued requests, then exits with the loader.
        drop(loader);

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.context = Some(context);
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            error!("Startup failed: {e}");
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.animation.stop_handle().stop();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(context), Some(renderer)) = (&mut self.context, &mut self.renderer) {
                    let size = context.resize(new_size.width, new_size.height, renderer);
                    info!("Window resized to {}x{}", size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(context) = &mut self.context {
                    context.pointer_moved(
                        &mut self.pointer,
                        position.x,
                        position.y,
                        &mut self.form,
                    );
                }
            }
            WindowEvent::RedrawRequested => {
                if let (Some(context), Some(renderer)) = (&mut self.context, &mut self.renderer) {
                    match self.animation.tick(context, renderer) {
                        LoopStatus::Running => {
                            if let Some(window) = &self.window {
                                window.request_redraw();
                            }
                        }
                        LoopStatus::Stopped => event_loop.exit(),
                    }
                }
            }
            _ => {}
        }
    }
}

/// Creates an event loop and runs the backdrop with the given config.
///
/// This function blocks until the window is closed.
#[instrument(skip(config))]
pub fn run(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config);
    event_loop.run_app(&mut app)?;
    match app.take_startup_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_starts_without_window() {
        let state = AppState::new(Config::default());
        assert!(state.window.is_none());
        assert!(state.context().is_none());
        assert!(!state.stop_handle().is_stopped());
    }

    #[test]
    fn test_form_uses_configured_perspective() {
        let mut config = Config::default();
        config.input.form_perspective_px = 800.0;
        let state = AppState::new(config);
        assert!(state.form().transform().starts_with("perspective(800px)"));
    }

    #[test]
    fn test_window_attributes_from_config() {
        let mut config = Config::default();
        config.window.title = "Sign in".to_string();
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "Sign in");
        assert_eq!(attrs.transparent, config.window.transparent);
    }
}
