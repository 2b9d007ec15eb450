//! Application-level errors.

use aurora_render::{RenderContextError, SurfaceError, TextureError};
use aurora_scene::BodyId;

use crate::assets::AssetError;

/// Failures that stop the backdrop from starting.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    RenderContext(#[from] RenderContextError),

    #[error("texture creation failed: {0}")]
    Texture(#[from] TextureError),

    #[error("asset loader failed: {0}")]
    Asset(#[from] AssetError),

    /// The composed scene lacks a body the renderer draws.
    #[error("scene has no {} body", .0.name())]
    MissingBody(BodyId),
}

/// A single frame that could not be drawn. Never fatal to the animation loop.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("failed to acquire frame: {0}")]
    Surface(#[from] SurfaceError),

    #[error("frame encoder closed before the scene pass began")]
    EncoderClosed,
}
