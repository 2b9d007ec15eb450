//! Aurora application: the animation loop, background texture loading, the
//! GPU scene renderer and the winit host that ties them together.

pub mod animation;
pub mod assets;
pub mod context;
pub mod error;
pub mod form;
pub mod renderer;
pub mod window;

pub use animation::{AnimationLoop, FRAME_LOG_INTERVAL, FrameRenderer, LoopStatus, StopHandle};
pub use assets::{
    AssetError, LoadedTexture, ThreadedTextureLoader, fit_within, load_texture, resolve_location,
};
pub use context::SceneContext;
pub use error::{AppError, FrameError};
pub use form::FormOverlay;
pub use renderer::SceneRenderer;
pub use window::{AppState, run, window_attributes_from_config};
