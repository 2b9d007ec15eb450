//! wgpu rendering foundation: GPU context, viewport and camera, render targets, and frame encoding.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod texture;
pub mod viewport;

pub use buffer::{BufferAllocator, MESH_INDEX_FORMAT, MeshBuffer};
pub use camera::Camera;
pub use depth::{DepthBuffer, MSAA_SAMPLES, MsaaTarget, supported_sample_count};
pub use gpu::{
    RenderContext, RenderContextError, SurfaceError, SurfaceOptions, init_render_context_blocking,
};
pub use pass::{DepthAttachmentConfig, FrameEncoder, RenderPassBuilder, TRANSPARENT};
pub use pipeline::{
    BlendMode, CAMERA_UNIFORM_WGSL, CameraBinding, CameraUniform, TargetConfig, multisample_state,
};
pub use texture::{
    GpuTexture, MipmapGenerator, TextureError, create_sphere_sampler, create_test_device_queue,
    mip_level_count,
};
pub use viewport::{MIN_SURFACE_DIMENSION, OutputSurface, PhysicalSize, Viewport};
