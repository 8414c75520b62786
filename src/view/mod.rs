// VIEW: rendering collaborator and its wgpu implementation
pub mod renderer;
pub mod gpu_init;
pub mod wgpu_render;

pub use renderer::{FrameGlobals, ObjectDraw, Renderer, VERTEX_ATTRIBUTES};
pub use gpu_init::GpuContext;
pub use wgpu_render::WgpuRenderer;
