use glam::{Mat4, Vec3};

use crate::model::{DrawRange, ObjectId, SceneBuffers};

/// Vertex attribute names and the shader locations they bind to.
/// Each attribute lives in its own vertex buffer, in this order.
pub const VERTEX_ATTRIBUTES: [(&str, u32); 2] = [("vert_position", 0), ("vert_normal", 1)];

/// Uniforms shared by every draw in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGlobals {
    pub view_proj: Mat4,
    pub light_direction: Vec3,
    pub ambient_color: Vec3,
    pub diffuse_color: Vec3,
}

/// Everything needed to draw one object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectDraw {
    pub id: ObjectId,
    pub view_transform: Mat4,
    pub world_transform: Mat4,
    pub material_color: Vec3,
    pub range: DrawRange,
}

/// Draw-submission side of the frame loop.
///
/// The frame driver calls `register_geometry` once, then per frame
/// `set_globals` once, `draw` once per object in scene order and `present`
/// once. Implementations absorb their own transient failures.
pub trait Renderer {
    fn register_geometry(&mut self, buffers: &SceneBuffers);
    fn set_globals(&mut self, globals: &FrameGlobals);
    fn draw(&mut self, draw: &ObjectDraw);
    fn present(&mut self);
}
