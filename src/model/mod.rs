// MODEL: camera and scene data
pub mod navigation;
pub mod scene_object;
pub mod scene;
pub mod geometry;
pub mod objects;

pub use navigation::NavigationPoint;
pub use scene_object::{Geometry, ObjectTransforms, SceneObject, UpdateRule};
pub use scene::{DrawRange, ObjectId, Scene, SceneBuffers};
