use std::sync::Arc;

use crate::error::SceneError;
use crate::model::SceneObject;

/// Index of an object in its scene. Stable for the lifetime of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// Slice of the concatenated index buffer that draws one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRange {
    pub first_index: u32,
    pub index_count: u32,
}

/// All scene geometry packed into three flat buffers for a one-time upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Already rebased onto the concatenated vertex list.
    pub indices: Vec<u32>,
}

/// Ordered, fixed set of objects. Order is both update and draw order.
pub struct Scene {
    objects: Vec<SceneObject>,
    ranges: Vec<DrawRange>,
    buffers: SceneBuffers,
}

impl Scene {
    /// Validates every object and packs their geometry.
    /// Objects sharing one `Arc<Geometry>` share its buffer range.
    pub fn new(objects: Vec<SceneObject>) -> Result<Self, SceneError> {
        for object in &objects {
            object.validate()?;
        }

        let mut buffers = SceneBuffers::default();
        let mut ranges: Vec<DrawRange> = Vec::with_capacity(objects.len());

        for (i, object) in objects.iter().enumerate() {
            let shared = objects[..i]
                .iter()
                .position(|earlier| Arc::ptr_eq(earlier.geometry(), object.geometry()));
            if let Some(earlier) = shared {
                ranges.push(ranges[earlier]);
                continue;
            }

            let geometry = object.geometry();
            let vertex_offset = buffers.positions.len() as u32;
            let range = DrawRange {
                first_index: buffers.indices.len() as u32,
                index_count: geometry.index_count() as u32,
            };
            buffers.positions.extend_from_slice(&geometry.positions);
            buffers.normals.extend_from_slice(&geometry.normals);
            buffers
                .indices
                .extend(geometry.indices.iter().map(|i| i + vertex_offset));
            ranges.push(range);
        }

        tracing::info!(
            objects = objects.len(),
            vertices = buffers.positions.len(),
            indices = buffers.indices.len(),
            "scene built"
        );

        Ok(Self { objects, ranges, buffers })
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    pub fn find(&self, label: &str) -> Option<ObjectId> {
        self.objects.iter().position(|o| o.label() == label).map(ObjectId)
    }

    pub fn range(&self, id: ObjectId) -> Option<DrawRange> {
        self.ranges.get(id.0).copied()
    }

    /// Objects in scene order together with their ids and buffer ranges.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject, DrawRange)> + '_ {
        self.objects
            .iter()
            .zip(self.ranges.iter().copied())
            .enumerate()
            .map(|(i, (object, range))| (ObjectId(i), object, range))
    }

    pub fn buffers(&self) -> &SceneBuffers {
        &self.buffers
    }

    /// Runs every object's update rule in scene order.
    pub fn update(&mut self, delta_ms: f64, time_ms: f64) {
        for object in &mut self.objects {
            object.update(delta_ms, time_ms);
        }
    }
}
