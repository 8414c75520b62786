use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::error::SceneError;

/// Immutable triangle mesh. Indices refer to entries of `positions`/`normals`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn new(positions: Vec<[f32; 3]>, normals: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self { positions, normals, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn validate(&self, object: &str) -> Result<(), SceneError> {
        if self.positions.len() != self.normals.len() {
            return Err(SceneError::NormalCountMismatch {
                object: object.to_string(),
                positions: self.positions.len(),
                normals: self.normals.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(SceneError::IncompleteTriangle {
                object: object.to_string(),
                count: self.indices.len(),
            });
        }
        let vertex_count = self.vertex_count();
        if let Some((position, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, &i)| i as usize >= vertex_count)
        {
            return Err(SceneError::IndexOutOfRange {
                object: object.to_string(),
                position,
                index,
                vertex_count,
            });
        }
        let finite = |v: &[f32; 3]| v.iter().all(|c| c.is_finite());
        if !self.positions.iter().all(finite) {
            return Err(non_finite(object, "vertex positions"));
        }
        if !self.normals.iter().all(finite) {
            return Err(non_finite(object, "vertex normals"));
        }
        Ok(())
    }
}

fn non_finite(object: &str, what: &'static str) -> SceneError {
    SceneError::NonFinite { object: object.to_string(), what }
}

/// The two independently animated transforms of an object.
/// The model matrix is `view * world`, so `world` acts in the object's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransforms {
    pub view: Mat4,
    pub world: Mat4,
}

impl ObjectTransforms {
    pub fn model_matrix(&self) -> Mat4 {
        self.view * self.world
    }
}

/// Per-frame animation of an object. Rules only ever see the transforms of
/// the object they belong to.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UpdateRule {
    #[default]
    Static,
    /// Rotate the view transform about its local Y axis by `rate` radians per millisecond.
    SpinY { rate: f64 },
    /// Replace the world transform with a translation along `axis` by
    /// `base + amplitude * sin(frequency * time_ms)`.
    Oscillate {
        axis: Vec3,
        base: f32,
        amplitude: f32,
        frequency: f64,
    },
}

impl UpdateRule {
    pub fn apply(&self, transforms: &mut ObjectTransforms, delta_ms: f64, time_ms: f64) {
        match *self {
            UpdateRule::Static => {}
            UpdateRule::SpinY { rate } => {
                let angle = (rate * delta_ms) as f32;
                transforms.view *= Mat4::from_rotation_y(angle);
            }
            UpdateRule::Oscillate { axis, base, amplitude, frequency } => {
                let offset = base + amplitude * (frequency * time_ms).sin() as f32;
                transforms.world = Mat4::from_translation(axis * offset);
            }
        }
    }
}

pub struct SceneObject {
    label: String,
    geometry: Arc<Geometry>,
    transforms: ObjectTransforms,
    material_color: Vec3,
    rule: UpdateRule,
}

impl SceneObject {
    pub fn new(
        label: impl Into<String>,
        geometry: Arc<Geometry>,
        view: Mat4,
        world: Mat4,
        material_color: Vec3,
        rule: Option<UpdateRule>,
    ) -> Self {
        Self {
            label: label.into(),
            geometry,
            transforms: ObjectTransforms { view, world },
            material_color,
            rule: rule.unwrap_or_default(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn geometry(&self) -> &Arc<Geometry> {
        &self.geometry
    }

    pub fn transforms(&self) -> ObjectTransforms {
        self.transforms
    }

    pub fn view_transform(&self) -> Mat4 {
        self.transforms.view
    }

    pub fn world_transform(&self) -> Mat4 {
        self.transforms.world
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.transforms.model_matrix()
    }

    pub fn material_color(&self) -> Vec3 {
        self.material_color
    }

    pub fn rule(&self) -> &UpdateRule {
        &self.rule
    }

    pub fn update(&mut self, delta_ms: f64, time_ms: f64) {
        self.rule.apply(&mut self.transforms, delta_ms, time_ms);
    }

    /// Checks run once when the object joins a scene.
    pub fn validate(&self) -> Result<(), SceneError> {
        self.geometry.validate(&self.label)?;
        if !self.transforms.view.is_finite() {
            return Err(non_finite(&self.label, "view transform"));
        }
        if !self.transforms.world.is_finite() {
            return Err(non_finite(&self.label, "world transform"));
        }
        if !self.material_color.is_finite() {
            return Err(non_finite(&self.label, "material color"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn triangle() -> Arc<Geometry> {
        Arc::new(Geometry::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0.0, 0.0, 1.0]; 3],
            vec![0, 1, 2],
        ))
    }

    fn height_of(object: &SceneObject) -> f32 {
        object.world_transform().w_axis.z
    }

    #[test]
    fn test_missing_rule_defaults_to_static() {
        let mut object = SceneObject::new("t", triangle(), Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ONE, None);
        assert_eq!(object.rule(), &UpdateRule::Static);
        object.update(16.0, 1000.0);
        assert_eq!(object.transforms(), ObjectTransforms { view: Mat4::IDENTITY, world: Mat4::IDENTITY });
    }

    #[test]
    fn test_oscillating_height() {
        let rule = UpdateRule::Oscillate { axis: Vec3::Z, base: 1.0, amplitude: 1.0, frequency: 0.001 };
        let mut object = SceneObject::new("pyramid", triangle(), Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ONE, Some(rule));

        object.update(0.0, 0.0);
        assert!((height_of(&object) - 1.0).abs() < 1e-6);

        object.update(16.0, FRAC_PI_2 / 0.001);
        assert!((height_of(&object) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_spin_with_zero_delta_is_identity() {
        let start = Mat4::from_translation(Vec3::new(0.0, 0.0, -6.0));
        let mut object = SceneObject::new(
            "cube",
            triangle(),
            start,
            Mat4::IDENTITY,
            Vec3::ONE,
            Some(UpdateRule::SpinY { rate: 0.001 }),
        );
        object.update(0.0, 0.0);
        assert_eq!(object.view_transform(), start);
        assert!(object.view_transform().is_finite());
    }

    #[test]
    fn test_spin_rotates_in_local_frame() {
        let start = Mat4::from_translation(Vec3::new(2.0, 0.0, -6.0));
        let mut object = SceneObject::new(
            "cube",
            triangle(),
            start,
            Mat4::IDENTITY,
            Vec3::ONE,
            Some(UpdateRule::SpinY { rate: 0.001 }),
        );
        object.update(1000.0 * FRAC_PI_2, 0.0);

        // Translation stays put, local +X now points to world -Z.
        let view = object.view_transform();
        assert!((view.w_axis.truncate() - Vec3::new(2.0, 0.0, -6.0)).length() < 1e-5);
        assert!((view.transform_vector3(Vec3::X) - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_world_applies_before_view() {
        let object = SceneObject::new(
            "sphere",
            triangle(),
            Mat4::from_translation(Vec3::new(-2.0, 0.0, -6.0)) * Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Mat4::from_translation(Vec3::X),
            Vec3::ONE,
            None,
        );
        let center = object.model_matrix().transform_point3(Vec3::ZERO);
        assert!((center - Vec3::new(-2.0, 0.0, -7.0)).length() < 1e-5);
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let mismatched = Geometry::new(vec![[0.0; 3]; 3], vec![[0.0; 3]; 2], vec![0, 1, 2]);
        assert!(matches!(
            mismatched.validate("m"),
            Err(SceneError::NormalCountMismatch { positions: 3, normals: 2, .. })
        ));

        let partial = Geometry::new(vec![[0.0; 3]; 3], vec![[0.0; 3]; 3], vec![0, 1]);
        assert!(matches!(partial.validate("p"), Err(SceneError::IncompleteTriangle { count: 2, .. })));

        let dangling = Geometry::new(vec![[0.0; 3]; 3], vec![[0.0; 3]; 3], vec![0, 1, 3]);
        assert_eq!(
            dangling.validate("d"),
            Err(SceneError::IndexOutOfRange { object: "d".to_string(), position: 2, index: 3, vertex_count: 3 })
        );

        assert!(triangle().validate("ok").is_ok());
    }

    #[test]
    fn test_validate_rejects_non_finite_transform() {
        let object = SceneObject::new(
            "nan",
            triangle(),
            Mat4::from_translation(Vec3::new(f32::NAN, 0.0, 0.0)),
            Mat4::IDENTITY,
            Vec3::ONE,
            None,
        );
        assert!(matches!(object.validate(), Err(SceneError::NonFinite { what: "view transform", .. })));
    }
}
