use std::f32::consts::PI;
use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::error::SceneError;
use crate::model::{geometry, Scene, SceneObject, UpdateRule};

/// The demo scene: a floor, two spinning cubes, a torus with a sphere
/// orbiting it, and a bobbing cone.
pub fn build_scene() -> Result<Scene, SceneError> {
    let cube = Arc::new(geometry::cube(0.2));

    let floor = SceneObject::new(
        "floor",
        Arc::new(geometry::floor(10.0)),
        Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)),
        Mat4::IDENTITY,
        Vec3::new(0.15, 0.6, 0.15),
        None,
    );

    let cube1 = SceneObject::new(
        "cube1",
        cube.clone(),
        Mat4::from_translation(Vec3::new(0.0, 0.0, -6.0)),
        Mat4::IDENTITY,
        Vec3::new(0.8, 0.2, 0.1),
        Some(UpdateRule::SpinY { rate: 0.001 }),
    );

    let cube2 = SceneObject::new(
        "cube2",
        cube,
        Mat4::from_translation(Vec3::new(2.0, 0.0, -6.0)),
        Mat4::IDENTITY,
        Vec3::new(0.1, 0.2, 0.8),
        Some(UpdateRule::SpinY { rate: -0.001 }),
    );

    let torus = SceneObject::new(
        "torus1",
        Arc::new(geometry::uv_torus(0.5, 0.2, 20, 20)),
        Mat4::from_translation(Vec3::new(-2.0, 0.0, -6.0)),
        Mat4::IDENTITY,
        Vec3::new(0.8, 0.8, 0.1),
        Some(UpdateRule::Static),
    );

    // Cone axis is +Z; tip it upright so the world offset along Z moves it vertically.
    let pyramid = SceneObject::new(
        "pyramid",
        Arc::new(geometry::uv_cone(0.3, 0.5, 12, false)),
        Mat4::from_translation(Vec3::new(1.0, 0.0, -9.0)) * Mat4::from_rotation_x(-0.5 * PI),
        Mat4::IDENTITY,
        Vec3::new(0.9, 0.7, 0.0),
        Some(UpdateRule::Oscillate {
            axis: Vec3::Z,
            base: 1.0,
            amplitude: 1.0,
            frequency: 0.001,
        }),
    );

    // Spins about the torus center with a one unit world offset, so it orbits.
    let sphere = SceneObject::new(
        "sphere",
        Arc::new(geometry::uv_sphere(0.2, 16, 8)),
        Mat4::from_translation(Vec3::new(-2.0, 0.0, -6.0)),
        Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)),
        Vec3::splat(0.75),
        Some(UpdateRule::SpinY { rate: 0.002 }),
    );

    Scene::new(vec![floor, cube1, cube2, torus, pyramid, sphere])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectId;

    #[test]
    fn test_demo_scene_builds() {
        let scene = build_scene().expect("demo scene must be valid");
        assert_eq!(scene.len(), 6);
        assert_eq!(scene.find("floor"), Some(ObjectId(0)));
        assert_eq!(scene.find("sphere"), Some(ObjectId(5)));
        // Both cubes draw from the same buffer range.
        assert_eq!(scene.range(ObjectId(1)), scene.range(ObjectId(2)));
    }

    #[test]
    fn test_pyramid_bobs_vertically() {
        let mut scene = build_scene().unwrap();
        let id = scene.find("pyramid").unwrap();

        scene.update(0.0, 0.0);
        let low = scene.get(id).unwrap().model_matrix().transform_point3(Vec3::ZERO);
        scene.update(16.0, std::f64::consts::FRAC_PI_2 / 0.001);
        let high = scene.get(id).unwrap().model_matrix().transform_point3(Vec3::ZERO);

        assert!((low - Vec3::new(1.0, 1.0, -9.0)).length() < 1e-5, "low point {low:?}");
        assert!((high - Vec3::new(1.0, 2.0, -9.0)).length() < 1e-5, "high point {high:?}");
    }

    #[test]
    fn test_sphere_orbits_torus_center() {
        let mut scene = build_scene().unwrap();
        let id = scene.find("sphere").unwrap();
        let center = Vec3::new(-2.0, 0.0, -6.0);

        for _ in 0..10 {
            scene.update(123.0, 0.0);
            let p = scene.get(id).unwrap().model_matrix().transform_point3(Vec3::ZERO);
            assert!(((p - center).length() - 1.0).abs() < 1e-4);
            assert!(p.y.abs() < 1e-5);
        }
    }
}
