//! Generators for the primitive shapes used by the scene.
//!
//! Round shapes are built around the Z axis, so a cone points along +Z and a
//! torus lies in the XY plane. Rotate them into place with the view transform.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::model::Geometry;

/// Axis aligned cube centered on the origin with flat-shaded faces.
pub fn cube(side: f32) -> Geometry {
    let h = side / 2.0;
    // (normal, u, v) with u x v = normal so each face winds counter-clockwise.
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in faces {
        let base = positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            positions.push((h * (normal + su * u + sv * v)).to_array());
            normals.push(normal.to_array());
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Geometry::new(positions, normals, indices)
}

/// Sphere made of `slices` meridians and `stacks` parallels.
pub fn uv_sphere(radius: f32, slices: u32, stacks: u32) -> Geometry {
    let mut positions = Vec::new();
    let mut normals = Vec::new();

    for i in 0..=stacks {
        let lat = -PI / 2.0 + i as f32 * PI / stacks as f32;
        let (sin_lat, cos_lat) = lat.sin_cos();
        for j in 0..=slices {
            let lon = j as f32 * TAU / slices as f32;
            let (sin_lon, cos_lon) = lon.sin_cos();
            let normal = Vec3::new(cos_lon * cos_lat, sin_lon * cos_lat, sin_lat);
            positions.push((radius * normal).to_array());
            normals.push(normal.to_array());
        }
    }

    Geometry::new(positions, normals, grid_indices(slices, stacks))
}

/// Torus whose hole has radius `inner` and whose outer edge has radius `outer`.
pub fn uv_torus(outer: f32, inner: f32, slices: u32, stacks: u32) -> Geometry {
    let tube = (outer - inner) / 2.0;
    let center = (outer + inner) / 2.0;
    let mut positions = Vec::new();
    let mut normals = Vec::new();

    for i in 0..=stacks {
        let u = i as f32 * TAU / stacks as f32;
        let (sin_u, cos_u) = u.sin_cos();
        for j in 0..=slices {
            let v = j as f32 * TAU / slices as f32;
            let (sin_v, cos_v) = v.sin_cos();
            let ring = Vec3::new(cos_v, sin_v, 0.0);
            let normal = cos_u * ring + sin_u * Vec3::Z;
            positions.push((center * ring + tube * normal).to_array());
            normals.push(normal.to_array());
        }
    }

    Geometry::new(positions, normals, grid_indices(slices, stacks))
}

/// Cone with its base at `z = -height/2` and apex at `z = height/2`.
pub fn uv_cone(radius: f32, height: f32, slices: u32, no_bottom: bool) -> Geometry {
    let half = height / 2.0;
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    // Side: one base and one apex vertex per slice edge, sharing the slanted normal.
    for i in 0..=slices {
        let angle = i as f32 * TAU / slices as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let normal = Vec3::new(height * cos_a, height * sin_a, radius).normalize();
        positions.push([radius * cos_a, radius * sin_a, -half]);
        normals.push(normal.to_array());
        positions.push([0.0, 0.0, half]);
        normals.push(normal.to_array());
    }
    for i in 0..slices {
        let base = 2 * i;
        indices.extend_from_slice(&[base, base + 2, base + 1]);
    }

    if !no_bottom {
        let center = positions.len() as u32;
        positions.push([0.0, 0.0, -half]);
        normals.push([0.0, 0.0, -1.0]);
        for i in 0..slices {
            let angle = i as f32 * TAU / slices as f32;
            let (sin_a, cos_a) = angle.sin_cos();
            positions.push([radius * cos_a, radius * sin_a, -half]);
            normals.push([0.0, 0.0, -1.0]);
        }
        for i in 0..slices {
            let a = center + 1 + i;
            let b = center + 1 + (i + 1) % slices;
            indices.extend_from_slice(&[center, b, a]);
        }
    }

    Geometry::new(positions, normals, indices)
}

/// Square in the XZ plane facing +Y, spanning `[-half_size, half_size]` on both axes.
pub fn floor(half_size: f32) -> Geometry {
    let s = half_size;
    Geometry::new(
        vec![[-s, 0.0, -s], [s, 0.0, -s], [s, 0.0, s], [-s, 0.0, s]],
        vec![[0.0, 1.0, 0.0]; 4],
        vec![0, 1, 2, 0, 2, 3],
    )
}

/// Triangles for a `(columns + 1) x (rows + 1)` vertex grid laid out row by row.
fn grid_indices(columns: u32, rows: u32) -> Vec<u32> {
    let stride = columns + 1;
    let mut indices = Vec::with_capacity((columns * rows * 6) as usize);
    for r in 0..rows {
        let row = r * stride;
        let next = (r + 1) * stride;
        for c in 0..columns {
            indices.extend_from_slice(&[row + c, row + c + 1, next + c + 1]);
            indices.extend_from_slice(&[row + c, next + c + 1, next + c]);
        }
    }
    indices
}
