// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local placements and mesh baking
//!
//! A placement is a 4x4 matrix whose columns are the world-space directions
//! of the local axes plus the local origin, the same layout a scene node's
//! local-to-parent transform uses.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use nalgebra::{Matrix4, Point3, Vector3};

/// Build a right-handed placement from an origin, a local X direction and
/// an approximate local Y direction.
///
/// Y is re-orthogonalised against X and Z is `X × Y`.
pub fn placement(
    origin: &Point3<f64>,
    x_dir: &Vector3<f64>,
    y_hint: &Vector3<f64>,
) -> Result<Matrix4<f64>> {
    let x_axis = x_dir
        .try_normalize(1e-12)
        .ok_or_else(|| Error::InvalidTransform("zero-length X axis".to_string()))?;

    // Ensure Y is orthogonal to X (project Y onto plane perpendicular to X)
    let y_orthogonal = y_hint - x_axis * y_hint.dot(&x_axis);
    let y_axis = y_orthogonal
        .try_normalize(1e-9)
        .ok_or_else(|| Error::InvalidTransform("X and Y axes are parallel".to_string()))?;

    let z_axis = x_axis.cross(&y_axis);

    Ok(Matrix4::new(
        x_axis.x, y_axis.x, z_axis.x, origin.x,
        x_axis.y, y_axis.y, z_axis.y, origin.y,
        x_axis.z, y_axis.z, z_axis.z, origin.z,
        0.0, 0.0, 0.0, 1.0,
    ))
}

/// Apply transformation matrix to mesh
#[inline]
pub fn apply_transform(mesh: &mut Mesh, transform: &Matrix4<f64>) {
    mesh.positions.chunks_exact_mut(3).for_each(|chunk| {
        let point = Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
        let transformed = transform.transform_point(&point);
        chunk[0] = transformed.x as f32;
        chunk[1] = transformed.y as f32;
        chunk[2] = transformed.z as f32;
    });

    // Normals use the inverse transpose
    let normal_matrix = transform.try_inverse().unwrap_or(*transform).transpose();

    mesh.normals.chunks_exact_mut(3).for_each(|chunk| {
        let normal = Vector3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
        let transformed = (normal_matrix * normal.to_homogeneous())
            .xyz()
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        chunk[0] = transformed.x as f32;
        chunk[1] = transformed.y as f32;
        chunk[2] = transformed.z as f32;
    });
}

/// Copy of `mesh` baked into the parent space of `transform`
pub fn baked(mesh: &Mesh, transform: &Matrix4<f64>) -> Mesh {
    let mut out = mesh.clone();
    apply_transform(&mut out, transform);
    out
}
