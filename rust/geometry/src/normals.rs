// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face and vertex normals

use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};

/// Unnormalized normal of triangle `(a, b, c)`: `(b - a) × (c - a)`.
///
/// Its length is twice the triangle area.
#[inline]
pub fn face_normal(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Vector3<f64> {
    (b - a).cross(&(c - a))
}

/// Per-triangle unit normals of a mesh, in index-buffer order.
///
/// Degenerate triangles yield a zero vector.
pub fn triangle_normals(mesh: &Mesh) -> Vec<Vector3<f64>> {
    mesh.indices
        .chunks_exact(3)
        .map(|tri| {
            let n = face_normal(
                &mesh.position(tri[0] as usize),
                &mesh.position(tri[1] as usize),
                &mesh.position(tri[2] as usize),
            );
            n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
        })
        .collect()
}

/// Recompute smooth vertex normals by area-weighted accumulation of the
/// adjacent face normals.
pub fn calculate_normals(mesh: &mut Mesh) {
    let vertex_count = mesh.vertex_count();
    if vertex_count == 0 {
        return;
    }

    let mut normals = vec![Vector3::zeros(); vertex_count];

    for tri in mesh.indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let normal = face_normal(&mesh.position(i0), &mesh.position(i1), &mesh.position(i2));

        normals[i0] += normal;
        normals[i1] += normal;
        normals[i2] += normal;
    }

    mesh.normals.clear();
    mesh.normals.reserve(vertex_count * 3);

    for normal in normals {
        // Unreferenced vertices keep a zero normal instead of NaN
        let n = normal.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros);
        mesh.normals.push(n.x as f32);
        mesh.normals.push(n.y as f32);
        mesh.normals.push(n.z as f32);
    }
}
