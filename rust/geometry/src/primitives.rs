// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point/vector helpers and intersections used by the building generator
//!
//! All functions work in a right-handed frame with `y` up. "Planar" means
//! the ground plane (`x`/`z`), the `y` component is ignored.

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};

/// Relative tolerance below which two ground-plane directions count as parallel
const PARALLEL_EPSILON: f64 = 1e-9;

/// Plane defined by a point and a unit normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Point on the plane
    pub point: Point3<f64>,
    /// Normal vector (normalized on construction)
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a new plane
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Intersect the infinite line `origin + t * direction` with this plane.
    ///
    /// Returns `None` when the line runs parallel to the plane.
    pub fn intersect_line(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
    ) -> Option<Point3<f64>> {
        let denom = self.normal.dot(direction);
        if denom.abs() < f64::EPSILON {
            return None;
        }
        let t = (self.point - origin).dot(&self.normal) / denom;
        Some(origin + direction * t)
    }
}

/// Distance between two points measured in the ground plane.
#[inline]
pub fn planar_distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

/// Linear interpolation between two points.
#[inline]
pub fn lerp(a: &Point3<f64>, b: &Point3<f64>, t: f64) -> Point3<f64> {
    a + (b - a) * t
}

/// Twice the signed area of a ground polygon (shoelace over `x`/`z`).
///
/// Positive for polygons that are clockwise when looked at from above.
pub fn signed_area_xz(points: &[Point3<f64>]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = &points[i];
            let b = &points[(i + 1) % n];
            a.x * b.z - b.x * a.z
        })
        .sum()
}

/// Intersection of the two diagonals `p0–p2` and `p1–p3` of a ground quad.
///
/// Solved as a 2x2 system in the `x`/`z` plane. The returned point lies on
/// the ground (`y = 0`). Fails with [`Error::DegenerateQuad`] when the
/// diagonals are parallel or collapse to a point.
pub fn diagonal_intersection(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
) -> Result<Point3<f64>> {
    let (x1, z1, x2, z2) = (p0.x, p0.z, p2.x, p2.z);
    let (x3, z3, x4, z4) = (p1.x, p1.z, p3.x, p3.z);

    let par = (x1 - x2) * (z3 - z4) - (z1 - z2) * (x3 - x4);
    let scale = planar_distance(p0, p2) * planar_distance(p1, p3);
    if scale == 0.0 || par.abs() <= PARALLEL_EPSILON * scale {
        return Err(Error::DegenerateQuad(par));
    }

    let det_a = x1 * z2 - z1 * x2;
    let det_b = x3 * z4 - z3 * x4;
    let x = (det_a * (x3 - x4) - (x1 - x2) * det_b) / par;
    let z = (det_a * (z3 - z4) - (z1 - z2) * det_b) / par;

    Ok(Point3::new(x, 0.0, z))
}
