// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use crate::error::{Error, Result};
use crate::normals::calculate_normals;
use nalgebra::{Point3, Vector3};

/// Triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Build a mesh from a vertex list and a flat index buffer.
    ///
    /// Indices are checked against the vertex count and smooth normals are
    /// recomputed from the triangles.
    pub fn from_buffers(vertices: &[Point3<f64>], indices: Vec<u32>) -> Result<Self> {
        let mut mesh = Self::with_capacity(vertices.len(), indices.len());
        for v in vertices {
            mesh.add_vertex(*v, Vector3::zeros());
        }
        mesh.indices = indices;
        mesh.validate_indices()?;
        calculate_normals(&mut mesh);
        Ok(mesh)
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add a quad as two triangles.
    ///
    /// Corners must be counter-clockwise as seen from the front side.
    #[inline]
    pub fn add_quad(&mut self, i0: u32, i1: u32, i2: u32, i3: u32) {
        push_quad(&mut self.indices, [i0, i1, i2, i3]);
    }

    /// Position of vertex `index` in f64
    #[inline]
    pub fn position(&self, index: usize) -> Point3<f64> {
        Point3::new(
            self.positions[index * 3] as f64,
            self.positions[index * 3 + 1] as f64,
            self.positions[index * 3 + 2] as f64,
        )
    }

    /// Merge another mesh into this one
    #[inline]
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = self.vertex_count() as u32;

        self.positions.reserve(other.positions.len());
        self.normals.reserve(other.normals.len());
        self.indices.reserve(other.indices.len());

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    /// Batch merge multiple meshes at once (more efficient than individual merges)
    #[inline]
    pub fn merge_all(&mut self, meshes: &[Mesh]) {
        let total_positions: usize = meshes.iter().map(|m| m.positions.len()).sum();
        let total_indices: usize = meshes.iter().map(|m| m.indices.len()).sum();

        self.positions.reserve(total_positions);
        self.normals.reserve(total_positions);
        self.indices.reserve(total_indices);

        for mesh in meshes {
            self.merge(mesh);
        }
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Fail if any index points past the vertex buffer
    pub fn validate_indices(&self) -> Result<()> {
        let vertex_count = self.vertex_count();
        match self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            Some(&index) => Err(Error::IndexOutOfRange {
                index,
                vertex_count,
            }),
            None => Ok(()),
        }
    }

    /// Calculate bounds (min, max)
    #[inline]
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            min.x = min.x.min(chunk[0]);
            min.y = min.y.min(chunk[1]);
            min.z = min.z.min(chunk[2]);
            max.x = max.x.max(chunk[0]);
            max.y = max.y.max(chunk[1]);
            max.z = max.z.max(chunk[2]);
        });

        (min, max)
    }

    /// Average of all vertex positions in f64
    pub fn centroid(&self) -> Point3<f64> {
        if self.is_empty() {
            return Point3::origin();
        }

        let count = self.vertex_count() as f64;
        let sum = self
            .positions
            .chunks_exact(3)
            .fold(Vector3::zeros(), |acc: Vector3<f64>, c| {
                acc + Vector3::new(c[0] as f64, c[1] as f64, c[2] as f64)
            });

        Point3::from(sum / count)
    }

    /// Planar UVs (`u = x`, `v = y`), two floats per vertex
    pub fn planar_uvs(&self) -> Vec<f32> {
        self.positions
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1]])
            .collect()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Append the two triangles of quad `[a, b, c, d]` to an index buffer.
///
/// The corners go counter-clockwise around the visible side, so the
/// triangles are `(a, b, c)` and `(a, c, d)`.
#[inline]
pub fn push_quad(indices: &mut Vec<u32>, [a, b, c, d]: [u32; 4]) {
    indices.extend_from_slice(&[a, b, c, a, c, d]);
}
