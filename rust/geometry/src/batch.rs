// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh batching
//!
//! Collects many small meshes, each with its own local-to-parent transform,
//! bakes them into the parent space and concatenates them into one mesh so
//! the whole batch can be submitted with a single draw call.

use crate::mesh::Mesh;
use crate::transform::baked;
use nalgebra::Matrix4;
use rayon::prelude::*;

/// Below this many parts baking runs sequentially
const PARALLEL_THRESHOLD: usize = 64;

/// One source mesh waiting to be combined
#[derive(Debug, Clone)]
pub struct BatchPart {
    pub mesh: Mesh,
    /// Local-to-parent transform of the source mesh
    pub transform: Matrix4<f64>,
}

/// Accumulates meshes and combines them into one
#[derive(Debug, Clone, Default)]
pub struct MeshBatcher {
    parts: Vec<BatchPart>,
}

impl MeshBatcher {
    /// Create an empty batcher
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Queue a mesh with its local-to-parent transform
    pub fn push(&mut self, mesh: Mesh, transform: Matrix4<f64>) {
        self.parts.push(BatchPart { mesh, transform });
    }

    /// Number of queued meshes
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Total vertex count of all queued meshes
    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(|p| p.mesh.vertex_count()).sum()
    }

    /// Bake every part into parent space and concatenate them.
    ///
    /// Triangle indices of each part are shifted by the number of vertices
    /// that precede it. An empty batcher yields an empty mesh.
    pub fn combine(self) -> Mesh {
        let part_count = self.parts.len();

        let baked_parts: Vec<Mesh> = if part_count >= PARALLEL_THRESHOLD {
            self.parts
                .par_iter()
                .map(|p| baked(&p.mesh, &p.transform))
                .collect()
        } else {
            self.parts
                .iter()
                .map(|p| baked(&p.mesh, &p.transform))
                .collect()
        };

        let mut combined = Mesh::new();
        combined.merge_all(&baked_parts);

        tracing::debug!(
            parts = part_count,
            vertices = combined.vertex_count(),
            triangles = combined.triangle_count(),
            "combined mesh batch"
        );

        combined
    }
}

impl FromIterator<(Mesh, Matrix4<f64>)> for MeshBatcher {
    fn from_iter<I: IntoIterator<Item = (Mesh, Matrix4<f64>)>>(iter: I) -> Self {
        Self {
            parts: iter
                .into_iter()
                .map(|(mesh, transform)| BatchPart { mesh, transform })
                .collect(),
        }
    }
}
