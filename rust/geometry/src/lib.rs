// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Buildgen Geometry
//!
//! Geometry primitives, triangle meshes, normals, placements and mesh
//! batching used by the procedural building generator. Math is done with
//! nalgebra in f64; mesh buffers are f32 ready for upload.

pub mod batch;
pub mod error;
pub mod mesh;
pub mod normals;
pub mod primitives;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};

pub use batch::{BatchPart, MeshBatcher};
pub use error::{Error, Result};
pub use mesh::{push_quad, Mesh};
pub use normals::{calculate_normals, face_normal, triangle_normals};
pub use primitives::{diagonal_intersection, lerp, planar_distance, signed_area_xz, Plane};
pub use transform::{apply_transform, baked, placement};
