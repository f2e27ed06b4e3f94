// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for building construction and rendering.

/// Result type alias for building operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing, rendering or batching a building.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Geometry failure, most notably a degenerate ground quadrilateral.
    #[error("geometry error: {0}")]
    Geometry(#[from] buildgen_geometry::Error),

    /// Vertex computation was requested before the roof boundaries and
    /// the four faces exist.
    #[error("building has {found} boundaries and {faces} faces, expected 8 (ground + roof) and 4")]
    IncompleteBoundaries { found: usize, faces: usize },

    /// Layout parameters cannot produce valid geometry.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// The scene has no material with this name.
    #[error("material not found: {0}")]
    MissingMaterial(String),

    /// A scene node id no longer refers to a live node.
    #[error("scene node not found")]
    NodeNotFound,

    /// A node was attached below itself or one of its descendants.
    #[error("attaching a scene node below itself would create a cycle")]
    SceneCycle,

    /// Frames or bodies were already merged into their batch.
    #[error("{0} have already been combined")]
    AlreadyCombined(&'static str),
}

impl Error {
    /// `true` when the ground quadrilateral's diagonals are parallel.
    pub fn is_degenerate_quad(&self) -> bool {
        matches!(
            self,
            Error::Geometry(buildgen_geometry::Error::DegenerateQuad(_))
        )
    }

    pub(crate) fn layout(msg: impl Into<String>) -> Self {
        Error::InvalidLayout(msg.into())
    }
}
