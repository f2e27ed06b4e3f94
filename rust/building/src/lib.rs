// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Buildgen Building
//!
//! Procedural building shells. A ground quadrilateral and a
//! [`LayoutConfig`] become four façades subdivided into floors and
//! columns of wall, window and door cells, stitched into one outward
//! facing vertex and index buffer. Window and door frames and bodies are
//! separate meshes that can be merged into one batch each.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use buildgen_building::{Building, DensityMode, SceneGraph};
//! use buildgen_geometry::Point3;
//!
//! # fn main() -> buildgen_building::Result<()> {
//! let ground = [
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(10.0, 0.0, 0.0),
//!     Point3::new(10.0, 0.0, 6.0),
//!     Point3::new(0.0, 0.0, 6.0),
//! ];
//! let mut building = Building::build(ground, DensityMode::Small.layout(3))?;
//!
//! let mut scene = SceneGraph::default();
//! building.combine_frames(&mut scene)?;
//! building.render(&mut scene)?;
//! # Ok(())
//! # }
//! ```

pub mod building;
pub mod component;
pub mod config;
pub mod error;
pub mod face;
pub mod factory;
pub mod scene;

pub use building::{Building, BuildingSummary, FaceSummary, FRAME_COMBINER, GLASS_COMBINER};
pub use component::{ComponentKind, ComponentPosition, FaceComponent, Fenestration, SubMesh};
pub use config::{ComponentsPerFloor, DensityMode, FenestrationSpec, LayoutConfig};
pub use error::{Error, Result};
pub use face::Face;
pub use factory::{destroy_all, BuildingFactory, BuildingPlan, DEFAULT_SEED, GRID_SIZE};
pub use scene::{
    Material, MaterialLibrary, NodeId, Renderable, SceneBackend, SceneGraph, SceneNode,
    BUILDING_MATERIAL, DOOR_PANEL_MATERIAL, FRAME_MATERIAL, GLASS_MATERIAL,
};
