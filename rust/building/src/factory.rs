// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building spawner
//!
//! Picks ground quads and floor counts for a [`DensityMode`] and drives
//! construction. All randomness comes from one seeded `ChaCha8Rng`, so a
//! seed always reproduces the same buildings. Buildings are constructed in
//! parallel; submitting them to the scene stays on the caller's thread.

use crate::building::Building;
use crate::config::{DensityMode, LayoutConfig};
use crate::error::Result;
use crate::scene::SceneBackend;
use buildgen_geometry::Point3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Seed used when none is given
pub const DEFAULT_SEED: u64 = 42;

/// Buildings per side of the `Many` grid
pub const GRID_SIZE: usize = 25;
const GRID_STEP_X: f64 = 15.0;
const GRID_STEP_Z: f64 = 9.0;

/// Footprint width, depth and corner jitter range per mode
fn footprint(mode: DensityMode) -> (f64, f64, f64, f64) {
    match mode {
        DensityMode::Many => (9.0, 3.5, 0.5, 1.5),
        DensityMode::Big => (20.0, 8.0, 0.5, 1.5),
        DensityMode::Small => (9.0, 3.5, 0.25, 0.75),
    }
}

/// Ground quad and layout of one building to construct
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingPlan {
    /// Clockwise seen from above
    pub ground: [Point3<f64>; 4],
    pub layout: LayoutConfig,
}

/// Seeded building spawner.
#[derive(Debug, Clone)]
pub struct BuildingFactory {
    seed: u64,
    rng: ChaCha8Rng,
}

impl Default for BuildingFactory {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl BuildingFactory {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw the plans for one spawn of `mode`.
    pub fn plans(&mut self, mode: DensityMode) -> Vec<BuildingPlan> {
        let origins: Vec<(f64, f64)> = match mode {
            DensityMode::Many => (0..GRID_SIZE)
                .flat_map(|i| {
                    (0..GRID_SIZE).map(move |j| (i as f64 * GRID_STEP_X, j as f64 * GRID_STEP_Z))
                })
                .collect(),
            DensityMode::Big | DensityMode::Small => vec![(0.0, 0.0)],
        };

        origins
            .into_iter()
            .map(|(x, z)| self.plan_at(mode, x, z))
            .collect()
    }

    fn plan_at(&mut self, mode: DensityMode, x: f64, z: f64) -> BuildingPlan {
        let (width, depth, lo, hi) = footprint(mode);
        let mut jitter = || self.rng.gen_range(lo..hi);

        let ground = [
            Point3::new(x - jitter(), 0.0, z - jitter()),
            Point3::new(x + width + jitter(), 0.0, z - jitter()),
            Point3::new(x + width + jitter(), 0.0, z + depth + jitter()),
            Point3::new(x - jitter(), 0.0, z + depth + jitter()),
        ];

        let (min_floors, max_floors) = mode.floor_range();
        let floors = self.rng.gen_range(min_floors..=max_floors);

        BuildingPlan {
            ground,
            layout: mode.layout(floors),
        }
    }

    /// Construct the buildings of one spawn without rendering them.
    pub fn create(&mut self, mode: DensityMode) -> Result<Vec<Building>> {
        let plans = self.plans(mode);
        let buildings = plans
            .into_par_iter()
            .map(|plan| Building::build(plan.ground, plan.layout))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(%mode, seed = self.seed, buildings = buildings.len(), "created buildings");
        Ok(buildings)
    }

    /// Construct, optionally batch, and render the buildings of one spawn.
    ///
    /// When any building fails to render, everything this call already
    /// submitted is removed and the error is returned.
    pub fn spawn<S: SceneBackend + ?Sized>(
        &mut self,
        mode: DensityMode,
        scene: &mut S,
        batch: bool,
    ) -> Result<Vec<Building>> {
        let mut buildings = self.create(mode)?;

        let published = buildings.iter_mut().try_for_each(|building| {
            if batch {
                building.combine_frames(scene)?;
                building.combine_bodies(scene)?;
            }
            building.render(scene).map(|_| ())
        });

        if let Err(err) = published {
            tracing::warn!(%mode, error = %err, "spawn failed, removing rendered buildings");
            destroy_all(&mut buildings, scene);
            return Err(err);
        }
        Ok(buildings)
    }
}

/// Destroy every building and empty the collection.
///
/// Returns the number of scene nodes removed.
pub fn destroy_all<S: SceneBackend + ?Sized>(buildings: &mut Vec<Building>, scene: &mut S) -> usize {
    let count = buildings.len();
    let removed: usize = buildings
        .drain(..)
        .map(|building| building.destroy(scene))
        .sum();
    tracing::info!(buildings = count, nodes = removed, "destroyed buildings");
    removed
}
