// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout configuration
//!
//! A building is one type parametrized by a [`LayoutConfig`]: floor count
//! and height, how many components each façade gets per floor, spacing
//! along the edges and the size of windows and doors. [`DensityMode`]
//! provides the presets used by the factory.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Size of a window or door opening and its frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FenestrationSpec {
    /// Opening height, centered in the floor band
    pub height: f64,
    /// Width of the frame border
    pub frame_thickness: f64,
    /// How far the glass or panel sits behind the façade
    pub depth: f64,
}

impl FenestrationSpec {
    pub const fn new(height: f64, frame_thickness: f64, depth: f64) -> Self {
        Self {
            height,
            frame_thickness,
            depth,
        }
    }

    /// Vertical offset from the floor base that centers the opening
    #[inline]
    pub fn height_modifier(&self, floor_height: f64) -> f64 {
        floor_height / 2.0 - self.height / 2.0
    }

    fn validate(&self, what: &str, floor_height: f64) -> Result<()> {
        if !(self.height > 0.0 && self.height < floor_height) {
            return Err(Error::layout(format!(
                "{what} height {} must be in (0, floor height {floor_height})",
                self.height
            )));
        }
        if !(self.frame_thickness > 0.0 && 2.0 * self.frame_thickness < self.height) {
            return Err(Error::layout(format!(
                "{what} frame thickness {} does not fit height {}",
                self.frame_thickness, self.height
            )));
        }
        if !(self.depth > 0.0) {
            return Err(Error::layout(format!("{what} depth must be positive")));
        }
        Ok(())
    }
}

/// How many components a façade gets on each floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentsPerFloor {
    /// Same count on every façade
    Uniform(usize),
    /// Explicit count per façade, in face order
    PerFace([usize; 4]),
    /// As many bays of at least `bay_width` as fit the edge
    ByWidth { bay_width: f64 },
}

/// Full set of parameters that shape a building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub floor_count: usize,
    pub floor_height: f64,
    pub components_per_floor: ComponentsPerFloor,
    /// Wall kept free at both ends of every edge
    pub edge_margin: f64,
    /// Wall between two neighbouring components
    pub component_gap: f64,
    pub window: FenestrationSpec,
    /// When set, the middle ground-floor component of the widest façade is a door
    pub door: Option<FenestrationSpec>,
    /// Columns that stay plain wall on every floor of every façade
    pub blind_columns: Vec<usize>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            floor_count: 3,
            floor_height: 3.0,
            components_per_floor: ComponentsPerFloor::ByWidth { bay_width: 2.4 },
            edge_margin: 0.5,
            component_gap: 0.6,
            window: FenestrationSpec::new(1.5, 0.1, 0.2),
            door: None,
            blind_columns: Vec::new(),
        }
    }
}

impl LayoutConfig {
    /// Total building height
    #[inline]
    pub fn height(&self) -> f64 {
        self.floor_count as f64 * self.floor_height
    }

    /// Check every parameter that does not depend on the ground quad.
    pub fn validate(&self) -> Result<()> {
        if self.floor_count == 0 {
            return Err(Error::layout("floor count must be at least 1"));
        }
        if !(self.floor_height > 0.0 && self.floor_height.is_finite()) {
            return Err(Error::layout(format!(
                "floor height {} must be positive",
                self.floor_height
            )));
        }
        if !(self.edge_margin > 0.0) || !(self.component_gap > 0.0) {
            return Err(Error::layout("edge margin and component gap must be positive"));
        }
        if let ComponentsPerFloor::ByWidth { bay_width } = self.components_per_floor {
            if !(bay_width > 0.0) {
                return Err(Error::layout("bay width must be positive"));
            }
        }
        self.window.validate("window", self.floor_height)?;
        if let Some(door) = &self.door {
            door.validate("door", self.floor_height)?;
        }
        Ok(())
    }

    /// Component count for face `face_index` whose edge is `width` long.
    pub fn components_for(&self, face_index: usize, width: f64) -> usize {
        match &self.components_per_floor {
            ComponentsPerFloor::Uniform(n) => *n,
            ComponentsPerFloor::PerFace(counts) => counts[face_index % 4],
            ComponentsPerFloor::ByWidth { bay_width } => {
                let usable = width - 2.0 * self.edge_margin + self.component_gap;
                if usable <= 0.0 {
                    0
                } else {
                    (usable / (bay_width + self.component_gap)).floor() as usize
                }
            }
        }
    }

    /// Width of each component on an edge of `width` holding `count` of them.
    ///
    /// Non-positive when the edge is too short for its margins and gaps.
    pub fn component_width(&self, width: f64, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        let gaps = (count - 1) as f64 * self.component_gap;
        (width - 2.0 * self.edge_margin - gaps) / count as f64
    }

    #[inline]
    pub fn is_blind_column(&self, column: usize) -> bool {
        self.blind_columns.contains(&column)
    }
}

/// Building density presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityMode {
    /// A 25 x 25 grid of small buildings
    Many,
    /// One large building with many components per floor
    Big,
    /// One compact building with few components per floor
    Small,
}

impl DensityMode {
    pub const ALL: [DensityMode; 3] = [DensityMode::Many, DensityMode::Big, DensityMode::Small];

    /// Layout preset for this mode with the given floor count.
    pub fn layout(&self, floor_count: usize) -> LayoutConfig {
        let door = Some(FenestrationSpec::new(2.4, 0.12, 0.15));
        match self {
            DensityMode::Many => LayoutConfig {
                floor_count,
                components_per_floor: ComponentsPerFloor::ByWidth { bay_width: 2.2 },
                door,
                ..LayoutConfig::default()
            },
            DensityMode::Big => LayoutConfig {
                floor_count,
                components_per_floor: ComponentsPerFloor::ByWidth { bay_width: 1.6 },
                edge_margin: 0.8,
                component_gap: 0.9,
                window: FenestrationSpec::new(1.8, 0.12, 0.25),
                door,
                ..LayoutConfig::default()
            },
            DensityMode::Small => LayoutConfig {
                floor_count,
                components_per_floor: ComponentsPerFloor::ByWidth { bay_width: 2.8 },
                door,
                ..LayoutConfig::default()
            },
        }
    }

    /// Inclusive floor count range the factory draws from
    pub fn floor_range(&self) -> (usize, usize) {
        match self {
            DensityMode::Many => (2, 5),
            DensityMode::Big => (5, 8),
            DensityMode::Small => (2, 4),
        }
    }
}

impl fmt::Display for DensityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DensityMode::Many => "many",
            DensityMode::Big => "big",
            DensityMode::Small => "small",
        };
        f.write_str(name)
    }
}

impl FromStr for DensityMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "many" | "1" => Ok(DensityMode::Many),
            "big" | "2" => Ok(DensityMode::Big),
            "small" | "3" => Ok(DensityMode::Small),
            other => Err(Error::layout(format!("unknown density mode '{other}'"))),
        }
    }
}
