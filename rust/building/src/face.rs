// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Façade layout
//!
//! A face splits its ground edge into evenly spaced columns, keeping a
//! margin at both ends and a gap between neighbours, and stacks one
//! component per column on every floor.
//!
//! Its vertices form `2 * floors + 2` rows of `vertices_per_row` points,
//! each row listing `[c0.start, c0.end, c1.start, c1.end, ...]` along the
//! edge:
//!
//! ```text
//! row 2F+1   roof         ───────────────
//! row 2j+2   floor j top      ┌──┐  ┌──┐
//! row 2j+1   floor j bottom   └──┘  └──┘
//! row 0      ground       ───────────────
//! ```
//!
//! The building stitches these rows to its corner vertices.

use crate::component::{ComponentKind, ComponentPosition, FaceComponent, Fenestration};
use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use buildgen_geometry::{lerp, planar_distance, Point3};
use smallvec::SmallVec;

/// Start and end distance of one column along the edge
type ColumnSpan = (f64, f64);

#[derive(Debug, Clone)]
pub struct Face {
    index: usize,
    edge_start: Point3<f64>,
    edge_end: Point3<f64>,
    width: f64,
    floor_count: usize,
    height: f64,
    components_per_floor: usize,
    vertices_per_row: usize,
    index_modifier: usize,
    columns: SmallVec<[ColumnSpan; 8]>,
    /// Floor-major: all columns of floor 0, then floor 1, ...
    components: Vec<FaceComponent>,
}

impl Face {
    /// Lay out face `index` along the ground edge `edge_start → edge_end`.
    ///
    /// `door_column` turns that column of the ground floor into a door when
    /// the layout has one. The layout is validated first.
    pub fn new(
        index: usize,
        edge_start: Point3<f64>,
        edge_end: Point3<f64>,
        layout: &LayoutConfig,
        door_column: Option<usize>,
    ) -> Result<Self> {
        layout.validate()?;
        let width = planar_distance(&edge_start, &edge_end);
        let count = layout.components_for(index, width);
        let columns = column_spans(layout, index, width, count)?;

        let mut face = Self {
            index,
            edge_start,
            edge_end,
            width,
            floor_count: layout.floor_count,
            height: layout.height(),
            components_per_floor: count,
            vertices_per_row: 2 * count,
            index_modifier: (2 * layout.floor_count + 1) * 2 * count,
            columns,
            components: Vec::with_capacity(count * layout.floor_count),
        };
        face.place_components(layout, door_column)?;

        tracing::debug!(
            face = index,
            width,
            components_per_floor = count,
            vertices = face.vertex_count(),
            "laid out face"
        );

        Ok(face)
    }

    fn place_components(&mut self, layout: &LayoutConfig, door_column: Option<usize>) -> Result<()> {
        for floor in 0..layout.floor_count {
            for (column, &(s, e)) in self.columns.iter().enumerate() {
                let door = match (&layout.door, door_column) {
                    (Some(spec), Some(c)) if floor == 0 && c == column => Some(*spec),
                    _ => None,
                };
                let spec = door.unwrap_or(layout.window);
                let bottom = self.edge_start.y
                    + floor as f64 * layout.floor_height
                    + spec.height_modifier(layout.floor_height);

                let mut start = lerp(&self.edge_start, &self.edge_end, s / self.width);
                let mut end = lerp(&self.edge_start, &self.edge_end, e / self.width);
                start.y = bottom;
                end.y = bottom;

                let blind = layout.is_blind_column(column);
                let component = FaceComponent::new(
                    ComponentPosition { floor, column },
                    start,
                    end,
                    spec.height,
                    |w, h| {
                        Ok(match door {
                            Some(spec) => ComponentKind::Door(Fenestration::door(spec, w, h)?),
                            None if blind => ComponentKind::Wall,
                            None => ComponentKind::Window(Fenestration::window(spec, w, h)?),
                        })
                    },
                )?;
                self.components.push(component);
            }
        }
        Ok(())
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn edge_start(&self) -> &Point3<f64> {
        &self.edge_start
    }

    #[inline]
    pub fn edge_end(&self) -> &Point3<f64> {
        &self.edge_end
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn components_per_floor(&self) -> usize {
        self.components_per_floor
    }

    /// Points in one row of this face's vertex block
    #[inline]
    pub fn vertices_per_row(&self) -> usize {
        self.vertices_per_row
    }

    /// Index distance from the ground row to the roof row
    #[inline]
    pub fn index_modifier(&self) -> usize {
        self.index_modifier
    }

    #[inline]
    pub fn floor_count(&self) -> usize {
        self.floor_count
    }

    pub fn components(&self) -> &[FaceComponent] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [FaceComponent] {
        &mut self.components
    }

    pub fn component(&self, floor: usize, column: usize) -> Option<&FaceComponent> {
        if column >= self.components_per_floor {
            return None;
        }
        self.components
            .get(floor * self.components_per_floor + column)
    }

    /// Size of this face's vertex block
    pub fn vertex_count(&self) -> usize {
        self.vertices_per_row * (2 * self.floor_count + 2)
    }

    /// Vertex block of this face, row by row from the ground up.
    pub fn find_vertices(&self) -> Vec<Point3<f64>> {
        let mut vertices = Vec::with_capacity(self.vertex_count());
        if self.components_per_floor == 0 {
            return vertices;
        }

        let level_row = |y: f64, vertices: &mut Vec<Point3<f64>>| {
            for component in &self.components[..self.components_per_floor] {
                for mut p in component.bottom() {
                    p.y = y;
                    vertices.push(p);
                }
            }
        };

        level_row(self.edge_start.y, &mut vertices);
        for floor in self.components.chunks_exact(self.components_per_floor) {
            vertices.extend(floor.iter().flat_map(|c| c.bottom()));
            vertices.extend(floor.iter().flat_map(|c| c.top()));
        }
        level_row(self.edge_start.y + self.height, &mut vertices);

        vertices
    }
}

/// Evenly spaced column spans for `count` components on an edge of `width`.
fn column_spans(
    layout: &LayoutConfig,
    face: usize,
    width: f64,
    count: usize,
) -> Result<SmallVec<[ColumnSpan; 8]>> {
    if count == 0 {
        return Ok(SmallVec::new());
    }

    let component_width = layout.component_width(width, count);
    if component_width <= 0.0 {
        tracing::warn!(face, width, count, "edge too short for its components");
        return Err(Error::layout(format!(
            "face {face}: {count} components do not fit an edge of {width:.3} \
             (margin {}, gap {})",
            layout.edge_margin, layout.component_gap
        )));
    }

    Ok((0..count)
        .map(|i| {
            let start = layout.edge_margin + i as f64 * (component_width + layout.component_gap);
            (start, start + component_width)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ComponentsPerFloor, FenestrationSpec};
    use approx::assert_relative_eq;

    fn layout(count: usize) -> LayoutConfig {
        LayoutConfig {
            floor_count: 3,
            floor_height: 3.0,
            components_per_floor: ComponentsPerFloor::Uniform(count),
            edge_margin: 0.5,
            component_gap: 0.6,
            window: FenestrationSpec::new(1.5, 0.1, 0.2),
            door: Some(FenestrationSpec::new(2.4, 0.12, 0.15)),
            blind_columns: Vec::new(),
        }
    }

    fn edge() -> (Point3<f64>, Point3<f64>) {
        (Point3::new(-5.0, 0.0, -3.0), Point3::new(5.0, 0.0, -3.0))
    }

    #[test]
    fn test_strides() {
        let (s, e) = edge();
        let face = Face::new(0, s, e, &layout(2), None).unwrap();
        assert_relative_eq!(face.width(), 10.0);
        assert_eq!(face.vertices_per_row(), 4);
        assert_eq!(face.index_modifier(), 28);
        assert_eq!(face.vertex_count(), 32);
        assert_eq!(face.components().len(), 6);
        assert_eq!(face.find_vertices().len(), 32);
    }

    #[test]
    fn test_empty_face() {
        let (s, e) = edge();
        let face = Face::new(0, s, e, &layout(0), None).unwrap();
        assert_eq!(face.vertex_count(), 0);
        assert!(face.find_vertices().is_empty());
        assert!(face.components().is_empty());
    }

    #[test]
    fn test_columns_keep_margin_and_gap() {
        let (s, e) = edge();
        let face = Face::new(0, s, e, &layout(2), None).unwrap();
        // (10 - 1 - 0.6) / 2
        let c0 = face.component(0, 0).unwrap();
        let c1 = face.component(0, 1).unwrap();
        assert_relative_eq!(c0.width(), 4.2, epsilon = 1e-12);
        assert_relative_eq!(c0.bottom()[0].x, -4.5, epsilon = 1e-12);
        assert_relative_eq!(c1.bottom()[0].x - c0.bottom()[1].x, 0.6, epsilon = 1e-12);
        assert_relative_eq!(c1.bottom()[1].x, 4.5, epsilon = 1e-12);
    }

    #[test]
    fn test_components_are_centered_in_their_floor() {
        let (s, e) = edge();
        let face = Face::new(0, s, e, &layout(1), None).unwrap();
        for floor in 0..3 {
            let c = face.component(floor, 0).unwrap();
            let base = floor as f64 * 3.0;
            assert_relative_eq!(c.bottom()[0].y, base + 0.75, epsilon = 1e-12);
            assert_relative_eq!(c.top()[0].y, base + 2.25, epsilon = 1e-12);
        }
        assert!(face.component(3, 0).is_none());
        assert!(face.component(0, 1).is_none());
    }

    #[test]
    fn test_vertex_rows() {
        let (s, e) = edge();
        let face = Face::new(0, s, e, &layout(1), None).unwrap();
        let v = face.find_vertices();
        let vpr = face.vertices_per_row();

        // Ground and roof rows share the columns of the components
        assert_relative_eq!(v[0], Point3::new(-4.5, 0.0, -3.0), epsilon = 1e-12);
        assert_relative_eq!(v[1], Point3::new(4.5, 0.0, -3.0), epsilon = 1e-12);
        assert_relative_eq!(v[vpr].y, 0.75);
        assert_relative_eq!(v[2 * vpr].y, 2.25);
        assert_relative_eq!(v[7 * vpr].y, 9.0);
        assert_relative_eq!(v[7 * vpr + 1].x, 4.5, epsilon = 1e-12);
    }

    #[test]
    fn test_door_on_ground_floor_only() {
        let (s, e) = edge();
        let face = Face::new(0, s, e, &layout(3), Some(1)).unwrap();
        assert!(matches!(
            face.component(0, 1).unwrap().kind(),
            ComponentKind::Door(_)
        ));
        assert!(matches!(
            face.component(1, 1).unwrap().kind(),
            ComponentKind::Window(_)
        ));
        assert!(matches!(
            face.component(0, 0).unwrap().kind(),
            ComponentKind::Window(_)
        ));
        assert_relative_eq!(face.component(0, 1).unwrap().height(), 2.4);
    }

    #[test]
    fn test_blind_columns_are_walls() {
        let (s, e) = edge();
        let mut layout = layout(3);
        layout.blind_columns = vec![0, 2];
        let face = Face::new(0, s, e, &layout, None).unwrap();
        for floor in 0..3 {
            assert!(!face.component(floor, 0).unwrap().is_open());
            assert!(face.component(floor, 1).unwrap().is_open());
            assert!(!face.component(floor, 2).unwrap().is_open());
        }
    }

    #[test]
    fn test_rejects_invalid_layout() {
        let (s, e) = edge();
        let no_floors = LayoutConfig {
            floor_count: 0,
            ..layout(2)
        };
        assert!(matches!(
            Face::new(0, s, e, &no_floors, None),
            Err(Error::InvalidLayout(_))
        ));

        // Window taller than its floor would invert the bands around it
        let tall_window = LayoutConfig {
            window: FenestrationSpec::new(3.5, 0.1, 0.2),
            ..layout(2)
        };
        assert!(matches!(
            Face::new(0, s, e, &tall_window, None),
            Err(Error::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_rejects_edge_too_short() {
        let (s, _) = edge();
        let e = Point3::new(-4.0, 0.0, -3.0);
        let err = Face::new(1, s, e, &layout(2), None).unwrap_err();
        assert!(matches!(err, Error::InvalidLayout(_)));
    }
}
