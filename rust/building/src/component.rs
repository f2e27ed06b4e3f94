// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Façade cells
//!
//! A [`FaceComponent`] is one floor × column cell of a façade. Plain walls
//! are closed by the building shell itself; windows and doors leave their
//! cell open and carry a frame and a body (glass or panel) sub-mesh.
//!
//! Sub-meshes live in component space: origin at the bottom corner nearest
//! the face's edge start, `x` along the edge, `y` up and `z` pointing into
//! the building. [`FaceComponent::transform`] maps that space into the
//! building's local space.

use crate::config::FenestrationSpec;
use crate::error::{Error, Result};
use crate::scene::{NodeId, DOOR_PANEL_MATERIAL, FRAME_MATERIAL, GLASS_MATERIAL};
use buildgen_geometry::{placement, planar_distance, push_quad, Matrix4, Mesh, Point3, Vector3};

/// Grid coordinate of a component inside its face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentPosition {
    pub floor: usize,
    pub column: usize,
}

/// Separately rendered piece of a component
#[derive(Debug, Clone)]
pub struct SubMesh {
    pub mesh: Mesh,
    /// `"frame"` or `"body"`
    pub role: &'static str,
    pub material: &'static str,
    /// Scene node while rendered
    pub node: Option<NodeId>,
}

impl SubMesh {
    fn new(mesh: Mesh, role: &'static str, material: &'static str) -> Self {
        Self {
            mesh,
            role,
            material,
            node: None,
        }
    }
}

/// Frame and body of a window or door.
///
/// `frame` and `body` become `None` once merged into the building's batch.
#[derive(Debug, Clone)]
pub struct Fenestration {
    pub spec: FenestrationSpec,
    pub frame: Option<SubMesh>,
    pub body: Option<SubMesh>,
}

impl Fenestration {
    /// Window with a four-sided frame and a glass pane.
    pub fn window(spec: FenestrationSpec, width: f64, height: f64) -> Result<Self> {
        Self::build(spec, width, height, true, GLASS_MATERIAL)
    }

    /// Door whose opening reaches the bottom of the frame.
    pub fn door(spec: FenestrationSpec, width: f64, height: f64) -> Result<Self> {
        Self::build(spec, width, height, false, DOOR_PANEL_MATERIAL)
    }

    fn build(
        spec: FenestrationSpec,
        width: f64,
        height: f64,
        sill: bool,
        body_material: &'static str,
    ) -> Result<Self> {
        let t = spec.frame_thickness;
        if width <= 2.0 * t || height <= 2.0 * t {
            return Err(Error::layout(format!(
                "{width:.3} x {height:.3} opening is too small for a {t:.3} frame"
            )));
        }

        let inner = inner_rect(width, height, t, sill);
        let frame = frame_mesh(width, height, &inner, spec.depth, sill)?;
        let body = body_mesh(&inner, spec.depth)?;

        Ok(Self {
            spec,
            frame: Some(SubMesh::new(frame, "frame", FRAME_MATERIAL)),
            body: Some(SubMesh::new(body, "body", body_material)),
        })
    }

    /// Frame and body that are still held individually
    pub fn sub_meshes(&self) -> impl Iterator<Item = &SubMesh> {
        self.frame.iter().chain(self.body.iter())
    }

    pub fn sub_meshes_mut(&mut self) -> impl Iterator<Item = &mut SubMesh> {
        self.frame.iter_mut().chain(self.body.iter_mut())
    }
}

/// Corners of the opening inside the frame, counter-clockwise from bottom-left
fn inner_rect(width: f64, height: f64, t: f64, sill: bool) -> [(f64, f64); 4] {
    let bottom = if sill { t } else { 0.0 };
    [
        (t, bottom),
        (width - t, bottom),
        (width - t, height - t),
        (t, height - t),
    ]
}

/// Flush border ring around the opening plus the reveals leading back to
/// the recessed body. Vertices: 4 outer, 4 inner, 4 recessed.
fn frame_mesh(
    width: f64,
    height: f64,
    inner: &[(f64, f64); 4],
    depth: f64,
    sill: bool,
) -> Result<Mesh> {
    let outer = [(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)];

    let mut points = Vec::with_capacity(12);
    points.extend(outer.iter().map(|&(x, y)| Point3::new(x, y, 0.0)));
    points.extend(inner.iter().map(|&(x, y)| Point3::new(x, y, 0.0)));
    points.extend(inner.iter().map(|&(x, y)| Point3::new(x, y, depth)));

    let mut indices = Vec::with_capacity(48);
    for k in 0..4u32 {
        // Without a sill the bottom bar and the bottom reveal collapse
        if !sill && k == 0 {
            continue;
        }
        let k1 = (k + 1) % 4;
        let (o, i, r) = (0, 4, 8);
        push_quad(&mut indices, [o + k, i + k, i + k1, o + k1]);
        push_quad(&mut indices, [i + k, r + k, r + k1, i + k1]);
    }

    Ok(Mesh::from_buffers(&points, indices)?)
}

/// Glass or panel quad at the back of the reveals, facing out of the building
fn body_mesh(inner: &[(f64, f64); 4], depth: f64) -> Result<Mesh> {
    let points: Vec<Point3<f64>> = [0, 3, 2, 1]
        .iter()
        .map(|&k| Point3::new(inner[k].0, inner[k].1, depth))
        .collect();
    let mut indices = Vec::with_capacity(6);
    push_quad(&mut indices, [0, 1, 2, 3]);
    Ok(Mesh::from_buffers(&points, indices)?)
}

#[derive(Debug, Clone)]
pub enum ComponentKind {
    Wall,
    Window(Fenestration),
    Door(Fenestration),
}

impl ComponentKind {
    pub fn fenestration(&self) -> Option<&Fenestration> {
        match self {
            ComponentKind::Wall => None,
            ComponentKind::Window(f) | ComponentKind::Door(f) => Some(f),
        }
    }

    pub fn fenestration_mut(&mut self) -> Option<&mut Fenestration> {
        match self {
            ComponentKind::Wall => None,
            ComponentKind::Window(f) | ComponentKind::Door(f) => Some(f),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Wall => "wall",
            ComponentKind::Window(_) => "window",
            ComponentKind::Door(_) => "door",
        }
    }
}

/// One cell of a façade.
#[derive(Debug, Clone)]
pub struct FaceComponent {
    position: ComponentPosition,
    /// Start-bottom, end-bottom, end-top, start-top in building space
    corners: [Point3<f64>; 4],
    transform: Matrix4<f64>,
    kind: ComponentKind,
}

impl FaceComponent {
    /// Create a component from its bottom corners and height.
    ///
    /// `bottom_start` lies nearer the face's edge start. `build_kind` gets
    /// the cell width and height and decides what fills the cell.
    pub fn new<F>(
        position: ComponentPosition,
        bottom_start: Point3<f64>,
        bottom_end: Point3<f64>,
        height: f64,
        build_kind: F,
    ) -> Result<Self>
    where
        F: FnOnce(f64, f64) -> Result<ComponentKind>,
    {
        let up = Vector3::new(0.0, height, 0.0);
        let corners = [bottom_start, bottom_end, bottom_end + up, bottom_start + up];
        let transform = placement(&bottom_start, &(bottom_end - bottom_start), &Vector3::y())?;
        let kind = build_kind(planar_distance(&bottom_start, &bottom_end), height)?;

        Ok(Self {
            position,
            corners,
            transform,
            kind,
        })
    }

    #[inline]
    pub fn position(&self) -> ComponentPosition {
        self.position
    }

    #[inline]
    pub fn corners(&self) -> &[Point3<f64>; 4] {
        &self.corners
    }

    /// Start and end of the bottom edge
    #[inline]
    pub fn bottom(&self) -> [Point3<f64>; 2] {
        [self.corners[0], self.corners[1]]
    }

    /// Start and end of the top edge
    #[inline]
    pub fn top(&self) -> [Point3<f64>; 2] {
        [self.corners[3], self.corners[2]]
    }

    pub fn width(&self) -> f64 {
        planar_distance(&self.corners[0], &self.corners[1])
    }

    pub fn height(&self) -> f64 {
        self.corners[3].y - self.corners[0].y
    }

    /// Component-to-building transform of the sub-meshes
    #[inline]
    pub fn transform(&self) -> &Matrix4<f64> {
        &self.transform
    }

    #[inline]
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    #[inline]
    pub fn kind_mut(&mut self) -> &mut ComponentKind {
        &mut self.kind
    }

    /// `true` for windows and doors, whose cell the shell leaves open
    pub fn is_open(&self) -> bool {
        !matches!(self.kind, ComponentKind::Wall)
    }
}
