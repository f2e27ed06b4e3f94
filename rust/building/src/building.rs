// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building shell
//!
//! A [`Building`] owns eight boundary points (four ground corners, four
//! roof corners) stored relative to its mesh origin, and one [`Face`] per
//! ground edge. Its shell is a single vertex buffer:
//!
//! - `0..4` ground corners, `4..8` roof corners
//! - then the vertex block of face 0, 1, 2 and 3
//!
//! and a single index buffer stitching the roof, the corner strips, the
//! strips between columns, the bands between floors and the plain wall
//! cells together. Window and door cells stay open; their frames and
//! bodies are separate sub-meshes, optionally merged into one batch each.

use crate::component::{ComponentKind, FaceComponent, SubMesh};
use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::face::Face;
use crate::scene::{
    Material, NodeId, SceneBackend, BUILDING_MATERIAL, FRAME_MATERIAL, GLASS_MATERIAL,
};
use buildgen_geometry::{
    diagonal_intersection, planar_distance, push_quad, signed_area_xz, Matrix4, Mesh, MeshBatcher,
    Point3, Vector3,
};
use serde::Serialize;
use std::sync::Arc;

/// Ground corners
const GROUND_POINTS: usize = 4;
/// Ground plus roof corners
const BOUNDARY_POINTS: usize = 8;

/// Scene node holding the merged frames
pub const FRAME_COMBINER: &str = "window_frame_combiner";
/// Scene node holding the merged window glass
pub const GLASS_COMBINER: &str = "window_glass_combiner";

/// Which sub-meshes a batch collects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchKind {
    /// Window and door frames
    Frames,
    /// Window glass; door panels keep their own material and node
    Bodies,
}

impl BatchKind {
    fn label(self) -> &'static str {
        match self {
            BatchKind::Frames => "frames",
            BatchKind::Bodies => "bodies",
        }
    }

    fn node_name(self) -> &'static str {
        match self {
            BatchKind::Frames => FRAME_COMBINER,
            BatchKind::Bodies => GLASS_COMBINER,
        }
    }

    fn material(self) -> &'static str {
        match self {
            BatchKind::Frames => FRAME_MATERIAL,
            BatchKind::Bodies => GLASS_MATERIAL,
        }
    }

    fn slot(self, kind: &mut ComponentKind) -> Option<&mut Option<SubMesh>> {
        match (self, kind) {
            (BatchKind::Frames, ComponentKind::Window(f) | ComponentKind::Door(f)) => {
                Some(&mut f.frame)
            }
            (BatchKind::Bodies, ComponentKind::Window(f)) => Some(&mut f.body),
            _ => None,
        }
    }
}

/// Merged sub-meshes in building space
#[derive(Debug, Clone)]
struct Batch {
    mesh: Mesh,
    node: Option<NodeId>,
}

/// Procedural building.
#[derive(Debug)]
pub struct Building {
    /// Relative to `mesh_origin`; 4 ground points, then 4 roof points once laid out
    boundaries: Vec<Point3<f64>>,
    mesh_origin: Point3<f64>,
    layout: LayoutConfig,
    height: f64,
    faces: Vec<Face>,
    node: Option<NodeId>,
    frames: Option<Batch>,
    bodies: Option<Batch>,
}

impl Building {
    /// Building from four ground points without faces or roof yet.
    ///
    /// Points are expected clockwise seen from above; a counter-clockwise
    /// quad is reordered. Fails with a degenerate-quad error when the
    /// diagonals are parallel. Only [`Building::build`] hands one out.
    pub(crate) fn new(ground: [Point3<f64>; 4]) -> Result<Self> {
        let mesh_origin = Self::find_mesh_origin(&ground)?;

        let [p0, p1, p2, p3] = ground;
        let ground = if signed_area_xz(&ground) < 0.0 {
            tracing::warn!("ground quad is counter-clockwise, reversing it");
            [p0, p3, p2, p1]
        } else {
            ground
        };

        let boundaries = ground.iter().map(|p| p - mesh_origin.coords).collect();

        Ok(Self {
            boundaries,
            mesh_origin,
            layout: LayoutConfig::default(),
            height: 0.0,
            faces: Vec::new(),
            node: None,
            frames: None,
            bodies: None,
        })
    }

    /// Create a building and lay out its floors and façades.
    ///
    /// Everything is validated before the building is returned.
    pub fn build(ground: [Point3<f64>; 4], layout: LayoutConfig) -> Result<Self> {
        layout.validate()?;
        let mut building = Self::new(ground)?;
        building.apply_layout(layout)?;

        tracing::info!(
            floors = building.floor_count(),
            height = building.height,
            windows = building.window_count(),
            doors = building.door_count(),
            "built building"
        );
        Ok(building)
    }

    /// Intersection of the ground quad's diagonals, on the ground plane.
    pub fn find_mesh_origin(ground: &[Point3<f64>; 4]) -> Result<Point3<f64>> {
        let [p0, p1, p2, p3] = ground;
        Ok(diagonal_intersection(p0, p1, p2, p3)?)
    }

    /// Replace the layout, rebuilding faces, height and roof.
    ///
    /// Nothing changes when the new layout is rejected. Batches are
    /// dropped; a rendered building must be rendered again.
    pub fn apply_layout(&mut self, layout: LayoutConfig) -> Result<()> {
        layout.validate()?;
        let faces = self.layout_faces(&layout)?;

        self.layout = layout;
        self.faces = faces;
        self.frames = None;
        self.bodies = None;
        self.recompute_derived();
        Ok(())
    }

    pub fn set_floor_count(&mut self, floor_count: usize) -> Result<()> {
        self.apply_layout(LayoutConfig {
            floor_count,
            ..self.layout.clone()
        })
    }

    pub fn set_floor_height(&mut self, floor_height: f64) -> Result<()> {
        self.apply_layout(LayoutConfig {
            floor_height,
            ..self.layout.clone()
        })
    }

    /// Refresh the height and roof from the current floor parameters.
    pub(crate) fn recompute_derived(&mut self) {
        self.height = self.layout.height();
        self.calculate_roof_boundaries();
    }

    /// Regenerate the roof corners as the ground corners raised by the height.
    ///
    /// Any previous roof is dropped first. Without a positive height only
    /// the ground corners remain.
    pub(crate) fn calculate_roof_boundaries(&mut self) {
        self.boundaries.truncate(GROUND_POINTS);
        if self.height > 0.0 {
            let up = Vector3::new(0.0, self.height, 0.0);
            let roof: Vec<_> = self.boundaries.iter().map(|p| p + up).collect();
            self.boundaries.extend(roof);
        }
    }

    fn layout_faces(&self, layout: &LayoutConfig) -> Result<Vec<Face>> {
        let ground = &self.boundaries[..GROUND_POINTS];
        let door_face = layout
            .door
            .and_then(|_| faces_by_width(ground, true).first().copied());

        (0..GROUND_POINTS)
            .map(|i| {
                let start = ground[i];
                let end = ground[(i + 1) % GROUND_POINTS];
                let door_column = if door_face == Some(i) {
                    let count = layout.components_for(i, planar_distance(&start, &end));
                    (count > 0).then_some(count / 2)
                } else {
                    None
                };
                Face::new(i, start, end, layout, door_column)
            })
            .collect()
    }

    fn check_boundaries(&self) -> Result<()> {
        if self.boundaries.len() != BOUNDARY_POINTS || self.faces.len() != GROUND_POINTS {
            return Err(Error::IncompleteBoundaries {
                found: self.boundaries.len(),
                faces: self.faces.len(),
            });
        }
        Ok(())
    }

    /// Vertex buffer of the shell in building space.
    pub fn find_vertices(&self) -> Result<Vec<Point3<f64>>> {
        self.check_boundaries()?;

        let face_vertices: usize = self.faces.iter().map(Face::vertex_count).sum();
        let mut vertices = Vec::with_capacity(BOUNDARY_POINTS + face_vertices);
        vertices.extend_from_slice(&self.boundaries);
        for face in &self.faces {
            vertices.extend(face.find_vertices());
        }
        Ok(vertices)
    }

    /// Index buffer of the shell, outward facing, matching [`find_vertices`].
    ///
    /// [`find_vertices`]: Building::find_vertices
    pub fn find_triangles(&self) -> Result<Vec<u32>> {
        self.check_boundaries()?;

        let mut indices = Vec::new();
        push_quad(&mut indices, [4, 7, 6, 5]);

        let mut offset = BOUNDARY_POINTS as u32;
        for face in &self.faces {
            let before = indices.len();
            stitch_face(face, offset, &mut indices);
            offset += face.vertex_count() as u32;

            tracing::debug!(
                face = face.index(),
                triangles = (indices.len() - before) / 3,
                "stitched face"
            );
        }

        Ok(indices)
    }

    /// Shell mesh with smooth normals.
    pub fn to_mesh(&self) -> Result<Mesh> {
        let vertices = self.find_vertices()?;
        let indices = self.find_triangles()?;
        Ok(Mesh::from_buffers(&vertices, indices)?)
    }

    /// Face indices ordered by façade width.
    pub fn sorted_faces(&self, descending: bool) -> Vec<usize> {
        faces_by_width(&self.boundaries[..GROUND_POINTS], descending)
    }

    /// Submit the shell and every remaining sub-mesh to `scene`.
    ///
    /// Any tree from an earlier call is destroyed first. On failure the
    /// partially built tree is removed again and the building is left
    /// unrendered.
    pub fn render<S: SceneBackend + ?Sized>(&mut self, scene: &mut S) -> Result<NodeId> {
        let mesh = self.to_mesh()?;
        let shell = scene.load_material(BUILDING_MATERIAL)?;

        if let Some(old) = self.node.take() {
            scene.destroy_node(old);
        }
        self.forget_nodes();

        let root = scene.create_node(
            "building",
            Matrix4::new_translation(&self.mesh_origin.coords),
            None,
        )?;

        match self.populate(scene, root, mesh, shell) {
            Ok(()) => {
                self.node = Some(root);
                tracing::debug!(nodes = self.node_ids().len(), "rendered building");
                Ok(root)
            }
            Err(err) => {
                scene.destroy_node(root);
                self.forget_nodes();
                Err(err)
            }
        }
    }

    fn populate<S: SceneBackend + ?Sized>(
        &mut self,
        scene: &mut S,
        root: NodeId,
        mesh: Mesh,
        shell: Arc<Material>,
    ) -> Result<()> {
        let uvs = mesh.planar_uvs();
        scene.submit_mesh(root, mesh, uvs, shell)?;

        for face in &mut self.faces {
            let face_index = face.index();
            for component in face.components_mut() {
                let transform = *component.transform();
                let position = component.position();
                let kind = component.kind().name();
                let Some(fenestration) = component.kind_mut().fenestration_mut() else {
                    continue;
                };
                for sub in fenestration.sub_meshes_mut() {
                    let material = scene.load_material(sub.material)?;
                    let name = format!(
                        "{kind}_{face_index}_{}_{}_{}",
                        position.floor, position.column, sub.role
                    );
                    let node = scene.create_node(&name, transform, Some(root))?;
                    scene.submit_mesh(node, sub.mesh.clone(), sub.mesh.planar_uvs(), material)?;
                    sub.node = Some(node);
                }
            }
        }

        for kind in [BatchKind::Frames, BatchKind::Bodies] {
            if let Some(batch) = self.batch_mut(kind) {
                let material = scene.load_material(kind.material())?;
                batch.node = Some(submit_batch(scene, root, kind, &batch.mesh, material)?);
            }
        }
        Ok(())
    }

    /// Merge every window and door frame into one mesh.
    ///
    /// Returns the number of frames merged. The individual frames and
    /// their nodes are released; a building without openings gets an
    /// empty batch. Fails when frames were already combined.
    pub fn combine_frames<S: SceneBackend + ?Sized>(&mut self, scene: &mut S) -> Result<usize> {
        self.combine(scene, BatchKind::Frames)
    }

    /// Merge every window pane into one mesh, like [`combine_frames`].
    ///
    /// [`combine_frames`]: Building::combine_frames
    pub fn combine_bodies<S: SceneBackend + ?Sized>(&mut self, scene: &mut S) -> Result<usize> {
        self.combine(scene, BatchKind::Bodies)
    }

    fn combine<S: SceneBackend + ?Sized>(&mut self, scene: &mut S, kind: BatchKind) -> Result<usize> {
        if self.batch_mut(kind).is_some() {
            return Err(Error::AlreadyCombined(kind.label()));
        }
        let material = scene.load_material(kind.material())?;

        let batcher: MeshBatcher = self
            .components_mut()
            .filter_map(|component| {
                let transform = *component.transform();
                let sub = kind.slot(component.kind_mut())?.as_ref()?;
                Some((sub.mesh.clone(), transform))
            })
            .collect();
        let parts = batcher.len();
        let mesh = batcher.combine();

        let node = match self.node {
            Some(root) => Some(submit_batch(scene, root, kind, &mesh, material)?),
            None => None,
        };

        for component in self.components_mut() {
            let released = kind.slot(component.kind_mut()).and_then(Option::take);
            if let Some(node) = released.and_then(|sub| sub.node) {
                scene.destroy_node(node);
            }
        }

        tracing::info!(
            parts,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "combined {}",
            kind.label()
        );
        *self.batch_mut(kind) = Some(Batch { mesh, node });
        Ok(parts)
    }

    /// Remove the building's nodes from `scene`, consuming the building.
    ///
    /// Returns the number of nodes destroyed.
    pub fn destroy<S: SceneBackend + ?Sized>(self, scene: &mut S) -> usize {
        let removed = self.node.map_or(0, |node| scene.destroy_node(node));
        tracing::debug!(removed, "destroyed building");
        removed
    }

    fn batch_mut(&mut self, kind: BatchKind) -> &mut Option<Batch> {
        match kind {
            BatchKind::Frames => &mut self.frames,
            BatchKind::Bodies => &mut self.bodies,
        }
    }

    fn components_mut(&mut self) -> impl Iterator<Item = &mut FaceComponent> {
        self.faces
            .iter_mut()
            .flat_map(|face| face.components_mut().iter_mut())
    }

    fn forget_nodes(&mut self) {
        for component in self.components_mut() {
            if let Some(fenestration) = component.kind_mut().fenestration_mut() {
                for sub in fenestration.sub_meshes_mut() {
                    sub.node = None;
                }
            }
        }
        for batch in [&mut self.frames, &mut self.bodies].into_iter().flatten() {
            batch.node = None;
        }
    }

    /// All components of all faces, face by face
    pub fn components(&self) -> impl Iterator<Item = &FaceComponent> {
        self.faces.iter().flat_map(|face| face.components().iter())
    }

    /// Root node and every child node while rendered
    pub fn node_ids(&self) -> Vec<NodeId> {
        let subs = self
            .components()
            .filter_map(|c| c.kind().fenestration())
            .flat_map(|f| f.sub_meshes())
            .filter_map(|sub| sub.node);
        let batches = [&self.frames, &self.bodies]
            .into_iter()
            .flatten()
            .filter_map(|batch| batch.node);
        self.node.into_iter().chain(subs).chain(batches).collect()
    }

    #[inline]
    pub fn boundaries(&self) -> &[Point3<f64>] {
        &self.boundaries
    }

    #[inline]
    pub fn mesh_origin(&self) -> &Point3<f64> {
        &self.mesh_origin
    }

    #[inline]
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn floor_count(&self) -> usize {
        self.layout.floor_count
    }

    #[inline]
    pub fn floor_height(&self) -> f64 {
        self.layout.floor_height
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn face(&self, index: usize) -> Option<&Face> {
        self.faces.get(index)
    }

    /// Root scene node while rendered
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn frame_batch(&self) -> Option<&Mesh> {
        self.frames.as_ref().map(|b| &b.mesh)
    }

    pub fn body_batch(&self) -> Option<&Mesh> {
        self.bodies.as_ref().map(|b| &b.mesh)
    }

    pub fn window_count(&self) -> usize {
        self.components()
            .filter(|c| matches!(c.kind(), ComponentKind::Window(_)))
            .count()
    }

    pub fn door_count(&self) -> usize {
        self.components()
            .filter(|c| matches!(c.kind(), ComponentKind::Door(_)))
            .count()
    }

    /// Counts describing the building, for reports.
    pub fn summary(&self) -> Result<BuildingSummary> {
        let vertices = self.find_vertices()?.len();
        let triangles = self.find_triangles()?.len() / 3;
        let walls = self.components().filter(|c| !c.is_open()).count();

        Ok(BuildingSummary {
            origin: [self.mesh_origin.x, self.mesh_origin.y, self.mesh_origin.z],
            floor_count: self.floor_count(),
            floor_height: self.floor_height(),
            height: self.height,
            faces: self
                .faces
                .iter()
                .map(|face| FaceSummary {
                    index: face.index(),
                    width: face.width(),
                    components_per_floor: face.components_per_floor(),
                    vertices: face.vertex_count(),
                })
                .collect(),
            windows: self.window_count(),
            doors: self.door_count(),
            walls,
            vertices,
            triangles,
            frames_combined: self.frames.is_some(),
            bodies_combined: self.bodies.is_some(),
        })
    }
}

/// Serializable overview of a building
#[derive(Debug, Clone, Serialize)]
pub struct BuildingSummary {
    pub origin: [f64; 3],
    pub floor_count: usize,
    pub floor_height: f64,
    pub height: f64,
    pub faces: Vec<FaceSummary>,
    pub windows: usize,
    pub doors: usize,
    pub walls: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub frames_combined: bool,
    pub bodies_combined: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FaceSummary {
    pub index: usize,
    pub width: f64,
    pub components_per_floor: usize,
    pub vertices: usize,
}

/// Append the triangles of one face whose vertex block starts at `offset`.
fn stitch_face(face: &Face, offset: u32, indices: &mut Vec<u32>) {
    let f = face.index() as u32;
    let f1 = ((face.index() + 1) % GROUND_POINTS) as u32;
    let (ground_start, roof_start) = (f, f + 4);
    let (ground_end, roof_end) = (f1, f1 + 4);

    let columns = face.components_per_floor() as u32;
    if columns == 0 {
        push_quad(indices, [ground_start, roof_start, roof_end, ground_end]);
        return;
    }

    let vpr = face.vertices_per_row() as u32;
    let im = face.index_modifier() as u32;
    let floors = face.floor_count() as u32;

    // Corner strips up to the first and from the last column
    let last = offset + vpr - 1;
    push_quad(indices, [ground_start, roof_start, offset + im, offset]);
    push_quad(indices, [last, last + im, roof_end, ground_end]);

    // Full-height strips between neighbouring columns
    for i in 1..columns {
        let index = offset + 2 * i - 1;
        push_quad(indices, [index, index + im, index + im + 1, index + 1]);
    }

    // Bands below, between and above the components of each column
    for i in 0..columns {
        for j in 0..=floors {
            let adj = offset + 2 * (i + j * vpr);
            push_quad(indices, [adj, adj + vpr, adj + vpr + 1, adj + 1]);
        }
    }

    // Plain wall cells; openings are filled by their frame and body
    for component in face.components().iter().filter(|c| !c.is_open()) {
        let p = component.position();
        let base = offset + (2 * p.floor as u32 + 1) * vpr + 2 * p.column as u32;
        push_quad(indices, [base, base + vpr, base + vpr + 1, base + 1]);
    }
}

/// Create a detached node for a batch, give it the mesh and hang it under `root`.
fn submit_batch<S: SceneBackend + ?Sized>(
    scene: &mut S,
    root: NodeId,
    kind: BatchKind,
    mesh: &Mesh,
    material: Arc<Material>,
) -> Result<NodeId> {
    let node = scene.create_node(kind.node_name(), Matrix4::identity(), None)?;
    let submitted = scene
        .submit_mesh(node, mesh.clone(), mesh.planar_uvs(), material)
        .and_then(|()| scene.attach_child(root, node));
    if let Err(err) = submitted {
        scene.destroy_node(node);
        return Err(err);
    }
    Ok(node)
}

/// Edge indices of a ground quad ordered by edge length.
fn faces_by_width(ground: &[Point3<f64>], descending: bool) -> Vec<usize> {
    let n = ground.len();
    let width = |i: usize| planar_distance(&ground[i], &ground[(i + 1) % n]);
    let mut order: Vec<usize> = (0..n).collect();
    if descending {
        order.sort_by(|&a, &b| width(b).total_cmp(&width(a)));
    } else {
        order.sort_by(|&a, &b| width(a).total_cmp(&width(b)));
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ComponentsPerFloor, FenestrationSpec};
    use approx::assert_relative_eq;

    fn ground() -> [Point3<f64>; 4] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 6.0),
            Point3::new(0.0, 0.0, 6.0),
        ]
    }

    fn layout(columns: usize) -> LayoutConfig {
        LayoutConfig {
            floor_count: 3,
            floor_height: 3.0,
            components_per_floor: ComponentsPerFloor::Uniform(columns),
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn test_mesh_origin_is_diagonal_intersection() {
        let origin = Building::find_mesh_origin(&ground()).unwrap();
        assert_relative_eq!(origin, Point3::new(5.0, 0.0, 3.0), epsilon = 1e-12);

        let building = Building::new(ground()).unwrap();
        for (stored, original) in building.boundaries().iter().zip(ground()) {
            assert_relative_eq!(stored + origin.coords, original, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_quad_is_rejected() {
        let collinear = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
        ];
        let err = Building::build(collinear, layout(1)).unwrap_err();
        assert!(err.is_degenerate_quad());
    }

    #[test]
    fn test_counter_clockwise_ground_is_reordered() {
        let [p0, p1, p2, p3] = ground();
        let building = Building::new([p0, p3, p2, p1]).unwrap();
        assert!(signed_area_xz(building.boundaries()) > 0.0);
        assert_eq!(building.mesh_origin(), &Point3::new(5.0, 0.0, 3.0));
    }

    #[test]
    fn test_vertices_need_a_roof() {
        let building = Building::new(ground()).unwrap();
        assert!(matches!(
            building.find_vertices(),
            Err(Error::IncompleteBoundaries { found: 4, .. })
        ));
        assert!(building.find_triangles().is_err());
    }

    #[test]
    fn test_roof_without_faces_is_incomplete() {
        let mut building = Building::new(ground()).unwrap();
        building.recompute_derived();
        assert_eq!(building.boundaries().len(), 8);

        assert!(matches!(
            building.find_vertices(),
            Err(Error::IncompleteBoundaries { found: 8, faces: 0 })
        ));
        assert!(building.find_triangles().is_err());
        assert!(building.to_mesh().is_err());
        assert!(building.summary().is_err());
    }

    #[test]
    fn test_roof_is_idempotent() {
        let mut building = Building::build(ground(), layout(1)).unwrap();
        let roof: Vec<_> = building.boundaries()[4..].to_vec();

        building.calculate_roof_boundaries();
        building.calculate_roof_boundaries();
        assert_eq!(building.boundaries().len(), 8);
        assert_eq!(&building.boundaries()[4..], roof.as_slice());
        assert_relative_eq!(roof[0].y, 9.0);
    }

    #[test]
    fn test_setters_recompute_roof_and_faces() {
        let mut building = Building::build(ground(), layout(1)).unwrap();
        building.set_floor_count(5).unwrap();
        assert_relative_eq!(building.height(), 15.0);
        assert_relative_eq!(building.boundaries()[6].y, 15.0);
        assert_eq!(building.face(0).unwrap().components().len(), 5);

        building.set_floor_height(4.0).unwrap();
        assert_relative_eq!(building.height(), 20.0);
        assert_relative_eq!(building.boundaries()[5].y, 20.0);
    }

    #[test]
    fn test_rejected_setter_keeps_building() {
        let mut building = Building::build(ground(), layout(1)).unwrap();
        assert!(building.set_floor_count(0).is_err());
        // Window taller than the floor
        assert!(building.set_floor_height(1.0).is_err());
        assert_eq!(building.floor_count(), 3);
        assert_relative_eq!(building.height(), 9.0);
        assert_eq!(building.boundaries().len(), 8);
    }

    #[test]
    fn test_sorted_faces() {
        let building = Building::new(ground()).unwrap();
        assert_eq!(building.sorted_faces(true), vec![0, 2, 1, 3]);
        assert_eq!(building.sorted_faces(false), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_door_goes_on_widest_face() {
        let layout = LayoutConfig {
            door: Some(FenestrationSpec::new(2.4, 0.12, 0.15)),
            ..layout(3)
        };
        let building = Building::build(ground(), layout).unwrap();
        assert_eq!(building.door_count(), 1);
        assert!(matches!(
            building.face(0).unwrap().component(0, 1).unwrap().kind(),
            ComponentKind::Door(_)
        ));
        assert_eq!(building.window_count(), 4 * 3 * 3 - 1);
    }

    #[test]
    fn test_triangle_counts() {
        // Per face: 2 corner strips, columns - 1 inner strips, columns * (floors + 1) bands
        let building = Building::build(ground(), layout(2)).unwrap();
        let per_face = 2 + 1 + 2 * 4;
        assert_eq!(building.find_triangles().unwrap().len(), 3 * (2 + 4 * 2 * per_face));

        let blind = LayoutConfig {
            blind_columns: vec![1],
            ..layout(2)
        };
        let building = Building::build(ground(), blind).unwrap();
        let per_face = per_face + 3;
        assert_eq!(building.find_triangles().unwrap().len(), 3 * (2 + 4 * 2 * per_face));
    }

    #[test]
    fn test_summary() {
        let building = Building::build(ground(), layout(1)).unwrap();
        let summary = building.summary().unwrap();
        assert_eq!(summary.vertices, 72);
        assert_eq!(summary.faces.len(), 4);
        assert_eq!(summary.windows, 12);
        assert_eq!(summary.doors, 0);
        assert!(!summary.frames_combined);
        assert_relative_eq!(summary.faces[1].width, 6.0, epsilon = 1e-12);
    }
}
