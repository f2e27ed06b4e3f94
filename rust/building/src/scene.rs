// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rendering collaborator
//!
//! Buildings never draw themselves. They talk to a [`SceneBackend`] that can
//! create nodes, hand out materials and accept triangle meshes.
//! [`SceneGraph`] is the in-memory backend: an arena of nodes keyed by
//! generational ids, so an id kept after its node was destroyed never
//! resolves again.

use crate::error::{Error, Result};
use buildgen_geometry::{baked, Matrix4, Mesh};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::sync::Arc;

new_key_type! {
    /// Key of a node in a [`SceneGraph`].
    pub struct NodeId;
}

/// Material of the building shell
pub const BUILDING_MATERIAL: &str = "BuildingMaterial";
/// Material shared by window and door frames
pub const FRAME_MATERIAL: &str = "WindowFrameMaterial";
/// Material of window glass
pub const GLASS_MATERIAL: &str = "WindowGlassMaterial";
/// Material of door panels
pub const DOOR_PANEL_MATERIAL: &str = "DoorPanelMaterial";

/// Named surface appearance. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// Linear RGBA
    pub color: [f32; 4],
}

impl Material {
    pub fn new(name: impl Into<String>, color: [f32; 4]) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Read-only set of materials shared by every building of a scene.
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    materials: FxHashMap<String, Arc<Material>>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding the four materials buildings use.
    pub fn with_defaults() -> Self {
        let mut library = Self::new();
        library.insert(Material::new(BUILDING_MATERIAL, [0.78, 0.74, 0.68, 1.0]));
        library.insert(Material::new(FRAME_MATERIAL, [0.93, 0.93, 0.90, 1.0]));
        library.insert(Material::new(GLASS_MATERIAL, [0.45, 0.62, 0.75, 0.45]));
        library.insert(Material::new(DOOR_PANEL_MATERIAL, [0.36, 0.22, 0.12, 1.0]));
        library
    }

    /// Add or replace a material
    pub fn insert(&mut self, material: Material) {
        self.materials
            .insert(material.name.clone(), Arc::new(material));
    }

    pub fn get(&self, name: &str) -> Option<Arc<Material>> {
        self.materials.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Operations the building generator needs from a renderer.
pub trait SceneBackend {
    /// Create an empty static node with a local-to-parent transform.
    ///
    /// A `None` parent creates a detached root.
    fn create_node(
        &mut self,
        name: &str,
        transform: Matrix4<f64>,
        parent: Option<NodeId>,
    ) -> Result<NodeId>;

    /// Look up a material by name.
    fn load_material(&self, name: &str) -> Result<Arc<Material>>;

    /// Attach a triangle mesh with its UVs and material to a node,
    /// replacing any mesh the node already had.
    fn submit_mesh(
        &mut self,
        node: NodeId,
        mesh: Mesh,
        uvs: Vec<f32>,
        material: Arc<Material>,
    ) -> Result<()>;

    /// Re-parent `child` under `parent`.
    fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Destroy a node and all its descendants. Returns how many nodes went away.
    fn destroy_node(&mut self, node: NodeId) -> usize;

    fn is_alive(&self, node: NodeId) -> bool;
}

/// Mesh submitted to a node
#[derive(Debug, Clone)]
pub struct Renderable {
    pub mesh: Mesh,
    /// Two floats per vertex
    pub uvs: Vec<f32>,
    pub material: Arc<Material>,
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    /// Local-to-parent transform
    pub transform: Matrix4<f64>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub renderable: Option<Renderable>,
}

/// In-memory scene graph.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    materials: Arc<MaterialLibrary>,
}

impl SceneGraph {
    pub fn new(materials: Arc<MaterialLibrary>) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            materials,
        }
    }

    /// Scene backed by [`MaterialLibrary::with_defaults`]
    pub fn with_default_materials() -> Self {
        Self::new(Arc::new(MaterialLibrary::with_defaults()))
    }

    pub fn materials(&self) -> &Arc<MaterialLibrary> {
        &self.materials
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes carrying a mesh
    pub fn renderable_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| n.renderable.is_some())
            .count()
    }

    pub fn mesh_of(&self, id: NodeId) -> Option<&Mesh> {
        self.nodes
            .get(id)
            .and_then(|n| n.renderable.as_ref())
            .map(|r| &r.mesh)
    }

    /// Nodes without a parent
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Product of the transforms from the root down to `id`
    pub fn world_transform(&self, id: NodeId) -> Option<Matrix4<f64>> {
        let mut node = self.nodes.get(id)?;
        let mut transform = node.transform;
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            transform = node.transform * transform;
        }
        Some(transform)
    }

    /// Every submitted mesh baked into world space, with its material name.
    pub fn world_meshes(&self) -> Vec<(String, Mesh)> {
        self.nodes
            .keys()
            .filter_map(|id| {
                let renderable = self.nodes.get(id)?.renderable.as_ref()?;
                let world = self.world_transform(id)?;
                Some((
                    renderable.material.name.clone(),
                    baked(&renderable.mesh, &world),
                ))
            })
            .collect()
    }

    fn is_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        while let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) {
            if parent == ancestor {
                return true;
            }
            id = parent;
        }
        false
    }

    fn detach(&mut self, child: NodeId) {
        let parent = self.nodes.get_mut(child).and_then(|n| n.parent.take());
        if let Some(node) = parent.and_then(|p| self.nodes.get_mut(p)) {
            node.children.retain(|&c| c != child);
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::with_default_materials()
    }
}

impl SceneBackend for SceneGraph {
    fn create_node(
        &mut self,
        name: &str,
        transform: Matrix4<f64>,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        if let Some(parent) = parent {
            if !self.nodes.contains_key(parent) {
                return Err(Error::NodeNotFound);
            }
        }

        let id = self.nodes.insert(SceneNode {
            name: name.to_string(),
            transform,
            parent,
            children: Vec::new(),
            renderable: None,
        });
        if let Some(node) = parent.and_then(|p| self.nodes.get_mut(p)) {
            node.children.push(id);
        }
        Ok(id)
    }

    fn load_material(&self, name: &str) -> Result<Arc<Material>> {
        self.materials
            .get(name)
            .ok_or_else(|| Error::MissingMaterial(name.to_string()))
    }

    fn submit_mesh(
        &mut self,
        node: NodeId,
        mesh: Mesh,
        uvs: Vec<f32>,
        material: Arc<Material>,
    ) -> Result<()> {
        let node = self.nodes.get_mut(node).ok_or(Error::NodeNotFound)?;
        node.renderable = Some(Renderable {
            mesh,
            uvs,
            material,
        });
        Ok(())
    }

    fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return Err(Error::NodeNotFound);
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::SceneCycle);
        }

        self.detach(child);
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    fn destroy_node(&mut self, node: NodeId) -> usize {
        if !self.nodes.contains_key(node) {
            return 0;
        }
        self.detach(node);

        let mut removed = 0;
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(data) = self.nodes.remove(id) {
                stack.extend(data.children);
                removed += 1;
            }
        }
        removed
    }

    fn is_alive(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use buildgen_geometry::{Point3, Vector3};

    fn triangle() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::z());
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::z());
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0), Vector3::z());
        mesh.add_triangle(0, 1, 2);
        mesh
    }

    #[test]
    fn test_default_materials() {
        let scene = SceneGraph::with_default_materials();
        assert_eq!(scene.materials().len(), 4);
        assert_eq!(
            scene.load_material(GLASS_MATERIAL).unwrap().name,
            GLASS_MATERIAL
        );
        assert!(matches!(
            scene.load_material("Marble"),
            Err(Error::MissingMaterial(name)) if name == "Marble"
        ));
    }

    #[test]
    fn test_materials_are_shared() {
        let library = Arc::new(MaterialLibrary::with_defaults());
        let a = SceneGraph::new(library.clone());
        let b = SceneGraph::new(library);
        let ma = a.load_material(FRAME_MATERIAL).unwrap();
        let mb = b.load_material(FRAME_MATERIAL).unwrap();
        assert!(Arc::ptr_eq(&ma, &mb));
    }

    #[test]
    fn test_destroy_is_recursive() {
        let mut scene = SceneGraph::default();
        let root = scene.create_node("root", Matrix4::identity(), None).unwrap();
        let child = scene
            .create_node("child", Matrix4::identity(), Some(root))
            .unwrap();
        let grandchild = scene
            .create_node("grandchild", Matrix4::identity(), Some(child))
            .unwrap();
        let other = scene.create_node("other", Matrix4::identity(), None).unwrap();

        assert_eq!(scene.destroy_node(root), 3);
        assert!(!scene.is_alive(root));
        assert!(!scene.is_alive(child));
        assert!(!scene.is_alive(grandchild));
        assert!(scene.is_alive(other));
        assert_eq!(scene.node_count(), 1);

        // Stale ids stay dead
        assert_eq!(scene.destroy_node(child), 0);
        let material = scene.load_material(BUILDING_MATERIAL).unwrap();
        let err = scene.submit_mesh(grandchild, triangle(), Vec::new(), material);
        assert!(matches!(err, Err(Error::NodeNotFound)));
    }

    #[test]
    fn test_destroying_child_detaches_it() {
        let mut scene = SceneGraph::default();
        let root = scene.create_node("root", Matrix4::identity(), None).unwrap();
        let child = scene
            .create_node("child", Matrix4::identity(), Some(root))
            .unwrap();
        scene.destroy_node(child);
        assert!(scene.node(root).unwrap().children.is_empty());
    }

    #[test]
    fn test_attach_child_reparents() {
        let mut scene = SceneGraph::default();
        let a = scene.create_node("a", Matrix4::identity(), None).unwrap();
        let b = scene.create_node("b", Matrix4::identity(), None).unwrap();
        let c = scene.create_node("c", Matrix4::identity(), Some(a)).unwrap();

        scene.attach_child(b, c).unwrap();
        assert!(scene.node(a).unwrap().children.is_empty());
        assert_eq!(scene.node(b).unwrap().children, vec![c]);
        assert_eq!(scene.node(c).unwrap().parent, Some(b));

        // No cycles, and a rejected attach leaves the tree alone
        assert!(matches!(scene.attach_child(c, b), Err(Error::SceneCycle)));
        assert!(matches!(scene.attach_child(b, b), Err(Error::SceneCycle)));
        assert_eq!(scene.node(c).unwrap().parent, Some(b));
        assert_eq!(scene.node(b).unwrap().parent, None);
    }

    #[test]
    fn test_world_meshes_apply_parent_transforms() {
        let mut scene = SceneGraph::default();
        let root = scene
            .create_node(
                "root",
                Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0)),
                None,
            )
            .unwrap();
        let child = scene
            .create_node(
                "child",
                Matrix4::new_translation(&Vector3::new(0.0, 2.0, 0.0)),
                Some(root),
            )
            .unwrap();
        let material = scene.load_material(FRAME_MATERIAL).unwrap();
        scene
            .submit_mesh(child, triangle(), Vec::new(), material)
            .unwrap();

        assert_eq!(scene.renderable_count(), 1);
        let meshes = scene.world_meshes();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].0, FRAME_MATERIAL);
        assert_relative_eq!(meshes[0].1.positions[0], 10.0);
        assert_relative_eq!(meshes[0].1.positions[1], 2.0);
    }
}
