// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rendering, frame/glass batching and destruction against the in-memory scene.

use buildgen_building::{
    Building, ComponentKind, ComponentsPerFloor, Error, FenestrationSpec, LayoutConfig,
    MaterialLibrary, SceneBackend, SceneGraph, FRAME_COMBINER, FRAME_MATERIAL, GLASS_COMBINER,
    GLASS_MATERIAL,
};
use buildgen_geometry::Point3;
use std::sync::Arc;

fn ground() -> [Point3<f64>; 4] {
    [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(10.0, 0.0, 0.0),
        Point3::new(10.0, 0.0, 6.0),
        Point3::new(0.0, 0.0, 6.0),
    ]
}

fn layout() -> LayoutConfig {
    LayoutConfig {
        floor_count: 3,
        floor_height: 3.0,
        components_per_floor: ComponentsPerFloor::Uniform(2),
        door: Some(FenestrationSpec::new(2.4, 0.12, 0.15)),
        ..LayoutConfig::default()
    }
}

fn frame_vertex_total(building: &Building) -> usize {
    building
        .components()
        .filter_map(|c| c.kind().fenestration())
        .filter_map(|f| f.frame.as_ref())
        .map(|frame| frame.mesh.vertex_count())
        .sum()
}

#[test]
fn render_creates_one_node_per_sub_mesh() {
    let mut scene = SceneGraph::default();
    let mut building = Building::build(ground(), layout()).unwrap();
    let root = building.render(&mut scene).unwrap();

    // 24 openings with a frame and a body each, plus the shell
    assert_eq!(building.window_count() + building.door_count(), 24);
    assert_eq!(scene.node_count(), 1 + 2 * 24);
    assert_eq!(scene.node(root).unwrap().children.len(), 48);

    let shell = scene.mesh_of(root).unwrap();
    assert_eq!(shell.vertex_count(), building.find_vertices().unwrap().len());
    // Root carries the mesh origin
    let world = scene.world_transform(root).unwrap();
    assert_eq!(world[(0, 3)], 5.0);
    assert_eq!(world[(2, 3)], 3.0);
}

#[test]
fn sub_mesh_nodes_have_distinct_names() {
    let mut scene = SceneGraph::default();
    let mut building = Building::build(ground(), layout()).unwrap();
    let root = building.render(&mut scene).unwrap();

    let mut names: Vec<&str> = scene
        .node(root)
        .unwrap()
        .children
        .iter()
        .map(|&n| scene.node(n).unwrap().name.as_str())
        .collect();
    assert!(names.contains(&"window_0_0_0_frame"));
    assert!(names.contains(&"window_0_0_0_body"));
    assert!(names.contains(&"door_0_0_1_body"));

    let count = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), count);
}

#[test]
fn rendering_again_replaces_the_tree() {
    let mut scene = SceneGraph::default();
    let mut building = Building::build(ground(), layout()).unwrap();
    let first = building.render(&mut scene).unwrap();
    let count = scene.node_count();

    let second = building.render(&mut scene).unwrap();
    assert!(!scene.is_alive(first));
    assert!(scene.is_alive(second));
    assert_eq!(scene.node_count(), count);
}

#[test]
fn combining_frames_keeps_every_vertex() {
    let mut scene = SceneGraph::default();
    let mut building = Building::build(ground(), layout()).unwrap();
    let root = building.render(&mut scene).unwrap();

    let expected_vertices = frame_vertex_total(&building);
    let old_nodes = building.node_ids();

    let parts = building.combine_frames(&mut scene).unwrap();
    assert_eq!(parts, 24);

    let batch = building.frame_batch().unwrap();
    assert_eq!(batch.vertex_count(), expected_vertices);
    batch.validate_indices().unwrap();

    // Frame nodes are gone, body nodes stay
    let alive = old_nodes.iter().filter(|&&n| scene.is_alive(n)).count();
    assert_eq!(alive, 1 + 24);
    assert!(building
        .components()
        .filter_map(|c| c.kind().fenestration())
        .all(|f| f.frame.is_none() && f.body.is_some()));

    // The batch hangs under the building with the shared frame material
    let combiner = scene
        .node(root)
        .unwrap()
        .children
        .iter()
        .copied()
        .find(|&n| scene.node(n).unwrap().name == FRAME_COMBINER)
        .unwrap();
    let renderable = scene.node(combiner).unwrap().renderable.as_ref().unwrap();
    assert_eq!(renderable.material.name, FRAME_MATERIAL);
    assert_eq!(renderable.uvs.len(), 2 * expected_vertices);
}

#[test]
fn batched_frames_are_in_building_space() {
    let mut scene = SceneGraph::default();
    let mut building = Building::build(ground(), layout()).unwrap();
    let first = building
        .components()
        .find(|c| c.is_open())
        .map(|c| c.bottom()[0])
        .unwrap();

    building.combine_frames(&mut scene).unwrap();
    let batch = building.frame_batch().unwrap();
    // Outer bottom corner of the first frame sits on the first opening's corner
    let p = batch.position(0);
    assert!((p - first).norm() < 1e-5);
}

#[test]
fn combining_twice_fails() {
    let mut scene = SceneGraph::default();
    let mut building = Building::build(ground(), layout()).unwrap();
    building.combine_frames(&mut scene).unwrap();
    assert!(matches!(
        building.combine_frames(&mut scene),
        Err(Error::AlreadyCombined("frames"))
    ));
    building.combine_bodies(&mut scene).unwrap();
    assert!(matches!(
        building.combine_bodies(&mut scene),
        Err(Error::AlreadyCombined("bodies"))
    ));
}

#[test]
fn glass_batch_leaves_door_panels_alone() {
    let mut scene = SceneGraph::default();
    let mut building = Building::build(ground(), layout()).unwrap();
    building.render(&mut scene).unwrap();

    let parts = building.combine_bodies(&mut scene).unwrap();
    assert_eq!(parts, building.window_count());
    assert_eq!(building.door_count(), 1);

    for component in building.components() {
        match component.kind() {
            ComponentKind::Door(door) => {
                let panel = door.body.as_ref().unwrap();
                assert!(scene.is_alive(panel.node.unwrap()));
            }
            ComponentKind::Window(window) => assert!(window.body.is_none()),
            ComponentKind::Wall => {}
        }
    }

    let glass = scene
        .roots()
        .flat_map(|root| scene.node(root).unwrap().children.clone())
        .find(|&n| scene.node(n).unwrap().name == GLASS_COMBINER)
        .unwrap();
    let renderable = scene.node(glass).unwrap().renderable.as_ref().unwrap();
    assert_eq!(renderable.material.name, GLASS_MATERIAL);
    assert_eq!(renderable.mesh.vertex_count(), 4 * building.window_count());
}

#[test]
fn batching_before_render_is_submitted_by_render() {
    let mut scene = SceneGraph::default();
    let mut building = Building::build(ground(), layout()).unwrap();
    building.combine_frames(&mut scene).unwrap();
    building.combine_bodies(&mut scene).unwrap();
    assert_eq!(scene.node_count(), 0);

    building.render(&mut scene).unwrap();
    // Shell, one door panel, two batches
    assert_eq!(scene.node_count(), 4);
    assert_eq!(scene.renderable_count(), 4);
}

#[test]
fn building_without_openings_batches_to_empty_mesh() {
    let mut scene = SceneGraph::default();
    let solid = LayoutConfig {
        components_per_floor: ComponentsPerFloor::Uniform(0),
        ..layout()
    };
    let mut building = Building::build(ground(), solid).unwrap();
    building.render(&mut scene).unwrap();

    assert_eq!(building.combine_frames(&mut scene).unwrap(), 0);
    assert!(building.frame_batch().unwrap().is_empty());
    assert_eq!(building.combine_bodies(&mut scene).unwrap(), 0);
}

#[test]
fn destroy_removes_every_node() {
    let mut scene = SceneGraph::default();
    let mut building = Building::build(ground(), layout()).unwrap();
    building.render(&mut scene).unwrap();
    building.combine_frames(&mut scene).unwrap();

    let nodes = building.node_ids();
    assert_eq!(nodes.len(), scene.node_count());

    let removed = building.destroy(&mut scene);
    assert_eq!(removed, nodes.len());
    assert!(nodes.iter().all(|&n| !scene.is_alive(n)));
    assert_eq!(scene.node_count(), 0);
}

#[test]
fn failed_render_leaves_nothing_behind() {
    let mut scene = SceneGraph::new(Arc::new(MaterialLibrary::new()));
    let mut building = Building::build(ground(), layout()).unwrap();

    let err = building.render(&mut scene).unwrap_err();
    assert!(matches!(err, Error::MissingMaterial(_)));
    assert_eq!(scene.node_count(), 0);
    assert!(building.node().is_none());

    // Shell material alone gets past the root, then the frames fail
    let mut library = MaterialLibrary::new();
    library.insert(buildgen_building::Material::new(
        buildgen_building::BUILDING_MATERIAL,
        [1.0; 4],
    ));
    let mut scene = SceneGraph::new(Arc::new(library));
    assert!(building.render(&mut scene).is_err());
    assert_eq!(scene.node_count(), 0);
    assert!(building.node_ids().is_empty());
}
