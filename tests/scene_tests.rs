//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: create/remove nodes, attach hierarchy
//! - Node query: names, root_nodes, ancestry
//! - Component maps: rig discovery and cleanup on removal

use glam::Vec3;
use myth_rig::{
    BindingSettings, BindingSystem, BoneData, Node, Scene, Skeleton, SkeletonInstance,
};

fn skeleton() -> Skeleton {
    Skeleton::new("scene", vec![BoneData::new("root")]).unwrap()
}

// ============================================================================
// Node Creation & Removal
// ============================================================================

#[test]
fn scene_create_node() {
    let mut scene = Scene::new();
    let handle = scene.create_node();
    assert!(scene.get_node(handle).is_some());
    assert_eq!(scene.root_nodes, vec![handle]);
}

#[test]
fn scene_create_node_with_name() {
    let mut scene = Scene::new();
    let handle = scene.create_node_with_name("TestNode");
    assert_eq!(scene.get_name(handle), Some("TestNode"));
}

#[test]
fn scene_set_name() {
    let mut scene = Scene::new();
    let handle = scene.create_node();
    scene.set_name(handle, "Renamed");
    assert_eq!(scene.get_name(handle), Some("Renamed"));
}

#[test]
fn scene_remove_node_removes_subtree() {
    let mut scene = Scene::new();
    let parent = scene.create_node_with_name("Parent");
    let child = scene.add_to_parent(Node::with_name("Child"), parent);
    let grandchild = scene.add_to_parent(Node::with_name("Grandchild"), child);

    scene.remove_node(child);

    assert!(scene.get_node(child).is_none());
    assert!(scene.get_node(grandchild).is_none());
    assert!(scene.get_node(parent).unwrap().children().is_empty());
}

#[test]
fn scene_remove_root_node_updates_root_list() {
    let mut scene = Scene::new();
    let a = scene.create_node();
    let b = scene.create_node();

    scene.remove_node(a);
    assert_eq!(scene.root_nodes, vec![b]);
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn scene_attach_moves_node_out_of_roots() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let child = scene.create_node();

    scene.attach(child, parent);

    assert_eq!(scene.root_nodes, vec![parent]);
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
    assert_eq!(scene.get_node(parent).unwrap().children(), &[child]);
}

#[test]
fn scene_attach_reparents_between_nodes() {
    let mut scene = Scene::new();
    let a = scene.create_node();
    let b = scene.create_node();
    let child = scene.add_to_parent(Node::new(), a);

    scene.attach(child, b);

    assert!(scene.get_node(a).unwrap().children().is_empty());
    assert_eq!(scene.get_node(b).unwrap().children(), &[child]);
}

#[test]
fn scene_attach_rejects_cycles() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let child = scene.add_to_parent(Node::new(), parent);

    scene.attach(parent, child);
    scene.attach(parent, parent);

    assert_eq!(scene.get_node(parent).unwrap().parent(), None);
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
}

#[test]
fn scene_find_node_by_name_searches_subtree() {
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Root");
    let arm = scene.add_to_parent(Node::with_name("Arm"), root);
    let hand = scene.add_to_parent(Node::with_name("Hand"), arm);

    assert_eq!(scene.find_node_by_name(root, "Hand"), Some(hand));
    assert_eq!(scene.find_node_by_name(arm, "Root"), None);
    assert!(scene.is_ancestor(root, hand));
    assert!(!scene.is_ancestor(hand, root));
}

#[test]
fn scene_world_position_follows_parent() {
    let mut scene = Scene::new();
    let mut parent = Node::new();
    parent.transform.position = Vec3::new(1.0, 2.0, 3.0);
    let parent = scene.add_node(parent);
    let mut child = Node::new();
    child.transform.position = Vec3::new(1.0, 0.0, 0.0);
    let child = scene.add_to_parent(child, parent);

    assert_eq!(scene.world_position(child), Vec3::new(2.0, 2.0, 3.0));
}

// ============================================================================
// Components
// ============================================================================

#[test]
fn scene_finds_nearest_rig_in_ancestors() {
    let mut scene = Scene::new();
    let outer = scene.create_node();
    let inner = scene.add_to_parent(Node::new(), outer);
    let leaf = scene.add_to_parent(Node::new(), inner);

    let outer_rig = BindingSystem::create_rig(&mut scene, outer, Some(SkeletonInstance::new(skeleton())));
    assert_eq!(scene.find_rig_in_ancestors(leaf), Some(outer_rig));

    let inner_rig = BindingSystem::create_rig(&mut scene, inner, Some(SkeletonInstance::new(skeleton())));
    assert_eq!(scene.find_rig_in_ancestors(leaf), Some(inner_rig));
    assert_eq!(scene.find_rig_in_ancestors(outer), Some(outer_rig));
}

#[test]
fn scene_remove_node_drops_its_binding() {
    let mut scene = Scene::new();
    let rig_node = scene.create_node();
    let rig = BindingSystem::create_rig(&mut scene, rig_node, Some(SkeletonInstance::new(skeleton())));
    let node = scene.add_to_parent(Node::new(), rig_node);
    let key = BindingSystem::attach(&mut scene, node, BindingSettings::follow("root")).unwrap();

    scene.remove_node(node);

    assert!(scene.bone_binding(key).is_none());
    assert!(scene.binding_of(node).is_none());
    let set = scene.rig(rig).unwrap();
    assert!(set.registered().is_empty());
    assert!(set.reset_subscribers().is_empty());
}

#[test]
fn scene_remove_rig_node_orphans_foreign_bindings() {
    let mut scene = Scene::new();
    let rig_node = scene.create_node();
    let rig = BindingSystem::create_rig(&mut scene, rig_node, Some(SkeletonInstance::new(skeleton())));
    let node = scene.add_to_parent(Node::new(), rig_node);
    let key = BindingSystem::attach(&mut scene, node, BindingSettings::follow("root")).unwrap();

    // Move the bound node away first so it survives the rig removal.
    let elsewhere = scene.create_node();
    scene.attach(node, elsewhere);
    scene.remove_node(rig_node);

    assert!(scene.rig(rig).is_none());
    let binding = scene.bone_binding(key).unwrap();
    assert!(!binding.is_valid());
    assert!(binding.rig().is_none());
    assert_eq!(
        BindingSystem::synchronize(&mut scene, key),
        myth_rig::SyncStatus::Inactive
    );
}
