//! Transform System
//!
//! Hierarchy matrix updates and world/local space conversions, decoupled from
//! [`Scene`](crate::scene::Scene) so that callers only borrow the node pool.
//!
//! Two flavours of world-space access exist:
//! - [`update_hierarchy`] refreshes the cached `world_matrix` of every node
//!   (once per frame, after all writers ran).
//! - [`compute_world_matrix`] and friends walk the parent chain on demand and
//!   never read the cache, so they stay correct while bindings write local
//!   transforms in the middle of a frame.

use glam::{Affine3A, Quat, Vec3};
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Refreshes cached world matrices for every tree under `roots`.
///
/// Uses an explicit stack instead of recursion so deep rigs cannot overflow.
pub fn update_hierarchy(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    // (node, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);
        }

        let current_world = node.transform.world_matrix;
        for &child_handle in node.children.iter().rev() {
            stack.push((child_handle, current_world, world_needs_update));
        }
    }
}

/// Local-to-world matrix of `handle`, composed from the live TRS values of the
/// node and all of its ancestors. Returns identity for a stale handle.
#[must_use]
pub fn compute_world_matrix(nodes: &SlotMap<NodeHandle, Node>, handle: NodeHandle) -> Affine3A {
    let mut world = Affine3A::IDENTITY;
    let mut current = Some(handle);
    while let Some(h) = current {
        let Some(node) = nodes.get(h) else {
            break;
        };
        world = node.transform.compose() * world;
        current = node.parent;
    }
    world
}

/// World-space position of the node's origin.
#[must_use]
pub fn world_position(nodes: &SlotMap<NodeHandle, Node>, handle: NodeHandle) -> Vec3 {
    compute_world_matrix(nodes, handle).translation.into()
}

/// World rotation: the product of local rotations up the chain (scale ignored).
#[must_use]
pub fn world_rotation(nodes: &SlotMap<NodeHandle, Node>, handle: NodeHandle) -> Quat {
    let mut rotation = Quat::IDENTITY;
    let mut current = Some(handle);
    while let Some(h) = current {
        let Some(node) = nodes.get(h) else {
            break;
        };
        rotation = node.transform.rotation * rotation;
        current = node.parent;
    }
    rotation.normalize()
}

/// Assigns a world rotation by rewriting the node's local rotation relative
/// to its parent's world rotation.
pub fn set_world_rotation(nodes: &mut SlotMap<NodeHandle, Node>, handle: NodeHandle, rotation: Quat) {
    let parent_rotation = nodes
        .get(handle)
        .and_then(|n| n.parent)
        .map_or(Quat::IDENTITY, |p| world_rotation(nodes, p));

    if let Some(node) = nodes.get_mut(handle) {
        node.transform.rotation = (parent_rotation.inverse() * rotation).normalize();
    }
}

/// Transforms a world-space point into the local space of `handle`.
#[must_use]
pub fn inverse_transform_point(
    nodes: &SlotMap<NodeHandle, Node>,
    handle: NodeHandle,
    point: Vec3,
) -> Vec3 {
    compute_world_matrix(nodes, handle)
        .inverse()
        .transform_point3(point)
}

/// Transforms a world-space direction into the local space of `handle`.
///
/// Only rotation is undone; scale does not affect directions.
#[must_use]
pub fn inverse_transform_direction(
    nodes: &SlotMap<NodeHandle, Node>,
    handle: NodeHandle,
    direction: Vec3,
) -> Vec3 {
    world_rotation(nodes, handle).inverse() * direction
}
