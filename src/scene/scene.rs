use glam::{Quat, Vec3};
use slotmap::{SlotMap, SparseSecondaryMap};

use crate::binding::BoneBinding;
use crate::rig::RigBindingSet;
use crate::scene::node::Node;
use crate::scene::transform_system;
use crate::scene::{BindingKey, NodeHandle, RigKey};

/// Scene graph structure
///
/// Pure data: the node hierarchy plus component pools. Rigs and bone bindings
/// are attached to nodes through the sparse component maps; their lifecycle
/// is driven by [`BindingSystem`](crate::binding::BindingSystem).
#[derive(Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    // ==== Component pools ====
    pub rigs: SlotMap<RigKey, RigBindingSet>,
    pub bone_bindings: SlotMap<BindingKey, BoneBinding>,

    // ==== Node -> component ====
    pub rig_components: SparseSecondaryMap<NodeHandle, RigKey>,
    pub binding_components: SparseSecondaryMap<NodeHandle, BindingKey>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Node management
    // ========================================================================

    /// Creates an unnamed root node.
    pub fn create_node(&mut self) -> NodeHandle {
        self.add_node(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::with_name(name))
    }

    /// Adds a node to the scene as a root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Adds a node directly under `parent`.
    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.add_node(child);
        self.attach(handle, parent);
        handle
    }

    /// Reparents `child` under `parent`.
    ///
    /// Bindings under the moved subtree keep their current rig; call
    /// [`BindingSystem::reattach`](crate::binding::BindingSystem::reattach)
    /// to rediscover it.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found during attach!");
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Cannot attach a node under its own descendant!");
            return;
        }

        // 1. Detach from old
        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }

        // 2. Attach to new
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }

        // 3. Update child
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Removes a node and its whole subtree, tearing down the bindings and
    /// rigs carried by the removed nodes.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let children = if let Some(node) = self.nodes.get(handle) {
            node.children.clone()
        } else {
            return;
        };

        for child in children {
            self.remove_node(child);
        }

        // Unlink from parent or root list
        let parent = self.nodes.get(handle).and_then(|n| n.parent);
        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(parent)
                && let Some(pos) = p.children.iter().position(|&x| x == handle)
            {
                p.children.remove(pos);
            }
        } else if let Some(pos) = self.root_nodes.iter().position(|&x| x == handle) {
            self.root_nodes.remove(pos);
        }

        // === Component cleanup ===
        if let Some(key) = self.binding_components.remove(handle)
            && let Some(mut binding) = self.bone_bindings.remove(key)
        {
            binding.teardown(key, &mut self.rigs);
        }
        if let Some(rig_key) = self.rig_components.remove(handle)
            && let Some(rig) = self.rigs.remove(rig_key)
        {
            for &key in rig.registered() {
                if let Some(binding) = self.bone_bindings.get_mut(key) {
                    binding.forget_rig();
                }
            }
        }

        self.nodes.remove(handle);
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.nodes.get(handle).map(|n| n.name.as_str())
    }

    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.name = name.to_string();
        }
    }

    /// Depth-first search for a node by name below (and including) `root`.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let node = self.nodes.get(root)?;
        if node.name == name {
            return Some(root);
        }
        node.children
            .iter()
            .find_map(|&child| self.find_node_by_name(child, name))
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(h) = current {
            if h == ancestor {
                return true;
            }
            current = self.nodes.get(h).and_then(|n| n.parent);
        }
        false
    }

    // ========================================================================
    // Component queries
    // ========================================================================

    /// Nearest rig on `node` or one of its ancestors.
    #[must_use]
    pub fn find_rig_in_ancestors(&self, node: NodeHandle) -> Option<RigKey> {
        let mut current = Some(node);
        while let Some(h) = current {
            if let Some(&rig) = self.rig_components.get(h) {
                return Some(rig);
            }
            current = self.nodes.get(h).and_then(|n| n.parent);
        }
        None
    }

    #[inline]
    #[must_use]
    pub fn rig(&self, key: RigKey) -> Option<&RigBindingSet> {
        self.rigs.get(key)
    }

    #[inline]
    pub fn rig_mut(&mut self, key: RigKey) -> Option<&mut RigBindingSet> {
        self.rigs.get_mut(key)
    }

    #[inline]
    #[must_use]
    pub fn bone_binding(&self, key: BindingKey) -> Option<&BoneBinding> {
        self.bone_bindings.get(key)
    }

    #[inline]
    pub fn bone_binding_mut(&mut self, key: BindingKey) -> Option<&mut BoneBinding> {
        self.bone_bindings.get_mut(key)
    }

    /// Bone binding carried by `node`, if any.
    #[inline]
    #[must_use]
    pub fn binding_of(&self, node: NodeHandle) -> Option<BindingKey> {
        self.binding_components.get(node).copied()
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Refreshes cached world matrices of the whole hierarchy.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy(&mut self.nodes, &self.root_nodes);
    }

    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Vec3 {
        transform_system::world_position(&self.nodes, handle)
    }

    #[must_use]
    pub fn world_rotation(&self, handle: NodeHandle) -> Quat {
        transform_system::world_rotation(&self.nodes, handle)
    }
}
