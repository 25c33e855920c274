use crate::scene::NodeHandle;
use crate::scene::transform::Transform;
use glam::Affine3A;

/// A minimal scene node: hierarchy, transform and a name.
///
/// Components (rigs, bone bindings) live in the [`Scene`](crate::scene::Scene)
/// component maps, keyed by [`NodeHandle`], so nodes stay small.
#[derive(Debug, Clone)]
pub struct Node {
    // === Core Hierarchy ===
    /// Parent node handle (None for root nodes)
    pub(crate) parent: Option<NodeHandle>,
    /// Child node handles
    pub(crate) children: Vec<NodeHandle>,

    // === Core Spatial Data ===
    pub transform: Transform,

    pub name: String,
}

impl Node {
    /// Creates a new node with default transform.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            name: String::new(),
        }
    }

    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::new()
        }
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Returns the cached world matrix.
    ///
    /// Only current after [`Scene::update_matrix_world`](crate::scene::Scene::update_matrix_world);
    /// use [`transform_system::compute_world_matrix`](crate::scene::transform_system::compute_world_matrix)
    /// for an always-fresh value.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
