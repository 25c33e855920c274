//! Scene graph
//!
//! The node hierarchy bone bindings read from and write to:
//! - [`Node`]: hierarchy + transform
//! - [`Transform`]: position, rotation, scale with cached matrices
//! - [`Scene`]: node pool and component maps (rigs, bone bindings)
//! - [`transform_system`]: hierarchy updates and world/local conversions

pub mod node;
pub mod transform;
pub mod transform_system;
#[allow(clippy::module_inception)]
pub mod scene;

pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct RigKey;
    pub struct BindingKey;
}
