//! Bone bindings
//!
//! Keeps a scene node and a skeleton bone synchronized once per frame:
//!
//! - [`BindingMode::Follow`]: the node copies the bone (position, roll, scale).
//! - [`BindingMode::Override`]: the bone is blended toward the node, optionally
//!   measured relative to a reference node.
//!
//! [`BoneBinding`] holds the per-pair state and the synchronization routine;
//! [`BindingSystem`] drives attach/detach, rig resets and the frame loop.

pub mod bone_binding;
pub mod settings;
pub mod system;

pub use bone_binding::{BoneBinding, SyncStatus};
pub use settings::{BindingMode, BindingSettings};
pub use system::BindingSystem;
