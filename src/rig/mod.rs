//! Rig containers
//!
//! A [`RigBindingSet`] sits on the node that represents a skeleton in the
//! scene. It owns the [`SkeletonInstance`](crate::skeleton::SkeletonInstance),
//! keeps the list of bone bindings registered under it and the list of
//! bindings that want to hear about resets.

pub mod binding_set;

pub use binding_set::RigBindingSet;
