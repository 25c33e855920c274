#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! # Myth Rig
//!
//! Binds scene graph nodes to the bones of a 2D skeleton.
//!
//! A [`RigBindingSet`] sits on the node representing the skeleton; each
//! [`BoneBinding`] below it pairs one node with one bone and synchronizes
//! them every frame, either bone → node ([`BindingMode::Follow`]) or
//! node → bone ([`BindingMode::Override`]).
//!
//! ```rust,ignore
//! use myth_rig::{BindingSettings, BindingSystem, Scene, Skeleton, SkeletonInstance};
//!
//! let mut scene = Scene::new();
//! let rig_node = scene.create_node_with_name("Rig");
//! let rig = BindingSystem::create_rig(&mut scene, rig_node, Some(SkeletonInstance::new(skeleton)));
//!
//! let hand = scene.add_to_parent(Node::with_name("Hand"), rig_node);
//! BindingSystem::attach(&mut scene, hand, BindingSettings::follow("hand"))?;
//!
//! // every frame
//! BindingSystem::begin_frame(&mut scene);
//! BindingSystem::update(&mut scene);
//! scene.update_matrix_world();
//! ```

pub mod binding;
pub mod errors;
pub mod math;
pub mod rig;
pub mod scene;
pub mod skeleton;

pub use binding::{BindingMode, BindingSettings, BindingSystem, BoneBinding, SyncStatus};
pub use errors::{Result, RigError};
pub use rig::RigBindingSet;
pub use scene::{BindingKey, Node, NodeHandle, RigKey, Scene, Transform};
pub use skeleton::{Bone, BoneData, BoneKey, Skeleton, SkeletonInstance, TransformMode};
