//! Skeleton data
//!
//! The rig side of a bone binding:
//! - [`Bone`] / [`BoneData`]: live pose and static setup data
//! - [`TransformMode`]: how a bone inherits its parent's transform
//! - [`Skeleton`]: bone pool, name lookup, mirror flags and world transforms
//! - [`SkeletonInstance`]: the owning component, which reports whether the
//!   skeleton is loaded

pub mod bone;
#[allow(clippy::module_inception)]
pub mod skeleton;
pub mod instance;

pub use bone::{Bone, BoneData, TransformMode};
pub use instance::SkeletonInstance;
pub use skeleton::Skeleton;

use slotmap::new_key_type;

new_key_type! {
    pub struct BoneKey;
}
