//! Bone Binding Configuration
//!
//! [`BindingSettings`] is the user-facing configuration of a
//! [`BoneBinding`](crate::binding::BoneBinding). It is a plain value: build it
//! with struct-update syntax or the chainable `with_*` helpers and hand it to
//! [`BindingSystem::attach`](crate::binding::BindingSystem::attach).
//!
//! ```rust,ignore
//! use myth_rig::binding::{BindingMode, BindingSettings};
//!
//! // Node follows the "head" bone.
//! let follow = BindingSettings::follow("head");
//!
//! // Node drives the "hand" bone at half authority, scale untouched.
//! let ik_target = BindingSettings::override_bone("hand")
//!     .with_override_weight(0.5)
//!     .with_scale(false);
//! ```

use crate::scene::NodeHandle;

/// Direction of synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BindingMode {
    /// Bone → node. The node copies the bone's pose every call.
    #[default]
    Follow,
    /// Node → bone, blended by the override weight, at most once per frame.
    Override,
}

/// Configuration of a bone binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingSettings {
    pub mode: BindingMode,
    /// Bone to resolve against the live skeleton.
    pub bone_name: String,
    /// Override mode measures position and rotation relative to this node.
    pub reference_node: Option<NodeHandle>,

    /// Channel flags. Off in [`Default`]; the `follow`/`override_bone`
    /// constructors turn all three on.
    pub sync_position: bool,
    pub sync_rotation: bool,
    pub sync_scale: bool,
    /// Follow mode writes `z = 0` when set; otherwise the node keeps its depth.
    pub sync_depth: bool,

    /// Blend factor in `[0, 1]`. Values outside are clamped when applied.
    pub override_weight: f32,
}

impl Default for BindingSettings {
    fn default() -> Self {
        Self {
            mode: BindingMode::Follow,
            bone_name: String::new(),
            reference_node: None,
            sync_position: false,
            sync_rotation: false,
            sync_scale: false,
            sync_depth: true,
            override_weight: 1.0,
        }
    }
}

impl BindingSettings {
    /// Follow-mode settings for the named bone, syncing every channel.
    #[must_use]
    pub fn follow(bone_name: &str) -> Self {
        Self {
            bone_name: bone_name.to_string(),
            ..Self::all_channels()
        }
    }

    /// Override-mode settings for the named bone.
    #[must_use]
    pub fn override_bone(bone_name: &str) -> Self {
        Self {
            mode: BindingMode::Override,
            bone_name: bone_name.to_string(),
            ..Self::all_channels()
        }
    }

    fn all_channels() -> Self {
        Self {
            sync_position: true,
            sync_rotation: true,
            sync_scale: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: BindingMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_bone_name(mut self, bone_name: &str) -> Self {
        self.bone_name = bone_name.to_string();
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: NodeHandle) -> Self {
        self.reference_node = Some(reference);
        self
    }

    #[must_use]
    pub fn with_position(mut self, enabled: bool) -> Self {
        self.sync_position = enabled;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, enabled: bool) -> Self {
        self.sync_rotation = enabled;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, enabled: bool) -> Self {
        self.sync_scale = enabled;
        self
    }

    #[must_use]
    pub fn with_depth(mut self, enabled: bool) -> Self {
        self.sync_depth = enabled;
        self
    }

    #[must_use]
    pub fn with_override_weight(mut self, weight: f32) -> Self {
        self.override_weight = weight.clamp(0.0, 1.0);
        self
    }
}
