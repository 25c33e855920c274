use glam::Vec3;
use slotmap::SlotMap;

use crate::binding::settings::{BindingMode, BindingSettings};
use crate::errors::{Result, RigError};
use crate::math;
use crate::rig::RigBindingSet;
use crate::scene::node::Node;
use crate::scene::transform_system;
use crate::scene::{BindingKey, NodeHandle, RigKey};
use crate::skeleton::{Bone, BoneKey, Skeleton};

/// What a call to [`BoneBinding::synchronize`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncStatus {
    /// Not registered with a rig, or the rig/skeleton is not usable.
    Inactive,
    /// No bone handle and no bone name configured.
    Unconfigured,
    /// The configured bone name is not in the live skeleton.
    BoneMissing,
    /// Override mode already ran this frame.
    AlreadySynced,
    /// Bone pose was copied onto the node.
    Followed,
    /// Node transform was blended into the bone.
    Overridden,
}

impl SyncStatus {
    /// True when the call wrote to the node or the bone.
    #[inline]
    #[must_use]
    pub fn applied(self) -> bool {
        matches!(self, Self::Followed | Self::Overridden)
    }
}

/// Binds one scene node to one skeleton bone.
///
/// # Lifecycle
///
/// ```text
/// Uninitialized ──attach + rig found──▶ initialize ──▶ Valid | Invalid
///       ▲                                   ▲
///       └──────────── teardown ─────────────┴── reset broadcast
/// ```
///
/// Lifecycle transitions are driven by
/// [`BindingSystem`](crate::binding::BindingSystem); the binding never looks
/// itself up in the scene.
///
/// # Frame guard
///
/// In [`BindingMode::Override`] the bone is written at most once per frame.
/// The guard is cleared by the owning rig
/// ([`RigBindingSet::begin_frame`]), never by the binding.
///
/// Two bindings overriding the same bone in one frame is a configuration
/// error; the last writer wins.
#[derive(Debug, Clone)]
pub struct BoneBinding {
    pub mode: BindingMode,
    /// Resolved bone. Cleared on every initialization, and whenever the rig's
    /// generation moves past the one the key was taken from, so a swapped
    /// skeleton is looked up again by name.
    pub bone: Option<BoneKey>,
    pub bone_name: String,
    pub reference_node: Option<NodeHandle>,

    pub sync_position: bool,
    pub sync_rotation: bool,
    pub sync_scale: bool,
    pub sync_depth: bool,

    override_weight: f32,

    // === Derived state ===
    valid: bool,
    incompatible_transform_mode: bool,
    pub(crate) frame_sync_done: bool,
    // Rig generation `bone` belongs to.
    bone_generation: u64,

    // === Non-owning handles ===
    rig: Option<RigKey>,
    pub(crate) node: Option<NodeHandle>,
    rig_root: Option<NodeHandle>,
}

impl BoneBinding {
    #[must_use]
    pub fn new(settings: BindingSettings) -> Self {
        Self {
            mode: settings.mode,
            bone: None,
            bone_name: settings.bone_name,
            reference_node: settings.reference_node,
            sync_position: settings.sync_position,
            sync_rotation: settings.sync_rotation,
            sync_scale: settings.sync_scale,
            sync_depth: settings.sync_depth,
            override_weight: settings.override_weight.clamp(0.0, 1.0),
            valid: false,
            incompatible_transform_mode: false,
            frame_sync_done: false,
            bone_generation: 0,
            rig: None,
            node: None,
            rig_root: None,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn override_weight(&self) -> f32 {
        self.override_weight
    }

    /// Sets the override blend factor, clamped to `[0, 1]`.
    pub fn set_override_weight(&mut self, weight: f32) {
        self.override_weight = weight.clamp(0.0, 1.0);
    }

    /// True when the rig and its skeleton were usable at the last initialization.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Advisory: the bone does not inherit scale, which a scene node cannot mimic.
    #[inline]
    #[must_use]
    pub fn is_transform_incompatible(&self) -> bool {
        self.incompatible_transform_mode
    }

    #[inline]
    #[must_use]
    pub fn frame_sync_done(&self) -> bool {
        self.frame_sync_done
    }

    #[inline]
    #[must_use]
    pub fn rig(&self) -> Option<RigKey> {
        self.rig
    }

    #[inline]
    #[must_use]
    pub fn node(&self) -> Option<NodeHandle> {
        self.node
    }

    #[inline]
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.rig.is_some()
    }

    /// A bone whose transform mode does not inherit scale cannot be mirrored
    /// by a scene node, whose scale always propagates to children.
    #[inline]
    #[must_use]
    pub fn bone_transform_mode_incompatible(bone: &Bone) -> bool {
        !bone.data().transform_mode.inherits_scale()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Registers with a rig and subscribes to its reset broadcasts.
    pub(crate) fn register(&mut self, key: BindingKey, rig_key: RigKey, rig: &mut RigBindingSet) {
        rig.register(key);
        rig.subscribe_reset(key);
        self.rig = Some(rig_key);
    }

    /// Captures the owning node, drops the cached bone and recomputes validity.
    ///
    /// Returns the new validity.
    pub(crate) fn initialize(
        &mut self,
        key: BindingKey,
        node: NodeHandle,
        rigs: &mut SlotMap<RigKey, RigBindingSet>,
    ) -> bool {
        self.bone = None;
        self.node = Some(node);

        let rig = self.rig.and_then(|k| rigs.get_mut(k));
        self.valid = rig.as_ref().is_some_and(|r| r.skeleton_valid());

        match rig {
            Some(rig) if self.valid => {
                self.rig_root = Some(rig.root());
                self.bone_generation = rig.generation();
                rig.subscribe_reset(key);
            }
            _ => self.rig_root = None,
        }

        log::debug!(
            "Bone binding '{}' initialized (valid: {})",
            self.bone_name,
            self.valid
        );
        self.valid
    }

    /// Unsubscribes and unregisters from the rig. Safe to call repeatedly or
    /// without ever having registered.
    pub(crate) fn teardown(&mut self, key: BindingKey, rigs: &mut SlotMap<RigKey, RigBindingSet>) {
        if let Some(rig) = self.rig.take().and_then(|k| rigs.get_mut(k)) {
            rig.unsubscribe_reset(key);
            rig.unregister(key);
        }
        self.forget_rig();
    }

    /// Drops every rig-derived handle without touching the rig itself.
    pub(crate) fn forget_rig(&mut self) {
        self.rig = None;
        self.rig_root = None;
        self.bone = None;
        self.valid = false;
    }

    // ========================================================================
    // Synchronization
    // ========================================================================

    /// Runs one synchronization step in the configured direction.
    ///
    /// Expected failures (invalid rig, unknown bone, guard already set) are
    /// reported through [`SyncStatus`] and never abort the caller.
    pub fn synchronize(
        &mut self,
        nodes: &mut SlotMap<NodeHandle, Node>,
        rigs: &mut SlotMap<RigKey, RigBindingSet>,
    ) -> SyncStatus {
        if !self.valid {
            return SyncStatus::Inactive;
        }
        let (Some(rig_key), Some(node), Some(rig_root)) = (self.rig, self.node, self.rig_root) else {
            return SyncStatus::Inactive;
        };
        if !nodes.contains_key(node) {
            log::warn!("Bone binding '{}' lost its node", self.bone_name);
            return SyncStatus::Inactive;
        }
        let Some(rig) = rigs.get_mut(rig_key) else {
            self.valid = false;
            return SyncStatus::Inactive;
        };
        let generation = rig.generation();
        let Some(skeleton) = rig.skeleton_mut() else {
            self.valid = false;
            return SyncStatus::Inactive;
        };

        let bone_key = match self.resolve_bone(skeleton, generation) {
            Ok(Some(key)) => key,
            Ok(None) => return SyncStatus::Unconfigured,
            Err(err) => {
                log::error!("{err}");
                return SyncStatus::BoneMissing;
            }
        };

        let mirror_sign = skeleton.mirror_sign();
        let Some(bone) = skeleton.bone_mut(bone_key) else {
            return SyncStatus::BoneMissing;
        };

        match self.mode {
            BindingMode::Follow => {
                self.follow(bone, mirror_sign, node, rig_root, nodes);
                SyncStatus::Followed
            }
            BindingMode::Override => {
                if self.frame_sync_done {
                    return SyncStatus::AlreadySynced;
                }
                self.apply_override(bone, node, nodes);
                self.frame_sync_done = true;
                SyncStatus::Overridden
            }
        }
    }

    /// Returns the cached bone, or looks it up by name.
    ///
    /// A key cached under an older rig generation may index an unrelated
    /// bone of a swapped-in skeleton, so it is dropped. `Ok(None)` means
    /// nothing is configured yet.
    fn resolve_bone(&mut self, skeleton: &Skeleton, generation: u64) -> Result<Option<BoneKey>> {
        if self.bone_generation != generation {
            self.bone = None;
            self.bone_generation = generation;
        }
        if let Some(key) = self.bone {
            if skeleton.bone(key).is_some() {
                return Ok(Some(key));
            }
            self.bone = None;
        }

        if self.bone_name.is_empty() {
            return Ok(None);
        }

        let key = skeleton
            .find_bone(&self.bone_name)
            .ok_or_else(|| RigError::BoneNotFound(self.bone_name.clone()))?;
        self.bone = Some(key);
        Ok(Some(key))
    }

    /// Bone → node.
    fn follow(
        &mut self,
        bone: &Bone,
        mirror_sign: f32,
        node: NodeHandle,
        rig_root: NodeHandle,
        nodes: &mut SlotMap<NodeHandle, Node>,
    ) {
        if self.sync_position
            && let Some(n) = nodes.get_mut(node)
        {
            let z = if self.sync_depth { 0.0 } else { n.transform.position.z };
            n.transform.position = Vec3::new(bone.x, bone.y, z);
        }

        if self.sync_rotation {
            if bone.data().transform_mode.inherits_rotation() {
                // The rig root is the reference frame; writing it would feed
                // back into the next call.
                if node == rig_root {
                    log::trace!("Bone binding '{}' sits on its rig root; rotation skipped", self.bone_name);
                } else {
                    // Keep the rig's pitch and yaw, replace roll only.
                    let mut euler = math::euler_degrees(transform_system::world_rotation(nodes, rig_root));
                    euler.z += bone.world_rotation_x() * mirror_sign;
                    transform_system::set_world_rotation(nodes, node, math::quat_from_euler_degrees(euler));
                }
            } else if let Some(n) = nodes.get_mut(node) {
                n.transform.rotation = math::roll_to_quat(bone.applied_rotation);
            }
        }

        if self.sync_scale {
            if let Some(n) = nodes.get_mut(node) {
                n.transform.scale = Vec3::new(bone.scale_x, bone.scale_y, 1.0);
            }
            self.incompatible_transform_mode = Self::bone_transform_mode_incompatible(bone);
        }
    }

    /// Node → bone, blended by the override weight. Depth is never written.
    fn apply_override(&mut self, bone: &mut Bone, node: NodeHandle, nodes: &SlotMap<NodeHandle, Node>) {
        let weight = self.override_weight;

        let reference = self.reference_node.filter(|&r| {
            let live = nodes.contains_key(r);
            if !live {
                log::warn!(
                    "Bone binding '{}' has a stale reference node; using local space",
                    self.bone_name
                );
            }
            live
        });

        let Some(transform) = nodes.get(node).map(|n| &n.transform) else {
            return;
        };

        match reference {
            None => {
                if self.sync_position {
                    bone.x = math::lerp(bone.x, transform.position.x, weight);
                    bone.y = math::lerp(bone.y, transform.position.y, weight);
                }
                if self.sync_rotation {
                    blend_rotation(bone, transform.roll_degrees(), weight);
                }
                if self.sync_scale {
                    blend_scale(bone, transform.scale, weight);
                }
            }
            Some(reference) => {
                if self.sync_position {
                    let world = transform_system::world_position(nodes, node);
                    let pos = transform_system::inverse_transform_point(nodes, reference, world);
                    bone.x = math::lerp(bone.x, pos.x, weight);
                    bone.y = math::lerp(bone.y, pos.y, weight);
                }
                if self.sync_rotation {
                    let up = transform_system::world_rotation(nodes, node) * Vec3::Y;
                    let local_up = transform_system::inverse_transform_direction(nodes, reference, up);
                    blend_rotation(bone, math::look_roll_degrees(local_up), weight);
                }
                if self.sync_scale {
                    blend_scale(bone, transform.scale, weight);
                }
                self.incompatible_transform_mode = Self::bone_transform_mode_incompatible(bone);
            }
        }
    }
}

impl Default for BoneBinding {
    fn default() -> Self {
        Self::new(BindingSettings::default())
    }
}

impl From<BindingSettings> for BoneBinding {
    fn from(settings: BindingSettings) -> Self {
        Self::new(settings)
    }
}

/// Writes the blended angle to both the current and the applied rotation.
fn blend_rotation(bone: &mut Bone, target: f32, weight: f32) {
    let angle = math::lerp_angle(bone.rotation, target, weight);
    bone.rotation = angle;
    bone.applied_rotation = angle;
}

fn blend_scale(bone: &mut Bone, target: Vec3, weight: f32) {
    bone.scale_x = math::lerp(bone.scale_x, target.x, weight);
    bone.scale_y = math::lerp(bone.scale_y, target.y, weight);
}
