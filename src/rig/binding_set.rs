use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::binding::BoneBinding;
use crate::scene::{BindingKey, NodeHandle};
use crate::skeleton::{BoneKey, Skeleton, SkeletonInstance};

/// Container that aggregates the bone bindings of one rig.
///
/// The set never owns bindings; it only stores their keys. Dispatching
/// resets and frame updates to them is done by
/// [`BindingSystem`](crate::binding::BindingSystem), which has access to the
/// binding pool.
#[derive(Debug)]
pub struct RigBindingSet {
    /// Node carrying this rig; its world rotation is the rig's reference frame.
    root: NodeHandle,
    instance: Option<SkeletonInstance>,

    // Registration order is the update order.
    registered: Vec<BindingKey>,
    reset_subscribers: SmallVec<[BindingKey; 8]>,

    generation: u64,
}

impl RigBindingSet {
    #[must_use]
    pub fn new(root: NodeHandle, instance: Option<SkeletonInstance>) -> Self {
        Self {
            root,
            instance,
            registered: Vec::new(),
            reset_subscribers: SmallVec::new(),
            generation: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    // ========================================================================
    // Skeleton access
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn instance(&self) -> Option<&SkeletonInstance> {
        self.instance.as_ref()
    }

    #[inline]
    pub fn instance_mut(&mut self) -> Option<&mut SkeletonInstance> {
        self.instance.as_mut()
    }

    /// Replaces the skeleton instance and returns the previous one.
    ///
    /// Advances the generation, so bindings drop bone keys taken from the old
    /// skeleton on their next synchronization. Validity is only recomputed
    /// by a reset, see
    /// [`BindingSystem::reload_rig`](crate::binding::BindingSystem::reload_rig).
    pub fn set_instance(&mut self, instance: Option<SkeletonInstance>) -> Option<SkeletonInstance> {
        self.bump_generation();
        std::mem::replace(&mut self.instance, instance)
    }

    /// True when an instance is present and reports itself loaded.
    #[inline]
    #[must_use]
    pub fn skeleton_valid(&self) -> bool {
        self.instance.as_ref().is_some_and(SkeletonInstance::is_valid)
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> Option<&Skeleton> {
        self.instance.as_ref().map(SkeletonInstance::skeleton)
    }

    #[inline]
    pub fn skeleton_mut(&mut self) -> Option<&mut Skeleton> {
        self.instance.as_mut().map(SkeletonInstance::skeleton_mut)
    }

    #[must_use]
    pub fn find_bone_by_name(&self, name: &str) -> Option<BoneKey> {
        self.skeleton()?.find_bone(name)
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers a binding. Registering twice keeps a single entry.
    pub fn register(&mut self, binding: BindingKey) {
        if !self.registered.contains(&binding) {
            self.registered.push(binding);
        }
    }

    /// Returns whether the binding was registered.
    pub fn unregister(&mut self, binding: BindingKey) -> bool {
        let before = self.registered.len();
        self.registered.retain(|k| *k != binding);
        before != self.registered.len()
    }

    #[inline]
    #[must_use]
    pub fn is_registered(&self, binding: BindingKey) -> bool {
        self.registered.contains(&binding)
    }

    #[inline]
    #[must_use]
    pub fn registered(&self) -> &[BindingKey] {
        &self.registered
    }

    // ========================================================================
    // Reset notification
    // ========================================================================

    /// Subscribes a binding to reset broadcasts. Never duplicates an entry.
    pub fn subscribe_reset(&mut self, binding: BindingKey) {
        if !self.reset_subscribers.contains(&binding) {
            self.reset_subscribers.push(binding);
        }
    }

    /// Returns whether the binding was subscribed.
    pub fn unsubscribe_reset(&mut self, binding: BindingKey) -> bool {
        let before = self.reset_subscribers.len();
        self.reset_subscribers.retain(|k| *k != binding);
        before != self.reset_subscribers.len()
    }

    #[inline]
    #[must_use]
    pub fn reset_subscribers(&self) -> &[BindingKey] {
        &self.reset_subscribers
    }

    /// Bumped on every instance swap and every reset broadcast. Bone keys are
    /// only meaningful within the generation they were resolved in.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    // ========================================================================
    // Frame guard
    // ========================================================================

    /// Clears the per-frame override guard of every registered binding.
    ///
    /// Must run exactly once per frame, before the first synchronization pass.
    pub fn begin_frame(&self, bindings: &mut SlotMap<BindingKey, BoneBinding>) {
        for &key in &self.registered {
            if let Some(binding) = bindings.get_mut(key) {
                binding.frame_sync_done = false;
            }
        }
    }
}
