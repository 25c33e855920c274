use crate::binding::bone_binding::{BoneBinding, SyncStatus};
use crate::binding::settings::BindingSettings;
use crate::errors::{Result, RigError};
use crate::rig::RigBindingSet;
use crate::scene::{BindingKey, NodeHandle, RigKey, Scene};
use crate::skeleton::SkeletonInstance;

/// Bone binding system.
///
/// Host-facing entry points for the binding lifecycle. The host decides when
/// they run; a typical frame looks like:
///
/// ```rust,ignore
/// BindingSystem::begin_frame(&mut scene);
/// // ... animation writes bone poses ...
/// BindingSystem::update(&mut scene);
/// scene.update_matrix_world();
/// ```
pub struct BindingSystem;

impl BindingSystem {
    // ========================================================================
    // Rigs
    // ========================================================================

    /// Puts a rig container on `node`.
    ///
    /// If the node already carries a rig, its instance is replaced and a
    /// reset is broadcast instead.
    pub fn create_rig(scene: &mut Scene, node: NodeHandle, instance: Option<SkeletonInstance>) -> RigKey {
        if let Some(&existing) = scene.rig_components.get(node) {
            log::warn!("Node already carries a rig; reloading it instead");
            Self::reload_rig(scene, existing, instance);
            return existing;
        }

        let key = scene.rigs.insert(RigBindingSet::new(node, instance));
        scene.rig_components.insert(node, key);
        key
    }

    /// Broadcasts a reset: every subscribed binding re-initializes and, when
    /// valid, synchronizes immediately.
    pub fn reset_rig(scene: &mut Scene, rig: RigKey) {
        let Some(set) = scene.rigs.get_mut(rig) else {
            return;
        };
        let generation = set.bump_generation();
        let subscribers = set.reset_subscribers().to_vec();
        log::debug!(
            "Rig reset (generation {generation}): re-initializing {} binding(s)",
            subscribers.len()
        );

        for key in subscribers {
            Self::initialize(scene, key);
        }
    }

    /// Swaps the rig's skeleton instance and broadcasts a reset.
    pub fn reload_rig(
        scene: &mut Scene,
        rig: RigKey,
        instance: Option<SkeletonInstance>,
    ) -> Option<SkeletonInstance> {
        let previous = scene.rigs.get_mut(rig)?.set_instance(instance);
        Self::reset_rig(scene, rig);
        previous
    }

    // ========================================================================
    // Bindings
    // ========================================================================

    /// Adds a bone binding to `node` and enables it.
    ///
    /// A binding already present on the node is removed first.
    pub fn attach(scene: &mut Scene, node: NodeHandle, settings: BindingSettings) -> Result<BindingKey> {
        if !scene.nodes.contains_key(node) {
            return Err(RigError::StaleHandle("node"));
        }
        if let Some(&existing) = scene.binding_components.get(node) {
            Self::remove(scene, existing);
        }

        let mut binding = BoneBinding::new(settings);
        binding.node = Some(node);
        let key = scene.bone_bindings.insert(binding);
        scene.binding_components.insert(node, key);
        Self::enable(scene, key);
        Ok(key)
    }

    /// Re-runs rig discovery for a detached binding, e.g. after reparenting.
    pub fn reattach(scene: &mut Scene, key: BindingKey) {
        Self::detach(scene, key);
        Self::enable(scene, key);
    }

    /// Unsubscribes and unregisters the binding. The component stays on its
    /// node. Idempotent.
    pub fn detach(scene: &mut Scene, key: BindingKey) {
        if let Some(binding) = scene.bone_bindings.get_mut(key) {
            binding.teardown(key, &mut scene.rigs);
        }
    }

    /// Detaches and deletes the binding.
    pub fn remove(scene: &mut Scene, key: BindingKey) -> Option<BoneBinding> {
        Self::detach(scene, key);
        if let Some(node) = find_owner(scene, key) {
            scene.binding_components.remove(node);
        }
        scene.bone_bindings.remove(key)
    }

    // ========================================================================
    // Per-frame
    // ========================================================================

    /// Clears the override guard of every registered binding. Call exactly
    /// once per frame.
    pub fn begin_frame(scene: &mut Scene) {
        for rig in scene.rigs.values() {
            rig.begin_frame(&mut scene.bone_bindings);
        }
    }

    /// Synchronizes every registered binding of every rig, in registration order.
    pub fn update(scene: &mut Scene) {
        let keys: Vec<BindingKey> = scene
            .rigs
            .values()
            .flat_map(|rig| rig.registered().iter().copied())
            .collect();

        for key in keys {
            Self::synchronize(scene, key);
        }
    }

    /// Synchronizes a single binding.
    pub fn synchronize(scene: &mut Scene, key: BindingKey) -> SyncStatus {
        match scene.bone_bindings.get_mut(key) {
            Some(binding) => binding.synchronize(&mut scene.nodes, &mut scene.rigs),
            None => SyncStatus::Inactive,
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Finds the enclosing rig, registers and initializes. A binding outside
    /// any rig stays inert.
    fn enable(scene: &mut Scene, key: BindingKey) {
        let Some(node) = find_owner(scene, key) else {
            return;
        };
        let Some(rig_key) = scene.find_rig_in_ancestors(node) else {
            log::debug!("Bone binding has no enclosing rig; staying inactive");
            return;
        };

        let (Some(binding), Some(rig)) = (scene.bone_bindings.get_mut(key), scene.rigs.get_mut(rig_key)) else {
            return;
        };
        binding.register(key, rig_key, rig);
        Self::initialize(scene, key);
    }

    fn initialize(scene: &mut Scene, key: BindingKey) {
        let Some(node) = find_owner(scene, key) else {
            return;
        };
        let Some(binding) = scene.bone_bindings.get_mut(key) else {
            return;
        };
        if binding.initialize(key, node, &mut scene.rigs) {
            binding.synchronize(&mut scene.nodes, &mut scene.rigs);
        }
    }
}

/// Node carrying the binding, as recorded by [`BindingSystem::attach`].
fn find_owner(scene: &Scene, key: BindingKey) -> Option<NodeHandle> {
    scene
        .bone_bindings
        .get(key)?
        .node()
        .filter(|&node| scene.binding_components.get(node) == Some(&key))
}
