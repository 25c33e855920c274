use glam::{Affine3A, Quat, Vec3};

/// Transform component
///
/// Wraps a node's position, rotation and scale (TRS) together with the
/// cached matrices and the dirty-check logic.
#[derive(Debug, Clone)]
pub struct Transform {
    // === Public properties ===
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    // === Matrix cache (Internal) ===
    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    // === Dirty-check state (Private) ===
    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    /// Creates a transform from explicit TRS values.
    #[must_use]
    pub fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            ..Self::new()
        }
    }

    // ========================================================================
    // Shadow state check
    // ========================================================================

    /// Recomputes the local matrix if any TRS value changed since the last call.
    ///
    /// Returns whether the matrix was rebuilt.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix = self.compose();

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    /// Builds the local matrix from the current TRS values without touching the cache.
    #[inline]
    #[must_use]
    pub fn compose(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    // ========================================================================
    // Getters & Helpers
    // ========================================================================

    /// Sets a pure rotation around +Z, in degrees.
    pub fn set_roll_degrees(&mut self, degrees: f32) {
        self.rotation = crate::math::roll_to_quat(degrees);
    }

    /// Rotation around +Z in degrees, normalized to `[0, 360)`.
    #[must_use]
    pub fn roll_degrees(&self) -> f32 {
        crate::math::roll_degrees(self.rotation)
    }

    /// Cached local matrix.
    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    /// Cached world matrix, refreshed by [`crate::scene::transform_system`].
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    pub fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
    }

    /// Forces the next [`Self::update_local_matrix`] to rebuild.
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
