use std::sync::Arc;

use glam::{Affine2, Vec2};

use crate::skeleton::BoneKey;

/// How a bone inherits its parent's world transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformMode {
    /// Full inheritance: rotation, scale, reflection and translation.
    #[default]
    Normal,
    /// Only the parent's translation is inherited.
    OnlyTranslation,
    /// Parent scale is inherited, parent rotation and reflection are not.
    NoRotationOrReflection,
    /// Parent rotation and reflection are inherited, parent scale is not.
    NoScale,
    /// Parent rotation is inherited, parent scale and reflection are not.
    NoScaleOrReflection,
}

impl TransformMode {
    #[inline]
    #[must_use]
    pub fn inherits_rotation(self) -> bool {
        matches!(self, Self::Normal | Self::NoScale | Self::NoScaleOrReflection)
    }

    #[inline]
    #[must_use]
    pub fn inherits_scale(self) -> bool {
        matches!(self, Self::Normal | Self::NoRotationOrReflection)
    }
}

/// Static per-bone data: name, hierarchy and setup pose.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneData {
    pub name: String,
    /// Index of the parent in the skeleton's bone list. Must precede this bone.
    pub parent: Option<usize>,
    pub transform_mode: TransformMode,

    // === Setup pose ===
    pub x: f32,
    pub y: f32,
    /// Degrees.
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl BoneData {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            transform_mode: TransformMode::Normal,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_transform_mode(mut self, mode: TransformMode) -> Self {
        self.transform_mode = mode;
        self
    }

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }
}

/// A live bone of a skeleton instance.
///
/// The local pose fields are plain public data: animation and bone bindings
/// write them in place. `world_rotation_x` is derived by
/// [`Skeleton::update_world_transform`](crate::skeleton::Skeleton::update_world_transform).
#[derive(Debug, Clone)]
pub struct Bone {
    data: Arc<BoneData>,
    pub(crate) parent: Option<BoneKey>,

    // === Local pose ===
    pub x: f32,
    pub y: f32,
    /// Degrees.
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Rotation (degrees) last used to compute the world transform.
    /// Deformation reads this one, so writers keep it consistent with `rotation`.
    pub applied_rotation: f32,

    // === World transform (derived) ===
    pub(crate) world: Affine2,
}

impl Bone {
    #[must_use]
    pub(crate) fn new(data: Arc<BoneData>, parent: Option<BoneKey>) -> Self {
        let mut bone = Self {
            data,
            parent,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            applied_rotation: 0.0,
            world: Affine2::IDENTITY,
        };
        bone.set_to_setup_pose();
        bone
    }

    #[inline]
    #[must_use]
    pub fn data(&self) -> &BoneData {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.data.name
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<BoneKey> {
        self.parent
    }

    /// Restores the local pose from the bone's setup data.
    pub fn set_to_setup_pose(&mut self) {
        let data = Arc::clone(&self.data);
        self.x = data.x;
        self.y = data.y;
        self.rotation = data.rotation;
        self.scale_x = data.scale_x;
        self.scale_y = data.scale_y;
        self.applied_rotation = data.rotation;
    }

    /// World rotation of the bone's local X axis, in degrees.
    #[inline]
    #[must_use]
    pub fn world_rotation_x(&self) -> f32 {
        let axis = self.world.matrix2.x_axis;
        axis.y.atan2(axis.x).to_degrees()
    }

    /// World rotation of the bone's local Y axis, in degrees.
    #[inline]
    #[must_use]
    pub fn world_rotation_y(&self) -> f32 {
        let axis = self.world.matrix2.y_axis;
        axis.y.atan2(axis.x).to_degrees() - 90.0
    }

    #[inline]
    #[must_use]
    pub fn world_position(&self) -> Vec2 {
        self.world.translation
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine2 {
        &self.world
    }
}
