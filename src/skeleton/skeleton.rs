use std::sync::Arc;

use glam::{Affine2, Mat2, Vec2};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::errors::{Result, RigError};
use crate::skeleton::BoneKey;
use crate::skeleton::bone::{Bone, BoneData, TransformMode};

/// A live skeleton: bones in parent-first order plus the rig-wide mirror flags.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub name: String,

    // === Core Data ===
    bones: SlotMap<BoneKey, Bone>,
    // Parent-first order, matches the `BoneData` list the skeleton was built from.
    order: Vec<BoneKey>,
    names: FxHashMap<String, BoneKey>,

    // === Mirroring ===
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Skeleton {
    /// Builds a skeleton from bone data. Every parent index must refer to a
    /// bone declared earlier in `bones`.
    pub fn new(name: &str, bones: Vec<BoneData>) -> Result<Self> {
        let mut pool: SlotMap<BoneKey, Bone> = SlotMap::with_capacity_and_key(bones.len());
        let mut order = Vec::with_capacity(bones.len());
        let mut names = FxHashMap::default();

        for (index, data) in bones.into_iter().enumerate() {
            let parent = match data.parent {
                Some(p) if p >= index => {
                    return Err(RigError::InvalidBoneParent {
                        bone: data.name,
                        parent: p,
                    });
                }
                Some(p) => Some(order[p]),
                None => None,
            };

            if names.contains_key(&data.name) {
                return Err(RigError::DuplicateBoneName(data.name));
            }

            let name = data.name.clone();
            let key = pool.insert(Bone::new(Arc::new(data), parent));
            order.push(key);
            names.insert(name, key);
        }

        let mut skeleton = Self {
            name: name.to_string(),
            bones: pool,
            order,
            names,
            flip_x: false,
            flip_y: false,
        };
        skeleton.update_world_transform();
        Ok(skeleton)
    }

    /// Looks a bone up by name.
    #[inline]
    #[must_use]
    pub fn find_bone(&self, name: &str) -> Option<BoneKey> {
        self.names.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, key: BoneKey) -> Option<&Bone> {
        self.bones.get(key)
    }

    #[inline]
    pub fn bone_mut(&mut self, key: BoneKey) -> Option<&mut Bone> {
        self.bones.get_mut(key)
    }

    /// Gets the root bone (the first declared bone).
    #[inline]
    #[must_use]
    pub fn root_bone(&self) -> Option<BoneKey> {
        self.order.first().copied()
    }

    /// Iterates bones in parent-first order.
    pub fn bones(&self) -> impl Iterator<Item = (BoneKey, &Bone)> {
        self.order.iter().map(|&key| (key, &self.bones[key]))
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.order.len()
    }

    /// `-1` when exactly one axis is mirrored (an odd number of flips inverts
    /// the perceived rotation direction), `+1` otherwise.
    #[inline]
    #[must_use]
    pub fn mirror_sign(&self) -> f32 {
        if self.flip_x ^ self.flip_y { -1.0 } else { 1.0 }
    }

    /// Restores every bone to its setup pose.
    pub fn set_to_setup_pose(&mut self) {
        for bone in self.bones.values_mut() {
            bone.set_to_setup_pose();
        }
    }

    /// Recomputes the world transform of every bone from its local pose.
    ///
    /// Mirror flags are applied at the root. Each bone's `applied_rotation`
    /// is set to the rotation used.
    pub fn update_world_transform(&mut self) {
        let flip = Mat2::from_diagonal(Vec2::new(
            if self.flip_x { -1.0 } else { 1.0 },
            if self.flip_y { -1.0 } else { 1.0 },
        ));

        for i in 0..self.order.len() {
            let key = self.order[i];
            let parent_world = self.bones[key].parent.map(|p| self.bones[p].world);

            let bone = &mut self.bones[key];
            bone.applied_rotation = bone.rotation;
            let local = Mat2::from_scale_angle(
                Vec2::new(bone.scale_x, bone.scale_y),
                bone.rotation.to_radians(),
            );
            let offset = Vec2::new(bone.x, bone.y);

            bone.world = match parent_world {
                None => Affine2 {
                    matrix2: flip * local,
                    translation: flip * offset,
                },
                Some(parent) => Affine2 {
                    matrix2: child_linear(bone.data().transform_mode, &parent.matrix2, local, flip),
                    translation: parent.transform_point2(offset),
                },
            };
        }
    }
}

/// Linear part of a child bone's world transform for the given inheritance mode.
fn child_linear(mode: TransformMode, parent: &Mat2, local: Mat2, flip: Mat2) -> Mat2 {
    match mode {
        TransformMode::Normal => *parent * local,
        TransformMode::OnlyTranslation => flip * local,
        TransformMode::NoRotationOrReflection => {
            let sx = parent.x_axis.length();
            let sy = if sx > f32::EPSILON {
                parent.determinant().abs() / sx
            } else {
                parent.y_axis.length()
            };
            flip * Mat2::from_diagonal(Vec2::new(sx, sy)) * local
        }
        TransformMode::NoScale => {
            let unscaled = Mat2::from_cols(
                parent.x_axis.normalize_or_zero(),
                parent.y_axis.normalize_or_zero(),
            );
            unscaled * local
        }
        TransformMode::NoScaleOrReflection => {
            let angle = parent.x_axis.y.atan2(parent.x_axis.x);
            Mat2::from_angle(angle) * local
        }
    }
}
