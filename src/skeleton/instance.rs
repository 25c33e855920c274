use crate::skeleton::Skeleton;

/// The component that owns a live skeleton on behalf of a rig.
///
/// A skeleton that has been swapped out or is still loading is held with
/// `loaded == false`; bindings treat such an instance as unusable.
#[derive(Debug, Clone)]
pub struct SkeletonInstance {
    skeleton: Skeleton,
    loaded: bool,
}

impl SkeletonInstance {
    /// Wraps a ready-to-use skeleton.
    #[must_use]
    pub fn new(skeleton: Skeleton) -> Self {
        Self {
            skeleton,
            loaded: true,
        }
    }

    /// Wraps a skeleton whose data is not usable yet.
    #[must_use]
    pub fn unloaded(skeleton: Skeleton) -> Self {
        Self {
            skeleton,
            loaded: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.loaded
    }

    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    #[inline]
    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }
}
