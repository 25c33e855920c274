//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`RigError`] covers the failure modes of building
//! skeletons and resolving bones:
//! - Bone lookup failures (a binding names a bone the rig does not have)
//! - Malformed skeleton data (bad parent indices, duplicate names)
//! - Stale handles into the scene or the rig
//!
//! Per-frame synchronization never surfaces these as `Err` to the host loop;
//! they are logged and the affected binding skips the current call.
//!
//! # Usage
//!
//! ```rust,ignore
//! use myth_rig::errors::{RigError, Result};
//!
//! fn build() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for rig bindings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RigError {
    // ========================================================================
    // Resolution Errors
    // ========================================================================
    /// The named bone does not exist in the live skeleton.
    #[error("Bone not found: {0}")]
    BoneNotFound(String),

    // ========================================================================
    // Skeleton Data Errors
    // ========================================================================
    /// A bone refers to a parent index that is out of range or not declared
    /// before the bone itself.
    #[error("Invalid parent index for bone '{bone}' (parent index: {parent})")]
    InvalidBoneParent {
        /// Name of the offending bone
        bone: String,
        /// The invalid parent index
        parent: usize,
    },

    /// Two bones share the same name.
    #[error("Duplicate bone name: {0}")]
    DuplicateBoneName(String),

    // ========================================================================
    // Handle Errors
    // ========================================================================
    /// A handle no longer points at a live object.
    #[error("Stale handle: {0}")]
    StaleHandle(&'static str),
}

/// Alias for `Result<T, RigError>`.
pub type Result<T> = std::result::Result<T, RigError>;
