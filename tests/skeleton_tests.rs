//! Skeleton Tests
//!
//! Tests for:
//! - Skeleton construction: parent ordering, name index, error reporting
//! - Transform modes and world transform derivation
//! - Setup pose restore

use glam::Vec2;
use myth_rig::{BoneData, RigError, Skeleton, TransformMode};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Root rotated 30° with uniform scale 2, plus one child per transform mode.
fn modes() -> anyhow::Result<Skeleton> {
    let child = |name: &str, mode| {
        BoneData::new(name)
            .with_parent(0)
            .with_rotation(15.0)
            .with_transform_mode(mode)
    };
    Ok(Skeleton::new(
        "modes",
        vec![
            BoneData::new("root").with_rotation(30.0).with_scale(2.0, 2.0),
            child("normal", TransformMode::Normal),
            child("translation", TransformMode::OnlyTranslation),
            child("no_rotation", TransformMode::NoRotationOrReflection),
            child("no_scale", TransformMode::NoScale),
            child("no_scale_reflection", TransformMode::NoScaleOrReflection),
        ],
    )?)
}

fn bone<'a>(skeleton: &'a Skeleton, name: &str) -> &'a myth_rig::Bone {
    skeleton.bone(skeleton.find_bone(name).unwrap()).unwrap()
}

fn x_scale(skeleton: &Skeleton, name: &str) -> f32 {
    bone(skeleton, name).world_matrix().matrix2.x_axis.length()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn skeleton_indexes_bones_by_name() -> anyhow::Result<()> {
    let skeleton = modes()?;

    assert_eq!(skeleton.bone_count(), 6);
    assert_eq!(skeleton.name, "modes");
    let root = skeleton.root_bone().unwrap();
    assert_eq!(skeleton.find_bone("root"), Some(root));
    assert!(skeleton.find_bone("missing").is_none());

    let names: Vec<&str> = skeleton.bones().map(|(_, b)| b.name()).collect();
    assert_eq!(names[0], "root");
    assert_eq!(names[5], "no_scale_reflection");
    assert_eq!(bone(&skeleton, "normal").parent(), Some(root));
    Ok(())
}

#[test]
fn skeleton_rejects_out_of_order_parent() {
    let err = Skeleton::new(
        "bad",
        vec![BoneData::new("root"), BoneData::new("child").with_parent(4)],
    )
    .unwrap_err();

    assert!(matches!(err, RigError::InvalidBoneParent { parent: 4, .. }));
    assert_eq!(
        err.to_string(),
        "Invalid parent index for bone 'child' (parent index: 4)"
    );
}

#[test]
fn empty_skeleton_has_no_root() -> anyhow::Result<()> {
    let skeleton = Skeleton::new("empty", Vec::new())?;
    assert!(skeleton.root_bone().is_none());
    assert_eq!(skeleton.bone_count(), 0);
    Ok(())
}

// ============================================================================
// Transform Modes
// ============================================================================

#[test]
fn transform_mode_inheritance_flags() {
    assert!(TransformMode::Normal.inherits_rotation());
    assert!(TransformMode::Normal.inherits_scale());
    assert!(!TransformMode::OnlyTranslation.inherits_rotation());
    assert!(!TransformMode::OnlyTranslation.inherits_scale());
    assert!(!TransformMode::NoRotationOrReflection.inherits_rotation());
    assert!(TransformMode::NoRotationOrReflection.inherits_scale());
    assert!(TransformMode::NoScale.inherits_rotation());
    assert!(!TransformMode::NoScale.inherits_scale());
    assert!(TransformMode::NoScaleOrReflection.inherits_rotation());
    assert!(!TransformMode::NoScaleOrReflection.inherits_scale());
}

#[test]
fn world_rotation_per_transform_mode() -> anyhow::Result<()> {
    let skeleton = modes()?;

    assert!(approx(bone(&skeleton, "normal").world_rotation_x(), 45.0));
    assert!(approx(bone(&skeleton, "translation").world_rotation_x(), 15.0));
    assert!(approx(bone(&skeleton, "no_rotation").world_rotation_x(), 15.0));
    assert!(approx(bone(&skeleton, "no_scale").world_rotation_x(), 45.0));
    assert!(approx(bone(&skeleton, "no_scale_reflection").world_rotation_x(), 45.0));
    Ok(())
}

#[test]
fn world_scale_per_transform_mode() -> anyhow::Result<()> {
    let skeleton = modes()?;

    assert!(approx(x_scale(&skeleton, "normal"), 2.0));
    assert!(approx(x_scale(&skeleton, "translation"), 1.0));
    assert!(approx(x_scale(&skeleton, "no_rotation"), 2.0));
    assert!(approx(x_scale(&skeleton, "no_scale"), 1.0));
    assert!(approx(x_scale(&skeleton, "no_scale_reflection"), 1.0));
    Ok(())
}

#[test]
fn reflection_is_dropped_by_no_scale_or_reflection() -> anyhow::Result<()> {
    let mut skeleton = modes()?;
    skeleton.flip_y = true;
    skeleton.update_world_transform();

    // Mirrored root: the x axis points to -30°; the child keeps a proper
    // rotation on top of it.
    let child = bone(&skeleton, "no_scale_reflection").world_matrix().matrix2;
    assert!(child.determinant() > 0.0);
    assert!(approx(bone(&skeleton, "no_scale_reflection").world_rotation_x(), -15.0));

    let mirrored = bone(&skeleton, "normal").world_matrix().matrix2;
    assert!(mirrored.determinant() < 0.0);
    Ok(())
}

#[test]
fn child_translation_is_transformed_by_parent() -> anyhow::Result<()> {
    let skeleton = Skeleton::new(
        "offset",
        vec![
            BoneData::new("root").with_position(1.0, 1.0).with_scale(2.0, 2.0),
            BoneData::new("tip").with_parent(0).with_position(3.0, 0.0),
        ],
    )?;

    let tip = bone(&skeleton, "tip");
    assert!(tip.world_position().distance(Vec2::new(7.0, 1.0)) < EPSILON);
    Ok(())
}

// ============================================================================
// Pose
// ============================================================================

#[test]
fn setup_pose_restores_local_values() -> anyhow::Result<()> {
    let mut skeleton = modes()?;
    let key = skeleton.find_bone("normal").unwrap();
    {
        let b = skeleton.bone_mut(key).unwrap();
        b.x = 9.0;
        b.rotation = 120.0;
        b.applied_rotation = 120.0;
        b.scale_y = 0.1;
    }

    skeleton.set_to_setup_pose();

    let b = skeleton.bone(key).unwrap();
    assert!(approx(b.x, 0.0));
    assert!(approx(b.rotation, 15.0));
    assert!(approx(b.applied_rotation, 15.0));
    assert!(approx(b.scale_y, 1.0));
    Ok(())
}

#[test]
fn update_world_transform_syncs_applied_rotation() -> anyhow::Result<()> {
    let mut skeleton = modes()?;
    let key = skeleton.find_bone("normal").unwrap();
    skeleton.bone_mut(key).unwrap().rotation = 60.0;

    skeleton.update_world_transform();

    let b = skeleton.bone(key).unwrap();
    assert!(approx(b.applied_rotation, 60.0));
    assert!(approx(b.world_rotation_x(), 90.0));
    Ok(())
}
