//! Scalar and angle helpers shared by the binding code.
//!
//! Angles handled here are in **degrees**, the unit skeleton bones store
//! their rotations in. Scene nodes carry quaternions; [`roll_degrees`] and
//! [`roll_to_quat`] convert between the two for the rotation around +Z.

use glam::{EulerRot, Quat, Vec3};

/// Linear interpolation with `t` clamped to `[0, 1]`.
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Wraps `t` into `[0, length)`.
#[inline]
#[must_use]
pub fn repeat(t: f32, length: f32) -> f32 {
    (t - (t / length).floor() * length).clamp(0.0, length)
}

/// Shortest-path interpolation between two angles in degrees.
///
/// The result is not re-wrapped: blending `350` toward `10` by `0.5` yields
/// `360`, which is the same orientation as `0`.
#[inline]
#[must_use]
pub fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
    let mut delta = repeat(b - a, 360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    a + delta * t.clamp(0.0, 1.0)
}

/// Decomposes a rotation into `(pitch, yaw, roll)` degrees, using the Z-X-Y
/// application order (roll first, then pitch, then yaw).
#[inline]
#[must_use]
pub fn euler_degrees(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}

/// Inverse of [`euler_degrees`].
#[inline]
#[must_use]
pub fn quat_from_euler_degrees(euler: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler.y.to_radians(),
        euler.x.to_radians(),
        euler.z.to_radians(),
    )
}

/// Rotation around +Z, in degrees, normalized to `[0, 360)`.
#[inline]
#[must_use]
pub fn roll_degrees(rotation: Quat) -> f32 {
    repeat(euler_degrees(rotation).z, 360.0) % 360.0
}

/// Pure roll rotation (around +Z) from degrees.
#[inline]
#[must_use]
pub fn roll_to_quat(degrees: f32) -> Quat {
    Quat::from_rotation_z(degrees.to_radians())
}

/// Roll of the rotation whose forward axis is +Z and whose up axis is the
/// projection of `up` onto the XY plane.
///
/// A roll of `θ` maps +Y onto `(-sin θ, cos θ)`, so the roll is recovered
/// with `atan2(-up.x, up.y)`. A degenerate `up` (parallel to Z) yields `0`.
#[inline]
#[must_use]
pub fn look_roll_degrees(up: Vec3) -> f32 {
    if up.x.abs() < f32::EPSILON && up.y.abs() < f32::EPSILON {
        return 0.0;
    }
    repeat((-up.x).atan2(up.y).to_degrees(), 360.0) % 360.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn lerp_clamps_weight() {
        assert!(approx(lerp(2.0, 4.0, 0.5), 3.0));
        assert!(approx(lerp(2.0, 4.0, -1.0), 2.0));
        assert!(approx(lerp(2.0, 4.0, 3.0), 4.0));
    }

    #[test]
    fn repeat_wraps_negative_values() {
        assert!(approx(repeat(-340.0, 360.0), 20.0));
        assert!(approx(repeat(725.0, 360.0), 5.0));
        assert!(approx(repeat(0.0, 360.0), 0.0));
    }

    #[test]
    fn lerp_angle_takes_shortest_path() {
        let blended = lerp_angle(350.0, 10.0, 0.5);
        assert!(approx(repeat(blended, 360.0) % 360.0, 0.0), "got {blended}");

        let blended = lerp_angle(10.0, 350.0, 0.5);
        assert!(approx(repeat(blended, 360.0) % 360.0, 0.0), "got {blended}");
    }

    #[test]
    fn lerp_angle_endpoints() {
        assert!(approx(lerp_angle(30.0, 100.0, 0.0), 30.0));
        assert!(approx(lerp_angle(30.0, 100.0, 1.0), 100.0));
        assert!(approx(lerp_angle(-170.0, 170.0, 1.0), -190.0));
    }

    #[test]
    fn roll_roundtrip() {
        for deg in [0.0_f32, 45.0, 90.0, 179.0, 270.0] {
            assert!(approx(roll_degrees(roll_to_quat(deg)), deg), "deg {deg}");
        }
    }

    #[test]
    fn euler_roundtrip_keeps_pitch_and_yaw() {
        let euler = Vec3::new(20.0, 35.0, 60.0);
        let back = euler_degrees(quat_from_euler_degrees(euler));
        assert!(approx(back.x, euler.x));
        assert!(approx(back.y, euler.y));
        assert!(approx(back.z, euler.z));
    }

    #[test]
    fn look_roll_matches_roll_of_up_vector() {
        let up = roll_to_quat(30.0) * Vec3::Y;
        assert!(approx(look_roll_degrees(up), 30.0));
        assert!(approx(look_roll_degrees(Vec3::Z), 0.0));
    }
}
