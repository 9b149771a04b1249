//! Math Tests - Euler Rotation, Quaternions and Poses
//!
//! Property checks over seeded random inputs.

use approx::assert_relative_eq;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use space_bear_engine::math::{FreePose, Orientation, Vec3Ext};

fn random_vec(rng: &mut StdRng, range: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-range..range),
        rng.gen_range(-range..range),
        rng.gen_range(-range..range),
    )
}

// ============================================================================
// Vector3
// ============================================================================

#[test]
fn test_euler_zero_is_identity() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..100 {
        let v = random_vec(&mut rng, 50.0);
        assert_eq!(v.rotated_euler(Vec3::ZERO), v);
    }
}

#[test]
fn test_euler_order_is_x_then_y_then_z() {
    let v = Vec3::new(0.0, 1.0, 0.0);
    // X by 90 sends +Y to -Z; Y by 90 then sends -Z to -X.
    let r = v.rotated_euler(Vec3::new(90.0, 90.0, 0.0));
    assert_relative_eq!(r.x, -1.0, epsilon = 1e-5);
    assert_relative_eq!(r.y, 0.0, epsilon = 1e-5);
    assert_relative_eq!(r.z, 0.0, epsilon = 1e-5);
}

#[test]
fn test_exceeds_is_componentwise() {
    assert!(Vec3::new(0.0, -0.02, 0.0).exceeds(0.01));
    assert!(!Vec3::splat(0.01).exceeds(0.01));
}

// ============================================================================
// Orientation
// ============================================================================

#[test]
fn test_normalized_has_unit_length() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..200 {
        let q = Orientation::new(
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-5.0..5.0),
            rng.gen_range(0.1..5.0),
        );
        assert_relative_eq!(q.normalized().length(), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn test_rotate_preserves_length() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let axis = random_vec(&mut rng, 1.0).normalize_or(Vec3::Y);
        let q = Orientation::from_angle(rng.gen_range(-360.0..360.0), axis);
        let v = random_vec(&mut rng, 20.0);
        assert_relative_eq!(q.rotate(v).length(), v.length(), epsilon = 1e-3);
    }
}

#[test]
fn test_single_axis_euler_matches_quaternion() {
    let mut rng = StdRng::seed_from_u64(4);
    for axis in [Vec3::X, Vec3::Z] {
        for _ in 0..50 {
            let degrees = rng.gen_range(-180.0..180.0);
            let v = random_vec(&mut rng, 10.0);
            let euler = v.rotated_euler(axis * degrees);
            let quat = Orientation::from_angle(degrees, axis).rotate(v);
            assert_relative_eq!(euler.x, quat.x, epsilon = 1e-3);
            assert_relative_eq!(euler.y, quat.y, epsilon = 1e-3);
            assert_relative_eq!(euler.z, quat.z, epsilon = 1e-3);
        }
    }
}

#[test]
fn test_euler_yaw_is_opposite_quaternion_yaw() {
    // The Euler Y step turns +X toward -Z; the quaternion turns it toward +Z.
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..50 {
        let degrees = rng.gen_range(-180.0..180.0);
        let v = random_vec(&mut rng, 10.0);
        let euler = v.rotated_euler(Vec3::Y * degrees);
        let quat = Orientation::from_angle(-degrees, Vec3::Y).rotate(v);
        assert_relative_eq!(euler.x, quat.x, epsilon = 1e-3);
        assert_relative_eq!(euler.y, quat.y, epsilon = 1e-3);
        assert_relative_eq!(euler.z, quat.z, epsilon = 1e-3);
    }
}

// ============================================================================
// Poses
// ============================================================================

#[test]
fn test_drift_keeps_orientation_normalized() {
    let mut pose = FreePose::IDENTITY;
    let velocity = FreePose::new(
        Vec3::new(0.0, 0.0, -0.01),
        Orientation::new(0.01, -0.02, 0.005, 1.0).normalized(),
    );
    for _ in 0..2000 {
        pose.integrate(&velocity);
    }
    assert!(pose.is_finite());
    assert_relative_eq!(pose.orientation.length(), 1.0, epsilon = 1e-5);
    assert_relative_eq!(pose.position.z, -20.0, epsilon = 1e-2);
}
