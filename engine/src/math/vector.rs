//! Vector Helpers
//!
//! Extends `glam::Vec3` with the operations grid-aligned bodies need:
//! sequential Euler rotation, the "any component exceeds" convergence test,
//! and snapping to integer grid cells.

use glam::{IVec3, Vec3};

/// One cell down the stack.
pub const DOWN: Vec3 = Vec3::new(0.0, -1.0, 0.0);
pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const LEFT: Vec3 = Vec3::new(-1.0, 0.0, 0.0);
pub const RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);
/// Toward the camera (+Z), the direction the build front advances.
pub const FRONT: Vec3 = Vec3::new(0.0, 0.0, 1.0);
pub const BACK: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// The six axis-aligned unit steps.
pub const DIRECTIONS: [Vec3; 6] = [UP, DOWN, LEFT, RIGHT, FRONT, BACK];

/// Extension methods for `glam::Vec3`.
///
/// `rotate_euler` mutates in place; every other method returns a new value.
pub trait Vec3Ext: Sized {
    /// Rotate in place by Euler angles in degrees.
    ///
    /// Applies the X rotation, then Y, then Z. Each step rotates one
    /// component pair using the components already updated by the previous
    /// step, so the order is significant.
    fn rotate_euler(&mut self, degrees: Vec3);

    /// Pure version of [`Vec3Ext::rotate_euler`].
    fn rotated_euler(self, degrees: Vec3) -> Self;

    /// True when any component's absolute value exceeds `threshold`.
    ///
    /// This is a near-zero convergence test, not an ordering.
    fn exceeds(self, threshold: f32) -> bool;

    /// Round each component to the nearest integer and return the grid cell.
    fn snap(self) -> IVec3;
}

impl Vec3Ext for Vec3 {
    fn rotate_euler(&mut self, degrees: Vec3) {
        let (sx, cx) = degrees.x.to_radians().sin_cos();
        let (sy, cy) = degrees.y.to_radians().sin_cos();
        let (sz, cz) = degrees.z.to_radians().sin_cos();

        let (y, z) = (self.y * cx + self.z * sx, self.z * cx - self.y * sx);
        self.y = y;
        self.z = z;

        let (x, z) = (self.x * cy + self.z * sy, self.z * cy - self.x * sy);
        self.x = x;
        self.z = z;

        let (x, y) = (self.x * cz + self.y * sz, self.y * cz - self.x * sz);
        self.x = x;
        self.y = y;
    }

    fn rotated_euler(mut self, degrees: Vec3) -> Self {
        self.rotate_euler(degrees);
        self
    }

    fn exceeds(self, threshold: f32) -> bool {
        self.abs().max_element() > threshold
    }

    fn snap(self) -> IVec3 {
        self.round().as_ivec3()
    }
}
