//! Rigid Poses
//!
//! Two pose flavors share the same shape: a position plus an orientation.
//!
//! - [`GridPose`] keeps orientation as Euler degrees and is used by blocks that
//!   stack and rotate in 90 degree steps.
//! - [`FreePose`] keeps orientation as a quaternion and is used by flying
//!   objects and the camera. Its orientation is renormalized after every
//!   incremental update.

use glam::{Mat4, Vec3};

use super::orientation::Orientation;
use super::vector::Vec3Ext;

/// Grid-aligned pose: position and Euler rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridPose {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl GridPose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
    };

    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    /// Map a local point into the pose's frame: rotate, then translate.
    pub fn apply(&self, local: Vec3) -> Vec3 {
        local.rotated_euler(self.rotation) + self.position
    }

    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            position: self.position + delta,
            rotation: self.rotation,
        }
    }

    pub fn rotated(&self, delta_degrees: Vec3) -> Self {
        Self {
            position: self.position,
            rotation: self.rotation + delta_degrees,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}

/// Free pose: position and quaternion orientation.
///
/// When used as a velocity, `position` is the per-tick translation and
/// `orientation` the per-tick rotation delta.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FreePose {
    pub position: Vec3,
    pub orientation: Orientation,
}

impl FreePose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Orientation::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Orientation::IDENTITY,
        }
    }

    /// Map a local point into world space.
    pub fn apply(&self, local: Vec3) -> Vec3 {
        self.orientation.rotate(local) + self.position
    }

    /// Direction `local` expressed in this pose's frame (no translation).
    pub fn relative(&self, local: Vec3) -> Vec3 {
        self.orientation.rotate(local)
    }

    /// Column-major model matrix: orientation matrix with the position in the
    /// translation slots.
    pub fn matrix(&self) -> Mat4 {
        let mut m = self.orientation.matrix();
        m[12] += self.position.x;
        m[13] += self.position.y;
        m[14] += self.position.z;
        Mat4::from_cols_array(&m)
    }

    /// Inverse of [`FreePose::matrix`]; the view matrix when this pose is a camera.
    pub fn inverse_matrix(&self) -> Mat4 {
        let conj = self.orientation.conjugate();
        let mut m = conj.matrix();
        let r = conj.rotate(self.position);
        m[12] -= r.x;
        m[13] -= r.y;
        m[14] -= r.z;
        Mat4::from_cols_array(&m)
    }

    /// Apply one tick of `velocity`: translate, then compose the rotation delta.
    pub fn integrate(&mut self, velocity: &FreePose) {
        self.position += velocity.position;
        self.orientation = self.orientation.compose(velocity.orientation).normalized();
    }

    /// Compose a local rotation delta onto the orientation.
    pub fn turn(&mut self, delta: Orientation) {
        self.orientation = self.orientation.compose(delta).normalized();
    }

    /// Exponential smoothing toward `target` on position and orientation.
    pub fn approach(&mut self, target: &FreePose, factor: f32) {
        self.position += (target.position - self.position) * factor;
        self.orientation = self.orientation.approach(target.orientation, factor);
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.orientation.is_finite()
    }
}
