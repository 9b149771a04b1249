//! Math Module
//!
//! Spatial primitives for cube-based rigid bodies. Storage comes from `glam`;
//! the rotation conventions the game depends on live here:
//!
//! - [`vector`] - Euler rotation in X, Y, Z order, convergence test, grid snapping
//! - [`orientation`] - Unit quaternion with conjugate-left vector rotation
//! - [`pose`] - Grid-aligned (Euler) and free (quaternion) rigid poses

pub mod orientation;
pub mod pose;
pub mod vector;

pub use orientation::Orientation;
pub use pose::{FreePose, GridPose};
pub use vector::{BACK, DIRECTIONS, DOWN, FRONT, LEFT, RIGHT, UP, Vec3Ext};
