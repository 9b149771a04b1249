//! Camera Module
//!
//! Camera state and projection math. Window-system agnostic.

pub mod chase;

pub use chase::{ChaseCamera, Frustum};
