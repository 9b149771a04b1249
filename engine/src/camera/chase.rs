//! Chase Camera
//!
//! A free-pose camera that eases toward a target pose each tick. In the
//! building phase only the target position moves (one step per confirmed row);
//! in flight the target follows the stack, orientation included.

use glam::{Mat4, Vec3};

use crate::math::{FreePose, Orientation};

/// Symmetric perspective frustum given by its extent on the near plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    /// Half height of the near-plane window
    pub half_height: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Frustum {
    fn default() -> Self {
        // ±0.8 x ±0.6 at near 1 for an 800x600 window.
        Self {
            half_height: 0.6,
            near: 1.0,
            far: 500.0,
        }
    }
}

impl Frustum {
    /// Vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        2.0 * (self.half_height / self.near).atan()
    }

    /// Right-handed projection with wgpu's 0..1 depth range.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y(), aspect, self.near, self.far)
    }
}

/// Camera with exponential smoothing toward a target pose.
#[derive(Clone, Debug)]
pub struct ChaseCamera {
    pub pose: FreePose,
    pub target: FreePose,
    /// Fraction of the remaining distance covered per tick
    pub smoothing: f32,
    pub frustum: Frustum,
}

impl ChaseCamera {
    pub fn new(pose: FreePose, smoothing: f32) -> Self {
        Self {
            pose,
            target: pose,
            smoothing,
            frustum: Frustum::default(),
        }
    }

    /// Camera at `position`, tilted `tilt_degrees` about the X axis.
    pub fn tilted(position: Vec3, tilt_degrees: f32, smoothing: f32) -> Self {
        Self::new(
            FreePose::new(position, Orientation::from_angle(tilt_degrees, Vec3::X)),
            smoothing,
        )
    }

    /// Place the camera and its target at `pose` with no easing.
    pub fn jump_to(&mut self, pose: FreePose) {
        self.pose = pose;
        self.target = pose;
    }

    /// Shift the target position; orientation is untouched.
    pub fn nudge_target(&mut self, delta: Vec3) {
        self.target.position += delta;
    }

    pub fn set_target(&mut self, target: FreePose) {
        self.target = target;
    }

    /// One smoothing step toward the target.
    pub fn update(&mut self) {
        self.pose.approach(&self.target, self.smoothing);
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.pose.inverse_matrix()
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.frustum.projection(aspect) * self.view_matrix()
    }

    /// World position of a light mounted at `view_space` relative to the camera.
    pub fn light_world(&self, view_space: Vec3) -> Vec3 {
        self.pose.apply(view_space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_update_covers_smoothing_fraction() {
        let mut camera = ChaseCamera::tilted(Vec3::new(1.0, 10.0, 10.0), 30.0, 0.1);
        camera.nudge_target(Vec3::Z);
        camera.update();
        assert_relative_eq!(camera.pose.position.z, 10.1, epsilon = 1e-5);
        // Orientation target equals current, so it holds still.
        assert_relative_eq!(camera.pose.orientation.x(), camera.target.orientation.x(), epsilon = 1e-6);
    }

    #[test]
    fn test_view_matrix_maps_camera_to_origin() {
        let camera = ChaseCamera::tilted(Vec3::new(1.0, 10.0, 10.0), 30.0, 0.1);
        let eye = camera.view_matrix().transform_point3(camera.pose.position);
        assert_relative_eq!(eye.length(), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_light_world_round_trips_through_view() {
        let camera = ChaseCamera::tilted(Vec3::new(1.0, 10.0, 10.0), 30.0, 0.1);
        let light = camera.light_world(Vec3::new(0.0, 3.0, 0.0));
        let eye = camera.view_matrix().transform_point3(light);
        assert_relative_eq!(eye.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(eye.y, 3.0, epsilon = 1e-4);
        assert_relative_eq!(eye.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_frustum_matches_near_plane_extent() {
        let frustum = Frustum::default();
        assert_relative_eq!((frustum.fov_y() / 2.0).tan(), 0.6, epsilon = 1e-6);
    }
}
