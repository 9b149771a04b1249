//! Orientation (Quaternion)
//!
//! Unit quaternion orientation for free-flying bodies and the camera.
//!
//! Convention: vectors are rotated with `conj(q) * v * q`, and [`Orientation::matrix`]
//! produces the matching column-major matrix. Composition is always
//! `new = old.compose(delta)`, i.e. `old * delta`.

use glam::{Mat4, Quat, Vec3, Vec4};

/// Rigid-body orientation stored as a quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation(pub Quat);

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Orientation {
    pub const IDENTITY: Self = Self(Quat::IDENTITY);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self(Quat::from_xyzw(x, y, z, w))
    }

    /// Rotation of `degrees` around `axis`, built from half-angle sine/cosine.
    ///
    /// The axis is not normalized here; pass a unit axis to get a unit quaternion.
    pub fn from_angle(degrees: f32, axis: Vec3) -> Self {
        let (s, c) = (degrees.to_radians() / 2.0).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    pub fn x(self) -> f32 {
        self.0.x
    }

    pub fn y(self) -> f32 {
        self.0.y
    }

    pub fn z(self) -> f32 {
        self.0.z
    }

    pub fn w(self) -> f32 {
        self.0.w
    }

    pub fn length(self) -> f32 {
        Vec4::from(self.0).length()
    }

    /// Unit-length copy.
    ///
    /// A zero quaternion yields NaN components; callers never build one from
    /// non-degenerate axes.
    pub fn normalized(self) -> Self {
        let v = Vec4::from(self.0);
        Self(Quat::from_vec4(v / v.length()))
    }

    /// Hamilton product `self * delta`.
    pub fn compose(self, delta: Self) -> Self {
        Self(self.0 * delta.0)
    }

    pub fn conjugate(self) -> Self {
        Self(self.0.conjugate())
    }

    /// Rotate `v` into this frame: `conj(q) * quat(v, 0) * q`.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let p = Quat::from_xyzw(v.x, v.y, v.z, 0.0);
        let r = self.0.conjugate() * p * self.0;
        Vec3::new(r.x, r.y, r.z)
    }

    /// Column-major 4x4 rotation with zeroed translation slots.
    #[rustfmt::skip]
    pub fn matrix(self) -> [f32; 16] {
        let (x, y, z, w) = (self.0.x, self.0.y, self.0.z, self.0.w);
        let (x2, y2, z2) = (x * x, y * y, z * z);
        let (xy, xz, xw) = (x * y, x * z, x * w);
        let (yz, yw, zw) = (y * z, y * w, z * w);
        [
            1.0 - 2.0 * (y2 + z2), 2.0 * (xy - zw), 2.0 * (xz + yw), 0.0,
            2.0 * (xy + zw), 1.0 - 2.0 * (x2 + z2), 2.0 * (yz - xw), 0.0,
            2.0 * (xz - yw), 2.0 * (yz + xw), 1.0 - 2.0 * (x2 + y2), 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]
    }

    pub fn to_mat4(self) -> Mat4 {
        Mat4::from_cols_array(&self.matrix())
    }

    /// Component-wise lerp toward `target`, then renormalize.
    ///
    /// Used for camera chase smoothing. No shortest-arc flip is applied.
    pub fn approach(self, target: Self, factor: f32) -> Self {
        let from = Vec4::from(self.0);
        let to = Vec4::from(target.0);
        Self(Quat::from_vec4(from + (to - from) * factor)).normalized()
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl From<Quat> for Orientation {
    fn from(q: Quat) -> Self {
        Self(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_angle_is_unit_for_unit_axis() {
        let q = Orientation::from_angle(73.0, Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(q.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotate_matches_matrix() {
        let q = Orientation::from_angle(30.0, Vec3::X)
            .compose(Orientation::from_angle(-50.0, Vec3::Z))
            .normalized();
        let v = Vec3::new(0.3, -1.2, 2.0);
        let by_quat = q.rotate(v);
        let by_matrix = q.to_mat4().transform_point3(v);
        assert_relative_eq!(by_quat.x, by_matrix.x, epsilon = 1e-5);
        assert_relative_eq!(by_quat.y, by_matrix.y, epsilon = 1e-5);
        assert_relative_eq!(by_quat.z, by_matrix.z, epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_direction_convention() {
        // conj-left rotation turns +90 about Z into a clockwise quarter turn.
        let q = Orientation::from_angle(90.0, Vec3::Z);
        let v = q.rotate(Vec3::X);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(v.y, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_matrix_translation_slots_are_zero() {
        let m = Orientation::from_angle(45.0, Vec3::Y).matrix();
        assert_eq!(&m[12..16], &[0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_approach_stays_normalized() {
        let a = Orientation::IDENTITY;
        let b = Orientation::from_angle(120.0, Vec3::X);
        let c = a.approach(b, 0.1);
        assert_relative_eq!(c.length(), 1.0, epsilon = 1e-6);
    }
}
