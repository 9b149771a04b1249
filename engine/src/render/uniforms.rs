//! Uniform Structs for GPU Shaders
//!
//! Must match the WGSL structs in `shaders/cube.wgsl` exactly.

use glam::{Mat4, Vec3};
use static_assertions::assert_eq_size;

/// Diffuse reflectance of every cube surface.
pub const MATERIAL_DIFFUSE: f32 = 0.8;

/// Per-frame scene data (group 0).
///
/// WGSL layout (96 bytes):
///   offset  0: view_proj (mat4x4<f32>)     = 64 bytes
///   offset 64: light_position (vec4<f32>)  = 16 bytes, w unused
///   offset 80: light_diffuse (vec4<f32>)   = 16 bytes, rgb premultiplied by material
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub light_position: [f32; 4],
    pub light_diffuse: [f32; 4],
}

assert_eq_size!(SceneUniforms, [u8; 96]);

impl SceneUniforms {
    pub fn new(view_proj: Mat4, light_world: Vec3, light_diffuse: Vec3) -> Self {
        let diffuse = light_diffuse * MATERIAL_DIFFUSE;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            light_position: light_world.extend(1.0).to_array(),
            light_diffuse: diffuse.extend(1.0).to_array(),
        }
    }
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Vec3::new(0.0, 3.0, 0.0), Vec3::new(2.0, 1.0, 0.0))
    }
}

/// Per-draw model matrix (group 1, dynamic offset).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    pub model: [[f32; 4]; 4],
}

assert_eq_size!(ModelUniforms, [u8; 64]);

impl From<Mat4> for ModelUniforms {
    fn from(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_uniforms_premultiply_material() {
        let u = SceneUniforms::new(Mat4::IDENTITY, Vec3::ZERO, Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(u.light_diffuse, [1.6, 0.8, 0.0, 1.0]);
    }

    #[test]
    fn test_model_uniforms_column_major() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let u = ModelUniforms::from(m);
        assert_eq!(u.model[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
