//! Render Module
//!
//! wgpu rendering for cube meshes. Game code only sees the [`MeshBackend`]
//! trait; [`CubeRenderer`] implements it on the GPU and [`RecordingBackend`]
//! implements it in memory for tests.

pub mod backend;
pub mod cube_renderer;
pub mod error;
pub mod gpu_context;
pub mod recording;
pub mod shader;
pub mod uniforms;
pub mod vertex;

// Re-export commonly used types for convenience
pub use backend::{MeshBackend, QUAD_BYTES, QUAD_INDICES, VERTICES_PER_QUAD, VertexStoreId, quad_indices};
pub use cube_renderer::{CubeRenderer, MAX_DRAWS};
pub use error::RenderError;
pub use gpu_context::{GpuContext, GpuContextConfig};
pub use recording::{DrawRecord, RecordingBackend, UploadRecord};
pub use shader::{CUBE_SHADER, create_shader_module, validate_wgsl};
pub use uniforms::{MATERIAL_DIFFUSE, ModelUniforms, SceneUniforms};
pub use vertex::CubeVertex;
