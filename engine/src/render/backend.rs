//! Mesh Backend
//!
//! The narrow interface the game core needs from a renderer: vertex stores it
//! can write into, and quad-list draws against them. The wgpu renderer and the
//! recording backend used by tests both implement it.

use glam::Mat4;

use super::vertex::CubeVertex;

/// Handle to a backend-owned vertex store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexStoreId(pub u32);

/// Vertices per quad.
pub const VERTICES_PER_QUAD: u32 = 4;

/// Byte size of one quad's vertices.
pub const QUAD_BYTES: u64 = VERTICES_PER_QUAD as u64 * std::mem::size_of::<CubeVertex>() as u64;

/// Triangle indices that split one quad (v0 v1 v2 v3, in winding order) into two triangles.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Renderer interface for quad meshes of interleaved position+normal vertices.
///
/// Draws are recorded for the current frame; lighting follows the scene
/// uniforms the renderer was given (single point light, Lambertian diffuse).
pub trait MeshBackend {
    /// Allocate a vertex store of `size_bytes`. Contents start zeroed.
    fn create_vertex_store(&mut self, size_bytes: u64) -> VertexStoreId;

    /// Copy `data` into `store` starting at `offset_bytes`.
    fn upload_vertices(&mut self, store: VertexStoreId, offset_bytes: u64, data: &[u8]);

    /// Draw the first `quad_count` quads of `store` with the given model matrix.
    fn draw_quads(&mut self, store: VertexStoreId, quad_count: u32, model: Mat4);

    /// Free a store. Drawing from it afterwards is a no-op.
    fn release_vertex_store(&mut self, store: VertexStoreId);
}

/// Expand `quad_count` quads into triangle-list indices.
pub fn quad_indices(quad_count: u32) -> Vec<u32> {
    (0..quad_count)
        .flat_map(|quad| {
            let base = quad * VERTICES_PER_QUAD;
            QUAD_INDICES.iter().map(move |i| base + i)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_bytes_is_four_vertices() {
        assert_eq!(QUAD_BYTES, 4 * 24);
    }

    #[test]
    fn test_quad_indices_offsets_each_quad() {
        let indices = quad_indices(2);
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }
}
