//! Cube Mesh Cache
//!
//! CPU mirror of one object's vertex store. Each block owns a contiguous
//! segment of quads; a segment is rewritten only when its block's revision
//! changed or it no longer starts at the write cursor (an earlier block was
//! removed or grew). Clean segments are skipped by advancing the cursor.
//!
//! Per frame at most one upload is issued, covering the span from the first
//! to the last rewritten vertex, followed by one draw of every written quad.

use std::ops::Range;

use glam::{Mat4, Vec3};

use crate::math::Vec3Ext;
use crate::render::{CubeVertex, MeshBackend, VertexStoreId};

use super::block::{Block, Cube};

/// Half the rendered edge of a cube. Slightly under 0.5 to leave visible seams.
pub const CUBE_HALF_EXTENT: f32 = 0.49;
/// 6 faces x 4 vertices.
pub const VERTICES_PER_CUBE: usize = 24;

/// The 24 vertices of one cube: 6 quads, each face's corners in winding order.
pub fn cube_vertices(cube: &Cube) -> [CubeVertex; VERTICES_PER_CUBE] {
    const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0), (1.0, -1.0)];

    let mut out = [CubeVertex::default(); VERTICES_PER_CUBE];
    let mut i = 0;
    for dim in 0..3 {
        for c in [-1.0f32, 1.0] {
            let n = [0.0, 0.0, c, 0.0, 0.0];
            let normal = Vec3::from_slice(&n[dim..dim + 3]).rotated_euler(cube.rotation);
            for (a, b) in CORNERS {
                let d = [a, b, c, a, b];
                let offset = Vec3::from_slice(&d[dim..dim + 3]).rotated_euler(cube.rotation);
                out[i] = CubeVertex::new(cube.center + offset * CUBE_HALF_EXTENT, normal);
                i += 1;
            }
        }
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Segment {
    /// First vertex
    offset: usize,
    /// Vertex count
    len: usize,
    revision: u64,
}

/// Result of one [`CubeMesh::rebuild`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshUpdate {
    /// Indices of blocks whose segments were rewritten
    pub rebuilt: Vec<usize>,
    /// Vertex span that must be uploaded, if any
    pub dirty: Option<Range<usize>>,
    /// Vertices written in total (all blocks that fit)
    pub vertex_count: usize,
}

#[derive(Debug)]
pub struct CubeMesh {
    max_cubes: usize,
    vertices: Vec<CubeVertex>,
    segments: Vec<Segment>,
    vertex_count: usize,
    store: Option<VertexStoreId>,
    warned_overflow: bool,
}

impl CubeMesh {
    /// Mesh cache for up to `max_cubes` cubes.
    pub fn with_capacity(max_cubes: usize) -> Self {
        Self {
            max_cubes,
            vertices: Vec::new(),
            segments: Vec::new(),
            vertex_count: 0,
            store: None,
            warned_overflow: false,
        }
    }

    pub fn max_cubes(&self) -> usize {
        self.max_cubes
    }

    pub fn capacity_bytes(&self) -> u64 {
        (self.max_cubes * VERTICES_PER_CUBE * std::mem::size_of::<CubeVertex>()) as u64
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn quad_count(&self) -> u32 {
        (self.vertex_count / 4) as u32
    }

    pub fn vertices(&self) -> &[CubeVertex] {
        &self.vertices[..self.vertex_count]
    }

    /// Vertex range of block `index`'s segment, if it was written.
    pub fn segment(&self, index: usize) -> Option<Range<usize>> {
        self.segments
            .get(index)
            .map(|s| s.offset..s.offset + s.len)
    }

    pub fn store(&self) -> Option<VertexStoreId> {
        self.store
    }

    /// Bring the CPU mirror up to date with `blocks`.
    pub fn rebuild(&mut self, blocks: &[Block]) -> MeshUpdate {
        let mut update = MeshUpdate::default();
        let mut cursor = 0;
        let mut written = 0;

        for (index, block) in blocks.iter().enumerate() {
            let len = block.shape().len() * VERTICES_PER_CUBE;

            if let Some(segment) = self.segments.get(index) {
                if segment.offset == cursor && segment.len == len && segment.revision == block.revision() {
                    cursor += len;
                    written = index + 1;
                    continue;
                }
            }

            if cursor + len > self.max_cubes * VERTICES_PER_CUBE {
                if !self.warned_overflow {
                    tracing::warn!(
                        max_cubes = self.max_cubes,
                        blocks = blocks.len(),
                        "object exceeds mesh capacity, remaining blocks not drawn"
                    );
                    self.warned_overflow = true;
                }
                break;
            }

            if self.vertices.len() < cursor + len {
                self.vertices.resize(cursor + len, CubeVertex::default());
            }
            let mut at = cursor;
            for cube in block.current_cubes() {
                self.vertices[at..at + VERTICES_PER_CUBE].copy_from_slice(&cube_vertices(&cube));
                at += VERTICES_PER_CUBE;
            }

            let segment = Segment {
                offset: cursor,
                len,
                revision: block.revision(),
            };
            if index < self.segments.len() {
                self.segments[index] = segment;
            } else {
                self.segments.push(segment);
            }

            update.dirty = Some(match update.dirty {
                Some(range) => range.start..cursor + len,
                None => cursor..cursor + len,
            });
            update.rebuilt.push(index);
            cursor += len;
            written = index + 1;
        }

        self.segments.truncate(written);
        self.vertex_count = cursor;
        update.vertex_count = cursor;
        update
    }

    /// Rebuild, upload what changed and draw every written quad.
    pub fn render(&mut self, blocks: &[Block], model: Mat4, backend: &mut dyn MeshBackend) -> MeshUpdate {
        let store = match self.store {
            Some(store) => store,
            None => {
                let store = backend.create_vertex_store(self.capacity_bytes());
                self.store = Some(store);
                store
            }
        };

        let update = self.rebuild(blocks);
        if let Some(range) = update.dirty.clone() {
            let offset = (range.start * std::mem::size_of::<CubeVertex>()) as u64;
            backend.upload_vertices(store, offset, bytemuck::cast_slice(&self.vertices[range]));
        }
        if self.vertex_count > 0 {
            backend.draw_quads(store, self.quad_count(), model);
        }
        update
    }

    /// Give up the vertex store; the next render allocates and rewrites everything.
    pub fn release(&mut self) -> Option<VertexStoreId> {
        self.segments.clear();
        self.vertex_count = 0;
        self.store.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::game::shapes::Shape;
    use crate::math::GridPose;
    use crate::render::RecordingBackend;

    #[test]
    fn test_cube_vertices_face_layout() {
        let cube = Cube {
            center: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::ZERO,
        };
        let v = cube_vertices(&cube);
        // First face: dim 0, c = -1 -> offsets (-1,-1,-1) and normal (0,0,-1).
        assert_eq!(v[0].normal, [0.0, 0.0, -1.0]);
        assert_relative_eq!(v[0].position[0], 0.51, epsilon = 1e-6);
        assert_relative_eq!(v[0].position[2], 2.51, epsilon = 1e-6);
        // Last face: dim 2, c = 1 -> offsets rotate to (c, a, b), normal (1,0,0).
        assert_eq!(v[23].normal, [1.0, 0.0, 0.0]);
        assert_relative_eq!(v[23].position[0], 1.49, epsilon = 1e-6);
    }

    #[test]
    fn test_clean_render_uploads_nothing() {
        let blocks = vec![Block::new(Shape::unit_cube(), GridPose::IDENTITY)];
        let mut mesh = CubeMesh::with_capacity(4);
        let mut backend = RecordingBackend::new();

        mesh.render(&blocks, Mat4::IDENTITY, &mut backend);
        assert_eq!(backend.uploads().len(), 1);

        backend.clear_log();
        let update = mesh.render(&blocks, Mat4::IDENTITY, &mut backend);
        assert!(update.rebuilt.is_empty());
        assert!(backend.uploads().is_empty());
        assert_eq!(backend.draws().len(), 1);
        assert_eq!(backend.draws()[0].quad_count, 6);
    }

    #[test]
    fn test_overflow_stops_writing() {
        let blocks: Vec<_> = (0..3)
            .map(|i| Block::new(Shape::unit_cube(), GridPose::at(Vec3::new(i as f32, 0.0, 0.0))))
            .collect();
        let mut mesh = CubeMesh::with_capacity(2);
        let update = mesh.rebuild(&blocks);
        assert_eq!(update.rebuilt, vec![0, 1]);
        assert_eq!(update.vertex_count, 2 * VERTICES_PER_CUBE);
    }

    #[test]
    fn test_release_forgets_store() {
        let blocks = vec![Block::new(Shape::unit_cube(), GridPose::IDENTITY)];
        let mut mesh = CubeMesh::with_capacity(1);
        let mut backend = RecordingBackend::new();
        mesh.render(&blocks, Mat4::IDENTITY, &mut backend);
        let store = mesh.release();
        assert!(store.is_some());
        assert!(mesh.store().is_none());
        assert_eq!(mesh.vertex_count(), 0);
    }
}
