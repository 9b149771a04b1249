//! Recording Backend
//!
//! A CPU-only [`MeshBackend`] that keeps a byte copy of every vertex store and
//! logs uploads and draws. Used by tests and headless runs to observe exactly
//! what the mesh cache sends to the GPU.

use std::collections::BTreeMap;

use glam::Mat4;

use super::backend::{MeshBackend, QUAD_BYTES, VertexStoreId};

/// One `upload_vertices` call.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRecord {
    pub store: VertexStoreId,
    pub offset: u64,
    pub len: usize,
}

/// One `draw_quads` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub store: VertexStoreId,
    pub quad_count: u32,
    pub model: Mat4,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    stores: BTreeMap<VertexStoreId, Vec<u8>>,
    next_id: u32,
    uploads: Vec<UploadRecord>,
    draws: Vec<DrawRecord>,
    released: Vec<VertexStoreId>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of a live store.
    pub fn store_bytes(&self, store: VertexStoreId) -> Option<&[u8]> {
        self.stores.get(&store).map(Vec::as_slice)
    }

    pub fn live_stores(&self) -> usize {
        self.stores.len()
    }

    pub fn uploads(&self) -> &[UploadRecord] {
        &self.uploads
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn released(&self) -> &[VertexStoreId] {
        &self.released
    }

    /// Forget logged uploads and draws; store contents are kept.
    pub fn clear_log(&mut self) {
        self.uploads.clear();
        self.draws.clear();
    }
}

impl MeshBackend for RecordingBackend {
    fn create_vertex_store(&mut self, size_bytes: u64) -> VertexStoreId {
        let id = VertexStoreId(self.next_id);
        self.next_id += 1;
        self.stores.insert(id, vec![0; size_bytes as usize]);
        id
    }

    fn upload_vertices(&mut self, store: VertexStoreId, offset_bytes: u64, data: &[u8]) {
        let Some(bytes) = self.stores.get_mut(&store) else {
            tracing::warn!(?store, "upload to unknown vertex store ignored");
            return;
        };
        let start = (offset_bytes as usize).min(bytes.len());
        let end = (start + data.len()).min(bytes.len());
        if end - start < data.len() {
            tracing::warn!(?store, offset_bytes, len = data.len(), "upload clipped to store size");
        }
        bytes[start..end].copy_from_slice(&data[..end - start]);
        self.uploads.push(UploadRecord {
            store,
            offset: offset_bytes,
            len: data.len(),
        });
    }

    fn draw_quads(&mut self, store: VertexStoreId, quad_count: u32, model: Mat4) {
        let Some(bytes) = self.stores.get(&store) else {
            return;
        };
        let capacity = bytes.len() as u64 / QUAD_BYTES;
        self.draws.push(DrawRecord {
            store,
            quad_count: quad_count.min(capacity as u32),
            model,
        });
    }

    fn release_vertex_store(&mut self, store: VertexStoreId) {
        if self.stores.remove(&store).is_some() {
            self.released.push(store);
        }
    }
}
