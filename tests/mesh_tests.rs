//! Mesh Cache Tests - Incremental Rebuilds Through a Recording Backend
//!
//! The recording backend keeps a byte copy of every vertex store, so these
//! tests can check exactly which segments a render rewrote.

use glam::Vec3;
use space_bear_engine::game::{Block, CompositeObject, Shape, VERTICES_PER_CUBE};
use space_bear_engine::math::{FreePose, GridPose, UP};
use space_bear_engine::render::{CubeVertex, MeshBackend, RecordingBackend};

const VERTEX_BYTES: usize = std::mem::size_of::<CubeVertex>();

fn three_block_object() -> CompositeObject {
    let mut object = CompositeObject::new(8);
    for x in 0..3 {
        object.push_block(Block::new(
            Shape::unit_cube(),
            GridPose::at(Vec3::new(x as f32, 0.0, 0.0)),
        ));
    }
    object
}

fn segment_bytes(bytes: &[u8], block: usize) -> &[u8] {
    let len = VERTICES_PER_CUBE * VERTEX_BYTES;
    &bytes[block * len..(block + 1) * len]
}

#[test]
fn test_first_render_uploads_everything_once() {
    let mut object = three_block_object();
    let mut backend = RecordingBackend::new();

    let update = object.render(&mut backend);
    assert_eq!(update.rebuilt, vec![0, 1, 2]);
    assert_eq!(backend.uploads().len(), 1);
    assert_eq!(backend.uploads()[0].offset, 0);
    assert_eq!(backend.uploads()[0].len, 3 * VERTICES_PER_CUBE * VERTEX_BYTES);
    assert_eq!(backend.draws().len(), 1);
    assert_eq!(backend.draws()[0].quad_count, 18);
}

#[test]
fn test_only_dirty_block_is_rewritten() {
    let mut object = three_block_object();
    let mut backend = RecordingBackend::new();
    object.render(&mut backend);

    let store = object.mesh().store().unwrap();
    let before = backend.store_bytes(store).unwrap().to_vec();
    backend.clear_log();

    // Block #2 starts sliding up; the others stay put.
    let block = object.block_mut(1).unwrap();
    let _ = block.propose_move(UP);
    block.tick();

    let update = object.render(&mut backend);
    assert_eq!(update.rebuilt, vec![1]);

    let after = backend.store_bytes(store).unwrap();
    assert_eq!(segment_bytes(after, 0), segment_bytes(&before, 0));
    assert_ne!(segment_bytes(after, 1), segment_bytes(&before, 1));
    assert_eq!(segment_bytes(after, 2), segment_bytes(&before, 2));

    assert_eq!(backend.uploads().len(), 1);
    let upload = &backend.uploads()[0];
    assert_eq!(upload.offset as usize, VERTICES_PER_CUBE * VERTEX_BYTES);
    assert_eq!(upload.len, VERTICES_PER_CUBE * VERTEX_BYTES);

    assert_eq!(backend.draws().len(), 1);
    assert_eq!(backend.draws()[0].quad_count, 18);
}

#[test]
fn test_removal_rewrites_blocks_after_the_gap() {
    let mut object = three_block_object();
    let mut backend = RecordingBackend::new();
    object.render(&mut backend);
    backend.clear_log();

    assert_eq!(object.remove_blocks(&[0]), 1);
    let update = object.render(&mut backend);

    assert_eq!(update.rebuilt, vec![0, 1]);
    assert_eq!(backend.uploads().len(), 1);
    assert_eq!(backend.uploads()[0].offset, 0);
    assert_eq!(backend.draws()[0].quad_count, 12);
}

#[test]
fn test_draw_uses_object_pose() {
    let mut object = three_block_object();
    object.pose = FreePose::at(Vec3::new(0.0, 0.0, -5.0));
    let mut backend = RecordingBackend::new();
    object.render(&mut backend);

    let model = backend.draws()[0].model;
    assert_eq!(model.w_axis.z, -5.0);
}

#[test]
fn test_released_store_is_recreated_on_next_render() {
    let mut object = three_block_object();
    let mut backend = RecordingBackend::new();
    object.render(&mut backend);

    let old = object.release_store().unwrap();
    backend.release_vertex_store(old);
    object.render(&mut backend);

    assert_eq!(backend.live_stores(), 1);
    assert_ne!(object.mesh().store(), Some(old));
}

