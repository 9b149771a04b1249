//! Blocks
//!
//! A block is a rigid group of unit cubes with two grid poses:
//!
//! - **target**: the logical pose. Moves and rotations change it, and its
//!   snapped cells are what the occupancy grid checks and locks.
//! - **current**: the visual pose. Each tick it covers a tenth of the
//!   remaining distance to the target until both the position and rotation
//!   gaps are within the settle thresholds.
//!
//! Moves follow apply, check, rollback: `propose_*` changes the target and
//! returns a [`Proposal`] that [`Block::revert`] can undo if the caller's
//! grid check fails.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::{IVec3, Vec3};

use crate::math::{GridPose, Vec3Ext};

use super::shapes::Shape;

/// Fraction of the remaining gap covered per tick.
pub const BLEND: f32 = 0.1;
/// Position gap (any component) below which a block counts as settled.
pub const SETTLE_POSITION: f32 = 0.01;
/// Rotation gap in degrees (any component) below which a block counts as settled.
pub const SETTLE_ROTATION_DEGREES: f32 = 1.0;

// Revisions are unique across all blocks, so a mesh segment stamped with one
// can never be mistaken for another block's geometry.
static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// One cube of a block: centre in the owning object's frame and Euler rotation in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cube {
    pub center: Vec3,
    pub rotation: Vec3,
}

/// Undo record for a tentative target change.
#[must_use = "a rejected proposal must be reverted"]
#[derive(Clone, Copy, Debug)]
pub struct Proposal {
    previous: GridPose,
    was_dirty: bool,
}

#[derive(Clone, Debug)]
pub struct Block {
    shape: Shape,
    current: GridPose,
    target: GridPose,
    dirty: bool,
    revision: u64,
}

impl Block {
    /// New block resting at `pose` (current and target equal).
    pub fn new(shape: Shape, pose: GridPose) -> Self {
        Self {
            shape,
            current: pose,
            target: pose,
            dirty: true,
            revision: next_revision(),
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn current(&self) -> GridPose {
        self.current
    }

    pub fn target(&self) -> GridPose {
        self.target
    }

    fn cubes_at(&self, pose: GridPose) -> impl Iterator<Item = Cube> + '_ {
        self.shape.cubes().iter().map(move |&offset| Cube {
            center: pose.apply(offset),
            rotation: pose.rotation,
        })
    }

    /// Cubes at the interpolated pose, for rendering.
    pub fn current_cubes(&self) -> Vec<Cube> {
        self.cubes_at(self.current).collect()
    }

    /// Grid cells covered at the target pose.
    pub fn target_cubes_snapped(&self) -> Vec<IVec3> {
        self.cubes_at(self.target).map(|c| c.center.snap()).collect()
    }

    fn change_target(&mut self, target: GridPose) -> Proposal {
        let proposal = Proposal {
            previous: self.target,
            was_dirty: self.dirty,
        };
        self.target = target;
        self.mark_dirty();
        proposal
    }

    /// Tentatively translate the target by `delta`.
    pub fn propose_move(&mut self, delta: Vec3) -> Proposal {
        self.change_target(self.target.translated(delta))
    }

    /// Tentatively rotate the target about Z by `degrees`.
    pub fn propose_rotate(&mut self, degrees: f32) -> Proposal {
        self.change_target(self.target.rotated(Vec3::new(0.0, 0.0, degrees)))
    }

    /// Undo a proposal, restoring the previous target and dirty flag.
    pub fn revert(&mut self, proposal: Proposal) {
        self.target = proposal.previous;
        self.dirty = proposal.was_dirty;
    }

    /// Advance the current pose toward the target.
    ///
    /// Returns `true` if the block moved. A block within the settle
    /// thresholds stops moving and is no longer dirty.
    pub fn tick(&mut self) -> bool {
        let dt = self.target.position - self.current.position;
        let dr = self.target.rotation - self.current.rotation;
        if dt.exceeds(SETTLE_POSITION) || dr.exceeds(SETTLE_ROTATION_DEGREES) {
            self.current.position += dt * BLEND;
            self.current.rotation += dr * BLEND;
            self.mark_dirty();
            true
        } else {
            self.dirty = false;
            false
        }
    }

    /// Remaining position gap to the target.
    pub fn position_gap(&self) -> Vec3 {
        self.target.position - self.current.position
    }

    pub fn is_settled(&self) -> bool {
        !self.position_gap().exceeds(SETTLE_POSITION)
            && !(self.target.rotation - self.current.rotation).exceeds(SETTLE_ROTATION_DEGREES)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force the block's mesh segment to be rewritten on the next render.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision = next_revision();
    }

    /// Stamp that changes whenever the block's geometry may have changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{LEFT, UP};
    use approx::assert_relative_eq;

    fn cube_block(position: Vec3) -> Block {
        Block::new(Shape::unit_cube(), GridPose::at(position))
    }

    #[test]
    fn test_new_block_is_settled() {
        let block = cube_block(Vec3::new(0.0, 10.0, 0.0));
        assert!(block.is_settled());
        assert_eq!(block.target_cubes_snapped(), vec![IVec3::new(0, 10, 0)]);
    }

    #[test]
    fn test_tick_moves_a_tenth() {
        let mut block = cube_block(Vec3::ZERO);
        let _ = block.propose_move(UP);
        assert!(block.tick());
        assert_relative_eq!(block.current().position.y, 0.1, epsilon = 1e-6);
        assert!(block.is_dirty());
    }

    #[test]
    fn test_revert_restores_target_and_dirty() {
        let mut block = cube_block(Vec3::ZERO);
        block.tick();
        assert!(!block.is_dirty());

        let proposal = block.propose_move(LEFT);
        assert!(block.is_dirty());
        block.revert(proposal);
        assert_eq!(block.target().position, Vec3::ZERO);
        assert!(!block.is_dirty());
    }

    #[test]
    fn test_rotation_changes_snapped_cells() {
        let shape = Shape::new(vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]);
        let mut block = Block::new(shape, GridPose::at(Vec3::new(0.0, 5.0, 0.0)));
        let _ = block.propose_rotate(90.0);
        assert_eq!(
            block.target_cubes_snapped(),
            vec![IVec3::new(0, 5, 0), IVec3::new(0, 4, 0)]
        );
        // Current pose has not moved yet.
        let cubes = block.current_cubes();
        assert_relative_eq!(cubes[1].center.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mark_dirty_changes_revision() {
        let mut block = cube_block(Vec3::ZERO);
        let before = block.revision();
        block.mark_dirty();
        assert_ne!(block.revision(), before);
    }
}
