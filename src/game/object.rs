//! Composite Objects
//!
//! An ordered list of blocks sharing one free pose: the player's stack and
//! every piece of floating debris. The object owns its blocks and the mesh
//! cache derived from them.

use std::collections::HashSet;

use glam::{IVec3, Vec3};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::math::{DIRECTIONS, FreePose, GridPose, Orientation};
use crate::render::{MeshBackend, VertexStoreId};

use super::block::Block;
use super::config::{ConfigError, FlightConfig};
use super::mesh::{CubeMesh, MeshUpdate};
use super::shapes::Shape;

/// How an object's pose evolves each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Apply `velocity` every tick.
    Drift,
    /// Ease toward `target` by `smoothing` per tick.
    Follow { target: FreePose, smoothing: f32 },
}

#[derive(Debug)]
pub struct CompositeObject {
    pub pose: FreePose,
    /// Per-tick translation and rotation delta, used by [`Motion::Drift`]
    pub velocity: FreePose,
    pub motion: Motion,
    blocks: Vec<Block>,
    mesh: CubeMesh,
}

impl CompositeObject {
    /// Empty drifting object at the origin.
    pub fn new(max_cubes: usize) -> Self {
        Self {
            pose: FreePose::IDENTITY,
            velocity: FreePose::IDENTITY,
            motion: Motion::Drift,
            blocks: Vec::new(),
            mesh: CubeMesh::with_capacity(max_cubes),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn mesh(&self) -> &CubeMesh {
        &self.mesh
    }

    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn pop_block(&mut self) -> Option<Block> {
        self.blocks.pop()
    }

    pub fn last_block(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn last_block_mut(&mut self) -> Option<&mut Block> {
        self.blocks.last_mut()
    }

    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    /// Ease every block toward its target. Returns how many moved.
    pub fn tick_blocks(&mut self) -> usize {
        self.blocks.iter_mut().map(Block::tick).filter(|&moved| moved).count()
    }

    /// Advance the pose one tick according to `motion`.
    pub fn update(&mut self) {
        match self.motion {
            Motion::Drift => self.pose.integrate(&self.velocity),
            Motion::Follow { target, smoothing } => self.pose.approach(&target, smoothing),
        }
    }

    /// Scale linear velocity; angular velocity is left alone.
    pub fn apply_drag(&mut self, factor: f32) {
        self.velocity.position *= factor;
    }

    /// World position of a block's pivot at its current pose.
    pub fn world_position(&self, block: &Block) -> Vec3 {
        self.pose.apply(block.current().position)
    }

    /// Remove the blocks at `indices` (any order, duplicates ignored).
    ///
    /// Blocks after the first removed one move to new mesh offsets and are
    /// marked dirty. Returns the number removed.
    pub fn remove_blocks(&mut self, indices: &[usize]) -> usize {
        let doomed: HashSet<usize> = indices.iter().copied().filter(|&i| i < self.blocks.len()).collect();
        let Some(&first) = doomed.iter().min() else {
            return 0;
        };

        let mut index = 0;
        self.blocks.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });
        for block in self.blocks.iter_mut().skip(first) {
            block.mark_dirty();
        }
        doomed.len()
    }

    /// Draw through `backend`, rewriting only changed mesh segments.
    pub fn render(&mut self, backend: &mut dyn MeshBackend) -> MeshUpdate {
        let model = self.pose.matrix();
        self.mesh.render(&self.blocks, model, backend)
    }

    /// Hand back the vertex store so the backend can free it.
    pub fn release_store(&mut self) -> Option<VertexStoreId> {
        self.mesh.release()
    }

    pub fn is_finite(&self) -> bool {
        self.pose.is_finite() && self.velocity.is_finite()
    }
}

/// Builds random debris objects for the flight phase.
#[derive(Clone, Debug)]
pub struct DebrisSpawner {
    position: Normal<f32>,
    spin: Normal<f32>,
    growth_probability: f64,
    max_cubes: usize,
}

impl DebrisSpawner {
    pub fn new(config: &FlightConfig, max_cubes: usize) -> Result<Self, ConfigError> {
        let position = Normal::new(0.0, config.spawn_sigma)
            .map_err(|e| ConfigError::Invalid(format!("flight.spawn_sigma: {e}")))?;
        let spin = Normal::new(0.0, config.spin_sigma)
            .map_err(|e| ConfigError::Invalid(format!("flight.spin_sigma: {e}")))?;
        Ok(Self {
            position,
            spin,
            growth_probability: config.growth_probability,
            max_cubes,
        })
    }

    /// One object: a random walk of unit cubes over the six axis directions,
    /// continuing while a draw falls under the growth probability. Revisited
    /// cells are skipped. The object is placed at a Gaussian position and
    /// spins slowly about a random axis.
    pub fn spawn(&self, rng: &mut impl Rng) -> CompositeObject {
        let mut object = CompositeObject::new(self.max_cubes);
        let mut visited = HashSet::new();
        let mut cell = IVec3::ZERO;

        visited.insert(cell);
        object.push_block(Block::new(Shape::unit_cube(), GridPose::at(cell.as_vec3())));

        while visited.len() < self.max_cubes && rng.r#gen::<f64>() < self.growth_probability {
            cell += DIRECTIONS[rng.gen_range(0..DIRECTIONS.len())].as_ivec3();
            if visited.insert(cell) {
                object.push_block(Block::new(Shape::unit_cube(), GridPose::at(cell.as_vec3())));
            }
        }

        object.pose = FreePose::at(Vec3::new(
            self.position.sample(rng),
            self.position.sample(rng),
            self.position.sample(rng),
        ));
        object.velocity.orientation = Orientation::new(
            self.spin.sample(rng),
            self.spin.sample(rng),
            self.spin.sample(rng),
            1.0,
        )
        .normalized();
        object
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn row(n: usize) -> CompositeObject {
        let mut object = CompositeObject::new(16);
        for i in 0..n {
            object.push_block(Block::new(
                Shape::unit_cube(),
                GridPose::at(Vec3::new(i as f32, 0.0, 0.0)),
            ));
        }
        object
    }

    #[test]
    fn test_drift_applies_velocity() {
        let mut object = row(1);
        object.velocity.position = Vec3::new(0.0, 0.0, -0.5);
        object.update();
        object.update();
        assert_relative_eq!(object.pose.position.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_follow_eases_toward_target() {
        let mut object = row(1);
        object.motion = Motion::Follow {
            target: FreePose::at(Vec3::new(10.0, 0.0, 0.0)),
            smoothing: 0.1,
        };
        object.update();
        assert_relative_eq!(object.pose.position.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_drag_keeps_spin() {
        let mut object = row(1);
        object.velocity = FreePose::new(Vec3::ONE, Orientation::from_angle(1.0, Vec3::Y));
        object.apply_drag(0.5);
        assert_eq!(object.velocity.position, Vec3::splat(0.5));
        assert_relative_eq!(object.velocity.orientation.y(), Orientation::from_angle(1.0, Vec3::Y).y());
    }

    #[test]
    fn test_remove_blocks_marks_followers_dirty() {
        let mut object = row(4);
        for block in 0..4 {
            object.block_mut(block).unwrap().tick();
        }
        let before: Vec<u64> = object.blocks().iter().map(Block::revision).collect();

        assert_eq!(object.remove_blocks(&[1, 1]), 1);
        assert_eq!(object.len(), 3);
        assert_eq!(object.blocks()[0].revision(), before[0]);
        assert!(object.blocks()[1].is_dirty());
        assert!(object.blocks()[2].is_dirty());
    }

    #[test]
    fn test_spawned_debris_is_connected_walk() {
        let config = FlightConfig::default();
        let spawner = DebrisSpawner::new(&config, 1000).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            let object = spawner.spawn(&mut rng);
            assert!(!object.is_empty());
            assert_relative_eq!(object.velocity.orientation.length(), 1.0, epsilon = 1e-6);

            let cells: HashSet<IVec3> = object
                .blocks()
                .iter()
                .map(|b| b.target().position.as_ivec3())
                .collect();
            assert_eq!(cells.len(), object.len(), "no cell is used twice");
        }
    }

    #[test]
    fn test_walk_respects_capacity() {
        let mut config = FlightConfig::default();
        config.growth_probability = 0.999;
        let spawner = DebrisSpawner::new(&config, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            assert!(spawner.spawn(&mut rng).len() <= 5);
        }
    }
}
