//! Game State
//!
//! The mode state machine. `Placement` is the initial mode: blocks fall onto
//! the occupancy grid and the player builds a stack. Confirming past the
//! placed depth switches to `Flight` for good: the stack becomes a free body
//! steered by held keys, and debris is spawned for it to eat.
//!
//! All blocks, including the falling one, live in the stack object. During
//! placement the stack sits at the identity pose, so block coordinates are
//! world coordinates and grid cells line up with what is drawn.

use glam::{Mat4, Vec3};
use rand::{SeedableRng, rngs::StdRng};

use crate::audio::AudioTrigger;
use crate::camera::ChaseCamera;
use crate::input::{InputAction, InputState};
use crate::math::{DOWN, FRONT, FreePose, GridPose, LEFT, Orientation, RIGHT};
use crate::render::{MeshBackend, SceneUniforms, VertexStoreId};

use super::block::Block;
use super::config::{ConfigError, GameConfig};
use super::consumption::consume_nearest;
use super::grid::OccupancyGrid;
use super::object::{CompositeObject, DebrisSpawner, Motion};
use super::shapes::ShapeCatalogue;

/// Rotation applied by one rotate press, in degrees about Z.
pub const ROTATE_STEP_DEGREES: f32 = 90.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Placement,
    Flight,
}

/// Whether the frame loop should keep going after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Game {
    config: GameConfig,
    rng: StdRng,
    mode: Mode,
    shapes: ShapeCatalogue,
    grid: OccupancyGrid,
    stack: CompositeObject,
    debris: Vec<CompositeObject>,
    camera: ChaseCamera,
    spawner: DebrisSpawner,
    /// Stores of destroyed objects, freed on the next render
    released: Vec<VertexStoreId>,
    consumed: usize,
}

impl Game {
    /// New game in placement mode with the tetromino catalogue.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_shapes(config, ShapeCatalogue::tetrominoes())
    }

    pub fn with_shapes(config: GameConfig, shapes: ShapeCatalogue) -> Result<Self, ConfigError> {
        config.validate()?;

        let max_cubes = config.render.max_cubes_per_object;
        let spawner = DebrisSpawner::new(&config.flight, max_cubes)?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut stack = CompositeObject::new(max_cubes);
        stack.motion = Motion::Follow {
            target: FreePose::IDENTITY,
            smoothing: config.camera_smoothing,
        };
        let spawn = GridPose::at(Vec3::new(0.0, config.placement.spawn_height, 0.0));
        stack.push_block(Block::new(shapes.choose(&mut rng), spawn));

        let camera = ChaseCamera::tilted(
            config.placement.camera_start,
            config.placement.camera_tilt_degrees,
            config.camera_smoothing,
        );

        tracing::info!(seed = ?config.seed, shapes = shapes.shapes().len(), "game started in placement mode");

        Ok(Self {
            config,
            rng,
            mode: Mode::Placement,
            shapes,
            grid: OccupancyGrid::new(),
            stack,
            debris: Vec::new(),
            camera,
            spawner,
            released: Vec::new(),
            consumed: 0,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn stack(&self) -> &CompositeObject {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut CompositeObject {
        &mut self.stack
    }

    pub fn debris(&self) -> &[CompositeObject] {
        &self.debris
    }

    pub fn debris_mut(&mut self) -> &mut Vec<CompositeObject> {
        &mut self.debris
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn camera(&self) -> &ChaseCamera {
        &self.camera
    }

    /// Blocks eaten since flight began.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// The block under player control, if still placing.
    pub fn falling(&self) -> Option<&Block> {
        match self.mode {
            Mode::Placement => self.stack.last_block(),
            Mode::Flight => None,
        }
    }

    /// Advance one tick.
    pub fn update(&mut self, input: &InputState, audio: &mut dyn AudioTrigger) -> Flow {
        match self.mode {
            Mode::Placement => self.update_placement(input, audio),
            Mode::Flight => self.update_flight(input),
        }
        if input.was_pressed(InputAction::Quit) {
            tracing::info!("quit requested");
            Flow::Quit
        } else {
            Flow::Continue
        }
    }

    // ========================================================================
    // PLACEMENT
    // ========================================================================

    fn update_placement(&mut self, input: &InputState, audio: &mut dyn AudioTrigger) {
        self.stack.tick_blocks();
        self.stack.update();
        self.camera.update();

        for &action in input.pressed() {
            if self.mode != Mode::Placement {
                break;
            }
            match action {
                InputAction::MoveLeft => {
                    self.try_shift(LEFT);
                }
                InputAction::MoveRight => {
                    self.try_shift(RIGHT);
                }
                InputAction::Rotate => {
                    self.try_rotate(ROTATE_STEP_DEGREES);
                }
                InputAction::Drop => self.drop_falling(),
                InputAction::Confirm => self.confirm(audio),
                InputAction::Thrust | InputAction::Quit => {}
            }
        }
    }

    /// Move the falling block's target by `delta` if the grid allows it.
    fn try_shift(&mut self, delta: Vec3) -> bool {
        let Some(block) = self.stack.last_block_mut() else {
            return false;
        };
        let proposal = block.propose_move(delta);
        if self.grid.accepts(&block.target_cubes_snapped()) {
            true
        } else {
            block.revert(proposal);
            tracing::debug!(?delta, "move rejected");
            false
        }
    }

    fn try_rotate(&mut self, degrees: f32) -> bool {
        let Some(block) = self.stack.last_block_mut() else {
            return false;
        };
        let proposal = block.propose_rotate(degrees);
        if self.grid.accepts(&block.target_cubes_snapped()) {
            true
        } else {
            block.revert(proposal);
            tracing::debug!(degrees, "rotation rejected");
            false
        }
    }

    /// Lock the falling block if it rests on the floor or the stack, else move it down.
    fn drop_falling(&mut self) {
        let Some(block) = self.stack.last_block() else {
            return;
        };
        let cells = block.target_cubes_snapped();
        if !self.grid.resting(&cells) {
            self.try_shift(DOWN);
            return;
        }

        self.grid.lock(&cells);
        let z = block.target().position.z;
        let spawn = GridPose::at(Vec3::new(0.0, self.config.placement.spawn_height, z));
        let shape = self.shapes.choose(&mut self.rng);
        self.stack.push_block(Block::new(shape, spawn));
        tracing::debug!(locked = cells.len(), filled = self.grid.len(), "block locked");
    }

    /// Advance the build front; past the placed depth, take off.
    fn confirm(&mut self, audio: &mut dyn AudioTrigger) {
        if !self.try_shift(FRONT) {
            return;
        }
        self.camera.nudge_target(FRONT);

        let Some(falling) = self.stack.last_block() else {
            return;
        };
        if falling.target().position.z > (self.grid.deepest_z() + 1) as f32 {
            self.enter_flight(audio);
        }
    }

    fn enter_flight(&mut self, audio: &mut dyn AudioTrigger) {
        self.stack.pop_block();
        self.stack.motion = Motion::Drift;
        self.stack.velocity = FreePose::IDENTITY;

        self.camera.jump_to(FreePose::at(self.config.flight.camera_start));

        let count = self.config.flight.object_count;
        self.debris = (0..count).map(|_| self.spawner.spawn(&mut self.rng)).collect();
        let cubes: usize = self.debris.iter().map(CompositeObject::len).sum();

        audio.play_background(&self.config.audio.flight_track);
        self.mode = Mode::Flight;
        tracing::info!(
            stack_blocks = self.stack.len(),
            debris = count,
            debris_cubes = cubes,
            "entering flight"
        );
    }

    // ========================================================================
    // FLIGHT
    // ========================================================================

    fn update_flight(&mut self, input: &InputState) {
        let flight = &self.config.flight;
        let stack = &mut self.stack;

        let steering = [
            (InputAction::MoveRight, flight.turn_degrees, Vec3::Y),
            (InputAction::MoveLeft, -flight.turn_degrees, Vec3::Y),
            (InputAction::Drop, -flight.turn_degrees, Vec3::X),
            (InputAction::Rotate, flight.turn_degrees, Vec3::X),
        ];
        for (action, degrees, axis) in steering {
            if input.is_held(action) {
                let axis = stack.pose.relative(axis);
                stack.pose.turn(Orientation::from_angle(degrees, axis));
            }
        }
        if input.is_held(InputAction::Thrust) {
            let thrust = stack.pose.relative(Vec3::new(0.0, 0.0, -flight.thrust));
            stack.velocity.position += thrust;
        }
        stack.apply_drag(flight.drag);

        let pose = self.stack.pose;
        self.camera.set_target(FreePose::new(
            pose.apply(flight.chase_offset),
            pose.orientation,
        ));
        self.camera.update();

        self.stack.tick_blocks();
        self.stack.update();
        for object in &mut self.debris {
            object.tick_blocks();
            object.update();
        }

        let radius = self.config.flight.eat_radius;
        if let Some(report) = consume_nearest(self.stack.pose.position, &mut self.debris, radius) {
            if report.eaten > 0 {
                self.consumed += report.eaten;
                tracing::debug!(
                    object = report.object,
                    eaten = report.eaten,
                    total = self.consumed,
                    "debris eaten"
                );
            }
            if let Some(mut object) = report.removed {
                self.released.extend(object.release_store());
                tracing::info!(remaining = self.debris.len(), total = self.consumed, "debris object consumed");
            }
        }
    }

    // ========================================================================
    // RENDERING
    // ========================================================================

    /// Free stores of destroyed objects, then draw every object.
    pub fn render(&mut self, backend: &mut dyn MeshBackend) {
        for store in self.released.drain(..) {
            backend.release_vertex_store(store);
        }
        self.stack.render(backend);
        for object in &mut self.debris {
            object.render(backend);
        }
    }

    /// Per-frame scene constants for a viewport of `aspect` width/height.
    pub fn scene_uniforms(&self, aspect: f32) -> SceneUniforms {
        let render = &self.config.render;
        SceneUniforms::new(
            self.camera.view_projection(aspect),
            self.camera.light_world(render.light_position),
            render.light_diffuse,
        )
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    /// True if every pose in the world is free of NaN and infinity.
    pub fn is_finite(&self) -> bool {
        self.stack.is_finite()
            && self.camera.pose.is_finite()
            && self.debris.iter().all(CompositeObject::is_finite)
    }
}
