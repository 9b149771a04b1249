//! Game Module
//!
//! Blocks, the occupancy grid, composite objects and the mode state machine
//! that tie the engine together into Space Bear Cathedrals.

pub mod block;
pub mod config;
pub mod consumption;
pub mod grid;
pub mod mesh;
pub mod object;
pub mod shapes;
pub mod state;

pub use block::{Block, Cube, Proposal};
pub use config::{
    AudioConfig, ConfigError, FlightConfig, GameConfig, PlacementConfig, RenderConfig, WindowConfig,
};
pub use consumption::{ConsumeReport, consume_nearest, nearest};
pub use grid::OccupancyGrid;
pub use mesh::{CUBE_HALF_EXTENT, CubeMesh, MeshUpdate, VERTICES_PER_CUBE, cube_vertices};
pub use object::{CompositeObject, DebrisSpawner, Motion};
pub use shapes::{Shape, ShapeCatalogue};
pub use state::{Flow, Game, Mode};
