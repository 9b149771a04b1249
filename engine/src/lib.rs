//! Space Bear Engine Library
//!
//! The spatial core and presentation layer for Space Bear Cathedrals, a small
//! 3D block-stacking game: stack falling blocks on a grid, then fly the
//! finished stack through space eating floating debris.
//!
//! # Modules
//!
//! - [`math`] - Euler and quaternion rotation helpers plus grid and free poses
//! - [`input`] - Platform-agnostic key codes, bindings and per-frame action state
//! - [`camera`] - Chase camera with exponential smoothing
//! - [`render`] - Mesh backend trait, cube vertex format, wgpu cube renderer
//! - [`audio`] - Fire-and-forget background music trigger
//! - [`timing`] - Fixed-rate frame pacing
//! - [`game`] - Blocks, occupancy grid, composite objects and the mode state machine
//!
//! # Example
//!
//! ```ignore
//! use space_bear_engine::audio::RecordedAudio;
//! use space_bear_engine::game::{Game, GameConfig};
//! use space_bear_engine::input::{InputAction, InputState};
//! use space_bear_engine::render::RecordingBackend;
//!
//! let mut game = Game::new(GameConfig::default())?;
//! let mut input = InputState::new();
//! let mut audio = RecordedAudio::default();
//! let mut backend = RecordingBackend::new();
//!
//! input.press(InputAction::MoveLeft);
//! game.update(&input, &mut audio);
//! game.render(&mut backend);
//! input.end_frame();
//! ```

pub mod audio;
pub mod camera;
pub mod input;
pub mod math;
pub mod render;
pub mod timing;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

pub use audio::{AudioTrigger, MusicPlayer, RecordedAudio};
pub use camera::{ChaseCamera, Frustum};
pub use input::{InputAction, InputState, KeyBindings, KeyCode};
pub use math::{FreePose, GridPose, Orientation, Vec3Ext};
pub use render::{CubeVertex, MeshBackend, RecordingBackend, RenderError, VertexStoreId};
pub use timing::FramePacer;
