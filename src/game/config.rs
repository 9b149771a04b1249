//! Game Configuration
//!
//! Every tunable of the game in one serde struct. All fields have defaults,
//! so a JSON file only needs the values it wants to change:
//!
//! ```json
//! { "flight": { "object_count": 20 }, "seed": 7 }
//! ```
//!
//! [`GameConfig::from_env`] reads the file named by `SPACE_BEAR_CONFIG`, else
//! `space_bear.json` in the working directory if present, else defaults.

use std::fmt;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "SPACE_BEAR_CONFIG";

/// Config file picked up from the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "space_bear.json";

// ============================================================================
// ERRORS
// ============================================================================

/// Errors from loading or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    /// A value is out of its allowed range.
    Invalid(String),
    /// A shape catalogue must hold at least one non-empty shape.
    EmptyShapeCatalogue,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config {}: {}", path.display(), source)
            }
            ConfigError::Json { path, source } => {
                write!(f, "invalid config {}: {}", path.display(), source)
            }
            ConfigError::Invalid(msg) => write!(f, "invalid config value: {}", msg),
            ConfigError::EmptyShapeCatalogue => write!(f, "shape catalogue is empty"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// SECTIONS
// ============================================================================

/// Window and frame loop settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// MSAA sample count (1, 2, 4 or 8)
    pub msaa_samples: u32,
    /// Fixed update/render rate
    pub tick_rate_hz: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Space Bear Cathedrals".to_string(),
            width: 800,
            height: 600,
            vsync: true,
            msaa_samples: 4,
            tick_rate_hz: 60,
        }
    }
}

/// Scene presentation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Background color (RGB)
    pub clear_color: [f32; 3],
    /// Point light position relative to the camera (view space)
    pub light_position: Vec3,
    /// Point light diffuse color; values above 1 are allowed
    pub light_diffuse: Vec3,
    /// Vertex store capacity per object, in cubes
    pub max_cubes_per_object: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.2, 0.3, 0.4],
            light_position: Vec3::new(0.0, 3.0, 0.0),
            light_diffuse: Vec3::new(2.0, 1.0, 0.0),
            max_cubes_per_object: 1000,
        }
    }
}

/// Building phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Height at which new falling blocks appear
    pub spawn_height: f32,
    pub camera_start: Vec3,
    /// Downward tilt of the building camera about X, in degrees
    pub camera_tilt_degrees: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            spawn_height: 10.0,
            camera_start: Vec3::new(1.0, 10.0, 10.0),
            camera_tilt_degrees: 30.0,
        }
    }
}

/// Flight phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Debris objects spawned on entering flight
    pub object_count: usize,
    /// Standard deviation of debris positions around the origin, per axis
    pub spawn_sigma: f32,
    /// Standard deviation of the random angular velocity components
    pub spin_sigma: f32,
    /// Chance that a debris random walk takes another step
    pub growth_probability: f64,
    /// Steering rate per tick, in degrees
    pub turn_degrees: f32,
    /// Velocity added per tick of thrust
    pub thrust: f32,
    /// Linear velocity multiplier per tick
    pub drag: f32,
    /// Blocks closer than this to the stack are eaten
    pub eat_radius: f32,
    /// Camera offset in the stack's frame
    pub chase_offset: Vec3,
    pub camera_start: Vec3,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            object_count: 100,
            spawn_sigma: 100.0,
            spin_sigma: 0.01,
            growth_probability: 0.95,
            turn_degrees: 2.0,
            thrust: 0.01,
            drag: 0.99,
            eat_radius: 1.0,
            chase_offset: Vec3::new(0.0, 2.0, 10.0),
            camera_start: Vec3::new(0.0, 0.0, 20.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Background track started on entering flight; skipped if missing
    pub flight_track: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            flight_track: PathBuf::from("sbc1.ogg"),
        }
    }
}

// ============================================================================
// GAME CONFIG
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub placement: PlacementConfig,
    pub flight: FlightConfig,
    pub audio: AudioConfig,
    /// Camera easing factor per tick (0 < s <= 1)
    pub camera_smoothing: f32,
    /// RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            render: RenderConfig::default(),
            placement: PlacementConfig::default(),
            flight: FlightConfig::default(),
            audio: AudioConfig::default(),
            camera_smoothing: 0.1,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Config from `SPACE_BEAR_CONFIG`, else `space_bear.json`, else defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::load(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load(local);
        }
        Ok(Self::default())
    }

    /// Reject values the game loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg.to_string())) };

        if self.window.width == 0 || self.window.height == 0 {
            return invalid("window size must be non-zero");
        }
        if !matches!(self.window.msaa_samples, 1 | 2 | 4 | 8) {
            return invalid("window.msaa_samples must be 1, 2, 4 or 8");
        }
        if self.window.tick_rate_hz == 0 {
            return invalid("window.tick_rate_hz must be positive");
        }
        if self.render.max_cubes_per_object == 0 {
            return invalid("render.max_cubes_per_object must be positive");
        }
        if !(self.camera_smoothing > 0.0 && self.camera_smoothing <= 1.0) {
            return invalid("camera_smoothing must be in (0, 1]");
        }
        // A block spawned below the floor would lock cells under y = 0.
        if !(self.placement.spawn_height.is_finite() && self.placement.spawn_height >= 0.0) {
            return invalid("placement.spawn_height must be finite and non-negative");
        }
        let flight = &self.flight;
        // A walk that always continues never ends.
        if !(flight.growth_probability >= 0.0 && flight.growth_probability < 1.0) {
            return invalid("flight.growth_probability must be in [0, 1)");
        }
        if !(flight.spawn_sigma.is_finite() && flight.spawn_sigma >= 0.0) {
            return invalid("flight.spawn_sigma must be finite and non-negative");
        }
        if !(flight.spin_sigma.is_finite() && flight.spin_sigma >= 0.0) {
            return invalid("flight.spin_sigma must be finite and non-negative");
        }
        if !(flight.drag >= 0.0 && flight.drag <= 1.0) {
            return invalid("flight.drag must be in [0, 1]");
        }
        if !(flight.eat_radius.is_finite() && flight.eat_radius >= 0.0) {
            return invalid("flight.eat_radius must be finite and non-negative");
        }
        if !flight.turn_degrees.is_finite() || !flight.thrust.is_finite() {
            return invalid("flight steering values must be finite");
        }
        Ok(())
    }
}
