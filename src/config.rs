//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`PULLSHOT_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use pullshot_game::GameSettings;
use pullshot_physics::MotionRatios;
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Gameplay configuration
    #[serde(default)]
    pub game: GameConfig,
    /// Level selection
    #[serde(default)]
    pub level: LevelConfig,
    /// Headless simulation configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`PULLSHOT_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Optional, never committed
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // PULLSHOT_GAME__COIN_VALUE=10 -> game.coin_value = 10
        figment = figment.merge(Env::prefixed("PULLSHOT_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Gameplay tunables for a new session
    pub fn to_game_settings(&self) -> GameSettings {
        GameSettings {
            tile_size: self.physics.tile_size,
            motion: self.physics.motion,
            mass: self.physics.mass,
            hero_health: self.game.hero_health,
            invulnerability_ms: self.game.invulnerability_ms,
            coin_value: self.game.coin_value,
            coin_expiry_ms: self.game.coin_expiry_ms,
            max_pull_tiles: self.game.max_pull_tiles,
            victory_animation_ms: self.game.victory_animation_ms,
            pause_after_victory_ms: self.game.pause_after_victory_ms,
            enemy_sight_tiles: self.game.enemy_sight_tiles,
            enemy_dash_tiles: self.game.enemy_dash_tiles,
        }
    }
}

/// Physics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Side length of one grid tile in world units
    pub tile_size: f32,
    /// Mass given to every spawned body
    pub mass: f32,
    /// Size-relative acceleration, braking and speed limits
    pub motion: MotionRatios,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let settings = GameSettings::default();
        Self {
            tile_size: settings.tile_size,
            mass: settings.mass,
            motion: settings.motion,
        }
    }
}

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub hero_health: u32,
    /// Grace period after the hero is hit (ms)
    pub invulnerability_ms: f32,
    /// Points per coin
    pub coin_value: i32,
    /// Delay before a picked-up coin is removed (ms)
    pub coin_expiry_ms: f32,
    /// Pull length, in tiles, for a full-speed launch
    pub max_pull_tiles: f32,
    pub victory_animation_ms: f32,
    pub pause_after_victory_ms: f32,
    pub enemy_sight_tiles: f32,
    pub enemy_dash_tiles: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        let settings = GameSettings::default();
        Self {
            hero_health: settings.hero_health,
            invulnerability_ms: settings.invulnerability_ms,
            coin_value: settings.coin_value,
            coin_expiry_ms: settings.coin_expiry_ms,
            max_pull_tiles: settings.max_pull_tiles,
            victory_animation_ms: settings.victory_animation_ms,
            pause_after_victory_ms: settings.pause_after_victory_ms,
            enemy_sight_tiles: settings.enemy_sight_tiles,
            enemy_dash_tiles: settings.enemy_dash_tiles,
        }
    }
}

/// Level selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// RON level file; the built-in level is used when unset
    pub path: Option<PathBuf>,
}

/// Headless simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of frames to run
    pub frames: u32,
    /// Wall-clock time between frames (ms)
    pub frame_interval_ms: u64,
    /// Pull vector for the opening launch [x, y]
    pub launch_pull: [f32; 2],
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frames: 180,
            frame_interval_ms: 16,
            launch_pull: [0.0, -192.0],
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
