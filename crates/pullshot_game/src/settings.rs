//! Gameplay tuning

use pullshot_physics::{Body, MotionRatios};

/// Tunables for a game session
#[derive(Clone, Debug, PartialEq)]
pub struct GameSettings {
    /// Side length of one grid tile in world units
    pub tile_size: f32,
    /// Size-relative motion constants applied to every spawned body
    pub motion: MotionRatios,
    /// Mass of every spawned body
    pub mass: f32,
    /// Hits the hero can take
    pub hero_health: u32,
    /// Grace period after the hero is hit
    pub invulnerability_ms: f32,
    /// Points per coin
    pub coin_value: i32,
    /// Delay between picking a coin up and removing it
    pub coin_expiry_ms: f32,
    /// Pull length, in tiles, that gives a full-speed launch
    pub max_pull_tiles: f32,
    pub victory_animation_ms: f32,
    pub pause_after_victory_ms: f32,
    /// Enemies chase a hero closer than this many tiles
    pub enemy_sight_tiles: f32,
    /// Enemies dash at a hero closer than this many tiles
    pub enemy_dash_tiles: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            tile_size: 64.0,
            motion: MotionRatios::default(),
            mass: Body::DEFAULT_MASS,
            hero_health: 3,
            invulnerability_ms: 1000.0,
            coin_value: 5,
            coin_expiry_ms: 1000.0,
            max_pull_tiles: 6.0,
            victory_animation_ms: 500.0,
            pause_after_victory_ms: 1000.0,
            enemy_sight_tiles: 6.0,
            enemy_dash_tiles: 2.0,
        }
    }
}

impl GameSettings {
    /// Pull length that gives a full-speed launch, in world units
    pub fn max_pull_distance(&self) -> f32 {
        self.max_pull_tiles * self.tile_size
    }

    /// Total time from reaching the goal to the menu opening
    pub fn victory_duration_ms(&self) -> f32 {
        self.victory_animation_ms + self.pause_after_victory_ms
    }
}
